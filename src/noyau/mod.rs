//! Noyau surface complexe
//!
//! Organisation interne :
//! - erreurs.rs  : erreurs de lecture / configuration (positionnées)
//! - complexe.rs : arithmétique complexe (branches principales, gamma, zeta, bornage)
//! - jetons.rs   : tokenisation
//! - rpn.rs      : shunting-yard validant + construction Expr
//! - expr.rs     : AST complexe + registre des fonctions + affichage canonique
//! - grille.rs   : balayage de la grille, modes de tracé, buffers plats
//! - eval.rs     : pipeline complet

pub mod complexe;
pub mod erreurs;
pub mod eval;
pub mod expr;
pub mod grille;
pub mod jetons;
pub mod rpn;

#[cfg(test)]
mod tests_scientifiques;

#[cfg(test)]
mod tests_fuzz_safe;

#[cfg(test)]
mod tests_proprietes;

// API publique minimale
pub use complexe::SENTINELLE;
pub use erreurs::{ErreurConfiguration, ErreurLecture, ErreurSurface, GenreErreur};
pub use eval::{analyser, compiler, evaluer, evaluer_ou_identite, DemarcheNoyau};
pub use expr::Expr;
pub use grille::{ModeTrace, ParametresSurface, SortieSurface};
