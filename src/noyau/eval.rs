//! Noyau : pipeline réel
//!
//! source -> jetons -> RPN -> Expr -> balayage de la grille -> buffers
//!
//! Remarque : la lecture est pure (même texte => même arbre), l’arbre peut donc
//! être gardé tant que le texte ne change pas et réévalué pour chaque mode.

use super::erreurs::{ErreurLecture, ErreurSurface};
use super::expr::{Expr, VARIABLE};
use super::grille::{evaluer_grille, ParametresSurface, SortieSurface};
use super::jetons::{format_tokens, tokenize};
use super::rpn::{format_rpn, from_rpn, to_rpn};

#[derive(Default, Clone, Debug, PartialEq, Eq)]
pub struct DemarcheNoyau {
    pub jetons: String,
    pub rpn: String,
    pub arbre: String,
    pub note: String,
}

/// Lit `source` avec la variable libre par défaut (`z`).
pub fn analyser(source: &str) -> Result<Expr, ErreurLecture> {
    analyser_avec_variable(source, VARIABLE)
}

/// Lit `source` ; `variable` est le nom de l’unique variable libre.
pub fn analyser_avec_variable(source: &str, variable: &str) -> Result<Expr, ErreurLecture> {
    compiler_avec_variable(source, variable).map(|(e, _)| e)
}

/// Lit `source` et garde la démarche (jetons, RPN, arbre) pour l’affichage.
pub fn compiler(source: &str) -> Result<(Expr, DemarcheNoyau), ErreurLecture> {
    compiler_avec_variable(source, VARIABLE)
}

fn compiler_avec_variable(
    source: &str,
    variable: &str,
) -> Result<(Expr, DemarcheNoyau), ErreurLecture> {
    let variable = variable.to_lowercase();
    let fin = source.chars().count();

    // 1) Jetons
    let jetons = tokenize(source)?;

    // 2) RPN (valide la syntaxe)
    let rpn = to_rpn(&jetons, &variable, fin)?;

    // 3) AST (Expr)
    let expr = from_rpn(&rpn)?;

    let d = DemarcheNoyau {
        jetons: format_tokens(jetons.iter().map(|j| &j.tok)),
        rpn: format_rpn(&rpn),
        arbre: expr.to_string(),
        note: format!(
            "Pipeline: jetons → RPN → Expr ({} noeuds) → grille.",
            expr.taille()
        ),
    };

    Ok((expr, d))
}

/// API publique : lit puis évalue sur la grille.
///
/// La configuration est vérifiée AVANT la lecture : une configuration invalide
/// est un bug de l’appelant, pas une faute de frappe.
pub fn evaluer(source: &str, params: &ParametresSurface) -> Result<SortieSurface, ErreurSurface> {
    params.valider()?;
    let expr = analyser(source)?;
    Ok(evaluer_grille(&expr, params)?)
}

/// Variante “appelant tolérant” : si la lecture échoue, trace l’identité `z`
/// et rend l’erreur à côté (pour l’afficher), sans interrompre l’application.
pub fn evaluer_ou_identite(
    source: &str,
    params: &ParametresSurface,
) -> Result<(SortieSurface, Option<ErreurLecture>), ErreurSurface> {
    params.valider()?;

    let (expr, erreur) = match analyser(source) {
        Ok(e) => (e, None),
        Err(e) => {
            tracing::warn!(erreur = %e, "lecture impossible, repli sur l’identité");
            (Expr::identite(), Some(e))
        }
    };

    let sortie = evaluer_grille(&expr, params)?;
    Ok((sortie, erreur))
}
