// src/noyau/expr.rs
//
// Arbre d’expression complexe (une seule variable libre).
// - Lit     : littéral complexe (nombres, i, pi, e)
// - Var     : la variable libre (le point de la grille)
// - Unaire  : moins unaire
// - Binaire : + - * / ^
// - Appel   : fonction du registre + arguments
//
// IMPORTANT :
// - Arbre immuable après construction, aucune référence partagée (Box / Vec).
// - evaluer() ne panique jamais : les singularités sortent en inf/NaN,
//   c’est la grille qui borne.
// - Display = forme canonique entièrement parenthésée, relisible par le parseur.

use num_complex::Complex64;
use std::f64::consts::{E, PI};
use std::fmt;

use super::complexe::{
    digamma, diviser, gamma, ln_gamma, log_base, polygamma, puissance, reel, zeta, zeta_termes,
};
use super::erreurs::GenreErreur;

/// Nom de la variable libre (fixe).
pub const VARIABLE: &str = "z";

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum OpUnaire {
    Neg,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum OpBinaire {
    Add,
    Sub,
    Mul,
    Div,
    Pow,
}

impl OpBinaire {
    pub fn symbole(self) -> &'static str {
        match self {
            OpBinaire::Add => "+",
            OpBinaire::Sub => "-",
            OpBinaire::Mul => "*",
            OpBinaire::Div => "/",
            OpBinaire::Pow => "^",
        }
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum Fonction {
    Sin,
    Cos,
    Tan,
    Csc,
    Sec,
    Cot,
    Sinh,
    Cosh,
    Tanh,
    Csch,
    Sech,
    Coth,
    Asin,
    Acos,
    Atan,
    Acsc,
    Asec,
    Acot,
    Asinh,
    Acosh,
    Atanh,
    Acsch,
    Asech,
    Acoth,
    Exp,
    Ln,
    LogBase,
    Sqrt,
    Cbrt,
    Conj,
    Inv,
    Re,
    Im,
    Abs,
    Arg,
    Gamma,
    LnGamma,
    Digamma,
    Trigamma,
    Polygamma,
    Zeta,
    ZetaTermes,
}

/// Registre : (nom, fonction, arité). Un même nom peut exister avec deux arités (log).
/// Le premier nom listé pour une fonction est son nom canonique.
const REGISTRE: &[(&str, Fonction, usize)] = &[
    ("sin", Fonction::Sin, 1),
    ("cos", Fonction::Cos, 1),
    ("tan", Fonction::Tan, 1),
    ("csc", Fonction::Csc, 1),
    ("sec", Fonction::Sec, 1),
    ("cot", Fonction::Cot, 1),
    ("sinh", Fonction::Sinh, 1),
    ("cosh", Fonction::Cosh, 1),
    ("tanh", Fonction::Tanh, 1),
    ("csch", Fonction::Csch, 1),
    ("sech", Fonction::Sech, 1),
    ("coth", Fonction::Coth, 1),
    ("asin", Fonction::Asin, 1),
    ("acos", Fonction::Acos, 1),
    ("atan", Fonction::Atan, 1),
    ("acsc", Fonction::Acsc, 1),
    ("asec", Fonction::Asec, 1),
    ("acot", Fonction::Acot, 1),
    ("asinh", Fonction::Asinh, 1),
    ("acosh", Fonction::Acosh, 1),
    ("atanh", Fonction::Atanh, 1),
    ("acsch", Fonction::Acsch, 1),
    ("asech", Fonction::Asech, 1),
    ("acoth", Fonction::Acoth, 1),
    ("exp", Fonction::Exp, 1),
    ("log", Fonction::Ln, 1),
    ("ln", Fonction::Ln, 1),
    ("log", Fonction::LogBase, 2),
    ("sqrt", Fonction::Sqrt, 1),
    ("cbrt", Fonction::Cbrt, 1),
    ("conj", Fonction::Conj, 1),
    ("inv", Fonction::Inv, 1),
    ("re", Fonction::Re, 1),
    ("im", Fonction::Im, 1),
    ("abs", Fonction::Abs, 1),
    ("norm", Fonction::Abs, 1),
    ("mod", Fonction::Abs, 1),
    ("arg", Fonction::Arg, 1),
    ("gamma", Fonction::Gamma, 1),
    ("lngamma", Fonction::LnGamma, 1),
    ("digamma", Fonction::Digamma, 1),
    ("trigamma", Fonction::Trigamma, 1),
    ("polygamma", Fonction::Polygamma, 2),
    ("zeta", Fonction::Zeta, 1),
    ("zetac", Fonction::ZetaTermes, 2),
];

/// Constantes nommées.
pub fn constante(nom: &str) -> Option<Complex64> {
    match nom {
        "pi" => Some(reel(PI)),
        "e" => Some(reel(E)),
        _ => None,
    }
}

/// Un identifiant est-il un nom de fonction (toutes arités confondues) ?
pub fn est_fonction(nom: &str) -> bool {
    REGISTRE.iter().any(|(n, _, _)| *n == nom)
}

impl Fonction {
    /// Résout un nom + nombre d’arguments.
    pub fn resoudre(nom: &str, nb_args: usize) -> Result<Fonction, GenreErreur> {
        let mut candidats = REGISTRE.iter().filter(|(n, _, _)| *n == nom).peekable();

        let attendus = match candidats.peek() {
            Some((_, _, arite)) => *arite,
            None => return Err(GenreErreur::IdentifiantInconnu(nom.to_string())),
        };

        candidats
            .find(|(_, _, arite)| *arite == nb_args)
            .map(|(_, f, _)| *f)
            .ok_or_else(|| GenreErreur::Arite {
                fonction: nom.to_string(),
                attendus,
                recus: nb_args,
            })
    }

    pub fn nom(self) -> &'static str {
        REGISTRE
            .iter()
            .find(|(_, f, _)| *f == self)
            .map(|(n, _, _)| *n)
            .unwrap_or("?")
    }

    pub fn arite(self) -> usize {
        REGISTRE
            .iter()
            .find(|(_, f, _)| *f == self)
            .map(|(_, _, a)| *a)
            .unwrap_or(1)
    }

    /// Applique la fonction ; `b` n’est lu que par les fonctions binaires.
    pub fn appliquer(self, a: Complex64, b: Complex64) -> Complex64 {
        use Fonction::*;

        let un = reel(1.0);
        match self {
            Sin => a.sin(),
            Cos => a.cos(),
            Tan => a.tan(),
            Csc => diviser(un, a.sin()),
            Sec => diviser(un, a.cos()),
            Cot => diviser(un, a.tan()),

            Sinh => a.sinh(),
            Cosh => a.cosh(),
            Tanh => a.tanh(),
            Csch => diviser(un, a.sinh()),
            Sech => diviser(un, a.cosh()),
            Coth => diviser(un, a.tanh()),

            Asin => a.asin(),
            Acos => a.acos(),
            Atan => a.atan(),
            Acsc => diviser(un, a).asin(),
            Asec => diviser(un, a).acos(),
            Acot => diviser(un, a).atan(),

            Asinh => a.asinh(),
            Acosh => a.acosh(),
            Atanh => a.atanh(),
            Acsch => diviser(un, a).asinh(),
            Asech => diviser(un, a).acosh(),
            Acoth => diviser(un, a).atanh(),

            Exp => a.exp(),
            Ln => a.ln(),
            LogBase => log_base(a, b),
            Sqrt => a.sqrt(),
            Cbrt => a.cbrt(),
            Conj => a.conj(),
            Inv => diviser(un, a),

            Re => reel(a.re),
            Im => reel(a.im),
            Abs => reel(a.norm()),
            // arg ∈ (-π, π] : le -0.0 de conj(-x) ne doit pas donner -π
            Arg => {
                let t = a.arg();
                reel(if t == -PI { PI } else { t })
            }

            Gamma => gamma(a),
            LnGamma => ln_gamma(a),
            Digamma => digamma(a),
            Trigamma => polygamma(a, 1),
            // ordre et nombre de termes : partie entière du module (conversion saturante)
            Polygamma => polygamma(a, b.norm() as u32),
            Zeta => zeta(a),
            ZetaTermes => zeta_termes(a, b.norm() as usize),
        }
    }
}

#[derive(Clone, Debug, PartialEq)]
pub enum Expr {
    Lit(Complex64),
    Var,
    Unaire(OpUnaire, Box<Expr>),
    Binaire(OpBinaire, Box<Expr>, Box<Expr>),
    Appel(Fonction, Vec<Expr>),
}

impl Expr {
    /// L’identité f(z) = z (repli quand la lecture échoue).
    pub fn identite() -> Expr {
        Expr::Var
    }

    /// Évalue l’arbre avec la variable liée à `z`.
    pub fn evaluer(&self, z: Complex64) -> Complex64 {
        match self {
            Expr::Lit(c) => *c,
            Expr::Var => z,

            Expr::Unaire(OpUnaire::Neg, x) => -x.evaluer(z),

            Expr::Binaire(op, a, b) => {
                let a = a.evaluer(z);
                let b = b.evaluer(z);
                match op {
                    OpBinaire::Add => a + b,
                    OpBinaire::Sub => a - b,
                    OpBinaire::Mul => a * b,
                    OpBinaire::Div => diviser(a, b),
                    OpBinaire::Pow => puissance(a, b),
                }
            }

            Expr::Appel(f, args) => {
                let a = args.first().map_or(z, |x| x.evaluer(z));
                let b = args.get(1).map_or(reel(0.0), |x| x.evaluer(z));
                f.appliquer(a, b)
            }
        }
    }

    /// Nombre de noeuds (affiché dans la démarche).
    pub fn taille(&self) -> usize {
        match self {
            Expr::Lit(_) | Expr::Var => 1,
            Expr::Unaire(_, x) => 1 + x.taille(),
            Expr::Binaire(_, a, b) => 1 + a.taille() + b.taille(),
            Expr::Appel(_, args) => 1 + args.iter().map(Expr::taille).sum::<usize>(),
        }
    }
}

impl fmt::Display for Expr {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Expr::Lit(c) => {
                if c.im == 0.0 {
                    write!(f, "{}", c.re)
                } else if c.re == 0.0 {
                    write!(f, "{}i", c.im)
                } else {
                    write!(f, "({} + {}i)", c.re, c.im)
                }
            }
            Expr::Var => write!(f, "{VARIABLE}"),
            Expr::Unaire(OpUnaire::Neg, x) => write!(f, "(-{x})"),
            Expr::Binaire(op, a, b) => write!(f, "({a} {} {b})", op.symbole()),
            Expr::Appel(fonction, args) => {
                write!(f, "{}(", fonction.nom())?;
                for (k, a) in args.iter().enumerate() {
                    if k > 0 {
                        write!(f, ", ")?;
                    }
                    write!(f, "{a}")?;
                }
                write!(f, ")")
            }
        }
    }
}
