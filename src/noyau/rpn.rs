// src/noyau/rpn.rs
//
// Shunting-yard -> RPN -> AST
// Objectif:
// - Convertir une suite de Jeton en RPN (postfix), en validant la syntaxe au passage
// - Puis reconstruire Expr
//
// Grammaire acceptée (précédence croissante):
//   expr  := term (('+' | '-') term)*
//   term  := unary (('*' | '/') unary)*
//   unary := '-' unary | power
//   power := atom ('^' unary)?                 (associatif à droite)
//   atom  := nombre | imaginaire | constante | variable
//          | '(' expr ')' | fonction '(' expr (',' expr)* ')'
//
// Règles:
// - Un état `attend_operande` détecte le moins unaire ET les erreurs
//   (opérateur sans opérande, deux valeurs collées, virgule orpheline).
// - Moins unaire : opérateur préfixe de précédence 3 (entre '*' et '^'),
//   donc "-z^2" = -(z^2) et "2^-z" = 2^(-z).
// - Fonctions : le nom doit être suivi de '(' ; l’arité est vérifiée à ')'.
// - Pas de multiplication implicite : "2z" et "(z)(z)" sont refusés.

use num_complex::Complex64;

use super::erreurs::{ErreurLecture, GenreErreur};
use super::expr::{constante, est_fonction, Expr, Fonction, OpBinaire, OpUnaire};
use super::jetons::{format_tok, Jeton, Tok};

/// Élément de la RPN (position = caractère source d’origine).
#[derive(Clone, Debug, PartialEq)]
pub enum ElementRpn {
    Valeur(Complex64),
    Variable,
    Neg,
    Op(OpBinaire),
    Appel(Fonction),
}

/// Élément de la pile d’opérateurs.
enum Pile {
    Binaire(OpBinaire, usize),
    Neg(usize),
    // '(' ; `appel` = Some(nom, position du nom) si c’est une parenthèse d’appel
    Ouvrante {
        position: usize,
        appel: Option<(String, usize)>,
        virgules: usize,
    },
}

fn precedence(op: OpBinaire) -> i32 {
    match op {
        OpBinaire::Add | OpBinaire::Sub => 1,
        OpBinaire::Mul | OpBinaire::Div => 2,
        OpBinaire::Pow => 4,
    }
}

const PRECEDENCE_NEG: i32 = 3;

fn is_right_associative(op: OpBinaire) -> bool {
    matches!(op, OpBinaire::Pow)
}

fn err(position: usize, genre: GenreErreur) -> ErreurLecture {
    ErreurLecture::new(position, genre)
}

/// Dépile les opérateurs qui doivent sortir avant `op` (arrêt sur '(').
fn depiler_avant(
    op: OpBinaire,
    ops: &mut Vec<Pile>,
    out: &mut Vec<(ElementRpn, usize)>,
) {
    loop {
        let p_top = match ops.last() {
            Some(Pile::Binaire(top, _)) => precedence(*top),
            Some(Pile::Neg(_)) => PRECEDENCE_NEG,
            Some(Pile::Ouvrante { .. }) | None => break,
        };
        let p_tok = precedence(op);

        let doit_pop = if is_right_associative(op) {
            p_top > p_tok
        } else {
            p_top >= p_tok
        };
        if !doit_pop {
            break;
        }

        match ops.pop() {
            Some(Pile::Binaire(top, pos)) => out.push((ElementRpn::Op(top), pos)),
            Some(Pile::Neg(pos)) => out.push((ElementRpn::Neg, pos)),
            _ => break,
        }
    }
}

/// Dépile jusqu’à la '(' la plus proche (non retirée). false si aucune.
fn depiler_jusqu_ouvrante(ops: &mut Vec<Pile>, out: &mut Vec<(ElementRpn, usize)>) -> bool {
    loop {
        match ops.last() {
            Some(Pile::Ouvrante { .. }) => return true,
            None => return false,
            _ => {}
        }
        match ops.pop() {
            Some(Pile::Binaire(op, pos)) => out.push((ElementRpn::Op(op), pos)),
            Some(Pile::Neg(pos)) => out.push((ElementRpn::Neg, pos)),
            _ => return false,
        }
    }
}

/// Convertit une suite de jetons en RPN (notation polonaise inversée).
///
/// `fin` = longueur de la source en caractères (position des erreurs de fin d’entrée).
///
/// Exemple:
///   jetons: [Ident("sin"), LPar, Ident("z"), Caret, Num(2), RPar]
///   rpn:    [Variable, Valeur(2), Op(Pow), Appel(Sin)]
pub fn to_rpn(
    jetons: &[Jeton],
    variable: &str,
    fin: usize,
) -> Result<Vec<(ElementRpn, usize)>, ErreurLecture> {
    if jetons.is_empty() {
        return Err(err(0, GenreErreur::EntreeVide));
    }

    let mut out: Vec<(ElementRpn, usize)> = Vec::with_capacity(jetons.len());
    let mut ops: Vec<Pile> = Vec::new();

    // true au début, après un opérateur, '(' ou ','
    let mut attend_operande = true;

    let mut k = 0;
    while k < jetons.len() {
        let Jeton { tok, position } = &jetons[k];
        let pos = *position;
        k += 1;

        let inattendu = || err(pos, GenreErreur::JetonInattendu(format_tok(tok)));

        match tok {
            Tok::Num(v) | Tok::Imag(v) => {
                if !attend_operande {
                    return Err(inattendu());
                }
                let c = if matches!(tok, Tok::Imag(_)) {
                    Complex64::new(0.0, *v)
                } else {
                    Complex64::new(*v, 0.0)
                };
                out.push((ElementRpn::Valeur(c), pos));
                attend_operande = false;
            }

            Tok::Ident(name) => {
                if !attend_operande {
                    return Err(inattendu());
                }

                if name == variable {
                    out.push((ElementRpn::Variable, pos));
                    attend_operande = false;
                } else if est_fonction(name) {
                    // fonction : '(' obligatoire juste après, consommée ici
                    match jetons.get(k) {
                        Some(Jeton {
                            tok: Tok::LPar,
                            position: p_par,
                        }) => {
                            ops.push(Pile::Ouvrante {
                                position: *p_par,
                                appel: Some((name.clone(), pos)),
                                virgules: 0,
                            });
                            k += 1;
                        }
                        _ => {
                            return Err(err(
                                pos,
                                GenreErreur::FonctionSansParentheses(name.clone()),
                            ))
                        }
                    }
                } else if let Some(c) = constante(name) {
                    out.push((ElementRpn::Valeur(c), pos));
                    attend_operande = false;
                } else {
                    return Err(err(pos, GenreErreur::IdentifiantInconnu(name.clone())));
                }
            }

            Tok::LPar => {
                if !attend_operande {
                    return Err(inattendu());
                }
                ops.push(Pile::Ouvrante {
                    position: pos,
                    appel: None,
                    virgules: 0,
                });
            }

            Tok::RPar => {
                if attend_operande {
                    // "f()" : rien n’a été empilé depuis la '(' d’appel => erreur d’arité
                    if let Some(Pile::Ouvrante {
                        appel: Some((name, p_nom)),
                        virgules: 0,
                        ..
                    }) = ops.last()
                    {
                        let genre = match Fonction::resoudre(name, 0) {
                            Err(g) => g,
                            Ok(_) => GenreErreur::OperandeManquant,
                        };
                        return Err(err(*p_nom, genre));
                    }
                    return Err(err(pos, GenreErreur::OperandeManquant));
                }

                if !depiler_jusqu_ouvrante(&mut ops, &mut out) {
                    return Err(err(pos, GenreErreur::ParentheseNonOuverte));
                }

                if let Some(Pile::Ouvrante {
                    appel: Some((name, p_nom)),
                    virgules,
                    ..
                }) = ops.pop()
                {
                    let f = Fonction::resoudre(&name, virgules + 1).map_err(|g| err(p_nom, g))?;
                    out.push((ElementRpn::Appel(f), p_nom));
                }

                attend_operande = false;
            }

            Tok::Virgule => {
                if attend_operande {
                    return Err(err(pos, GenreErreur::OperandeManquant));
                }
                if !depiler_jusqu_ouvrante(&mut ops, &mut out) {
                    return Err(err(pos, GenreErreur::VirguleHorsFonction));
                }
                match ops.last_mut() {
                    Some(Pile::Ouvrante {
                        appel: Some(_),
                        virgules,
                        ..
                    }) => *virgules += 1,
                    _ => return Err(err(pos, GenreErreur::VirguleHorsFonction)),
                }
                attend_operande = true;
            }

            Tok::Minus if attend_operande => {
                // moins unaire : préfixe, rien à dépiler
                ops.push(Pile::Neg(pos));
            }

            Tok::Plus | Tok::Minus | Tok::Star | Tok::Slash | Tok::Caret => {
                if attend_operande {
                    return Err(err(pos, GenreErreur::OperandeManquant));
                }
                let op = match tok {
                    Tok::Plus => OpBinaire::Add,
                    Tok::Minus => OpBinaire::Sub,
                    Tok::Star => OpBinaire::Mul,
                    Tok::Slash => OpBinaire::Div,
                    _ => OpBinaire::Pow,
                };
                depiler_avant(op, &mut ops, &mut out);
                ops.push(Pile::Binaire(op, pos));
                attend_operande = true;
            }
        }
    }

    if attend_operande {
        return Err(err(fin, GenreErreur::OperandeManquant));
    }

    // vide la pile ops
    while let Some(op) = ops.pop() {
        match op {
            Pile::Binaire(op, pos) => out.push((ElementRpn::Op(op), pos)),
            Pile::Neg(pos) => out.push((ElementRpn::Neg, pos)),
            Pile::Ouvrante { position, .. } => {
                return Err(err(position, GenreErreur::ParentheseNonFermee))
            }
        }
    }

    Ok(out)
}

/// Garde-fous de l’arbre lu : profondeur (évaluation et affichage récursifs) et taille.
pub const PROFONDEUR_MAX: usize = 256;
pub const MAX_NOEUDS: usize = 200_000;

/// Construit une Expr à partir d’une RPN validée.
///
/// Chaque entrée de pile porte la profondeur de son sous-arbre ; un arbre qui
/// dépasse PROFONDEUR_MAX ou MAX_NOEUDS est refusé à la position de l’élément fautif.
pub fn from_rpn(rpn: &[(ElementRpn, usize)]) -> Result<Expr, ErreurLecture> {
    let mut st: Vec<(Expr, usize)> = Vec::new();
    let mut noeuds: usize = 0;

    for (el, pos) in rpn.iter() {
        let manque = || err(*pos, GenreErreur::OperandeManquant);

        noeuds += 1;
        if noeuds > MAX_NOEUDS {
            return Err(err(*pos, GenreErreur::ExpressionTropLongue(MAX_NOEUDS)));
        }

        let (e, profondeur) = match el {
            ElementRpn::Valeur(c) => (Expr::Lit(*c), 1),
            ElementRpn::Variable => (Expr::Var, 1),

            ElementRpn::Neg => {
                let (x, p) = st.pop().ok_or_else(manque)?;
                (Expr::Unaire(OpUnaire::Neg, Box::new(x)), p + 1)
            }

            ElementRpn::Op(op) => {
                let (b, pb) = st.pop().ok_or_else(manque)?;
                let (a, pa) = st.pop().ok_or_else(manque)?;
                (Expr::Binaire(*op, Box::new(a), Box::new(b)), pa.max(pb) + 1)
            }

            ElementRpn::Appel(f) => {
                let n = f.arite();
                if st.len() < n {
                    return Err(manque());
                }
                let args = st.split_off(st.len() - n);
                let p = args.iter().map(|(_, p)| *p).max().unwrap_or(0);
                let args = args.into_iter().map(|(a, _)| a).collect();
                (Expr::Appel(*f, args), p + 1)
            }
        };

        if profondeur > PROFONDEUR_MAX {
            return Err(err(*pos, GenreErreur::ExpressionTropProfonde(PROFONDEUR_MAX)));
        }
        st.push((e, profondeur));
    }

    let (racine, _) = st.pop().ok_or_else(|| err(0, GenreErreur::EntreeVide))?;
    if !st.is_empty() {
        return Err(err(0, GenreErreur::OperandeManquant));
    }
    Ok(racine)
}

/// Format utilitaire (“démarche”) : RPN en texte.
pub fn format_rpn(rpn: &[(ElementRpn, usize)]) -> String {
    rpn.iter()
        .map(|(el, _)| match el {
            ElementRpn::Valeur(c) => Expr::Lit(*c).to_string(),
            ElementRpn::Variable => super::expr::VARIABLE.to_string(),
            ElementRpn::Neg => "neg".to_string(),
            ElementRpn::Op(op) => op.symbole().to_string(),
            ElementRpn::Appel(f) if f.arite() == 1 => f.nom().to_string(),
            ElementRpn::Appel(f) => format!("{}/{}", f.nom(), f.arite()),
        })
        .collect::<Vec<_>>()
        .join(" ")
}
