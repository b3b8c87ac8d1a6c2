// src/noyau/jetons.rs

use super::erreurs::{ErreurLecture, GenreErreur};

#[derive(Clone, Debug, PartialEq)]
pub enum Tok {
    Num(f64),
    // littéral imaginaire : "3i" -> Imag(3), "i" -> Imag(1)
    Imag(f64),

    // Fonctions, constantes, variable : le parse (RPN->Expr) décide.
    Ident(String),

    Plus,
    Minus,
    Star,
    Slash,
    Caret, // ^ ou **

    LPar,
    RPar,
    Virgule,
}

/// Jeton + indice (en caractères) de son premier caractère dans la source.
#[derive(Clone, Debug, PartialEq)]
pub struct Jeton {
    pub tok: Tok,
    pub position: usize,
}

fn est_alnum(c: char) -> bool {
    c.is_ascii_alphanumeric() || c == '_'
}

/// Tokenize une chaîne en jetons.
/// Supporte:
/// - nombres décimaux (ex: 12, 0.5, .5, 1.5e-3)
/// - suffixe imaginaire collé (ex: 3i, 2.5i)
/// - opérateurs + - * / ^ ** et la virgule
/// - parenthèses ( )
/// - π (équivaut à ident("pi")), √ (équivaut à ident("sqrt"))
/// - identifiants [a-zA-Z_][a-zA-Z0-9_]* (normalisés en minuscules ; "i" seul = unité imaginaire)
pub fn tokenize(s: &str) -> Result<Vec<Jeton>, ErreurLecture> {
    let mut out = Vec::new();
    let chars: Vec<char> = s.chars().collect();
    let mut i: usize = 0;

    let mut pousser = |tok: Tok, position: usize| out.push(Jeton { tok, position });

    while i < chars.len() {
        let c = chars[i];
        let debut = i;

        if c.is_whitespace() {
            i += 1;
            continue;
        }

        // Opérateurs + parenthèses
        let simple = match c {
            '(' => Some(Tok::LPar),
            ')' => Some(Tok::RPar),
            ',' => Some(Tok::Virgule),
            '+' => Some(Tok::Plus),
            '-' => Some(Tok::Minus),
            '/' => Some(Tok::Slash),
            '^' => Some(Tok::Caret),
            _ => None,
        };
        if let Some(tok) = simple {
            pousser(tok, debut);
            i += 1;
            continue;
        }

        // '*' ou '**'
        if c == '*' {
            if i + 1 < chars.len() && chars[i + 1] == '*' {
                pousser(Tok::Caret, debut);
                i += 2;
            } else {
                pousser(Tok::Star, debut);
                i += 1;
            }
            continue;
        }

        if c == 'π' {
            pousser(Tok::Ident("pi".to_string()), debut);
            i += 1;
            continue;
        }
        if c == '√' {
            pousser(Tok::Ident("sqrt".to_string()), debut);
            i += 1;
            continue;
        }

        // Identifiants ASCII : [a-zA-Z_][a-zA-Z0-9_]*
        if c.is_ascii_alphabetic() || c == '_' {
            i += 1;
            while i < chars.len() && est_alnum(chars[i]) {
                i += 1;
            }
            let word: String = chars[debut..i].iter().collect();
            let w = word.to_lowercase();

            if w == "i" {
                pousser(Tok::Imag(1.0), debut);
            } else {
                pousser(Tok::Ident(w), debut);
            }
            continue;
        }

        // Nombre : \d*(\.\d*)?([eE][+-]?\d+)? avec au moins un chiffre
        let commence_nombre = c.is_ascii_digit()
            || (c == '.' && i + 1 < chars.len() && chars[i + 1].is_ascii_digit());
        if commence_nombre {
            while i < chars.len() && chars[i].is_ascii_digit() {
                i += 1;
            }
            if i < chars.len() && chars[i] == '.' {
                i += 1;
                while i < chars.len() && chars[i].is_ascii_digit() {
                    i += 1;
                }
            }

            // exposant seulement s’il est complet (sinon "2e" = 2 puis ident e)
            if i < chars.len() && (chars[i] == 'e' || chars[i] == 'E') {
                let mut j = i + 1;
                if j < chars.len() && (chars[j] == '+' || chars[j] == '-') {
                    j += 1;
                }
                if j < chars.len() && chars[j].is_ascii_digit() {
                    while j < chars.len() && chars[j].is_ascii_digit() {
                        j += 1;
                    }
                    i = j;
                }
            }

            let texte: String = chars[debut..i].iter().collect();
            let valeur = texte
                .parse::<f64>()
                .ok()
                .filter(|v| v.is_finite())
                .ok_or_else(|| {
                    ErreurLecture::new(debut, GenreErreur::NombreInvalide(texte.clone()))
                })?;

            // suffixe imaginaire collé : "3i" mais pas "3in"
            let suffixe_i = i < chars.len()
                && (chars[i] == 'i' || chars[i] == 'I')
                && !(i + 1 < chars.len() && est_alnum(chars[i + 1]));
            if suffixe_i {
                i += 1;
                pousser(Tok::Imag(valeur), debut);
            } else {
                pousser(Tok::Num(valeur), debut);
            }
            continue;
        }

        return Err(ErreurLecture::new(
            debut,
            GenreErreur::CaractereInattendu(c),
        ));
    }

    Ok(out)
}

/// Texte d’un jeton, tel qu’il se relit.
pub fn format_tok(t: &Tok) -> String {
    match t {
        Tok::Num(v) => format!("{v}"),
        Tok::Imag(v) => format!("{v}i"),
        Tok::Ident(name) => name.clone(),

        Tok::Plus => "+".to_string(),
        Tok::Minus => "-".to_string(),
        Tok::Star => "*".to_string(),
        Tok::Slash => "/".to_string(),
        Tok::Caret => "^".to_string(),

        Tok::LPar => "(".to_string(),
        Tok::RPar => ")".to_string(),
        Tok::Virgule => ",".to_string(),
    }
}

/// Format utilitaire (debug/“démarche”) : liste de jetons en texte.
pub fn format_tokens<'a>(tokens: impl IntoIterator<Item = &'a Tok>) -> String {
    tokens
        .into_iter()
        .map(format_tok)
        .collect::<Vec<_>>()
        .join(" ")
}
