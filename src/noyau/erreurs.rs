// src/noyau/erreurs.rs
//
// Taxonomie d’erreurs du noyau.
// - ErreurLecture       : texte source mal formé (montré à l’utilisateur)
// - ErreurConfiguration : résolution / mode invalides (bug appelant, échec immédiat)
// - ErreurSurface       : union des deux, retournée par `evaluer`
//
// Les singularités numériques (1/0, log(0), débordement) ne sont PAS des erreurs :
// elles sont bornées point par point dans grille.rs.

use thiserror::Error;

/// Nature d’une erreur de lecture.
#[derive(Error, Clone, Debug, PartialEq, Eq)]
pub enum GenreErreur {
    #[error("entrée vide")]
    EntreeVide,

    #[error("caractère inattendu: '{0}'")]
    CaractereInattendu(char),

    #[error("nombre invalide: {0}")]
    NombreInvalide(String),

    #[error("identifiant inconnu: {0}")]
    IdentifiantInconnu(String),

    #[error("fonction sans parenthèses: {0}")]
    FonctionSansParentheses(String),

    #[error("parenthèse non fermée")]
    ParentheseNonFermee,

    #[error("parenthèse fermante sans ouvrante")]
    ParentheseNonOuverte,

    #[error("opérande manquant")]
    OperandeManquant,

    #[error("jeton inattendu: {0}")]
    JetonInattendu(String),

    #[error("{fonction} attend {attendus} argument(s), reçu {recus}")]
    Arite {
        fonction: String,
        attendus: usize,
        recus: usize,
    },

    #[error("virgule hors d’un appel de fonction")]
    VirguleHorsFonction,

    #[error("expression trop profonde (plus de {0} niveaux)")]
    ExpressionTropProfonde(usize),

    #[error("expression trop longue (plus de {0} nœuds)")]
    ExpressionTropLongue(usize),
}

/// ParseError : position (indice de caractère, 0-based) + raison.
#[derive(Error, Clone, Debug, PartialEq, Eq)]
#[error("{genre} (position {position})")]
pub struct ErreurLecture {
    pub position: usize,
    pub genre: GenreErreur,
}

impl ErreurLecture {
    pub fn new(position: usize, genre: GenreErreur) -> Self {
        Self { position, genre }
    }
}

#[derive(Error, Clone, Copy, Debug, PartialEq, Eq)]
pub enum ErreurConfiguration {
    #[error("résolution nulle: la grille demande au moins 1 subdivision par unité")]
    ResolutionNulle,

    #[error("mode de tracé inconnu: {0}")]
    ModeInconnu(u8),
}

#[derive(Error, Clone, Debug, PartialEq, Eq)]
pub enum ErreurSurface {
    #[error("lecture: {0}")]
    Lecture(#[from] ErreurLecture),

    #[error("configuration: {0}")]
    Configuration(#[from] ErreurConfiguration),
}
