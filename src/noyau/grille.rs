// src/noyau/grille.rs
//
// Balayage de la grille : z = re + i·im sur [-L, L]², pas 1/n, ordre ligne par ligne.
//
// Contrats :
// - positions.len() == 3 * points, canaux.len() == points, points = (2Ln + 1)²
// - ordre stable : idx -> (re = idx / (segments+1), im = idx % (segments+1)),
//   identique à celui d’un maillage plan de même résolution
// - aucun NaN / inf dans la sortie : bornage AVANT le choix des canaux
// - fonction pure de (expr, paramètres) : aucun état caché

use num_complex::Complex64;

use super::complexe::{argument_normalise, borner_complexe};
use super::erreurs::ErreurConfiguration;
use super::expr::Expr;

/// Demi-étendue L du domaine (la grille couvre [-L, L] sur chaque axe).
pub const DEMI_ETENDUE: u32 = 10;

/// Résolution par défaut (subdivisions par unité).
pub const RESOLUTION_DEFAUT: u32 = 10;

/// Quel canal devient la hauteur, lequel devient la couleur.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Default)]
pub enum ModeTrace {
    /// hauteur = Re, couleur = Im
    #[default]
    ReelImag,
    /// hauteur = Im, couleur = Re
    ImagReel,
    /// hauteur = |w|, couleur = arg(w) / 2π dans [0, 1)
    ModuleArgument,
}

impl ModeTrace {
    pub const TOUS: [ModeTrace; 3] = [
        ModeTrace::ReelImag,
        ModeTrace::ImagReel,
        ModeTrace::ModuleArgument,
    ];

    /// Code numérique côté collaborateurs (wasm, ligne de commande…).
    pub fn depuis_code(code: u8) -> Result<ModeTrace, ErreurConfiguration> {
        match code {
            0 => Ok(ModeTrace::ReelImag),
            1 => Ok(ModeTrace::ImagReel),
            2 => Ok(ModeTrace::ModuleArgument),
            autre => Err(ErreurConfiguration::ModeInconnu(autre)),
        }
    }

    pub fn code(self) -> u8 {
        match self {
            ModeTrace::ReelImag => 0,
            ModeTrace::ImagReel => 1,
            ModeTrace::ModuleArgument => 2,
        }
    }

    /// (hauteur, canal couleur brut) pour un résultat déjà borné.
    #[inline]
    pub fn canaux(self, w: Complex64) -> (f64, f64) {
        match self {
            ModeTrace::ReelImag => (w.re, w.im),
            ModeTrace::ImagReel => (w.im, w.re),
            ModeTrace::ModuleArgument => (w.norm(), argument_normalise(w)),
        }
    }
}

/// Paramètres explicites d’une évaluation (aucun drapeau global).
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct ParametresSurface {
    pub resolution: u32,
    pub mode: ModeTrace,
    pub log_hauteur: bool,
}

impl Default for ParametresSurface {
    fn default() -> Self {
        Self {
            resolution: RESOLUTION_DEFAUT,
            mode: ModeTrace::default(),
            log_hauteur: false,
        }
    }
}

impl ParametresSurface {
    /// Échec immédiat si la configuration est invalide (avant tout calcul).
    pub fn valider(&self) -> Result<Grille, ErreurConfiguration> {
        Grille::new(self.resolution)
    }
}

/// Descripteur de grille : n subdivisions par unité, domaine [-L, L]².
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Grille {
    pub resolution: u32,
    pub demi_etendue: u32,
}

impl Grille {
    pub fn new(resolution: u32) -> Result<Grille, ErreurConfiguration> {
        if resolution == 0 {
            return Err(ErreurConfiguration::ResolutionNulle);
        }
        Ok(Grille {
            resolution,
            demi_etendue: DEMI_ETENDUE,
        })
    }

    /// segments = 2 L n
    pub fn segments(&self) -> usize {
        2 * self.demi_etendue as usize * self.resolution as usize
    }

    /// Points par côté = segments + 1.
    pub fn cote(&self) -> usize {
        self.segments() + 1
    }

    pub fn nb_points(&self) -> usize {
        self.cote() * self.cote()
    }

    /// Indice linéaire -> coordonnées (re, im) du point.
    #[inline]
    pub fn coordonnees(&self, idx: usize) -> (f64, f64) {
        let cote = self.cote();
        let demi = (self.segments() / 2) as f64;
        let n = self.resolution as f64;

        let im = ((idx % cote) as f64 - demi) / n;
        let re = ((idx / cote) as f64 - demi) / n;
        (re, im)
    }
}

/// Compression monotone : signe(h) · ln(1 + |h|).
#[inline]
pub fn hauteur_log(h: f64) -> f64 {
    if h == 0.0 {
        return 0.0;
    }
    h.signum() * h.abs().ln_1p()
}

/// Sortie d’une évaluation : buffers plats, possédés par l’appelant.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct SortieSurface {
    /// (x = re, y = hauteur, z = im) par point
    pub positions: Vec<f32>,
    /// canal couleur brut par point (avant sigmoïde / HSV)
    pub canaux: Vec<f32>,
    /// points dont le résultat a dû être borné
    pub points_singuliers: usize,
}

impl SortieSurface {
    pub fn nb_points(&self) -> usize {
        self.canaux.len()
    }
}

/// Évalue `expr` sur toute la grille.
///
/// Un point singulier (1/0, log(0), débordement) est borné puis le balayage continue.
#[tracing::instrument(
    level = "debug",
    skip(expr, params),
    fields(resolution = params.resolution, mode = ?params.mode, log_hauteur = params.log_hauteur)
)]
pub fn evaluer_grille(
    expr: &Expr,
    params: &ParametresSurface,
) -> Result<SortieSurface, ErreurConfiguration> {
    let grille = params.valider()?;
    let nb = grille.nb_points();

    let mut positions = Vec::with_capacity(3 * nb);
    let mut canaux = Vec::with_capacity(nb);
    let mut points_singuliers = 0usize;

    for idx in 0..nb {
        let (re, im) = grille.coordonnees(idx);
        let brut = expr.evaluer(Complex64::new(re, im));

        let (w, singularite) = borner_complexe(brut);
        if singularite.is_some() {
            points_singuliers += 1;
        }

        let (mut hauteur, canal) = params.mode.canaux(w);
        if params.log_hauteur {
            hauteur = hauteur_log(hauteur);
        }

        positions.push(re as f32);
        positions.push(hauteur as f32);
        positions.push(im as f32);
        canaux.push(canal as f32);
    }

    tracing::debug!(points = nb, points_singuliers, "grille évaluée");

    Ok(SortieSurface {
        positions,
        canaux,
        points_singuliers,
    })
}
