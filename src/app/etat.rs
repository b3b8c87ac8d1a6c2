//! src/app/etat.rs
//!
//! État UI (sans vue, sans évaluation).
//!
//! Rôle : contenir l’état du traceur (formule, arbre retenu, paramètres, sortie,
//! erreur, démarche, caméra) et offrir des opérations simples sans logique d’affichage.
//!
//! Contrats :
//! - Aucune lecture ni balayage ici : c’est vue.rs qui appelle le noyau.
//! - Actions déterministes, sans effet de bord caché.
//! - Défense en profondeur : bornes sur la résolution et sur la caméra.

use surface_complexe::noyau::expr::Expr;
use surface_complexe::noyau::grille::RESOLUTION_DEFAUT;
use surface_complexe::noyau::{DemarcheNoyau, ModeTrace, ParametresSurface, SortieSurface};

use super::couleurs::Palette;

/// Formule affichée au lancement.
const FORMULE_DEFAUT: &str = "z";

/// Garde-fou : au-delà, un balayage dépasse largement une image (anti-gel).
pub const RESOLUTION_MAX: u32 = 40;

/// Caméra par défaut (radians).
const AZIMUT_DEFAUT: f32 = 0.6;
const ELEVATION_DEFAUT: f32 = 0.5;
const ELEVATION_MAX: f32 = 1.5;

#[derive(Clone, Debug)]
pub struct AppSurface {
    // --- entrée utilisateur ---
    pub entree: String,

    // --- arbre retenu (identité si la dernière lecture a échoué) ---
    pub arbre: Expr,

    // --- paramètres ---
    pub params: ParametresSurface,
    pub palette: Palette,

    // --- sorties ---
    pub sortie: SortieSurface,
    pub erreur: String, // dernière ErreurLecture (la surface est alors l’identité)

    // --- démarche (panneau d’explication) ---
    pub demarche: DemarcheNoyau,

    // --- caméra de l’aperçu ---
    pub azimut: f32,
    pub elevation: f32,

    // --- UX ---
    pub focus_entree: bool,
    // true => vue.rs relance le balayage à la prochaine image
    pub a_retracer: bool,
}

impl Default for AppSurface {
    fn default() -> Self {
        Self {
            entree: FORMULE_DEFAUT.to_string(),
            arbre: Expr::identite(),
            params: ParametresSurface::default(),
            palette: Palette::default(),
            sortie: SortieSurface::default(),
            erreur: String::new(),
            demarche: DemarcheNoyau::default(),
            azimut: AZIMUT_DEFAUT,
            elevation: ELEVATION_DEFAUT,
            focus_entree: true,
            a_retracer: true, // premier tracé à la première image
        }
    }
}

impl AppSurface {
    /* ------------------------ Actions (état seulement) ------------------------ */

    /// Remise à zéro totale (formule, paramètres, caméra).
    pub fn reset_total(&mut self) {
        *self = Self::default();
    }

    /// Efface seulement l’entrée (l’arbre retenu et la surface restent).
    pub fn clear_entree(&mut self) {
        self.entree.clear();
        self.focus_entree = true;
    }

    /// Lecture réussie : on retient l’arbre et on demande un nouveau tracé.
    pub fn set_arbre(&mut self, arbre: Expr, demarche: DemarcheNoyau) {
        self.arbre = arbre;
        self.demarche = demarche;
        self.erreur.clear();
        self.a_retracer = true;
    }

    /// Lecture échouée : repli sur l’identité, message affiché, démarche effacée.
    pub fn set_erreur_lecture(&mut self, msg: impl Into<String>) {
        self.arbre = Expr::identite();
        self.demarche = DemarcheNoyau::default();
        self.erreur = msg.into();
        self.a_retracer = true;
    }

    /// Nouveau balayage : remplace entièrement la sortie précédente.
    pub fn set_sortie(&mut self, sortie: SortieSurface) {
        self.sortie = sortie;
        self.a_retracer = false;
    }

    pub fn set_mode(&mut self, mode: ModeTrace) {
        if self.params.mode != mode {
            self.params.mode = mode;
            self.a_retracer = true;
        }
    }

    pub fn set_log_hauteur(&mut self, log_hauteur: bool) {
        if self.params.log_hauteur != log_hauteur {
            self.params.log_hauteur = log_hauteur;
            self.a_retracer = true;
        }
    }

    /// La palette ne touche pas au noyau : pas de nouveau balayage.
    pub fn set_palette(&mut self, palette: Palette) {
        self.palette = palette;
    }

    /// Garde-fou : résolution dans 1..=RESOLUTION_MAX.
    pub fn set_resolution(&mut self, resolution: u32) {
        let r = resolution.clamp(1, RESOLUTION_MAX);
        if self.params.resolution != r {
            self.params.resolution = r;
            self.a_retracer = true;
        }
    }

    pub fn resolution_par_defaut(&mut self) {
        self.set_resolution(RESOLUTION_DEFAUT);
    }

    /// Rotation de la caméra ; l’élévation reste bornée (pas de retournement).
    pub fn tourner(&mut self, d_azimut: f32, d_elevation: f32) {
        self.azimut = (self.azimut + d_azimut).rem_euclid(std::f32::consts::TAU);
        self.elevation = (self.elevation + d_elevation).clamp(-ELEVATION_MAX, ELEVATION_MAX);
    }
}
