//! src/app/couleurs.rs
//!
//! Mise en couleur (hors noyau) : canal brut -> teinte -> RGB.
//!
//! - Re/Im : sigmoïde 1/(1+e^-x) pour ramener ℝ dans (0, 1)
//! - arg   : déjà normalisé dans [0, 1) par le noyau
//! - Palette couleur : HSV (saturation 0.75, valeur 1) ; palette N/B : gris = teinte
//!
//! La légende dépend du couple (mode, palette) et de lui seul.

use eframe::egui::Color32;
use surface_complexe::noyau::ModeTrace;

const SATURATION: f32 = 0.75;

#[derive(Clone, Copy, Debug, PartialEq, Eq, Default)]
pub enum Palette {
    #[default]
    Couleur,
    NoirBlanc,
}

impl Palette {
    pub const TOUTES: [Palette; 2] = [Palette::Couleur, Palette::NoirBlanc];

    pub fn libelle(self) -> &'static str {
        match self {
            Palette::Couleur => "Couleur",
            Palette::NoirBlanc => "N/B",
        }
    }
}

pub fn libelle_mode(mode: ModeTrace) -> &'static str {
    match mode {
        ModeTrace::ReelImag => "Re / Im",
        ModeTrace::ImagReel => "Im / Re",
        ModeTrace::ModuleArgument => "|w| / arg",
    }
}

#[inline]
pub fn sigmoide(x: f32) -> f32 {
    1.0 / (1.0 + (-x).exp())
}

/// Canal brut -> teinte dans [0, 1].
#[inline]
pub fn teinte(mode: ModeTrace, canal: f32) -> f32 {
    match mode {
        ModeTrace::ModuleArgument => canal,
        ModeTrace::ReelImag | ModeTrace::ImagReel => sigmoide(canal),
    }
}

/// HSV -> RGB, h en tours (1.0 = un tour complet), s et v dans [0, 1].
pub fn hsv_vers_rgb(h: f32, s: f32, v: f32) -> [f32; 3] {
    let h6 = h.rem_euclid(1.0) * 6.0;
    let secteur = h6.floor();
    let f = h6 - secteur;

    let p = v * (1.0 - s);
    let q = v * (1.0 - f * s);
    let t = v * (1.0 - (1.0 - f) * s);

    match secteur as u8 % 6 {
        0 => [v, t, p],
        1 => [q, v, p],
        2 => [p, v, t],
        3 => [p, q, v],
        4 => [t, p, v],
        _ => [v, p, q],
    }
}

fn octet(x: f32) -> u8 {
    (x.clamp(0.0, 1.0) * 255.0).round() as u8
}

pub fn couleur_point(mode: ModeTrace, palette: Palette, canal: f32) -> Color32 {
    let h = teinte(mode, canal);
    match palette {
        Palette::Couleur => {
            let [r, g, b] = hsv_vers_rgb(h, SATURATION, 1.0);
            Color32::from_rgb(octet(r), octet(g), octet(b))
        }
        Palette::NoirBlanc => Color32::from_gray(octet(h)),
    }
}

/// Une couleur par point, dans l’ordre des buffers du noyau.
pub fn couleurs(canaux: &[f32], mode: ModeTrace, palette: Palette) -> Vec<Color32> {
    canaux
        .iter()
        .map(|&c| couleur_point(mode, palette, c))
        .collect()
}

pub fn legende(mode: ModeTrace, palette: Palette) -> String {
    let (hauteur, canal) = match mode {
        ModeTrace::ReelImag => ("Re f(z)", "Im f(z)"),
        ModeTrace::ImagReel => ("Im f(z)", "Re f(z)"),
        ModeTrace::ModuleArgument => ("|f(z)|", "arg f(z)"),
    };

    let couleur = match (mode, palette) {
        (ModeTrace::ModuleArgument, Palette::Couleur) => {
            format!("teinte = {canal} (rouge → vert → bleu → rouge, sur un tour)")
        }
        (ModeTrace::ModuleArgument, Palette::NoirBlanc) => {
            format!("gris = {canal} (noir = 0, blanc → 2π)")
        }
        (_, Palette::Couleur) => {
            format!("teinte = sigmoïde({canal}) (cyan = 0, rouge aux extrêmes)")
        }
        (_, Palette::NoirBlanc) => {
            format!("gris = sigmoïde({canal}) (noir = plus petit, blanc = plus grand)")
        }
    };

    format!("hauteur = {hauteur}\n{couleur}")
}
