// src/web.rs
//
// Passerelle JS (wasm32 seulement)
// --------------------------------
// evaluate(source, resolution, mode, log_hauteur) -> SortieJs
// - positions() : Float32Array, 3 flottants par point (x = re, y = hauteur, z = im)
// - canaux()    : Float32Array, 1 flottant par point (avant sigmoïde / HSV)
//
// Codes de `mode` (u8) :
//   0 = ReelImag        hauteur Re(w), canal Im(w)
//   1 = ImagReel        hauteur Im(w), canal Re(w)
//   2 = ModuleArgument  hauteur |w|,   canal arg(w) / 2π dans [0, 1)
//   3 et au-delà : refusés (ErreurConfiguration::ModeInconnu). Le noir et blanc
//   n’est plus un mode : la palette est choisie côté affichage.
//
// Erreurs : exception JS (Error) avec le message ; `position` est posée en plus
// pour une erreur de lecture.

use wasm_bindgen::prelude::*;

use crate::noyau::{evaluer, ErreurSurface, ModeTrace, ParametresSurface, SortieSurface};

/// Buffers possédés côté Rust, copiés à la demande dans des Float32Array.
#[wasm_bindgen]
pub struct SortieJs {
    sortie: SortieSurface,
}

#[wasm_bindgen]
impl SortieJs {
    pub fn positions(&self) -> js_sys::Float32Array {
        js_sys::Float32Array::from(self.sortie.positions.as_slice())
    }

    pub fn canaux(&self) -> js_sys::Float32Array {
        js_sys::Float32Array::from(self.sortie.canaux.as_slice())
    }

    #[wasm_bindgen(getter, js_name = nbPoints)]
    pub fn nb_points(&self) -> usize {
        self.sortie.nb_points()
    }

    #[wasm_bindgen(getter, js_name = pointsSinguliers)]
    pub fn points_singuliers(&self) -> usize {
        self.sortie.points_singuliers
    }
}

#[wasm_bindgen]
pub fn evaluate(
    source: &str,
    resolution: u32,
    mode: u8,
    log_hauteur: bool,
) -> Result<SortieJs, JsValue> {
    let mode = ModeTrace::depuis_code(mode).map_err(|e| erreur_js(&ErreurSurface::from(e)))?;
    let params = ParametresSurface {
        resolution,
        mode,
        log_hauteur,
    };

    let sortie = evaluer(source, &params).map_err(|e| erreur_js(&e))?;
    Ok(SortieJs { sortie })
}

fn erreur_js(e: &ErreurSurface) -> JsValue {
    let err = js_sys::Error::new(&e.to_string());
    if let ErreurSurface::Lecture(l) = e {
        // échec de Reflect::set ignoré : le message suffit
        let _ = js_sys::Reflect::set(
            &err,
            &JsValue::from_str("position"),
            &JsValue::from_f64(l.position as f64),
        );
    }
    err.into()
}
