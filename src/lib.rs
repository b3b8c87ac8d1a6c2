// src/lib.rs
//
// Surface complexe : bibliothèque
// -------------------------------
// - noyau : lecture d’une formule en z + balayage de la grille (buffers plats)
// - web   : (wasm32) `evaluate(...)` exporté vers JS via wasm-bindgen
//
// Le binaire (src/main.rs) n’utilise que `noyau` ; l’interface egui vit dans src/app.

pub mod noyau;

#[cfg(target_arch = "wasm32")]
pub mod web;
