// src/app.rs
//
// Surface complexe : module App (racine)
// --------------------------------------
// Rôle:
// - Déclarer les sous-modules (etat.rs + couleurs.rs + vue.rs)
// - Ré-exporter AppSurface (pour main.rs: use app::AppSurface;)
// - Fournir l’impl eframe::App (compatible NATIF + WEB)
//
// Important:
// - Enter est géré dans vue.rs (quand le champ a le focus).

pub mod couleurs;
pub mod etat;
pub mod vue;

pub use etat::AppSurface;

use eframe::egui;

impl eframe::App for AppSurface {
    fn update(&mut self, ctx: &egui::Context, _frame: &mut eframe::Frame) {
        // ESC = effacer seulement l’entrée (la surface reste)
        let esc = ctx.input(|i| i.key_pressed(egui::Key::Escape));
        if esc {
            self.clear_entree();
        }

        egui::CentralPanel::default().show(ctx, |ui| {
            self.ui(ui);
        });
    }
}
