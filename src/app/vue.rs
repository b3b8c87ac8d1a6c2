// src/app/vue.rs
//
// Vue (UI egui), natif + web
// ---------------------------
// Objectifs :
// - Même AppSurface (etat.rs) pour natif + wasm
// - Clavier : Enter applique la formule (quand le champ est focus)
// - Commandes : mode de tracé, palette, hauteur log, résolution
// - Aperçu : surface projetée (rotation à la souris ou au doigt), peinte du fond vers l’avant
//
// Note :
// - La lecture n’a lieu que sur Enter / bouton ; un changement de mode ou de
//   résolution rebalaye l’arbre déjà retenu.

use eframe::egui;

use surface_complexe::noyau::compiler;
use surface_complexe::noyau::grille::evaluer_grille;
use surface_complexe::noyau::ModeTrace;

use super::couleurs::{couleurs, legende, libelle_mode, Palette};
use super::etat::{AppSurface, RESOLUTION_MAX};

/// Hauteur maximale affichée (les pôles sont coupés à l’écran, pas dans les buffers).
const HAUTEUR_AFFICHAGE_MAX: f32 = 10.0;

/// Au-delà, l’aperçu saute des lignes (les buffers restent complets).
const CELLULES_APERCU_MAX: usize = 120;

/// Radians par point de glissement.
const VITESSE_ROTATION: f32 = 0.01;

impl AppSurface {
    /// UI principale : à appeler depuis eframe::App::update(...)
    pub fn ui(&mut self, ui: &mut egui::Ui) {
        if self.a_retracer {
            self.retracer();
        }

        ui.spacing_mut().item_spacing = egui::vec2(6.0, 6.0);

        egui::ScrollArea::vertical()
            .auto_shrink([false, false])
            .show(ui, |ui| {
                ui.heading("Surface complexe");
                ui.add_space(6.0);

                self.ui_entree(ui);

                ui.add_space(8.0);
                self.ui_commandes(ui);

                ui.add_space(8.0);
                ui.separator();
                ui.add_space(8.0);

                self.ui_apercu(ui);

                ui.add_space(6.0);
                ui.monospace(legende(self.params.mode, self.palette));

                ui.add_space(8.0);
                ui.separator();
                ui.add_space(8.0);

                self.ui_demarche(ui);
            });
    }

    fn ui_entree(&mut self, ui: &mut egui::Ui) {
        ui.label("f(z) =");

        // IMPORTANT : id stable + focus contrôlé
        let resp = ui.add(
            egui::TextEdit::singleline(&mut self.entree)
                .desired_width(ui.available_width())
                .hint_text("Ex: z^2, 1/z, sin(z)/z, log(z, 2), zeta(z)")
                .id_source("entree_formule")
                .code_editor(),
        );

        if self.focus_entree {
            resp.request_focus();
            self.focus_entree = false;
        }

        // Enter applique (seulement si le champ est focus)
        let enter = ui.input(|i| i.key_pressed(egui::Key::Enter));
        if (resp.has_focus() || resp.lost_focus()) && enter {
            self.appliquer_formule();
            self.focus_entree = true;
        }

        ui.horizontal(|ui| {
            if ui.add_sized([72.0, 28.0], egui::Button::new("Tracer")).clicked() {
                self.appliquer_formule();
                self.focus_entree = true;
            }
            if ui
                .add_sized([46.0, 28.0], egui::Button::new("C"))
                .on_hover_text("Efface seulement l’entrée")
                .clicked()
            {
                self.clear_entree();
            }
            if ui
                .add_sized([46.0, 28.0], egui::Button::new("AC"))
                .on_hover_text("Remise à zéro totale")
                .clicked()
            {
                self.reset_total();
            }
        });

        if !self.erreur.is_empty() {
            ui.add_space(6.0);
            ui.colored_label(
                ui.visuals().error_fg_color,
                format!("{} ; surface tracée : f(z) = z", self.erreur),
            );
        }
    }

    fn ui_commandes(&mut self, ui: &mut egui::Ui) {
        ui.horizontal_wrapped(|ui| {
            ui.label("Mode :");
            for mode in ModeTrace::TOUS {
                if ui
                    .selectable_label(self.params.mode == mode, libelle_mode(mode))
                    .clicked()
                {
                    self.set_mode(mode);
                }
            }

            ui.separator();

            for palette in Palette::TOUTES {
                if ui
                    .selectable_label(self.palette == palette, palette.libelle())
                    .clicked()
                {
                    self.set_palette(palette);
                }
            }

            ui.separator();

            let mut log_hauteur = self.params.log_hauteur;
            if ui.checkbox(&mut log_hauteur, "hauteur log").changed() {
                self.set_log_hauteur(log_hauteur);
            }

            ui.separator();

            ui.label("Résolution :");
            let mut r = self.params.resolution;
            let resp = ui.add(
                egui::DragValue::new(&mut r)
                    .speed(1)
                    .range(1..=RESOLUTION_MAX)
                    .suffix(" /unité"),
            );
            if resp.changed() {
                self.set_resolution(r);
            }
            if ui.small_button("↺").on_hover_text("Résolution par défaut").clicked() {
                self.resolution_par_defaut();
            }
        });

        if self.sortie.points_singuliers > 0 {
            ui.weak(format!(
                "{} point(s) singulier(s) borné(s) sur {}",
                self.sortie.points_singuliers,
                self.sortie.nb_points()
            ));
        }
    }

    fn ui_apercu(&mut self, ui: &mut egui::Ui) {
        let largeur = ui.available_width();
        let (resp, painter) =
            ui.allocate_painter(egui::vec2(largeur, largeur.min(520.0)), egui::Sense::drag());

        let d = resp.drag_delta();
        if d != egui::Vec2::ZERO {
            self.tourner(d.x * VITESSE_ROTATION, d.y * VITESSE_ROTATION);
        }

        let rect = resp.rect;
        painter.rect_filled(rect, 4.0, ui.visuals().extreme_bg_color);

        let nb = self.sortie.nb_points();
        if nb == 0 {
            return;
        }
        let cote = (nb as f64).sqrt().round() as usize;
        if cote * cote != nb || self.sortie.positions.len() != 3 * nb {
            tracing::warn!(points = nb, "buffers incohérents, aperçu ignoré");
            return;
        }

        let camera = Camera::new(self.azimut, self.elevation, rect);
        let teintes = couleurs(&self.sortie.canaux, self.params.mode, self.palette);

        // Sous-grille affichée (toujours les bords)
        let pas = ((cote - 1) / CELLULES_APERCU_MAX).max(1);
        let mut lignes: Vec<usize> = (0..cote).step_by(pas).collect();
        if lignes.last() != Some(&(cote - 1)) {
            lignes.push(cote - 1);
        }
        let m = lignes.len();

        let mut mesh = egui::Mesh::default();
        let mut profondeurs = Vec::with_capacity(m * m);
        for &l in &lignes {
            for &c in &lignes {
                let k = l * cote + c;
                let p = &self.sortie.positions[3 * k..3 * k + 3];
                let h = p[1].clamp(-HAUTEUR_AFFICHAGE_MAX, HAUTEUR_AFFICHAGE_MAX);
                let (ecran, profondeur) = camera.projeter(p[0], h, p[2]);
                mesh.colored_vertex(ecran, teintes[k]);
                profondeurs.push(profondeur);
            }
        }

        // Peintre : cellules triées du fond vers l’avant
        let mut cellules: Vec<(f32, [u32; 4])> = Vec::with_capacity((m - 1) * (m - 1));
        for a in 0..m - 1 {
            for b in 0..m - 1 {
                let coins = [a * m + b, a * m + b + 1, (a + 1) * m + b, (a + 1) * m + b + 1];
                let prof = coins.iter().map(|&i| profondeurs[i]).sum::<f32>() / 4.0;
                cellules.push((prof, coins.map(|i| i as u32)));
            }
        }
        cellules.sort_by(|x, y| x.0.total_cmp(&y.0));

        for (_, [c00, c01, c10, c11]) in cellules {
            mesh.add_triangle(c00, c01, c11);
            mesh.add_triangle(c00, c11, c10);
        }

        painter.add(egui::Shape::mesh(mesh));
        self.dessiner_axes(&painter, &camera, ui.visuals().text_color());
    }

    fn dessiner_axes(&self, painter: &egui::Painter, camera: &Camera, couleur: egui::Color32) {
        let l = 11.0;
        let trait_ = egui::Stroke::new(1.0, couleur);
        for (debut, fin, nom) in [
            ((-l, 0.0, 0.0), (l, 0.0, 0.0), "Re"),
            ((0.0, 0.0, -l), (0.0, 0.0, l), "Im"),
        ] {
            let (a, _) = camera.projeter(debut.0, debut.1, debut.2);
            let (b, _) = camera.projeter(fin.0, fin.1, fin.2);
            painter.line_segment([a, b], trait_);
            painter.text(
                b,
                egui::Align2::LEFT_CENTER,
                nom,
                egui::FontId::monospace(12.0),
                couleur,
            );
        }
    }

    fn ui_demarche(&mut self, ui: &mut egui::Ui) {
        egui::CollapsingHeader::new("Démarche")
            .default_open(false)
            .show(ui, |ui| {
                Self::champ_demarche(ui, "Jetons", "demarche_jetons", &self.demarche.jetons);
                Self::champ_demarche(ui, "RPN", "demarche_rpn", &self.demarche.rpn);
                Self::champ_demarche(ui, "Arbre", "demarche_arbre", &self.demarche.arbre);
                Self::champ_demarche(ui, "Note", "demarche_note", &self.demarche.note);
            });
    }

    fn champ_demarche(ui: &mut egui::Ui, titre: &str, id: &str, contenu: &str) {
        ui.add_space(4.0);
        ui.label(format!("{titre} :"));
        egui::Frame::group(ui.style())
            .fill(ui.visuals().extreme_bg_color)
            .show(ui, |ui| {
                ui.push_id(id, |ui| {
                    ui.set_min_width(ui.available_width());
                    ui.monospace(contenu);
                });
            });
    }

    /// Lit la formule via le noyau ; en cas d’échec, l’identité est retenue.
    fn appliquer_formule(&mut self) {
        match compiler(self.entree.trim()) {
            Ok((arbre, d)) => self.set_arbre(arbre, d),
            Err(e) => {
                tracing::info!(erreur = %e, "formule refusée, repli sur l’identité");
                self.set_erreur_lecture(e.to_string());
            }
        }
    }

    /// Balaye l’arbre retenu ; la sortie précédente est remplacée d’un bloc.
    fn retracer(&mut self) {
        match evaluer_grille(&self.arbre, &self.params) {
            Ok(sortie) => self.set_sortie(sortie),
            Err(e) => {
                // résolution bornée par l’état : ne devrait pas arriver
                tracing::error!(erreur = %e, "configuration refusée par le noyau");
                self.a_retracer = false;
            }
        }
    }
}

/// Projection orthographique : rotation autour de la verticale, puis inclinaison.
struct Camera {
    sin_a: f32,
    cos_a: f32,
    sin_e: f32,
    cos_e: f32,
    centre: egui::Pos2,
    echelle: f32,
}

impl Camera {
    fn new(azimut: f32, elevation: f32, rect: egui::Rect) -> Self {
        let (sin_a, cos_a) = azimut.sin_cos();
        let (sin_e, cos_e) = elevation.sin_cos();
        Self {
            sin_a,
            cos_a,
            sin_e,
            cos_e,
            centre: rect.center(),
            // domaine [-10, 10]² + marge pour la hauteur
            echelle: rect.width().min(rect.height()) / 34.0,
        }
    }

    /// (point écran, profondeur) ; profondeur croissante vers l’observateur.
    fn projeter(&self, x: f32, y: f32, z: f32) -> (egui::Pos2, f32) {
        let x1 = self.cos_a * x - self.sin_a * z;
        let z1 = self.sin_a * x + self.cos_a * z;

        let y2 = self.cos_e * y - self.sin_e * z1;
        let z2 = self.sin_e * y + self.cos_e * z1;

        let ecran = egui::pos2(
            self.centre.x + self.echelle * x1,
            self.centre.y - self.echelle * y2,
        );
        (ecran, z2)
    }
}
