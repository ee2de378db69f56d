// src/app.rs
//
// Calculatrice MAX — module App (racine)
// -------------------------------------
// Rôle:
// - Déclarer les sous-modules (etat.rs + vue.rs)
// - Ré-exporter AppCalc (pour main.rs: use crate::app::AppCalc;)
// - Fournir l’impl eframe::App (compatible NATIF + WEB)
//
// Important:
// - La gestion de Enter est faite dans vue.rs (au bon endroit: quand le champ a le focus).
// - Ici, on évite d’appeler des méthodes privées de vue.rs.

pub mod etat;
pub mod vue;

// Ré-export pratique : `use crate::app::AppCalc;`
pub use etat::AppCalc;

use eframe::egui;

impl eframe::App for AppCalc {
    fn update(&mut self, ctx: &egui::Context, _frame: &mut eframe::Frame) {
        // Raccourcis clavier globaux (safe natif + web) :
        // ESC = effacer seulement l’entrée (comme bouton "C").
        // Haut/Bas = rappel des expressions de l’historique.
        //
        // On NE gère PAS Enter ici:
        // - sur web/mobile, clavier incertain
        // - risque de double déclenchement
        // - la vue le fait déjà avec resp.has_focus()
        let (esc, haut, bas) = ctx.input(|i| {
            (
                i.key_pressed(egui::Key::Escape),
                i.key_pressed(egui::Key::ArrowUp),
                i.key_pressed(egui::Key::ArrowDown),
            )
        });
        if esc {
            self.clear_entree(); // méthode publique de etat.rs
        }

        // Flèches : parcourir l’historique (plus ancien / plus récent)
        if haut {
            self.rappel_precedent();
        } else if bas {
            self.rappel_suivant();
        }

        egui::CentralPanel::default().show(ctx, |ui| {
            self.ui(ui); // méthode publique (dans vue.rs)
        });
    }
}
