// src/app/vue.rs
//
// Vue (UI egui) — natif + web
// ---------------------------
// Objectifs :
// - Même AppCalc (etat.rs) pour natif + wasm
// - Clavier : Enter évalue (quand le champ est focus), Escape efface l’entrée (app.rs)
// - Tactile : gros boutons, focus redonné après clic (focus_entree)
// - Rejet : un bloc par diagnostic (expression surlignée + message)
//
// Note :
// - PAS de Key::NumEnter (n’existe pas dans egui 0.33.x)
// - L’entrée est passée telle quelle au noyau : les plages des diagnostics
//   sont des indices de caractères dans ce texte brut.

use eframe::egui;
use egui::text::LayoutJob;

use super::etat::{AppCalc, Echec};

/// Opérateurs proposés au pavé (symbole, info-bulle).
const TOUCHES_OPERATEURS: [(&str, &str); 12] = [
    ("+", "addition"),
    ("-", "soustraction / moins"),
    ("*", "multiplication"),
    ("/", "division"),
    ("^", "puissance"),
    ("%", "modulo"),
    ("$", "maximum"),
    ("&", "minimum"),
    ("@", "moyenne"),
    ("~", "négation"),
    ("!", "factorielle"),
    ("#", "somme des chiffres"),
];

impl AppCalc {
    /// UI principale : à appeler depuis eframe::App::update(...)
    pub fn ui(&mut self, ui: &mut egui::Ui) {
        // Densité “calc”
        ui.spacing_mut().item_spacing = egui::vec2(6.0, 6.0);

        egui::ScrollArea::vertical()
            .auto_shrink([false, false])
            .show(ui, |ui| {
                ui.heading("Calculatrice MAX");
                ui.add_space(6.0);

                self.ui_entree(ui);

                ui.add_space(8.0);
                ui.separator();
                ui.add_space(8.0);

                self.ui_resultats(ui);

                ui.add_space(8.0);
                ui.separator();
                ui.add_space(8.0);

                self.ui_historique(ui);
                self.ui_demarche(ui);
            });
    }

    fn ui_entree(&mut self, ui: &mut egui::Ui) {
        ui.label("Entrée :");

        // IMPORTANT : id stable + focus contrôlé
        let resp = ui.add(
            egui::TextEdit::singleline(&mut self.entree)
                .desired_width(ui.available_width())
                .hint_text("Ex: (10$2) & (20@4) + -((4#)/(3%2))")
                .id_source("entree_edit")
                .code_editor(),
        );

        // Si on a cliqué un bouton (pavé / DEL / C / etc.), on redonne le focus
        if self.focus_entree {
            resp.request_focus();
            self.focus_entree = false;
        }

        // --- Clavier : Enter évalue (seulement si le champ est focus) ---
        let enter = ui.input(|i| i.key_pressed(egui::Key::Enter));
        if resp.has_focus() && enter {
            self.eval_via_noyau();
        }

        ui.add_space(6.0);

        ui.horizontal(|ui| {
            // Contrat: C = entrée seulement ; CLR = résultats seulement ; AC = tout
            self.bouton_action(ui, "C", "Efface seulement l’entrée", Action::ClearEntree);
            self.bouton_action(
                ui,
                "CLR",
                "Efface résultat + erreurs + démarche",
                Action::ClearResultats,
            );
            self.bouton_action(ui, "AC", "Remise à zéro totale", Action::ResetTotal);
            self.bouton_action(ui, "DEL", "Efface le dernier symbole", Action::Backspace);

            ui.add_space(10.0);

            let eq = ui.add_sized([64.0, 30.0], egui::Button::new("="));
            if eq.clicked() {
                self.eval_via_noyau();
            }
        });

        ui.add_space(8.0);

        // Parenthèses + opérateurs
        ui.horizontal_wrapped(|ui| {
            self.bouton_insert(ui, "(", InsertKind::OpenParen, "parenthèse ouvrante");
            self.bouton_insert(ui, ")", InsertKind::CloseParen, "parenthèse fermante");

            ui.separator();

            for (symbole, tip) in TOUCHES_OPERATEURS {
                let kind = match symbole {
                    "~" => InsertKind::Prefixe,
                    "!" | "#" => InsertKind::Postfixe,
                    _ => InsertKind::Op,
                };
                self.bouton_insert(ui, symbole, kind, tip);
            }
        });

        ui.add_space(8.0);

        // Pavé numérique
        self.ui_pave_numerique(ui);
    }

    fn ui_pave_numerique(&mut self, ui: &mut egui::Ui) {
        egui::Grid::new("pave_numerique_max")
            .num_columns(3)
            .spacing([6.0, 6.0])
            .show(ui, |ui| {
                for ligne in [["7", "8", "9"], ["4", "5", "6"], ["1", "2", "3"]] {
                    for chiffre in ligne {
                        self.bouton_insert(ui, chiffre, InsertKind::Digit, "");
                    }
                    ui.end_row();
                }

                self.bouton_insert(ui, "0", InsertKind::Digit, "");
                self.bouton_insert(ui, ".", InsertKind::Digit, "point décimal");
                ui.label("");
                ui.end_row();
            });
    }

    /// Retire le dernier symbole (et les espaces qui le précèdent).
    fn backspace_entree(&mut self) {
        self.entree.pop();
        while self.entree.ends_with(' ') {
            self.entree.pop();
        }
    }

    fn ui_resultats(&mut self, ui: &mut egui::Ui) {
        ui.label("Résultat :");
        let texte = self
            .resultat
            .map(|v| v.to_string())
            .unwrap_or_default();
        Self::champ_monospace(ui, "resultat_out", &texte, 2);

        if let Some(echec) = &self.echec {
            ui.add_space(6.0);
            Self::ui_echec(ui, echec);
        }
    }

    /// Pour chaque diagnostic : l’expression, caractères fautifs surlignés, puis le message.
    fn ui_echec(ui: &mut egui::Ui, echec: &Echec) {
        let rouge = ui.visuals().error_fg_color;
        let normal = ui.visuals().text_color();
        let police = egui::TextStyle::Monospace.resolve(ui.style());

        ui.colored_label(rouge, egui::RichText::new(echec.titre()).strong());

        for d in &echec.rejet.diagnostics {
            let mut job = LayoutJob::default();
            for (i, c) in echec.expression.chars().enumerate() {
                let format = if d.highlights(i) {
                    egui::TextFormat {
                        font_id: police.clone(),
                        color: rouge,
                        underline: egui::Stroke::new(1.5, rouge),
                        ..Default::default()
                    }
                } else {
                    egui::TextFormat::simple(police.clone(), normal)
                };
                job.append(c.encode_utf8(&mut [0; 4]), 0.0, format);
            }

            egui::Frame::group(ui.style())
                .fill(ui.visuals().extreme_bg_color)
                .show(ui, |ui| {
                    ui.set_min_width(ui.available_width());
                    ui.label(job);
                    ui.colored_label(rouge, d.to_string());
                });
        }
    }

    fn ui_historique(&mut self, ui: &mut egui::Ui) {
        egui::CollapsingHeader::new("Historique")
            .default_open(true)
            .show(ui, |ui| {
                if self.historique.is_empty() {
                    ui.monospace("vide");
                    return;
                }
                // clic sur une ligne => l’expression revient dans l’entrée
                let mut rappel = None;
                for (k, (expr, valeur)) in self.historique.iter().enumerate() {
                    let ligne = ui.add(
                        egui::Label::new(egui::RichText::new(format!("{expr} = {valeur}")).monospace())
                            .sense(egui::Sense::click()),
                    );
                    if ligne.clicked() {
                        rappel = Some(k);
                    }
                }
                if let Some(k) = rappel {
                    self.rappeler(k);
                }
            });
    }

    fn ui_demarche(&mut self, ui: &mut egui::Ui) {
        egui::CollapsingHeader::new("Démarche")
            .default_open(false)
            .show(ui, |ui| {
                Self::champ_demarche(ui, "Moins", "demarche_marques", &self.demarche.marques);
                Self::champ_demarche(ui, "Jetons", "demarche_jetons", &self.demarche.jetons);
                Self::champ_demarche(ui, "RPN", "demarche_rpn", &self.demarche.rpn);
            });
    }

    fn champ_demarche(ui: &mut egui::Ui, titre: &str, id: &str, contenu: &str) {
        ui.add_space(4.0);
        ui.label(format!("{titre} :"));
        Self::champ_monospace(ui, id, contenu, 1);
    }

    fn champ_monospace(ui: &mut egui::Ui, id: &str, contenu: &str, rows: usize) {
        // Affichage lecture seule “stable”, sans TextEdit interactif.
        egui::Frame::group(ui.style())
            .fill(ui.visuals().extreme_bg_color)
            .show(ui, |ui| {
                ui.push_id(id, |ui| {
                    ui.set_min_width(ui.available_width());
                    ui.set_min_height(
                        rows as f32 * ui.text_style_height(&egui::TextStyle::Monospace),
                    );
                    ui.monospace(contenu);
                });
            });
    }

    fn bouton_action(&mut self, ui: &mut egui::Ui, label: &str, tip: &str, action: Action) {
        let resp = ui
            .add_sized([56.0, 30.0], egui::Button::new(label))
            .on_hover_text(tip);

        if resp.clicked() {
            match action {
                Action::ClearEntree => self.clear_entree(),
                Action::ClearResultats => self.clear_resultats(),
                Action::ResetTotal => self.reset_total(),
                Action::Backspace => self.backspace_entree(),
            }
            self.focus_entree = true;
        }
    }

    fn bouton_insert(&mut self, ui: &mut egui::Ui, symbole: &str, kind: InsertKind, tip: &str) {
        let mut resp = ui.add_sized([46.0, 28.0], egui::Button::new(symbole));
        if !tip.is_empty() {
            resp = resp.on_hover_text(tip);
        }
        if !resp.clicked() {
            return;
        }

        inserer(&mut self.entree, symbole, kind);
        self.focus_entree = true;
    }

    /// Évalue l’entrée brute via le noyau, puis dépose résultat/rejet/démarche dans l’état UI.
    fn eval_via_noyau(&mut self) {
        let expression = self.entree.clone();

        match crate::noyau::eval_expression(&expression) {
            Ok((valeur, demarche)) => self.set_resultat(expression, valeur, demarche),
            Err(rejet) => self.set_rejet(expression, rejet),
        }
    }
}

/// Insertion d’un symbole du pavé, avec espacement lisible.
/// Les chiffres et le point restent collés (un espace couperait le nombre).
fn inserer(entree: &mut String, symbole: &str, kind: InsertKind) {
    match kind {
        InsertKind::Digit | InsertKind::Postfixe | InsertKind::CloseParen => {
            while entree.ends_with(' ') && kind != InsertKind::Digit {
                entree.pop();
            }
            entree.push_str(symbole);
        }
        InsertKind::OpenParen | InsertKind::Prefixe => {
            entree.push_str(symbole);
        }
        InsertKind::Op => {
            while entree.ends_with(' ') {
                entree.pop();
            }
            if !entree.is_empty() {
                entree.push(' ');
            }
            entree.push_str(symbole);
            entree.push(' ');
        }
    }
}

#[derive(Clone, Copy, Debug)]
enum Action {
    ClearEntree,
    ClearResultats,
    ResetTotal,
    Backspace,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
enum InsertKind {
    Digit,
    Op,
    Prefixe,
    Postfixe,
    OpenParen,
    CloseParen,
}
