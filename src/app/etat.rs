//! src/app/etat.rs
//!
//! État UI (sans vue, sans noyau).
//!
//! Rôle : contenir l’état de la calculatrice (entrée, résultat, rejet, historique, démarche)
//! et offrir des opérations simples (C/CLR/AC) sans logique d’affichage.
//!
//! Contrats :
//! - Aucune évaluation ici (pas de noyau, pas de parsing).
//! - Actions déterministes, sans effet de bord caché.
//! - Historique borné (HISTORIQUE_MAX entrées, les plus récentes en tête).

use std::collections::VecDeque;

use crate::noyau::{DemarcheNoyau, Nombre, Rejet};

/// Nombre de calculs réussis conservés.
pub const HISTORIQUE_MAX: usize = 5;

/// Expression rejetée + diagnostics (affichage surligné dans vue.rs).
#[derive(Clone, Debug)]
pub struct Echec {
    pub expression: String,
    pub rejet: Rejet,
}

impl Echec {
    /// Titre du bloc : faute de saisie (structure) ou erreur pendant le calcul.
    pub fn titre(&self) -> &'static str {
        if self.rejet.diagnostics.iter().all(|d| d.kind.is_runtime()) {
            "Erreur de calcul"
        } else {
            "Erreur de saisie"
        }
    }
}

#[derive(Clone, Debug)]
pub struct AppCalc {
    // --- entrée utilisateur ---
    pub entree: String,

    // --- sorties ---
    pub resultat: Option<Nombre>, // dernier résultat (conservé sur une faute)
    pub echec: Option<Echec>,     // dernier rejet (effacé au prochain succès)
    pub historique: VecDeque<(String, Nombre)>,
    pub curseur_historique: Option<usize>, // ligne rappelée (flèches haut/bas)

    // --- démarche (panneau d’explication) ---
    pub demarche: DemarcheNoyau,

    // --- UX ---
    // Permet à vue.rs de redonner le focus à l’entrée après un clic sur un bouton.
    pub focus_entree: bool,
}

impl Default for AppCalc {
    fn default() -> Self {
        Self {
            entree: String::new(),
            resultat: None,
            echec: None,
            historique: VecDeque::with_capacity(HISTORIQUE_MAX),
            curseur_historique: None,
            demarche: DemarcheNoyau::default(),
            focus_entree: true, // au lancement, on veut pouvoir taper tout de suite
        }
    }
}

impl AppCalc {
    /* ------------------------ Actions “boutons” (état seulement) ------------------------ */

    /// AC : remise à zéro totale (entrée + résultats + historique).
    pub fn reset_total(&mut self) {
        self.entree.clear();
        self.clear_resultats();
        self.historique.clear();
        self.curseur_historique = None;
        self.focus_entree = true;
    }

    /// C : effacer seulement l’entrée (sans toucher aux résultats).
    pub fn clear_entree(&mut self) {
        self.entree.clear();
        self.curseur_historique = None;
        self.focus_entree = true;
    }

    /* ------------------------ Rappel d’historique ------------------------ */

    /// Remet l’expression de la ligne `k` (0 = plus récente) dans l’entrée.
    pub fn rappeler(&mut self, k: usize) {
        if let Some((expr, _)) = self.historique.get(k) {
            self.entree = expr.clone();
            self.curseur_historique = Some(k);
            self.focus_entree = true;
        }
    }

    /// Flèche haut : une ligne plus ancienne (reste sur la plus ancienne).
    pub fn rappel_precedent(&mut self) {
        let k = self.curseur_historique.map_or(0, |k| k + 1);
        self.rappeler(k.min(self.historique.len().saturating_sub(1)));
    }

    /// Flèche bas : une ligne plus récente ; au-delà, entrée vide.
    pub fn rappel_suivant(&mut self) {
        match self.curseur_historique {
            Some(0) => self.clear_entree(),
            Some(k) => self.rappeler(k - 1),
            None => {}
        }
    }

    /// CLR : effacer résultat + rejet + démarche (sans toucher à l’entrée ni à l’historique).
    pub fn clear_resultats(&mut self) {
        self.resultat = None;
        self.echec = None;
        self.demarche = DemarcheNoyau::default();
        self.focus_entree = true;
    }

    /// Dépose un rejet.
    ///
    /// On CONSERVE `resultat` et la démarche du dernier succès pour ne pas “effacer l’écran” sur une faute.
    pub fn set_rejet(&mut self, expression: impl Into<String>, rejet: Rejet) {
        self.echec = Some(Echec {
            expression: expression.into(),
            rejet,
        });
        self.focus_entree = true;
    }

    /// Dépose un résultat et l’inscrit en tête de l’historique.
    pub fn set_resultat(&mut self, expression: impl Into<String>, valeur: Nombre, demarche: DemarcheNoyau) {
        self.echec = None;
        self.resultat = Some(valeur);
        self.demarche = demarche;

        self.historique.push_front((expression.into(), valeur));
        self.historique.truncate(HISTORIQUE_MAX);
        self.curseur_historique = None;

        self.focus_entree = true;
    }
}
