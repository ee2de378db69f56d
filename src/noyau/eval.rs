//! Noyau — évaluation (pipeline réel)
//!
//! texte brut -> sans espaces (indices conservés) -> alphabet
//!   -> moins marqués -> jetons (points décimaux contrôlés)
//!   -> validation (6 contrôles cumulés) -> RPN -> valeur
//!
//! Chaque étape peut court-circuiter la suite avec un Rejet ; les plages des
//! diagnostics pointent toujours dans le texte brut tel qu’il a été tapé.

use tracing::{debug, error, warn};

use super::diagnostic::{Diagnostic, DiagnosticKind, Rejet};
use super::jetons::{format_tokens, tokenize};
use super::moins::{disambiguate, format_marques};
use super::nombre::Nombre;
use super::pretraitement::{check_characters, strip_whitespace};
use super::rpn::{eval_rpn, format_rpn, to_rpn};
use super::validation::validate;

#[derive(Default, Clone, Debug)]
pub struct DemarcheNoyau {
    pub marques: String,
    pub jetons: String,
    pub rpn: String,
}

/// API publique : valeur seule.
pub fn evaluate(raw: &str) -> Result<Nombre, Rejet> {
    eval_expression(raw).map(|(valeur, _d)| valeur)
}

/// API publique : valeur + démarche (formes intermédiaires).
pub fn eval_expression(raw: &str) -> Result<(Nombre, DemarcheNoyau), Rejet> {
    let resultat = pipeline(raw);

    match &resultat {
        Ok((valeur, _)) => debug!(expression = raw, %valeur, "évaluation réussie"),
        Err(rejet) if rejet.has(DiagnosticKind::InternalInvariantViolation) => {
            error!(expression = raw, %rejet, "invariant interne violé")
        }
        Err(rejet) => warn!(expression = raw, kinds = ?rejet.kinds(), "expression rejetée"),
    }

    resultat
}

fn vide() -> Diagnostic {
    Diagnostic::new(DiagnosticKind::EmptyExpression, "rien à calculer", Vec::new())
}

fn pipeline(raw: &str) -> Result<(Nombre, DemarcheNoyau), Rejet> {
    // 1) Espaces + alphabet
    let chars = strip_whitespace(raw);
    if chars.is_empty() {
        return Err(vide().into());
    }
    check_characters(&chars)?;

    // 2) Moins
    let marques = disambiguate(&chars);
    if marques.is_empty() {
        // "--" : les moins s’annulent, il ne reste rien
        return Err(vide().into());
    }
    let marques_txt = format_marques(&marques);
    debug!(marques = %marques_txt, "moins marqués");

    // 3) Jetons
    let jetons = tokenize(&marques)?;
    let jetons_txt = format_tokens(&jetons);
    debug!(jetons = %jetons_txt, "tokenisation");

    // 4) Validation (tous les contrôles, diagnostics cumulés)
    validate(&jetons)?;

    // 5) RPN
    let rpn = to_rpn(&jetons)?;
    let rpn_txt = format_rpn(&rpn);
    debug!(rpn = %rpn_txt, "conversion postfixe");

    // 6) Valeur
    let valeur = Nombre::from_f64(eval_rpn(&rpn)?);

    let d = DemarcheNoyau {
        marques: marques_txt,
        jetons: jetons_txt,
        rpn: rpn_txt,
    };
    Ok((valeur, d))
}
