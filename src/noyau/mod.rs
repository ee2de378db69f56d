//! Noyau de calcul MAX
//!
//! Organisation interne :
//! - operateurs.rs   : registre statique (symbole, arité, priorité, position, fonction)
//! - pretraitement.rs: espaces retirés (indices conservés) + alphabet
//! - moins.rs        : moins unaire / de signe / soustraction
//! - jetons.rs       : points décimaux + tokenisation
//! - validation.rs   : six contrôles structurels cumulés
//! - rpn.rs          : shunting-yard + évaluation postfixe
//! - nombre.rs       : résultat entier ou décimal
//! - diagnostic.rs   : plages, genres, diagnostics
//! - config.rs       : réglages (borne de la factorielle, affichage entier)
//! - eval.rs         : pipeline complet
//!
//! Sans état : chaque appel repart de zéro, seul le registre est partagé (lecture seule).

pub mod config;
pub mod diagnostic;
pub mod eval;
pub mod jetons;
pub mod moins;
pub mod nombre;
pub mod operateurs;
pub mod pretraitement;
pub mod rpn;
pub mod validation;

#[cfg(test)]
mod tests_exemples;

#[cfg(test)]
mod tests_fuzz_safe;

// API publique minimale
pub use diagnostic::{Diagnostic, DiagnosticKind, Rejet, Span};
pub use eval::{eval_expression, evaluate, DemarcheNoyau};
pub use nombre::Nombre;
