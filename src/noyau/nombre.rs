// src/noyau/nombre.rs
//
// Résultat numérique : entier quand la valeur n’a pas de partie fractionnaire
// (et tient dans un i64), décimal sinon.

use std::fmt;

use num_traits::ToPrimitive;

use super::config::SNAP_ENTIER;

#[derive(Clone, Copy, Debug, PartialEq)]
pub enum Nombre {
    Entier(i64),
    Decimal(f64),
}

impl Nombre {
    /// Projection d’un f64 (déjà fini) selon la politique SNAP_ENTIER.
    pub fn from_f64(x: f64) -> Self {
        if SNAP_ENTIER && x.fract() == 0.0 {
            if let Some(n) = x.to_i64() {
                return Nombre::Entier(n);
            }
        }
        Nombre::Decimal(x)
    }

    pub fn as_f64(self) -> f64 {
        match self {
            Nombre::Entier(n) => n as f64,
            Nombre::Decimal(x) => x,
        }
    }

    pub fn is_entier(self) -> bool {
        matches!(self, Nombre::Entier(_))
    }
}

impl From<f64> for Nombre {
    fn from(x: f64) -> Self {
        Nombre::from_f64(x)
    }
}

impl fmt::Display for Nombre {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Nombre::Entier(n) => write!(f, "{n}"),
            Nombre::Decimal(x) => f.write_str(&format_f64(*x)),
        }
    }
}

/// Écriture décimale la plus courte (jamais d’exposant), -0 => 0.
pub fn format_f64(x: f64) -> String {
    if x == 0.0 {
        return "0".to_string();
    }
    format!("{x}")
}
