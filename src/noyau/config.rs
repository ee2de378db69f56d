// src/noyau/config.rs
//
// Réglages du noyau (choix de politique, pas des contraintes dérivées).

/// Plus grand n accepté par `!` : 171! dépasse la plage d’un f64.
pub const FACTORIELLE_MAX: f64 = 170.0;

/// Un résultat flottant sans partie fractionnaire s’affiche comme un entier.
pub const SNAP_ENTIER: bool = true;
