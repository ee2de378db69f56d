// src/noyau/operateurs.rs
//
// Registre des opérateurs
// -----------------------
// Table statique, immuable, indexée par symbole :
// symbole, arité, priorité (plus haut = lie plus fort), position, fonction.
//
// Position :
// - Milieu : binaire infixe (a + b)
// - Gauche : unaire préfixe (~a, moins unaire interne)
// - Droite : unaire postfixe (a!, a#)
//
// Les contrôles de domaine (division par zéro, bornes de la factorielle...)
// vivent dans rpn.rs : ils ont besoin des plages source pour le diagnostic.

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum Op {
    Add,
    Sub,
    Mul,
    Div,
    /// Moins unaire interne (marqueur issu de moins.rs, jamais tapé tel quel).
    Moins,
    Pow,
    Mod,
    Max,
    Min,
    Moyenne,
    Negation,
    Factorielle,
    SommeChiffres,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Arite {
    Unaire,
    Binaire,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Position {
    Gauche,
    Milieu,
    Droite,
}

/// Fonction d’un opérateur : unaire ou binaire.
#[derive(Clone, Copy)]
pub enum Fonction {
    Unaire(fn(f64) -> f64),
    Binaire(fn(f64, f64) -> f64),
}

#[derive(Clone, Copy)]
pub struct OperatorSpec {
    pub op: Op,
    pub symbole: char,
    pub arite: Arite,
    pub priorite: u8,
    pub position: Position,
    pub fonction: Fonction,
}

impl std::fmt::Debug for OperatorSpec {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("OperatorSpec")
            .field("op", &self.op)
            .field("symbole", &self.symbole)
            .field("arite", &self.arite)
            .field("priorite", &self.priorite)
            .field("position", &self.position)
            .finish()
    }
}

/// Symbole interne du moins unaire (hors de l’alphabet accepté en entrée).
pub const SYMBOLE_MOINS_UNAIRE: char = 'u';

const fn spec_bin(op: Op, symbole: char, priorite: u8, f: fn(f64, f64) -> f64) -> OperatorSpec {
    OperatorSpec {
        op,
        symbole,
        arite: Arite::Binaire,
        priorite,
        position: Position::Milieu,
        fonction: Fonction::Binaire(f),
    }
}

const fn spec_un(
    op: Op,
    symbole: char,
    priorite: u8,
    position: Position,
    f: fn(f64) -> f64,
) -> OperatorSpec {
    OperatorSpec {
        op,
        symbole,
        arite: Arite::Unaire,
        priorite,
        position,
        fonction: Fonction::Unaire(f),
    }
}

static REGISTRE: [OperatorSpec; 13] = [
    spec_bin(Op::Add, '+', 1, add),
    spec_bin(Op::Sub, '-', 1, sub),
    spec_bin(Op::Mul, '*', 2, mul),
    spec_bin(Op::Div, '/', 2, div),
    spec_un(Op::Moins, SYMBOLE_MOINS_UNAIRE, 3, Position::Gauche, negatif),
    spec_bin(Op::Pow, '^', 4, f64::powf),
    spec_bin(Op::Mod, '%', 5, modulo),
    spec_bin(Op::Max, '$', 6, f64::max),
    spec_bin(Op::Min, '&', 6, f64::min),
    spec_bin(Op::Moyenne, '@', 6, moyenne),
    spec_un(Op::Negation, '~', 7, Position::Gauche, negatif),
    spec_un(Op::Factorielle, '!', 7, Position::Droite, factorielle),
    spec_un(Op::SommeChiffres, '#', 7, Position::Droite, somme_chiffres),
];

/// Recherche par symbole tapé. Le moins unaire interne n’est PAS trouvable
/// ainsi : il n’existe qu’après la levée d’ambiguïté des moins.
pub fn lookup(symbole: char) -> Option<&'static OperatorSpec> {
    if symbole == SYMBOLE_MOINS_UNAIRE {
        return None;
    }
    REGISTRE.iter().find(|s| s.symbole == symbole)
}

/// Fiche d’un opérateur déjà identifié (toujours présente).
pub fn spec(op: Op) -> &'static OperatorSpec {
    // Le registre couvre chaque variante de Op (vérifié par les tests).
    match REGISTRE.iter().find(|s| s.op == op) {
        Some(s) => s,
        None => unreachable!("opérateur absent du registre: {op:?}"),
    }
}

/// `None` (pas de caractère) => false, jamais de panique.
pub fn is_operator(symbole: Option<char>) -> bool {
    symbole.and_then(lookup).is_some()
}

/// Tous les symboles acceptés en entrée (pour les messages d’aide).
pub fn symboles() -> impl Iterator<Item = char> {
    REGISTRE
        .iter()
        .map(|s| s.symbole)
        .filter(|&c| c != SYMBOLE_MOINS_UNAIRE)
}

impl Op {
    pub fn spec(self) -> &'static OperatorSpec {
        spec(self)
    }

    pub fn priority(self) -> u8 {
        spec(self).priorite
    }

    pub fn arity(self) -> Arite {
        spec(self).arite
    }

    pub fn position(self) -> Position {
        spec(self).position
    }

    pub fn symbole(self) -> char {
        spec(self).symbole
    }

    pub fn is_binary(self) -> bool {
        self.arity() == Arite::Binaire
    }

    pub fn is_prefix(self) -> bool {
        self.position() == Position::Gauche
    }

    pub fn is_postfix(self) -> bool {
        self.position() == Position::Droite
    }

    /// Applique la fonction brute (sans contrôle de domaine).
    /// `b` est ignoré pour un opérateur unaire.
    pub fn apply(self, a: f64, b: f64) -> f64 {
        match spec(self).fonction {
            Fonction::Unaire(f) => f(a),
            Fonction::Binaire(f) => f(a, b),
        }
    }
}

/* ------------------------ Fonctions ------------------------ */

fn add(a: f64, b: f64) -> f64 {
    a + b
}

fn sub(a: f64, b: f64) -> f64 {
    a - b
}

fn mul(a: f64, b: f64) -> f64 {
    a * b
}

fn div(a: f64, b: f64) -> f64 {
    a / b
}

/// Modulo « plancher » : le reste prend le signe du diviseur (-7 % 3 = 2).
fn modulo(a: f64, b: f64) -> f64 {
    let r = a % b;
    if r != 0.0 && (r < 0.0) != (b < 0.0) {
        r + b
    } else {
        r
    }
}

fn moyenne(a: f64, b: f64) -> f64 {
    (a + b) / 2.0
}

fn negatif(a: f64) -> f64 {
    -a
}

/// n! par produit itératif (n déjà validé : entier, 0 <= n <= FACTORIELLE_MAX).
fn factorielle(n: f64) -> f64 {
    let mut acc = 1.0;
    let mut k = 2.0;
    while k <= n {
        acc *= k;
        k += 1.0;
    }
    acc
}

/// Somme des chiffres de l’écriture décimale (le séparateur est ignoré).
/// 123 -> 6 ; 1.5 -> 6 ; 0.25 -> 7
fn somme_chiffres(x: f64) -> f64 {
    x.abs()
        .to_string()
        .chars()
        .filter_map(|c| c.to_digit(10))
        .map(f64::from)
        .sum()
}
