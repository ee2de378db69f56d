// src/noyau/moins.rs
//
// Levée d’ambiguïté des moins
// ---------------------------
// Un même glyphe '-' joue trois rôles :
// - moins unaire  : en tête ou juste après '('        => Symbole::Unaire
// - moins de signe: juste après un opérateur          => Symbole::Signe
// - soustraction  : partout ailleurs                  => reste '-'
//
// Une série de moins consécutifs se réduit par parité :
// nombre pair => rien, nombre impair => un seul marqueur, placé juste avant
// le caractère qui termine la série. Le marqueur porte la plage de toute la série.
//
// Tout opérateur reconnu ouvre une série, postfixes compris : "3!-2" se lit
// "3! s2", deux opérandes côte à côte, rejeté par la validation.
// Pour soustraire après un postfixe : "(3!)-2".

use super::diagnostic::Span;
use super::operateurs;
use super::pretraitement::SourceChar;

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Symbole {
    Car(char),
    Unaire,
    Signe,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Marque {
    pub symbole: Symbole,
    pub span: Span,
}

impl Marque {
    pub fn car(&self) -> Option<char> {
        match self.symbole {
            Symbole::Car(c) => Some(c),
            Symbole::Unaire | Symbole::Signe => None,
        }
    }

    pub fn is_marqueur(&self) -> bool {
        !matches!(self.symbole, Symbole::Car(_))
    }
}

/// Point d’entrée : caractères prétraités -> texte marqué.
pub fn disambiguate(chars: &[SourceChar]) -> Vec<Marque> {
    let entree: Vec<Marque> = chars
        .iter()
        .map(|sc| Marque {
            symbole: Symbole::Car(sc.ch),
            span: Span::at(sc.index),
        })
        .collect();
    lever_ambiguite(&entree)
}

/// Le caractère précédent ouvre-t-il une série de moins ?
/// (None = début d’expression)
fn ouvre_serie(prev: Option<&Marque>) -> Option<Symbole> {
    let Some(prev) = prev else {
        return Some(Symbole::Unaire);
    };
    match prev.car() {
        Some('(') => Some(Symbole::Unaire),
        Some(c) if operateurs::is_operator(Some(c)) => Some(Symbole::Signe),
        Some(_) => None,
        // marqueur déjà posé : opaque
        None => None,
    }
}

/// Réécriture sur un texte déjà (éventuellement) marqué.
/// Idempotente : les marqueurs sont opaques, et aucun '-' restant n’ouvre de série.
pub fn lever_ambiguite(entree: &[Marque]) -> Vec<Marque> {
    let mut out: Vec<Marque> = Vec::with_capacity(entree.len());
    let mut i = 0;

    while i < entree.len() {
        let m = entree[i];
        let prev = if i == 0 { None } else { entree.get(i - 1) };

        if m.car() == Some('-') {
            if let Some(role) = ouvre_serie(prev) {
                // Parcourt toute la série
                let mut j = i;
                let mut negatif = false;
                while j < entree.len() && entree[j].car() == Some('-') {
                    negatif = !negatif;
                    j += 1;
                }

                if negatif {
                    out.push(Marque {
                        symbole: role,
                        span: m.span.cover(entree[j - 1].span),
                    });
                }

                i = j;
                continue;
            }
        }

        out.push(m);
        i += 1;
    }

    out
}

/// Forme texte (démarche) : 'u' pour unaire, 's' pour signe.
pub fn format_marques(marques: &[Marque]) -> String {
    marques
        .iter()
        .map(|m| match m.symbole {
            Symbole::Car(c) => c,
            Symbole::Unaire => operateurs::SYMBOLE_MOINS_UNAIRE,
            Symbole::Signe => 's',
        })
        .collect()
}
