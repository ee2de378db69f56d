// src/noyau/pretraitement.rs
//
// Prétraitement : espaces retirés + contrôle de l’alphabet.
// Chaque caractère conservé garde son indice dans le texte brut
// (indices de caractères, pas d’octets) : c’est ce qui permet de
// surligner la bonne position après toutes les réécritures.

use super::diagnostic::{Diagnostic, DiagnosticKind, Span};
use super::operateurs;

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct SourceChar {
    pub ch: char,
    pub index: usize,
}

/// Retire les espaces (tout blanc Unicode), garde l’indice d’origine.
pub fn strip_whitespace(raw: &str) -> Vec<SourceChar> {
    raw.chars()
        .enumerate()
        .filter(|(_, c)| !c.is_whitespace())
        .map(|(index, ch)| SourceChar { ch, index })
        .collect()
}

fn is_accepte(c: char) -> bool {
    c.is_ascii_digit() || matches!(c, '.' | '(' | ')') || operateurs::is_operator(Some(c))
}

/// Tous les caractères invalides d’un coup (chacun listé une fois dans le
/// message, chaque occurrence surlignée).
pub fn check_characters(chars: &[SourceChar]) -> Result<(), Diagnostic> {
    let mut fautifs: Vec<char> = Vec::new();
    let mut spans = Vec::new();

    for sc in chars.iter().filter(|sc| !is_accepte(sc.ch)) {
        if !fautifs.contains(&sc.ch) {
            fautifs.push(sc.ch);
        }
        spans.push(Span::at(sc.index));
    }

    if fautifs.is_empty() {
        return Ok(());
    }

    let liste = fautifs
        .iter()
        .map(|c| format!("'{c}'"))
        .collect::<Vec<_>>()
        .join(", ");
    let valides: String = operateurs::symboles().collect();
    Err(Diagnostic::new(
        DiagnosticKind::InvalidCharacter,
        format!(
            "caractères invalides : {liste}. Acceptés : chiffres, '.', parenthèses et {valides}"
        ),
        spans,
    ))
}
