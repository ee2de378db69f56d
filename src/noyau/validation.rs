// src/noyau/validation.rs
//
// Validation structurelle des jetons
// ----------------------------------
// Six contrôles indépendants, tous exécutés (l’utilisateur voit tous les
// problèmes d’un coup). Chaque contrôle renvoie Ok(()) ou UN diagnostic
// qui surligne toutes les positions fautives.
//
// 1. parenthèses équilibrées
// 2. parenthèses vides
// 3. opérateur binaire entre deux opérandes
// 4. négation (~) suivie directement d’un nombre
// 5. opérateur unaire non isolé
// 6. opérateur manquant entre deux opérandes

use super::diagnostic::{Diagnostic, DiagnosticKind, Rejet, Span};
use super::jetons::Jeton;
use super::operateurs::Op;

type Controle = fn(&[Jeton]) -> Result<(), Diagnostic>;

const CONTROLES: [Controle; 6] = [
    parentheses_check,
    empty_parentheses_check,
    binary_operators_check,
    negation_check,
    standalone_unary_check,
    missing_operator_check,
];

/// Exécute les six contrôles et cumule les diagnostics.
pub fn validate(jetons: &[Jeton]) -> Result<(), Rejet> {
    let diagnostics: Vec<Diagnostic> = CONTROLES
        .iter()
        .filter_map(|controle| controle(jetons).err())
        .collect();

    if diagnostics.is_empty() {
        Ok(())
    } else {
        Err(Rejet::from(diagnostics))
    }
}

fn echec(kind: DiagnosticKind, message: &str, spans: Vec<Span>) -> Result<(), Diagnostic> {
    if spans.is_empty() {
        Ok(())
    } else {
        Err(Diagnostic::new(kind, message, spans))
    }
}

/// Voisin de gauche : fin d’opérande ? (nombre, ')', opérateur postfixe)
fn finit_operande(j: Option<&Jeton>) -> bool {
    j.is_some_and(|j| j.is_num() || j.is_close() || j.is_postfix_op())
}

/// Voisin de droite : début d’opérande ? (nombre, '(' ou '-(', opérateur préfixe)
fn commence_operande(j: Option<&Jeton>) -> bool {
    j.is_some_and(|j| j.is_num() || j.is_open() || j.is_prefix_op())
}

fn voisins(jetons: &[Jeton], i: usize) -> (Option<&Jeton>, Option<&Jeton>) {
    let prev = if i == 0 { None } else { jetons.get(i - 1) };
    (prev, jetons.get(i + 1))
}

/// 1. Toute ouvrante sans fermante, et toute fermante sans ouvrante.
pub fn parentheses_check(jetons: &[Jeton]) -> Result<(), Diagnostic> {
    let mut ouvertes: Vec<Span> = Vec::new();
    let mut fautives: Vec<Span> = Vec::new();

    for j in jetons {
        if j.is_open() {
            ouvertes.push(j.span);
        } else if j.is_close() && ouvertes.pop().is_none() {
            fautives.push(j.span);
        }
    }

    fautives.extend(ouvertes);
    fautives.sort();
    echec(
        DiagnosticKind::UnbalancedParentheses,
        "les parenthèses ne sont pas équilibrées",
        fautives,
    )
}

/// 2. "()" sans rien entre les deux.
pub fn empty_parentheses_check(jetons: &[Jeton]) -> Result<(), Diagnostic> {
    let spans = jetons
        .windows(2)
        .filter(|w| w[0].is_open() && w[1].is_close())
        .map(|w| w[0].span.cover(w[1].span))
        .collect();
    echec(
        DiagnosticKind::EmptyParentheses,
        "les parenthèses vides sont interdites",
        spans,
    )
}

/// 3. Un binaire a une fin d’opérande à gauche et un début d’opérande à droite.
pub fn binary_operators_check(jetons: &[Jeton]) -> Result<(), Diagnostic> {
    let spans = jetons
        .iter()
        .enumerate()
        .filter(|(_, j)| j.is_binary_op())
        .filter(|(i, _)| {
            let (prev, next) = voisins(jetons, *i);
            !(finit_operande(prev) && commence_operande(next))
        })
        .map(|(_, j)| j.span)
        .collect();
    echec(
        DiagnosticKind::MisplacedBinaryOperator,
        "un opérateur binaire doit se trouver entre deux opérandes ou expressions",
        spans,
    )
}

/// 4. '~' est suivi d’un NOMBRE (pas d’une expression, pas d’un opérateur).
/// Plus strict que les autres préfixes.
pub fn negation_check(jetons: &[Jeton]) -> Result<(), Diagnostic> {
    let spans = jetons
        .iter()
        .enumerate()
        .filter(|(_, j)| j.op() == Some(Op::Negation))
        .filter(|(i, _)| !jetons.get(i + 1).is_some_and(Jeton::is_num))
        .map(|(_, j)| j.span)
        .collect();
    echec(
        DiagnosticKind::MisplacedNegation,
        "la négation (~) doit être suivie directement d’un nombre",
        spans,
    )
}

/// 5. Préfixe : un opérande (ou un autre préfixe) à droite.
///    Postfixe : un opérande (ou un autre postfixe) à gauche.
pub fn standalone_unary_check(jetons: &[Jeton]) -> Result<(), Diagnostic> {
    let mut spans = Vec::new();

    for (i, j) in jetons.iter().enumerate() {
        let (prev, next) = voisins(jetons, i);
        let isole = if j.is_prefix_op() {
            !commence_operande(next)
        } else if j.is_postfix_op() {
            !finit_operande(prev)
        } else {
            false
        };
        if isole {
            spans.push(j.span);
        }
    }

    echec(
        DiagnosticKind::StandaloneUnaryOperator,
        "un opérateur unaire ne peut pas être isolé",
        spans,
    )
}

/// 6. Deux opérandes côte à côte : "2 3", "(1)(2)", "3!4", "2(3)".
pub fn missing_operator_check(jetons: &[Jeton]) -> Result<(), Diagnostic> {
    let spans = jetons
        .windows(2)
        .filter(|w| finit_operande(Some(&w[0])) && commence_operande(Some(&w[1])))
        .map(|w| w[0].span.cover(w[1].span))
        .collect();
    echec(
        DiagnosticKind::MissingOperator,
        "il manque des opérateurs",
        spans,
    )
}
