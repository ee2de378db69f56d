// src/noyau/diagnostic.rs
//
// Diagnostics du noyau
// --------------------
// - Span : plage [start, end) en indices de CARACTÈRES du texte brut (espaces compris)
// - DiagnosticKind : taxonomie fermée (jamais un nom de type d’erreur)
// - Diagnostic : genre + message + plages à surligner
// - Rejet : un ou plusieurs diagnostics (la validation les cumule)

use std::fmt;

use thiserror::Error;

/// Plage demi-ouverte dans le texte saisi.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct Span {
    pub start: usize,
    pub end: usize,
}

impl Span {
    pub fn new(start: usize, end: usize) -> Self {
        debug_assert!(start <= end, "span inversé: {start}..{end}");
        Self { start, end }
    }

    /// Un seul caractère.
    pub fn at(index: usize) -> Self {
        Self::new(index, index + 1)
    }

    /// Plus petite plage couvrant `self` et `other`.
    pub fn cover(self, other: Span) -> Span {
        Span::new(self.start.min(other.start), self.end.max(other.end))
    }

    pub fn contains(&self, index: usize) -> bool {
        self.start <= index && index < self.end
    }
}

impl fmt::Display for Span {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}..{}", self.start, self.end)
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Error)]
pub enum DiagnosticKind {
    #[error("Caractère invalide")]
    InvalidCharacter,
    #[error("Expression vide")]
    EmptyExpression,
    #[error("Point décimal invalide")]
    InvalidDecimalPoint,
    #[error("Nombre hors limites")]
    NumberOutOfRange,
    #[error("Parenthèses non équilibrées")]
    UnbalancedParentheses,
    #[error("Parenthèses vides")]
    EmptyParentheses,
    #[error("Opérateur binaire mal placé")]
    MisplacedBinaryOperator,
    #[error("Négation mal placée")]
    MisplacedNegation,
    #[error("Opérateur unaire isolé")]
    StandaloneUnaryOperator,
    #[error("Opérateur manquant")]
    MissingOperator,
    #[error("Division par zéro")]
    DivisionByZero,
    #[error("Factorielle hors domaine")]
    FactorialDomainError,
    #[error("Somme des chiffres hors domaine")]
    DigitSumDomainError,
    #[error("Résultat non fini")]
    NonFiniteResult,
    #[error("Invariant interne violé")]
    InternalInvariantViolation,
}

impl DiagnosticKind {
    /// Erreur d’exécution (après la conversion postfixe) ?
    pub fn is_runtime(self) -> bool {
        matches!(
            self,
            DiagnosticKind::DivisionByZero
                | DiagnosticKind::FactorialDomainError
                | DiagnosticKind::DigitSumDomainError
                | DiagnosticKind::NonFiniteResult
        )
    }
}

#[derive(Clone, Debug, PartialEq, Error)]
#[error("{kind} : {message}")]
pub struct Diagnostic {
    pub kind: DiagnosticKind,
    pub message: String,
    pub spans: Vec<Span>,
}

impl Diagnostic {
    pub fn new(kind: DiagnosticKind, message: impl Into<String>, spans: Vec<Span>) -> Self {
        Self {
            kind,
            message: message.into(),
            spans,
        }
    }

    /// Violation d’invariant : défaut du noyau, pas une faute de saisie.
    pub fn interne(message: impl Into<String>) -> Self {
        Self::new(DiagnosticKind::InternalInvariantViolation, message, Vec::new())
    }

    /// Vrai si l’indice `index` du texte brut doit être surligné.
    pub fn highlights(&self, index: usize) -> bool {
        self.spans.iter().any(|s| s.contains(index))
    }
}

/// Échec d’une évaluation : au moins un diagnostic.
#[derive(Clone, Debug, PartialEq, Error)]
#[error("{}", resume(.diagnostics))]
pub struct Rejet {
    pub diagnostics: Vec<Diagnostic>,
}

impl Rejet {
    pub fn kinds(&self) -> Vec<DiagnosticKind> {
        self.diagnostics.iter().map(|d| d.kind).collect()
    }

    pub fn has(&self, kind: DiagnosticKind) -> bool {
        self.diagnostics.iter().any(|d| d.kind == kind)
    }
}

impl From<Diagnostic> for Rejet {
    fn from(d: Diagnostic) -> Self {
        Self {
            diagnostics: vec![d],
        }
    }
}

impl From<Vec<Diagnostic>> for Rejet {
    fn from(diagnostics: Vec<Diagnostic>) -> Self {
        Self { diagnostics }
    }
}

fn resume(diagnostics: &[Diagnostic]) -> String {
    diagnostics
        .iter()
        .map(|d| d.to_string())
        .collect::<Vec<_>>()
        .join("\n")
}
