// src/noyau/jetons.rs
//
// Tokenisation du texte marqué (sortie de moins.rs).
//
// 1) Contrôle de TOUS les points décimaux avant de découper (tous les fautifs
//    sont signalés ensemble).
// 2) Découpage en un seul passage :
//    - suite de chiffres (au plus un '.') => Num
//    - '(' ')'                            => LPar / RPar
//    - symbole d’opérateur                => Op
//    - marqueur de moins :
//        suivi d’un nombre => le littéral est négatif
//        suivi de '('      => SignLPar (négation différée du groupe)
//        sinon             => Op(Moins) (préfixe)
//
// Un espace sépare deux nombres : "2 3" donne deux Num (pas 23).
// Chaque jeton garde sa plage dans le texte brut.

use super::diagnostic::{Diagnostic, DiagnosticKind, Span};
use super::moins::{Marque, Symbole};
use super::nombre::format_f64;
use super::operateurs::{self, Op};

#[derive(Clone, Copy, Debug, PartialEq)]
pub enum Tok {
    Num(f64),
    Op(Op),
    LPar,
    RPar,
    /// '-(' : parenthèse ouvrante + négation appliquée au groupe entier
    /// quand la parenthèse correspondante se ferme.
    SignLPar,
}

#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Jeton {
    pub tok: Tok,
    pub span: Span,
}

impl Jeton {
    pub fn is_num(&self) -> bool {
        matches!(self.tok, Tok::Num(_))
    }

    pub fn is_open(&self) -> bool {
        matches!(self.tok, Tok::LPar | Tok::SignLPar)
    }

    pub fn is_close(&self) -> bool {
        matches!(self.tok, Tok::RPar)
    }

    pub fn op(&self) -> Option<Op> {
        match self.tok {
            Tok::Op(op) => Some(op),
            _ => None,
        }
    }

    pub fn is_binary_op(&self) -> bool {
        self.op().is_some_and(Op::is_binary)
    }

    pub fn is_prefix_op(&self) -> bool {
        self.op().is_some_and(Op::is_prefix)
    }

    pub fn is_postfix_op(&self) -> bool {
        self.op().is_some_and(Op::is_postfix)
    }
}

fn is_chiffre(m: &Marque) -> bool {
    m.car().is_some_and(|c| c.is_ascii_digit())
}

fn is_chiffre_ou_point(m: &Marque) -> bool {
    m.car().is_some_and(|c| c.is_ascii_digit() || c == '.')
}

/// Deux caractères collés dans le texte brut (aucun espace entre eux).
fn colles(a: &Marque, b: &Marque) -> bool {
    a.span.end == b.span.start
}

/* ------------------------ Points décimaux ------------------------ */

/// Un point est invalide :
/// - s’il y a déjà un point dans le nombre en cours ;
/// - s’il n’a de chiffre collé ni avant ni après (début, fin, ou entre
///   deux non-chiffres).
pub fn check_decimal_points(marques: &[Marque]) -> Result<(), Diagnostic> {
    let mut multiples = Vec::new();
    let mut isoles = Vec::new();
    let mut point_vu = false;

    for (i, m) in marques.iter().enumerate() {
        let prev = if i == 0 { None } else { marques.get(i - 1) };
        let next = marques.get(i + 1);

        // Le nombre en cours se poursuit-il ?
        let continue_nombre =
            prev.is_some_and(|p| is_chiffre_ou_point(p) && colles(p, m)) && is_chiffre_ou_point(m);
        if !continue_nombre {
            point_vu = false;
        }

        if m.car() != Some('.') {
            continue;
        }

        let chiffre_avant = prev.is_some_and(|p| is_chiffre(p) && colles(p, m));
        let chiffre_apres = next.is_some_and(|n| is_chiffre(n) && colles(m, n));

        if point_vu {
            multiples.push(m.span);
        } else if !chiffre_avant && !chiffre_apres {
            isoles.push(m.span);
        }
        point_vu = true;
    }

    if multiples.is_empty() && isoles.is_empty() {
        return Ok(());
    }

    let message = match (multiples.is_empty(), isoles.is_empty()) {
        (false, false) => {
            "points isolés et plusieurs points dans un même nombre interdits (valides : .5, 1.5, 5.)"
        }
        (false, true) => "plusieurs points dans un même nombre interdits (valides : .5, 1.5, 5.)",
        _ => "point isolé interdit (valides : .5, 1.5, 5.)",
    };

    let mut spans = multiples;
    spans.extend(isoles);
    spans.sort();
    Err(Diagnostic::new(
        DiagnosticKind::InvalidDecimalPoint,
        message,
        spans,
    ))
}

/* ------------------------ Tokenisation ------------------------ */

/// Lit un nombre à partir de `debut` (chiffre ou point).
/// Renvoie (valeur, plage, indice suivant).
fn lire_nombre(marques: &[Marque], debut: usize) -> Result<(f64, Span, usize), Diagnostic> {
    let mut texte = String::new();
    let mut i = debut;
    while i < marques.len() && is_chiffre_ou_point(&marques[i]) {
        if i > debut && !colles(&marques[i - 1], &marques[i]) {
            break;
        }
        if let Some(c) = marques[i].car() {
            texte.push(c);
        }
        i += 1;
    }

    let span = marques[debut].span.cover(marques[i - 1].span);
    let valeur: f64 = texte.parse().map_err(|_| {
        Diagnostic::new(
            DiagnosticKind::InvalidDecimalPoint,
            format!("nombre mal formé : {texte}"),
            vec![span],
        )
    })?;

    if !valeur.is_finite() {
        return Err(Diagnostic::new(
            DiagnosticKind::NumberOutOfRange,
            format!("nombre trop grand : {texte}"),
            vec![span],
        ));
    }

    Ok((valeur, span, i))
}

/// Tokenize le texte marqué (points décimaux contrôlés d’abord).
pub fn tokenize(marques: &[Marque]) -> Result<Vec<Jeton>, Diagnostic> {
    check_decimal_points(marques)?;

    let mut out = Vec::new();
    let mut i = 0;

    while i < marques.len() {
        let m = marques[i];

        match m.symbole {
            Symbole::Car(c) if c.is_ascii_digit() || c == '.' => {
                let (valeur, span, suivant) = lire_nombre(marques, i)?;
                out.push(Jeton {
                    tok: Tok::Num(valeur),
                    span,
                });
                i = suivant;
            }
            Symbole::Car('(') => {
                out.push(Jeton {
                    tok: Tok::LPar,
                    span: m.span,
                });
                i += 1;
            }
            Symbole::Car(')') => {
                out.push(Jeton {
                    tok: Tok::RPar,
                    span: m.span,
                });
                i += 1;
            }
            Symbole::Car(c) => {
                let spec = operateurs::lookup(c).ok_or_else(|| {
                    Diagnostic::new(
                        DiagnosticKind::InvalidCharacter,
                        format!("caractère inattendu : '{c}'"),
                        vec![m.span],
                    )
                })?;
                out.push(Jeton {
                    tok: Tok::Op(spec.op),
                    span: m.span,
                });
                i += 1;
            }
            Symbole::Unaire | Symbole::Signe => {
                let suivant = marques.get(i + 1);
                match suivant.and_then(Marque::car) {
                    Some(d) if d.is_ascii_digit() || d == '.' => {
                        let (valeur, span, j) = lire_nombre(marques, i + 1)?;
                        out.push(Jeton {
                            tok: Tok::Num(-valeur),
                            span: m.span.cover(span),
                        });
                        i = j;
                    }
                    Some('(') => {
                        let span = suivant.map_or(m.span, |p| m.span.cover(p.span));
                        out.push(Jeton {
                            tok: Tok::SignLPar,
                            span,
                        });
                        i += 2;
                    }
                    _ => {
                        out.push(Jeton {
                            tok: Tok::Op(Op::Moins),
                            span: m.span,
                        });
                        i += 1;
                    }
                }
            }
        }
    }

    Ok(out)
}

/// Format utilitaire (démarche) : liste de jetons en texte.
pub fn format_tokens(jetons: &[Jeton]) -> String {
    jetons
        .iter()
        .map(|j| match j.tok {
            Tok::Num(x) => format_f64(x),
            Tok::Op(op) => op.symbole().to_string(),
            Tok::LPar => "(".to_string(),
            Tok::RPar => ")".to_string(),
            Tok::SignLPar => "-(".to_string(),
        })
        .collect::<Vec<_>>()
        .join(" ")
}
