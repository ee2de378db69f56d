// src/noyau/rpn.rs
//
// Shunting-yard -> RPN -> valeur
// Objectif:
// - Convertir une suite de Jeton (déjà validée) en RPN (postfix)
// - Puis évaluer la RPN sur une pile (valeur, plage source)
//
// Règles de dépilement pour un opérateur t :
// - préfixe (~, moins unaire) : jamais (son opérande n’est pas encore lu)
// - sinon, tant que le sommet n’est pas une ouvrante et que
//     prio(sommet) > prio(t)
//     ou prio(sommet) == prio(t) et t n’est pas postfixe
//   => on sort le sommet.
//   Égalité entre binaires : associativité à gauche (2^3^2 = 64).
//   Un postfixe ne fait jamais sortir un opérateur de même priorité :
//   ~3! = ~(3!), et une chaîne de postfixes s’applique de droite à gauche
//   (12!# = (12#)!).
//
// '-(' : ouvrante qui, à sa fermeture, émet un moins unaire sur tout le groupe.
// Chaque fermeture émet aussi Groupe(plage) : la plage du résultat en cours
// s’élargit aux parenthèses, pour surligner "(3-3)" en entier.

use tracing::error;

use super::config::FACTORIELLE_MAX;
use super::diagnostic::{Diagnostic, DiagnosticKind, Span};
use super::jetons::{Jeton, Tok};
use super::nombre::format_f64;
use super::operateurs::Op;

#[derive(Clone, Copy, Debug, PartialEq)]
pub enum RpnTok {
    Num(f64),
    Op(Op),
    /// Fin d’un groupe parenthésé (n’agit que sur les plages).
    Groupe,
}

#[derive(Clone, Copy, Debug, PartialEq)]
pub struct RpnItem {
    pub tok: RpnTok,
    pub span: Span,
}

/// Entrée de la pile d’opérateurs.
#[derive(Clone, Copy, Debug)]
enum Pile {
    Ouvrante { span: Span, signe: bool },
    Op(Op, Span),
}

fn doit_sortir(sommet: Op, t: Op) -> bool {
    let (ps, pt) = (sommet.priority(), t.priority());
    ps > pt || (ps == pt && !t.is_postfix())
}

/// Convertit une suite de jetons validée en RPN.
pub fn to_rpn(jetons: &[Jeton]) -> Result<Vec<RpnItem>, Diagnostic> {
    let mut out: Vec<RpnItem> = Vec::with_capacity(jetons.len());
    let mut ops: Vec<Pile> = Vec::new();

    for j in jetons {
        match j.tok {
            Tok::Num(x) => out.push(RpnItem {
                tok: RpnTok::Num(x),
                span: j.span,
            }),

            Tok::LPar => ops.push(Pile::Ouvrante {
                span: j.span,
                signe: false,
            }),

            Tok::SignLPar => ops.push(Pile::Ouvrante {
                span: j.span,
                signe: true,
            }),

            Tok::RPar => {
                // dépile jusqu’à l’ouvrante (jetée, pas émise)
                loop {
                    match ops.pop() {
                        Some(Pile::Op(op, span)) => out.push(RpnItem {
                            tok: RpnTok::Op(op),
                            span,
                        }),
                        Some(Pile::Ouvrante { span, signe }) => {
                            let groupe = span.cover(j.span);
                            out.push(RpnItem {
                                tok: RpnTok::Groupe,
                                span: groupe,
                            });
                            // négation différée : s’applique au groupe fermé
                            if signe {
                                out.push(RpnItem {
                                    tok: RpnTok::Op(Op::Moins),
                                    span,
                                });
                            }
                            break;
                        }
                        None => {
                            return Err(Diagnostic::new(
                                DiagnosticKind::UnbalancedParentheses,
                                "parenthèse fermante sans ouvrante",
                                vec![j.span],
                            ))
                        }
                    }
                }
            }

            Tok::Op(t) => {
                if !t.is_prefix() {
                    while let Some(&Pile::Op(sommet, span)) = ops.last() {
                        if !doit_sortir(sommet, t) {
                            break;
                        }
                        ops.pop();
                        out.push(RpnItem {
                            tok: RpnTok::Op(sommet),
                            span,
                        });
                    }
                }
                ops.push(Pile::Op(t, j.span));
            }
        }
    }

    // vide la pile ops
    while let Some(entree) = ops.pop() {
        match entree {
            Pile::Op(op, span) => out.push(RpnItem {
                tok: RpnTok::Op(op),
                span,
            }),
            Pile::Ouvrante { span, .. } => {
                return Err(Diagnostic::new(
                    DiagnosticKind::UnbalancedParentheses,
                    "parenthèses non fermées",
                    vec![span],
                ))
            }
        }
    }

    Ok(out)
}

/* ------------------------ Évaluation ------------------------ */

type Operande = (f64, Span);

fn depile(pile: &mut Vec<Operande>, op: Op) -> Result<Operande, Diagnostic> {
    pile.pop().ok_or_else(|| {
        error!(?op, "RPN invalide : opérande manquant");
        Diagnostic::interne(format!(
            "RPN invalide : opérande manquant pour '{}'",
            op.symbole()
        ))
    })
}

/// Contrôles de domaine d’un binaire (avant application).
fn controle_binaire(op: Op, op_span: Span, droite: Operande) -> Result<(), Diagnostic> {
    let (b, b_span) = droite;
    match op {
        Op::Div if b == 0.0 => Err(Diagnostic::new(
            DiagnosticKind::DivisionByZero,
            "la division par zéro est interdite",
            vec![op_span.cover(b_span)],
        )),
        Op::Mod if b == 0.0 => Err(Diagnostic::new(
            DiagnosticKind::DivisionByZero,
            "le modulo par zéro est interdit",
            vec![op_span.cover(b_span)],
        )),
        _ => Ok(()),
    }
}

/// Contrôles de domaine d’un unaire (avant application).
fn controle_unaire(op: Op, op_span: Span, operande: Operande) -> Result<(), Diagnostic> {
    let (a, a_span) = operande;
    let plage = vec![a_span.cover(op_span)];
    match op {
        Op::Factorielle => {
            let raison = if a < 0.0 {
                Some("la factorielle n’est définie que pour les entiers positifs ou nuls")
            } else if a.fract() != 0.0 {
                Some("la factorielle n’est définie que pour les entiers")
            } else if a > FACTORIELLE_MAX {
                Some("la factorielle est limitée à 170 (171! dépasse la plage des flottants)")
            } else {
                None
            };
            match raison {
                Some(m) => Err(Diagnostic::new(DiagnosticKind::FactorialDomainError, m, plage)),
                None => Ok(()),
            }
        }
        Op::SommeChiffres if a < 0.0 => Err(Diagnostic::new(
            DiagnosticKind::DigitSumDomainError,
            "la somme des chiffres (#) n’est définie que pour les nombres positifs ou nuls",
            plage,
        )),
        _ => Ok(()),
    }
}

fn controle_fini(op: Op, resultat: f64, plage: Span) -> Result<f64, Diagnostic> {
    if resultat.is_finite() {
        return Ok(resultat);
    }
    let message = if resultat.is_nan() {
        format!("résultat indéfini pour '{}'", op.symbole())
    } else {
        format!("résultat hors de la plage des flottants pour '{}'", op.symbole())
    };
    Err(Diagnostic::new(
        DiagnosticKind::NonFiniteResult,
        message,
        vec![plage],
    ))
}

/// Évalue une RPN. S’arrête à la première erreur de domaine.
pub fn eval_rpn(rpn: &[RpnItem]) -> Result<f64, Diagnostic> {
    let mut pile: Vec<Operande> = Vec::new();

    for item in rpn {
        match item.tok {
            RpnTok::Num(x) => pile.push((x, item.span)),

            RpnTok::Groupe => {
                let sommet = pile
                    .last_mut()
                    .ok_or_else(|| Diagnostic::interne("RPN invalide : groupe vide"))?;
                sommet.1 = sommet.1.cover(item.span);
            }

            RpnTok::Op(op) if op.is_binary() => {
                // droite d’abord (ordre important pour -, /, ^, %)
                let droite = depile(&mut pile, op)?;
                let gauche = depile(&mut pile, op)?;
                controle_binaire(op, item.span, droite)?;

                let plage = gauche.1.cover(droite.1);
                let r = controle_fini(op, op.apply(gauche.0, droite.0), plage)?;
                pile.push((r, plage));
            }

            RpnTok::Op(op) => {
                let operande = depile(&mut pile, op)?;
                controle_unaire(op, item.span, operande)?;

                let r = controle_fini(op, op.apply(operande.0, 0.0), operande.1)?;
                pile.push((r, operande.1));
            }
        }
    }

    match pile.as_slice() {
        [(valeur, _)] => Ok(*valeur),
        _ => {
            error!(restant = pile.len(), "RPN invalide : pile finale");
            Err(Diagnostic::interne(format!(
                "RPN invalide : {} valeurs restantes au lieu d’une",
                pile.len()
            )))
        }
    }
}

/// Format utilitaire (démarche) : RPN en texte.
pub fn format_rpn(rpn: &[RpnItem]) -> String {
    rpn.iter()
        .filter_map(|item| match item.tok {
            RpnTok::Num(x) => Some(format_f64(x)),
            RpnTok::Op(op) => Some(op.symbole().to_string()),
            RpnTok::Groupe => None,
        })
        .collect::<Vec<_>>()
        .join(" ")
}
