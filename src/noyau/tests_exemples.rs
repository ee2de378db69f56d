//! Tests exemples (campagne) : expressions simples et composées, erreurs de saisie.
//!
//! Les valeurs attendues sont calculées à la main ; tolérance relative pour
//! les puissances (powf) et les quotients non entiers.

use super::{evaluate, DiagnosticKind, Nombre};

fn eval_ok(expr: &str) -> Nombre {
    evaluate(expr).unwrap_or_else(|e| panic!("expr={expr:?} err={e}"))
}

fn assert_proche(expr: &str, attendu: f64) {
    let v = eval_ok(expr).as_f64();
    let ecart = (v - attendu).abs();
    let tol = 1e-9 * attendu.abs().max(1.0);
    assert!(ecart <= tol, "expr={expr:?} attendu≈{attendu} obtenu={v}");
}

fn assert_rejet(expr: &str) {
    assert!(evaluate(expr).is_err(), "expr={expr:?} devait être rejetée");
}

/* ------------------------ Simples ------------------------ */

#[test]
fn exemples_simples() {
    let cas: [(&str, i64); 15] = [
        ("1+2", 3),
        ("5-3", 2),
        ("2*3", 6),
        ("10/2", 5),
        ("2^3", 8),
        ("-5", -5),
        ("11%3", 2),
        ("1$2", 2),
        ("2&3", 2),
        ("2@4", 3),
        ("3!", 6),
        ("~5", -5),
        ("-(~3)", 3),
        ("(2+3)*4", 20),
        ("123#", 6),
    ];
    for (expr, attendu) in cas {
        assert_eq!(eval_ok(expr), Nombre::Entier(attendu), "expr={expr:?}");
    }
}

/* ------------------------ Composées ------------------------ */

#[test]
fn exemples_composes() {
    let cas: [(&str, f64); 20] = [
        ("((2 + 3 * 4 ) - (5 % 2 ))", 13.0),
        (" (10 @ 20 )  + (3 ^ 2 ) / (2 & 4) ", 19.5),
        ("( 5 + ( 8 - ( 6# ) ) * 2 )", 9.0),
        ("((12 #) * (3!)) ^ (4) ", 104976.0),
        ("(7$3) ^ 2 - (10%3) + (6&5 * 2) ", 58.0),
        // le moins de signe nie bien le groupe : 10 & 12 + (-4)
        ("(10$2) & (20@4) + -((4#)/(3%2))", 6.0),
        ("((2+3*4)/(5-2))^(2$1)", 196.0 / 9.0),
        ("( ( 3 * ( 2+5 ) ) - ( ~4 ) ) ^ (3!)", 244140625.0),
        ("((10 * 2) - 3!) % ( ~5 + 10 )", 4.0),
        ("12! / ((10@2) ^ (3&5))", 2217600.0),
        (" ( ( (8&4) + (9$3) ) ^ ( 3! ) ) - ( 2@4 ) ", 4826806.0),
        ("(10#)^((1.2+3.4)*2)", 1.0),
        ("((5 + 5 +5+5+5) * (2@10)) / ( (3$1) - (1%1) )", 50.0),
        ("((((8#)*2)+((10%3)^(2)))^( (6$3) )) - ~10", 24137579.0),
        ("(7!) + (8!) + (9!)", 408240.0),
        (" ((100 @ 50 ) + ( 70 & 30 )) ^ ( 2! ) ", 11025.0),
        (" ( ( 2! )^( 3! ) ) + ( ( 4! )^( 1%1 ) )", 65.0),
        (" ( ( (10! ) / (5! ) ) ^ (2.5 ) )", 159020995200.19443),
        (" ((8#) + (9#)) * ((999#)/(100#))", 459.0),
        ("( ( 3^2 ) + ( (4!) - (5!) ) ) ^ 2", 7569.0),
    ];
    for (expr, attendu) in cas {
        assert_proche(expr, attendu);
    }
}

/* ------------------------ Moins ------------------------ */

#[test]
fn series_de_moins() {
    assert_eq!(eval_ok("--5"), Nombre::Entier(5));
    assert_eq!(eval_ok("---5"), Nombre::Entier(-5));
    assert_eq!(eval_ok("5--3"), Nombre::Entier(8));
    assert_eq!(eval_ok("5---3"), Nombre::Entier(2));
    assert_eq!(eval_ok("2*-3"), Nombre::Entier(-6));
    assert_eq!(eval_ok("(-2)*(--3)"), Nombre::Entier(-6));
    assert_eq!(eval_ok("(3!)-2"), Nombre::Entier(4));
    assert_eq!(eval_ok("-~4"), Nombre::Entier(4));
    assert_eq!(eval_ok("~-4"), Nombre::Entier(4));
}

#[test]
fn moins_apres_un_postfixe_est_un_signe() {
    // "3!-2" se lit "3!" suivi de "-2" : il manque l’opérateur
    for expr in ["3!-2", "4#-1", "(2)!-1"] {
        let r = evaluate(expr).unwrap_err();
        assert_eq!(r.kinds(), vec![DiagnosticKind::MissingOperator], "expr={expr:?}");
    }
    assert_eq!(eval_ok("3!+-2"), Nombre::Entier(4));
}

#[test]
fn moins_colle_a_l_operande() {
    // un moins négatif lie l’opérande qui le suit immédiatement
    assert_eq!(eval_ok("-2^2"), Nombre::Entier(4));
    assert_eq!(eval_ok("-(2)^2"), Nombre::Entier(4));
    assert_eq!(eval_ok("0-2^2"), Nombre::Entier(-4));
}

/* ------------------------ Décimaux ------------------------ */

#[test]
fn decimaux() {
    assert_eq!(eval_ok(".5+.5"), Nombre::Entier(1));
    assert_eq!(eval_ok("5.*2"), Nombre::Entier(10));
    assert_eq!(eval_ok("1.5#"), Nombre::Entier(6));
    assert_eq!(eval_ok("7/2"), Nombre::Decimal(3.5));
    assert_eq!(eval_ok("9007199254740993-1"), Nombre::Entier(9007199254740991));
}

/* ------------------------ Erreurs de syntaxe ------------------------ */

#[test]
fn erreurs_de_syntaxe() {
    for expr in ["2*^3", "1??2", "3..4", "((((((", "2^*3", "blablabla", "", "   \t   "] {
        assert_rejet(expr);
    }
}

#[test]
fn diagnostics_cumules() {
    let r = evaluate("(()+2 3").unwrap_err();
    let k = r.kinds();
    assert!(k.contains(&DiagnosticKind::UnbalancedParentheses), "{k:?}");
    assert!(k.contains(&DiagnosticKind::EmptyParentheses), "{k:?}");
    assert!(k.contains(&DiagnosticKind::MissingOperator), "{k:?}");
}

#[test]
fn erreur_d_execution_seule() {
    // l’évaluation s’arrête à la première erreur : un seul diagnostic
    let r = evaluate("(1/0) + (0-1)!").unwrap_err();
    assert_eq!(r.kinds(), vec![DiagnosticKind::DivisionByZero]);
    assert!(r.kinds().iter().all(|k| k.is_runtime()));
}
