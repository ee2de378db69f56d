//! Tests fuzz safe : robustesse + déterminisme + oracle indépendant.
//!
//! But : marteler le pipeline sans brûler la machine.
//! - RNG déterministe (seed fixe)
//! - profondeur bornée
//! - budget temps global
//! - oracle : évaluateur récursif descendant (infixe direct, sans RPN)
//!   => même valeur, ou même genre d’erreur d’exécution
//! - levée d’ambiguïté des moins idempotente sur toutes les entrées générées

use std::time::{Duration, Instant};

use super::moins::{disambiguate, lever_ambiguite};
use super::pretraitement::strip_whitespace;
use super::{evaluate, DiagnosticKind};

/* ------------------------ RNG déterministe minimal ------------------------ */

#[derive(Clone)]
struct Rng {
    state: u64,
}
impl Rng {
    fn new(seed: u64) -> Self {
        Self { state: seed }
    }
    fn next_u32(&mut self) -> u32 {
        // LCG simple (déterministe)
        self.state = self.state.wrapping_mul(6364136223846793005).wrapping_add(1);
        (self.state >> 32) as u32
    }
    fn pick(&mut self, n: u32) -> u32 {
        if n == 0 {
            0
        } else {
            self.next_u32() % n
        }
    }
    fn coin(&mut self) -> bool {
        (self.next_u32() & 1) == 1
    }
}

/* ------------------------ Budget anti-gel ------------------------ */

fn budget(start: Instant, max: Duration) {
    if start.elapsed() > max {
        panic!("budget temps dépassé: {:?}", max);
    }
}

/* ------------------------ Génération d’expressions (bornée) ------------------------ */

const BINAIRES: [char; 10] = ['+', '-', '*', '/', '^', '%', '$', '&', '@', '+'];

fn gen_nombre(rng: &mut Rng) -> String {
    match rng.pick(10) {
        0 => "0".to_string(),
        1 => "1.5".to_string(),
        2 => "0.25".to_string(),
        3 => "12".to_string(),
        _ => format!("{}", 1 + rng.pick(6)),
    }
}

fn gen_atome(rng: &mut Rng) -> String {
    match rng.pick(7) {
        0 => format!("-{}", gen_nombre(rng)),
        1 => format!("~{}", gen_nombre(rng)),
        2 => format!("{}!", 1 + rng.pick(5)),
        3 => format!("{}{}", 1 + rng.pick(5), if rng.coin() { "!#" } else { "#!" }),
        _ => gen_nombre(rng),
    }
}

fn gen_expr(rng: &mut Rng, depth: usize) -> String {
    if depth == 0 {
        return gen_atome(rng);
    }

    match rng.pick(8) {
        0 => gen_atome(rng),
        1 => format!("({})", gen_expr(rng, depth - 1)),
        2 => format!("-({})", gen_expr(rng, depth - 1)),
        3 => format!("({})#", gen_expr(rng, depth - 1)),
        4 => format!("({})!", gen_expr(rng, depth - 1)),
        _ => {
            let op = BINAIRES[rng.pick(BINAIRES.len() as u32) as usize];
            let mut gauche = gen_expr(rng, depth - 1);
            // "3!-2" : le moins qui suit un postfixe est un signe, pas une soustraction
            if op == '-' && gauche.ends_with(['!', '#']) {
                gauche = format!("({gauche})");
            }
            format!("{gauche}{op}{}", gen_expr(rng, depth - 1))
        }
    }
}

/* ------------------------ Oracle récursif descendant ------------------------ */
//
// Grammaire (priorité croissante, binaires associatifs à gauche) :
//   n1 := n2 (('+'|'-') n2)*
//   n2 := n4 (('*'|'/') n4)*
//   n4 := n5 ('^' n5)*
//   n5 := n6 ('%' n6)*
//   n6 := un (('$'|'&'|'@') un)*
//   un := '~' un | post
//   post := prim ('!'|'#')*        (chaîne appliquée de droite à gauche)
//   prim := '-' nombre | '-' '(' n1 ')' | '(' n1 ')' | nombre

#[derive(Debug, Clone, Copy, PartialEq)]
enum ErrOracle {
    DivZero,
    Factorielle,
    SommeChiffres,
    NonFini,
}

impl ErrOracle {
    fn kind(self) -> DiagnosticKind {
        match self {
            ErrOracle::DivZero => DiagnosticKind::DivisionByZero,
            ErrOracle::Factorielle => DiagnosticKind::FactorialDomainError,
            ErrOracle::SommeChiffres => DiagnosticKind::DigitSumDomainError,
            ErrOracle::NonFini => DiagnosticKind::NonFiniteResult,
        }
    }
}

struct Oracle<'a> {
    s: &'a [u8],
    i: usize,
}

impl<'a> Oracle<'a> {
    fn eval(texte: &'a str) -> Result<f64, ErrOracle> {
        let mut o = Oracle {
            s: texte.as_bytes(),
            i: 0,
        };
        let v = o.n1()?;
        assert_eq!(o.i, o.s.len(), "oracle: fin non atteinte dans {texte:?}");
        Ok(v)
    }

    fn peek(&self) -> Option<u8> {
        self.s.get(self.i).copied()
    }

    fn fini(v: f64) -> Result<f64, ErrOracle> {
        if v.is_finite() {
            Ok(v)
        } else {
            Err(ErrOracle::NonFini)
        }
    }

    fn n1(&mut self) -> Result<f64, ErrOracle> {
        let mut a = self.n2()?;
        while let Some(c @ (b'+' | b'-')) = self.peek() {
            self.i += 1;
            let b = self.n2()?;
            a = Self::fini(if c == b'+' { a + b } else { a - b })?;
        }
        Ok(a)
    }

    fn n2(&mut self) -> Result<f64, ErrOracle> {
        let mut a = self.n4()?;
        while let Some(c @ (b'*' | b'/')) = self.peek() {
            self.i += 1;
            let b = self.n4()?;
            a = if c == b'*' {
                Self::fini(a * b)?
            } else if b == 0.0 {
                return Err(ErrOracle::DivZero);
            } else {
                Self::fini(a / b)?
            };
        }
        Ok(a)
    }

    fn n4(&mut self) -> Result<f64, ErrOracle> {
        let mut a = self.n5()?;
        while self.peek() == Some(b'^') {
            self.i += 1;
            let b = self.n5()?;
            a = Self::fini(a.powf(b))?;
        }
        Ok(a)
    }

    fn n5(&mut self) -> Result<f64, ErrOracle> {
        let mut a = self.n6()?;
        while self.peek() == Some(b'%') {
            self.i += 1;
            let b = self.n6()?;
            if b == 0.0 {
                return Err(ErrOracle::DivZero);
            }
            // reste du signe du diviseur
            let r = a % b;
            a = Self::fini(if r != 0.0 && (r < 0.0) != (b < 0.0) { r + b } else { r })?;
        }
        Ok(a)
    }

    fn n6(&mut self) -> Result<f64, ErrOracle> {
        let mut a = self.un()?;
        while let Some(c @ (b'$' | b'&' | b'@')) = self.peek() {
            self.i += 1;
            let b = self.un()?;
            a = Self::fini(match c {
                b'$' => a.max(b),
                b'&' => a.min(b),
                _ => (a + b) / 2.0,
            })?;
        }
        Ok(a)
    }

    fn un(&mut self) -> Result<f64, ErrOracle> {
        if self.peek() == Some(b'~') {
            self.i += 1;
            return Ok(-self.un()?);
        }
        self.post()
    }

    fn post(&mut self) -> Result<f64, ErrOracle> {
        let mut a = self.prim()?;

        // une chaîne de postfixes s’applique du dernier au premier : 12!# = (12#)!
        let mut chaine = Vec::new();
        while let Some(c @ (b'!' | b'#')) = self.peek() {
            self.i += 1;
            chaine.push(c);
        }

        for c in chaine.into_iter().rev() {
            if c == b'!' {
                if a < 0.0 || a.fract() != 0.0 || a > 170.0 {
                    return Err(ErrOracle::Factorielle);
                }
                a = (1..=(a as u32)).map(f64::from).product();
            } else {
                if a < 0.0 {
                    return Err(ErrOracle::SommeChiffres);
                }
                a = format!("{a}")
                    .bytes()
                    .filter(u8::is_ascii_digit)
                    .map(|d| f64::from(d - b'0'))
                    .sum();
            }
        }
        Ok(a)
    }

    fn prim(&mut self) -> Result<f64, ErrOracle> {
        match self.peek() {
            Some(b'-') => {
                self.i += 1;
                Ok(-self.prim()?)
            }
            Some(b'(') => {
                self.i += 1;
                let v = self.n1()?;
                assert_eq!(self.peek(), Some(b')'), "oracle: ')' attendue");
                self.i += 1;
                Ok(v)
            }
            _ => {
                let debut = self.i;
                while self
                    .peek()
                    .is_some_and(|c| c.is_ascii_digit() || c == b'.')
                {
                    self.i += 1;
                }
                let txt = std::str::from_utf8(&self.s[debut..self.i]).unwrap_or("");
                Ok(txt
                    .parse::<f64>()
                    .unwrap_or_else(|_| panic!("oracle: nombre attendu en {debut}")))
            }
        }
    }
}

fn proches(a: f64, b: f64) -> bool {
    a == b || (a - b).abs() <= 1e-9 * a.abs().max(b.abs()).max(1.0)
}

/* ------------------------ Tests ------------------------ */

#[test]
fn fuzz_safe_oracle_infixe() {
    let t0 = Instant::now();
    let max = Duration::from_millis(500);

    let mut rng = Rng::new(0xC0FFEE_u64);

    let mut seen_ok = 0usize;
    let mut seen_err = 0usize;

    for _ in 0..400 {
        budget(t0, max);

        let expr = gen_expr(&mut rng, 4);

        match (evaluate(&expr), Oracle::eval(&expr)) {
            (Ok(v), Ok(attendu)) => {
                assert!(
                    proches(v.as_f64(), attendu),
                    "expr={expr:?} pipeline={v} oracle={attendu}"
                );
                seen_ok += 1;
            }
            (Err(r), Err(e)) => {
                assert_eq!(r.kinds(), vec![e.kind()], "expr={expr:?} rejet={r}");
                seen_err += 1;
            }
            (obtenu, attendu) => {
                panic!("désaccord: expr={expr:?} pipeline={obtenu:?} oracle={attendu:?}")
            }
        }
    }

    // On veut voir un mix des deux, sinon le fuzz ne “balaye” rien.
    assert!(seen_ok > 20, "trop peu de succès: {seen_ok}");
    assert!(seen_err > 0, "aucune erreur vue: fuzz trop “sage”");
}

#[test]
fn fuzz_safe_determinisme() {
    let t0 = Instant::now();
    let max = Duration::from_millis(250);

    // Même seed => mêmes expressions => mêmes sorties
    let mut a = Rng::new(0xBADC0DE_u64);
    let mut b = Rng::new(0xBADC0DE_u64);

    for _ in 0..100 {
        budget(t0, max);
        let ea = gen_expr(&mut a, 3);
        let eb = gen_expr(&mut b, 3);
        assert_eq!(ea, eb);
        assert_eq!(evaluate(&ea), evaluate(&eb), "expr={ea:?}");
    }
}

#[test]
fn fuzz_safe_moins_idempotent() {
    let mut rng = Rng::new(0x5EED_u64);

    for _ in 0..200 {
        // mélange brut de moins, chiffres, opérateurs et parenthèses
        let n = 1 + rng.pick(12) as usize;
        let expr: String = (0..n)
            .map(|_| match rng.pick(7) {
                0 | 1 => '-',
                2 => '(',
                3 => ')',
                4 => if rng.coin() { '!' } else { '*' },
                _ => char::from(b'0' + rng.pick(10) as u8),
            })
            .collect();

        let une = disambiguate(&strip_whitespace(&expr));
        let deux = lever_ambiguite(&une);
        assert_eq!(une, deux, "expr={expr:?}");
    }
}

#[test]
fn fuzz_safe_somme_balancee_anti_pile() {
    let t0 = Instant::now();
    let max = Duration::from_millis(200);

    let mut items: Vec<String> = (0..800).map(|_| "1.5".to_string()).collect();
    while items.len() > 1 {
        items = items
            .chunks(2)
            .map(|c| match c {
                [a, b] => format!("({a}+{b})"),
                [a] => a.clone(),
                _ => unreachable!(),
            })
            .collect();
    }
    let expr = items.pop().unwrap_or_else(|| "0".to_string());

    let v = evaluate(&expr).unwrap_or_else(|e| panic!("err: {e}"));
    budget(t0, max);
    assert_eq!(v.as_f64(), 1200.0);
}

#[test]
fn fuzz_safe_imbrication_profonde() {
    // pipeline itératif : pas de récursion, pas de débordement de pile
    let expr = format!("{}7{}", "-(".repeat(2000), ")".repeat(2000));
    let v = evaluate(&expr).unwrap_or_else(|e| panic!("err: {e}"));
    assert_eq!(v.as_f64(), 7.0);
}
