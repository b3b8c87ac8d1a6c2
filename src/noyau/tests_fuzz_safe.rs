//! Tests fuzz safe : robustesse + déterminisme + limites contrôlées.
//!
//! But : marteler le pipeline sans brûler la machine.
//! - RNG déterministe (seed fixe)
//! - profondeur bornée
//! - budget temps global
//! - invariant clé : jamais de NaN / inf dans les buffers, longueurs exactes
//! - une source mutilée doit donner une ErreurLecture, jamais une panique

use std::time::{Duration, Instant};

use super::erreurs::ErreurSurface;
use super::grille::{ModeTrace, ParametresSurface};
use super::{analyser, evaluer};

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

const FONCTIONS: &[&str] = &[
    "sin", "cos", "tan", "exp", "log", "sqrt", "abs", "arg", "conj", "re", "im", "sinh",
    "atan", "inv", "cbrt", "gamma", "lngamma", "digamma",
];

fn gen_atom(rng: &mut Rng) -> String {
    match rng.pick(7) {
        0 | 1 | 2 => "z".to_string(),
        3 => "i".to_string(),
        4 => format!("{}", rng.pick(10)),
        5 => format!("{}.{}i", rng.pick(4), rng.pick(10)),
        _ => {
            if rng.coin() {
                "pi".to_string()
            } else {
                "e".to_string()
            }
        }
    }
}

fn gen_expr(rng: &mut Rng, depth: usize) -> String {
    if depth == 0 {
        return gen_atom(rng);
    }

    match rng.pick(9) {
        0 => gen_atom(rng),
        1 => format!("({}+{})", gen_expr(rng, depth - 1), gen_expr(rng, depth - 1)),
        2 => format!("({}-{})", gen_expr(rng, depth - 1), gen_expr(rng, depth - 1)),
        3 => format!("({}*{})", gen_expr(rng, depth - 1), gen_expr(rng, depth - 1)),
        // division : les pôles sont voulus
        4 => format!("({}/{})", gen_expr(rng, depth - 1), gen_expr(rng, depth - 1)),
        5 => format!("({})^{}", gen_expr(rng, depth - 1), gen_atom(rng)),
        6 => format!("-{}", gen_expr(rng, depth - 1)),
        7 => format!("log({}, {})", gen_expr(rng, depth - 1), gen_atom(rng)),
        _ => {
            let f = FONCTIONS[rng.pick(FONCTIONS.len() as u32) as usize];
            format!("{f}({})", gen_expr(rng, depth - 1))
        }
    }
}

/// Abîme une source valide (coupe, opérateur final, parenthèse en trop ou en moins).
fn mutiler(rng: &mut Rng, s: &str) -> String {
    let chars: Vec<char> = s.chars().collect();
    let coupe = rng.pick(chars.len() as u32 + 1) as usize;
    match rng.pick(4) {
        0 => chars[..coupe].iter().collect(),
        1 => format!("{s})"),
        2 => format!("{s} +"),
        _ => format!("({s}"),
    }
}

/* ------------------------ Helper somme balancée anti pile ------------------------ */

fn somme_balancee(terme: &str, n: usize) -> String {
    let mut items: Vec<String> = (0..n).map(|_| terme.to_string()).collect();
    while items.len() > 1 {
        let mut next = Vec::new();
        let mut i = 0;
        while i < items.len() {
            if i + 1 < items.len() {
                next.push(format!("({}+{})", items[i], items[i + 1]));
                i += 2;
            } else {
                next.push(items[i].clone());
                i += 1;
            }
        }
        items = next;
    }
    items.pop().unwrap_or_else(|| "0".to_string())
}

/* ------------------------ Tests ------------------------ */

#[test]
fn fuzz_safe_buffers_toujours_finis() {
    let t0 = Instant::now();
    let max = Duration::from_secs(20);

    let mut rng = Rng::new(0xC0FFEE_u64);

    for k in 0..60 {
        budget(t0, max);

        let expr = gen_expr(&mut rng, 4);
        let params = ParametresSurface {
            resolution: 1,
            mode: ModeTrace::TOUS[k % 3],
            log_hauteur: rng.coin(),
        };

        let s = evaluer(&expr, &params).unwrap_or_else(|e| panic!("expr={expr:?} err={e}"));

        assert_eq!(s.positions.len(), 3 * 441, "expr={expr:?}");
        assert_eq!(s.canaux.len(), 441, "expr={expr:?}");
        assert!(
            s.positions.iter().chain(&s.canaux).all(|v| v.is_finite()),
            "valeur non finie: expr={expr:?}"
        );
    }
}

#[test]
fn fuzz_safe_determinisme() {
    let t0 = Instant::now();
    let max = Duration::from_secs(10);

    // Même seed => mêmes expressions => mêmes sorties, bit à bit
    let mut rng = Rng::new(0xBADC0DE_u64);
    let params = ParametresSurface {
        resolution: 1,
        mode: ModeTrace::ModuleArgument,
        log_hauteur: false,
    };

    for _ in 0..30 {
        budget(t0, max);

        let expr = gen_expr(&mut rng, 3);
        let a = evaluer(&expr, &params).unwrap();
        let b = evaluer(&expr, &params).unwrap();

        let bits = |v: &[f32]| v.iter().map(|x| x.to_bits()).collect::<Vec<_>>();
        assert_eq!(bits(&a.positions), bits(&b.positions), "expr={expr:?}");
        assert_eq!(bits(&a.canaux), bits(&b.canaux), "expr={expr:?}");
    }
}

#[test]
fn fuzz_safe_sources_mutilees() {
    let t0 = Instant::now();
    let max = Duration::from_secs(2);

    let mut rng = Rng::new(0x5EED_u64);
    let mut seen_err = 0usize;

    for _ in 0..300 {
        budget(t0, max);

        let g = gen_expr(&mut rng, 3);
        let s = mutiler(&mut rng, &g);

        // Jamais de panique ; si erreur, elle est structurée et positionnée dans la source.
        if let Err(e) = analyser(&s) {
            assert!(
                e.position <= s.chars().count(),
                "position hors source: s={s:?} err={e}"
            );
            seen_err += 1;
        }
    }

    // On veut voir des erreurs, sinon la mutilation ne casse rien.
    assert!(seen_err > 100, "trop peu d’erreurs: {seen_err}");
}

#[test]
fn fuzz_safe_erreur_lecture_via_evaluer() {
    let params = ParametresSurface::default();
    for s in ["", "   ", "z +", "(", ")", "sin", "2 z", "z $"] {
        match evaluer(s, &params) {
            Err(ErreurSurface::Lecture(_)) => {}
            autre => panic!("attendu ErreurLecture pour {s:?}, reçu {autre:?}"),
        }
    }
}

#[test]
fn fuzz_safe_somme_balancee_anti_pile() {
    let t0 = Instant::now();
    let max = Duration::from_secs(2);

    let expr = somme_balancee("z/2", 800);
    let params = ParametresSurface {
        resolution: 1,
        ..Default::default()
    };
    let s = evaluer(&expr, &params).unwrap_or_else(|e| panic!("err: {e}"));
    budget(t0, max);

    // 800 * (z/2) = 400 z ; en z = 1 + 0i (ligne 11, colonne 10) : hauteur 400
    let k = 11 * 21 + 10;
    assert_eq!(s.positions[3 * k + 1], 400.0);
}
