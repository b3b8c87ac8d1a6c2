//! Tests scientifiques (campagne) : invariants + scénarios + limites contrôlées.
//!
//! But : vérifier les contrats publics sans faire chauffer la machine.
//! - budget temps global
//! - résolutions petites (n ≤ 3) sauf un test de cadence
//!
//! Notes importantes (aligné avec l’état actuel du noyau) :
//! - Les branches sont les branches principales (sqrt, log, arg, puissances).
//! - Un point singulier est borné à ±SENTINELLE, jamais signalé comme erreur.
//! - La multiplication implicite est refusée : "2z" est une ErreurLecture,
//!   mais "3i" est un littéral imaginaire.

use std::time::{Duration, Instant};

use num_complex::Complex64;

use super::erreurs::{ErreurSurface, GenreErreur};
use super::grille::{Grille, ModeTrace, ParametresSurface, SortieSurface};
use super::{analyser, evaluer, SENTINELLE};

fn params(resolution: u32, mode: ModeTrace, log_hauteur: bool) -> ParametresSurface {
    ParametresSurface {
        resolution,
        mode,
        log_hauteur,
    }
}

fn eval_ok(source: &str, p: ParametresSurface) -> SortieSurface {
    evaluer(source, &p).unwrap_or_else(|e| panic!("source={source:?} err={e}"))
}

fn genre_erreur(source: &str) -> GenreErreur {
    match analyser(source) {
        Ok(e) => panic!("source={source:?} devait échouer, arbre={e}"),
        Err(e) => e.genre,
    }
}

/// Indice linéaire du point (re, im) sur une grille de résolution n.
fn indice(n: u32, re: f64, im: f64) -> usize {
    let g = Grille::new(n).unwrap();
    let demi = (g.segments() / 2) as f64;
    let ligne = (re * n as f64 + demi).round() as usize;
    let col = (im * n as f64 + demi).round() as usize;
    ligne * g.cote() + col
}

fn hauteur(s: &SortieSurface, k: usize) -> f32 {
    s.positions[3 * k + 1]
}

/// Budget global anti-gel.
fn budget(start: Instant, max: Duration) {
    if start.elapsed() > max {
        panic!("budget temps dépassé: {:?}", max);
    }
}

/* ------------------------ Longueurs des buffers ------------------------ */

#[test]
fn sci_longueurs_exactes() {
    let t0 = Instant::now();
    let max = Duration::from_secs(5);

    for n in 1..=3u32 {
        for mode in ModeTrace::TOUS {
            for src in ["z", "sin(z)/z", "log(z)", "z^z"] {
                budget(t0, max);
                let s = eval_ok(src, params(n, mode, false));
                let cote = (20 * n + 1) as usize;
                assert_eq!(s.positions.len(), 3 * cote * cote, "src={src:?} n={n}");
                assert_eq!(s.canaux.len(), cote * cote, "src={src:?} n={n}");
            }
        }
    }
}

/* ------------------------ Bornes ------------------------ */

#[test]
fn sci_identite_a_l_origine() {
    let s = eval_ok("z", params(1, ModeTrace::ReelImag, false));
    let k = indice(1, 0.0, 0.0);
    assert_eq!(hauteur(&s, k), 0.0);
    assert_eq!(s.canaux[k], 0.0);
}

#[test]
fn sci_positions_x_z_non_mises_a_l_echelle() {
    // x = re, z = im, quelle que soit l’expression
    let s = eval_ok("exp(z)", params(2, ModeTrace::ImagReel, true));
    let k = indice(2, -3.5, 1.5);
    assert_eq!(s.positions[3 * k], -3.5);
    assert_eq!(s.positions[3 * k + 2], 1.5);
}

#[test]
fn sci_poles_bornes_partout() {
    for src in ["1/z", "log(z)", "1/(z*z)", "tan(z)/0", "gamma(z)", "log(0)/z"] {
        for mode in ModeTrace::TOUS {
            for log_hauteur in [false, true] {
                let s = eval_ok(src, params(1, mode, log_hauteur));
                assert!(
                    s.positions.iter().chain(&s.canaux).all(|v| v.is_finite()),
                    "src={src:?} mode={mode:?}"
                );
            }
        }
    }
}

#[test]
fn sci_inverse_sentinelle_en_zero() {
    let s = eval_ok("1/z", params(1, ModeTrace::ReelImag, false));
    let k = indice(1, 0.0, 0.0);
    // 1/0 -> (inf, NaN) -> (SENTINELLE, SENTINELLE)
    assert_eq!(hauteur(&s, k), SENTINELLE as f32);
    assert_eq!(s.canaux[k], SENTINELLE as f32);
    assert_eq!(s.points_singuliers, 1);

    // ailleurs, le point n’est pas touché : 1/(2) en z = 2
    assert_eq!(hauteur(&s, indice(1, 2.0, 0.0)), 0.5);
}

#[test]
fn sci_hauteur_log_monotone() {
    let brut = eval_ok("re(z)^3", params(1, ModeTrace::ReelImag, false));
    let log = eval_ok("re(z)^3", params(1, ModeTrace::ReelImag, true));

    // le long de l’axe réel, l’ordre des hauteurs est conservé
    let axe: Vec<usize> = (-10..=10).map(|r| indice(1, r as f64, 0.0)).collect();
    for w in axe.windows(2) {
        assert!(hauteur(&brut, w[0]) < hauteur(&brut, w[1]));
        assert!(hauteur(&log, w[0]) < hauteur(&log, w[1]));
    }
    // et la compression borne le volume : ln(1 + 1000) < 7
    assert!(log.positions.iter().all(|v| v.abs() < 11.0));
}

/* ------------------------ Erreurs de lecture ------------------------ */

#[test]
fn sci_erreurs_lecture() {
    for src in ["z +", ""] {
        let e = evaluer(src, &params(1, ModeTrace::ReelImag, false)).unwrap_err();
        assert!(matches!(e, ErreurSurface::Lecture(_)), "src={src:?} err={e}");
    }

    assert_eq!(genre_erreur(""), GenreErreur::EntreeVide);
    assert_eq!(genre_erreur("z +"), GenreErreur::OperandeManquant);
    assert_eq!(genre_erreur("(z"), GenreErreur::ParentheseNonFermee);
    assert_eq!(genre_erreur("z)"), GenreErreur::ParentheseNonOuverte);
    assert_eq!(
        genre_erreur("foo(z)"),
        GenreErreur::IdentifiantInconnu("foo".into())
    );
    assert_eq!(
        genre_erreur("sin z"),
        GenreErreur::FonctionSansParentheses("sin".into())
    );
}

#[test]
fn sci_formules_demesurees_refusees() {
    // lecture complète + évaluation : une ErreurLecture, jamais un débordement de pile
    let p = params(1, ModeTrace::ReelImag, false);
    for src in ["z+".repeat(10_000) + "z", "-".repeat(20_000) + "z"] {
        match evaluer(&src, &p) {
            Err(ErreurSurface::Lecture(e)) => assert!(
                matches!(e.genre, GenreErreur::ExpressionTropProfonde(_)),
                "err={e}"
            ),
            autre => panic!("attendu ErreurLecture, reçu {autre:?}"),
        }
    }
}

#[test]
fn sci_erreur_position() {
    // "z + * 2" : l’opérateur inattendu est en position 4
    let e = analyser("z + * 2").unwrap_err();
    assert_eq!(e.position, 4);

    // erreur en fin de texte : position = longueur (en caractères)
    let e = analyser("π + ").unwrap_err();
    assert_eq!(e.position, 4);
}

/* ------------------------ Scénarios ------------------------ */

#[test]
fn sci_module_argument_z_carre() {
    let s = eval_ok("z^2", params(1, ModeTrace::ModuleArgument, false));
    let k = indice(1, 1.0, 1.0);
    assert_eq!(hauteur(&s, k), 2.0);
    assert_eq!(s.canaux[k], 0.25);
}

#[test]
fn sci_argument_normalise_demi_ouvert() {
    let s = eval_ok("z", params(1, ModeTrace::ModuleArgument, false));
    assert!(s.canaux.iter().all(|c| (0.0..1.0).contains(c)));

    // z = -1 : arg = π -> 0.5 ; z = -i : arg = -π/2 -> 0.75
    assert_eq!(s.canaux[indice(1, -1.0, 0.0)], 0.5);
    assert_eq!(s.canaux[indice(1, 0.0, -1.0)], 0.75);
}

#[test]
fn sci_branches_principales() {
    let f = |src: &str, z: Complex64| analyser(src).unwrap().evaluer(z);
    let proche = |a: Complex64, b: Complex64| (a - b).norm() < 1e-12;

    // sqrt(-1) = i, log(-1) = iπ
    assert!(proche(f("sqrt(z)", Complex64::new(-1.0, 0.0)), Complex64::i()));
    assert!(proche(
        f("log(z)", Complex64::new(-1.0, 0.0)),
        Complex64::new(0.0, std::f64::consts::PI)
    ));
    // e^(iπ) + 1 = 0
    assert!(proche(f("e^(i*pi) + 1", Complex64::new(0.0, 0.0)), Complex64::new(0.0, 0.0)));
    // log(8, 2) = 3
    assert!(proche(f("log(8, 2)", Complex64::new(0.0, 0.0)), Complex64::new(3.0, 0.0)));
    // base prise en module : log(8, -2) = 3
    assert!(proche(f("log(8, -2)", Complex64::new(0.0, 0.0)), Complex64::new(3.0, 0.0)));
    assert!(proche(f("log(z, 2i)", Complex64::new(8.0, 0.0)), Complex64::new(3.0, 0.0)));
    // arg ∈ (-π, π] : arg(-5) = arg(conj(z)) en z = -5 = π
    let pi = Complex64::new(std::f64::consts::PI, 0.0);
    assert_eq!(f("arg(-5)", Complex64::new(0.0, 0.0)), pi);
    assert_eq!(f("arg(conj(z))", Complex64::new(-5.0, 0.0)), pi);
}

#[test]
fn sci_fonctions_speciales() {
    let f = |src: &str, z: Complex64| analyser(src).unwrap().evaluer(z);
    let proche = |a: Complex64, v: f64| (a - Complex64::new(v, 0.0)).norm() < 1e-9;
    let un = Complex64::new(1.0, 0.0);
    let pi = std::f64::consts::PI;

    assert!(proche(f("lngamma(z)", Complex64::new(10.0, 0.0)), 362_880f64.ln()));
    assert!(proche(f("digamma(z)", un), -0.577_215_664_901_532_9));
    assert!(proche(f("trigamma(z)", Complex64::new(0.5, 0.0)), pi * pi / 2.0));
    assert!(proche(f("polygamma(z, 2)", un), -2.404_113_806_319_188_5));
    assert!(proche(f("zetac(z, 1)", Complex64::new(2.0, 0.0)), 1.0));
    let z60 = f("zetac(z, 60)", Complex64::new(2.0, 0.0));
    assert!((z60 - Complex64::new(pi * pi / 6.0, 0.0)).norm() < 1e-7);

    // pôles bornés sur la grille, jamais d’erreur
    for src in ["digamma(z)", "trigamma(z)", "polygamma(z, 3)", "lngamma(z)"] {
        let s = eval_ok(src, params(1, ModeTrace::ModuleArgument, true));
        assert!(s.positions.iter().chain(&s.canaux).all(|v| v.is_finite()), "{src}");
        assert!(s.points_singuliers > 0, "{src}");
    }
}

#[test]
fn sci_litteraux_et_alias() {
    let z = Complex64::new(2.0, -1.0);
    let val = |src: &str| analyser(src).unwrap().evaluer(z);

    assert_eq!(val("3i"), Complex64::new(0.0, 3.0));
    assert_eq!(val("Z**2"), val("z^2"));
    assert_eq!(val("√(z)"), val("sqrt(z)"));
    assert_eq!(val("mod(z)"), val("abs(z)"));
    assert_eq!(val("2^-1"), Complex64::new(0.5, 0.0));
    // -z^2 = -(z^2)
    assert_eq!(val("-z^2"), -(z * z));
}

/* ------------------------ Aller-retour / idempotence ------------------------ */

#[test]
fn sci_aller_retour_forme_canonique() {
    for src in ["z^2+1", "-z^2", "sin(z)/(z - 3i)", "log(z, 2)", "2^3^2", "conj(z)*e"] {
        let a = analyser(src).unwrap();
        let b = analyser(&a.to_string()).unwrap_or_else(|e| panic!("src={src:?} err={e}"));
        assert_eq!(a, b, "src={src:?} canon={a}");
        assert_eq!(a.to_string(), b.to_string());
    }
}

#[test]
fn sci_lecture_pure() {
    assert_eq!(analyser("z^2+1").unwrap(), analyser("z^2+1").unwrap());
    assert_eq!(analyser("z ^ 2 + 1").unwrap(), analyser("z^2+1").unwrap());
}

#[test]
fn sci_evaluation_idempotente() {
    for mode in ModeTrace::TOUS {
        let p = params(2, mode, true);
        let a = eval_ok("zeta(z)*gamma(z)", p);
        let b = eval_ok("zeta(z)*gamma(z)", p);
        assert_eq!(a, b);
    }
}

/* ------------------------ Cadence ------------------------ */

#[test]
fn sci_cadence_resolution_defaut() {
    let t0 = Instant::now();
    // 40401 points, expression moyenne : doit rester raisonnable même en debug
    let s = eval_ok("sin(z)*exp(-z/4) + 1/(z - 1)", ParametresSurface::default());
    assert_eq!(s.nb_points(), 201 * 201);
    budget(t0, Duration::from_secs(5));
}
