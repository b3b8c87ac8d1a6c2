//! Tests de propriétés (proptest)
//!
//! - toute source bien formée se relit depuis sa forme canonique (même arbre)
//! - toute source, même aberrante, donne un arbre ou une ErreurLecture positionnée
//! - les buffers ont toujours la longueur attendue et ne contiennent que du fini

use proptest::prelude::*;

use super::grille::{ModeTrace, ParametresSurface};
use super::{analyser, evaluer};

/// Atomes : variable, unité imaginaire, constantes, littéraux réels et imaginaires.
fn atome() -> impl Strategy<Value = String> {
    prop_oneof![
        Just("z".to_string()),
        Just("i".to_string()),
        Just("pi".to_string()),
        Just("e".to_string()),
        (0u16..1000).prop_map(|n| n.to_string()),
        (0u16..100, 0u8..10).prop_map(|(a, b)| format!("{a}.{b}")),
        (1u8..20).prop_map(|n| format!("{n}i")),
    ]
}

/// Expressions bien formées, profondeur bornée.
fn expression() -> impl Strategy<Value = String> {
    atome().prop_recursive(4, 32, 2, |interne| {
        prop_oneof![
            (interne.clone(), "[-+*/^]", interne.clone())
                .prop_map(|(a, op, b)| format!("({a} {op} {b})")),
            interne.clone().prop_map(|a| format!("-{a}")),
            (
                prop::sample::select(vec![
                    "sin", "cos", "exp", "log", "sqrt", "abs", "arg", "conj", "re", "im", "tanh",
                    "asin",
                ]),
                interne.clone()
            )
                .prop_map(|(f, a)| format!("{f}({a})")),
            (interne.clone(), interne).prop_map(|(a, b)| format!("log({a}, {b})")),
        ]
    })
}

fn un_mode() -> impl Strategy<Value = ModeTrace> {
    prop::sample::select(ModeTrace::TOUS.to_vec())
}

proptest! {
    #[test]
    fn forme_canonique_relue_a_l_identique(src in expression()) {
        let a = analyser(&src).map_err(|e| TestCaseError::fail(format!("{src:?}: {e}")))?;
        let canon = a.to_string();
        let b = analyser(&canon).map_err(|e| TestCaseError::fail(format!("{canon:?}: {e}")))?;
        prop_assert_eq!(&a, &b);
        prop_assert_eq!(canon, b.to_string());
    }

    #[test]
    fn lecture_jamais_de_panique(src in "\\PC{0,40}") {
        if let Err(e) = analyser(&src) {
            prop_assert!(e.position <= src.chars().count(), "{:?}: {}", src, e);
        }
    }
}

proptest! {
    #![proptest_config(ProptestConfig::with_cases(48))]

    #[test]
    fn buffers_finis_et_dimensionnes(
        src in expression(),
        mode in un_mode(),
        log_hauteur in any::<bool>()
    ) {
        let params = ParametresSurface { resolution: 1, mode, log_hauteur };
        let s = evaluer(&src, &params).map_err(|e| TestCaseError::fail(format!("{src:?}: {e}")))?;

        prop_assert_eq!(s.positions.len(), 3 * 441);
        prop_assert_eq!(s.canaux.len(), 441);
        prop_assert!(s.positions.iter().chain(&s.canaux).all(|v| v.is_finite()));
        if mode == ModeTrace::ModuleArgument {
            prop_assert!(s.canaux.iter().all(|c| (0.0..1.0).contains(c)));
        }
    }
}
