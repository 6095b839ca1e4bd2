//! Property tests for parser totality and evaluator determinism.
//!
//! Any input must parse without panicking into entities that cover the
//! output text exactly, and any parsed expression must evaluate the same way
//! every time for a given seed.

use proptest::prelude::*;

use crate::{Entity, Env, ExprNode, Seed, evaluate_entities, evaluate_seeded, parse, parse_with};

// ==========================================================================
// Generators
// ==========================================================================

/// Completely random strings.
fn arbitrary_string() -> impl Strategy<Value = String> {
    prop::collection::vec(any::<char>(), 0..400).prop_map(|chars| chars.into_iter().collect())
}

/// Strings built from the pieces the grammar reacts to.
fn chat_like_string() -> impl Strategy<Value = String> {
    let atom = prop_oneof![
        "[0-9]{1,6}".prop_map(String::from),            // Numbers
        "[0-9]{0,3}d[0-9]{0,4}".prop_map(String::from), // Dice
        "[a-z]{1,6}".prop_map(String::from),            // Words
        "[一-龥]{1,3}".prop_map(String::from),          // CJK
    ];

    let punct = prop_oneof![
        Just("**".to_string()),
        Just("[".to_string()),
        Just("](".to_string()),
        Just("(".to_string()),
        Just(")".to_string()),
        Just("（".to_string()),
        Just("）".to_string()),
        Just("]".to_string()),
        Just("https://".to_string()),
        Just(".io".to_string()),
        Just("+".to_string()),
        Just("-".to_string()),
        Just("*".to_string()),
        Just("/".to_string()),
        Just("×".to_string()),
        Just("÷".to_string()),
        Just(" ".to_string()),
        Just("\n".to_string()),
        Just("@".to_string()),
        Just("#".to_string()),
    ];

    prop::collection::vec(prop_oneof![atom, punct], 0..80).prop_map(|parts| parts.join(""))
}

fn assert_well_formed(input: &str, entities: &[Entity], text: &str) -> Result<(), TestCaseError> {
    prop_assert!(
        crate::entity::check_coverage(text, entities).is_ok(),
        "coverage broken for {:?}: {:?}",
        input,
        entities
    );
    for pair in entities.windows(2) {
        prop_assert!(!(pair[0].is_text() && pair[1].is_text()), "adjacent Text for {:?}", input);
    }
    Ok(())
}

// ==========================================================================
// Parser properties
// ==========================================================================

proptest! {
    #[test]
    fn arbitrary_input_is_covered(input in arbitrary_string()) {
        let out = parse(&input);
        if input.is_empty() {
            prop_assert!(out.entities.is_empty());
        }
        assert_well_formed(&input, &out.entities, &out.text)?;
    }

    #[test]
    fn chat_like_input_is_covered(input in chat_like_string()) {
        let out = parse(&input);
        assert_well_formed(&input, &out.entities, &out.text)?;
    }

    #[test]
    fn text_is_unchanged_without_markup(raw in chat_like_string()) {
        // No `**` and no `](` left, so neither strong nor link can match.
        let input = raw.replace('*', "×").replace(']', ")");
        prop_assert_eq!(parse(&input).text, input);
    }

    #[test]
    fn bare_digits_are_one_text(digits in "[0-9]{1,40}") {
        let out = parse(&digits);
        prop_assert_eq!(out.entities, vec![Entity::Text { start: 0, offset: digits.len() }]);
    }

    #[test]
    fn expressions_off_yields_no_expr(input in chat_like_string()) {
        let env = Env::default().with_parse_expr(false);
        let out = parse_with(&input, &env);
        let no_expr = out.entities.iter().all(|e| !matches!(e, Entity::Expr { .. }));
        prop_assert!(no_expr);
        assert_well_formed(&input, &out.entities, &out.text)?;
    }

    #[test]
    fn operator_chains_are_never_split(count in 2usize..200, spaced in any::<bool>()) {
        let input = vec!["1"; count].join(if spaced { " + " } else { "+" });
        let out = parse(&input);
        prop_assert_eq!(out.entities.len(), 1, "input {:?}", input);
        let covers_all = out.entities[0].end() == input.len();
        prop_assert!(covers_all);
    }

    #[test]
    fn parse_is_deterministic(input in chat_like_string()) {
        prop_assert_eq!(parse(&input), parse(&input));
    }
}

// ==========================================================================
// Evaluator properties
// ==========================================================================

proptest! {
    #[test]
    fn evaluation_is_deterministic(input in chat_like_string(), seed in any::<u32>()) {
        let out = parse(&input);
        for entity in &out.entities {
            if let Entity::Expr { node, .. } = entity {
                prop_assert_eq!(evaluate_seeded(node, Seed(seed)), evaluate_seeded(node, Seed(seed)));
            }
        }
        prop_assert_eq!(evaluate_entities(&out, Seed(seed)), evaluate_entities(&out, Seed(seed)));
    }

    #[test]
    fn rolls_stay_in_range(counter in 1u32..=64, face in 1u32..=1000, seed in any::<u32>()) {
        let node = ExprNode::roll(counter, face);
        let evaluated = evaluate_seeded(&node, Seed(seed));
        prop_assert!(evaluated.is_ok());
        if let Ok(crate::EvaluatedNode::Roll { values, value, .. }) = evaluated {
            prop_assert_eq!(values.len(), counter as usize);
            prop_assert!(values.iter().all(|v| (1..=i64::from(face)).contains(v)));
            prop_assert_eq!(value, values.iter().sum::<i64>());
        }
    }
}
