use crate::combinator::State;
use crate::entity::utf16_len;
use crate::rules::text::rules;
use crate::{Entity, Env, parse};

/// Source pieces the `span` rule cuts `input` into, before merging.
fn pieces(input: &str) -> Vec<String> {
    let rule = rules::get().into_iter().next().expect("span rule");
    let env = Env::default();
    let mut state = State::new(input);
    let mut out = Vec::new();
    while !state.rest.is_empty() {
        let (entity, next) = rule.parser.run(&state, &env).expect("span consumes any non-empty input");
        let text = next.text();
        out.push(entity.slice(&text).expect("span entity fits its text").to_string());
        state = next;
    }
    out
}

#[test]
fn span_pieces() {
    // (input, pieces)
    let cases: Vec<(&str, Vec<&str>)> = vec![
        ("hello world", vec!["hello ", "world"]),
        ("a  b", vec!["a  ", "b"]),
        (" x", vec![" ", "x"]),
        ("  x", vec!["  ", "x"]),
        ("abc123def", vec!["abc", "123", "def"]),
        ("see(this)", vec!["see", "(this)"]),
        ("a*b", vec!["a", "*b"]),
        ("x@y#z", vec!["x", "@y", "#z"]),
        ("甲（乙）", vec!["甲", "（乙）"]),
        ("line\nnext", vec!["line\n", "next"]),
        ("   ", vec!["   "]),
        // U+FEFF is whitespace, U+0085 is not.
        ("a\u{FEFF}b", vec!["a\u{FEFF}", "b"]),
        ("\u{FEFF}x", vec!["\u{FEFF}", "x"]),
        ("a\u{85}b", vec!["a\u{85}b"]),
    ];

    for (input, expected) in cases {
        assert_eq!(pieces(input), expected, "input {input:?}");
    }
}

#[test]
fn plain_text_is_a_single_entity() {
    for input in ["hello", "hello world", "中文 消息", "tabs\tand\nnewlines", " lead and trail "] {
        let out = parse(input);
        assert_eq!(out.text, input);
        assert_eq!(out.entities, vec![Entity::Text { start: 0, offset: utf16_len(input) }], "input {input:?}");
    }
}

#[test]
fn cjk_text_before_a_roll_counts_utf16_units() {
    let out = parse("掷骰 d20");
    assert_eq!(
        out.entities,
        vec![Entity::Text { start: 0, offset: 3 }, Entity::Expr { start: 3, offset: 3, node: crate::ExprNode::roll(1, 20) }]
    );

    let out = parse("🎲🎲 2d6");
    assert_eq!(out.entities[1], Entity::Expr { start: 5, offset: 3, node: crate::ExprNode::roll(2, 6) });
}

#[test]
fn empty_input_has_no_entities() {
    let out = parse("");
    assert_eq!(out.text, "");
    assert!(out.entities.is_empty());
}
