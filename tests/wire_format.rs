//! JSON shapes of stored and broadcast values.

use boluo_markup::{
    Entity, EvalError, EvaluatedNode, ExportEntity, ExprNode, ExprOutcome, Operator, ParseResult, Seed,
    evaluate_entities, parse,
};
use serde_json::json;

#[test]
fn parse_result_shape() {
    let out = parse("roll 1d20+3");
    assert_eq!(
        serde_json::to_value(&out).unwrap(),
        json!({
            "text": "roll 1d20+3",
            "entities": [
                { "type": "Text", "start": 0, "offset": 5 },
                {
                    "type": "Expr",
                    "start": 5,
                    "offset": 6,
                    "node": {
                        "type": "Binary",
                        "op": "+",
                        "l": { "type": "Roll", "counter": 1, "face": 20 },
                        "r": { "type": "Num", "value": 3 }
                    }
                }
            ]
        })
    );
}

#[test]
fn offsets_match_utf16_string_lengths() {
    let out = parse("掷骰 d20");
    assert_eq!(
        serde_json::to_value(&out).unwrap(),
        json!({
            "text": "掷骰 d20",
            "entities": [
                { "type": "Text", "start": 0, "offset": 3 },
                { "type": "Expr", "start": 3, "offset": 3, "node": { "type": "Roll", "counter": 1, "face": 20 } }
            ]
        })
    );
}

#[test]
fn link_and_strong_shape() {
    let out = parse("**a**[b](c)");
    assert_eq!(
        serde_json::to_value(&out.entities).unwrap(),
        json!([
            { "type": "Strong", "start": 0, "offset": 1 },
            { "type": "Link", "start": 1, "offset": 1, "href": "c" }
        ])
    );
}

#[test]
fn stored_json_round_trips() {
    let stored = r#"{
        "text": "2 × d6",
        "entities": [
            { "type": "Expr", "start": 0, "offset": 6,
              "node": { "type": "Binary", "op": "×",
                        "l": { "type": "Num", "value": 2 },
                        "r": { "type": "Roll", "counter": 1, "face": 6 } } }
        ]
    }"#;
    let message: ParseResult = serde_json::from_str(stored).unwrap();
    assert_eq!(message, parse("2 × d6"));
    assert_eq!(
        message.entities[0],
        Entity::Expr {
            start: 0,
            offset: 6,
            node: ExprNode::binary(Operator::Mul, ExprNode::num(2), ExprNode::roll(1, 6)),
        }
    );
}

#[test]
fn seed_is_a_bare_number() {
    assert_eq!(serde_json::to_value(Seed(7)).unwrap(), json!(7));
    assert_eq!(serde_json::from_value::<Seed>(json!(12345)).unwrap(), Seed(12345));
}

#[test]
fn export_shape() {
    let exported = evaluate_entities(&parse("3d6"), Seed(42));
    assert_eq!(
        exported,
        vec![ExportEntity::Expr {
            start: 0,
            offset: 3,
            text: "3d6".into(),
            outcome: ExprOutcome::Evaluated {
                node: EvaluatedNode::Roll { counter: 3, face: 6, values: vec![1, 5, 1], value: 7 },
                expr_text: "3d6=[1, 5, 1]=7".into(),
            },
        }]
    );
    assert_eq!(
        serde_json::to_value(&exported).unwrap(),
        json!([{
            "type": "Expr",
            "start": 0,
            "offset": 3,
            "text": "3d6",
            "outcome": {
                "status": "Evaluated",
                "node": { "type": "Roll", "counter": 3, "face": 6, "values": [1, 5, 1], "value": 7 },
                "expr_text": "3d6=[1, 5, 1]=7"
            }
        }])
    );
}

#[test]
fn eval_error_shape() {
    let outcome = ExprOutcome::Invalid { error: EvalError::TooManyDice { counter: 100, max: 64 } };
    assert_eq!(
        serde_json::to_value(&outcome).unwrap(),
        json!({ "status": "Invalid", "error": { "kind": "TooManyDice", "counter": 100, "max": 64 } })
    );
    let outcome = ExprOutcome::Invalid { error: EvalError::DivisionByZero };
    assert_eq!(
        serde_json::to_value(&outcome).unwrap(),
        json!({ "status": "Invalid", "error": { "kind": "DivisionByZero" } })
    );
}
