//! Message export: every entity resolved against the message text, with
//! expressions evaluated from the message seed.
//!
//! All `Expr` entities of one message draw from a single [`Rng`] in entity
//! order, so the second roll continues where the first stopped:
//!
//! ```text
//! "roll 1d20+3 and 3d6", seed 12345
//!        └─ draws 1     └─ draws 2..4
//! ```
//!
//! A failing expression keeps the draws it took and does not stop the rest of
//! the message from being exported.

use crate::entity::Utf16Cursor;
use crate::eval::{EvaluatedNode, Rng, Seed, evaluate};
use crate::{Entity, EvalError, ParseResult};
use serde::{Deserialize, Serialize};

/// Result of evaluating one `Expr` entity.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "status")]
pub enum ExprOutcome {
    /// `expr_text` shows every intermediate result, e.g. `1d20=10+3=13`.
    Evaluated { node: EvaluatedNode, expr_text: String },
    Invalid { error: EvalError },
}

/// An entity together with the text it covers.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type")]
pub enum ExportEntity {
    Text { start: usize, offset: usize, text: String },
    Strong { start: usize, offset: usize, text: String },
    Link { start: usize, offset: usize, text: String, href: String },
    /// `text` is the source of the expression with trailing whitespace removed.
    Expr { start: usize, offset: usize, text: String, outcome: ExprOutcome },
}

impl ExportEntity {
    pub fn text(&self) -> &str {
        match self {
            ExportEntity::Text { text, .. }
            | ExportEntity::Strong { text, .. }
            | ExportEntity::Link { text, .. }
            | ExportEntity::Expr { text, .. } => text,
        }
    }

    /// The evaluation outcome of an `Expr` entity.
    pub fn outcome(&self) -> Option<&ExprOutcome> {
        match self {
            ExportEntity::Expr { outcome, .. } => Some(outcome),
            _ => None,
        }
    }
}

/// Resolve every entity of `message`, evaluating expressions with `seed`.
///
/// Entities whose range does not fit `message.text` (corrupt stored data)
/// export with an empty text.
pub fn evaluate_entities(message: &ParseResult, seed: Seed) -> Vec<ExportEntity> {
    let mut rng = Rng::new(seed);
    let mut cursor = Utf16Cursor::new(&message.text);
    message.entities.iter().map(|entity| export_entity(&mut cursor, entity, &mut rng)).collect()
}

fn export_entity(cursor: &mut Utf16Cursor<'_>, entity: &Entity, rng: &mut Rng) -> ExportEntity {
    let covered = cursor.slice(entity).unwrap_or_default().to_string();
    match entity {
        Entity::Text { start, offset } => ExportEntity::Text { start: *start, offset: *offset, text: covered },
        Entity::Strong { start, offset } => ExportEntity::Strong { start: *start, offset: *offset, text: covered },
        Entity::Link { start, offset, href } => {
            ExportEntity::Link { start: *start, offset: *offset, text: covered, href: href.clone() }
        }
        Entity::Expr { start, offset, node } => {
            let outcome = match evaluate(node, rng) {
                Ok(node) => {
                    let expr_text = node.to_string();
                    ExprOutcome::Evaluated { node, expr_text }
                }
                Err(error) => {
                    tracing::debug!(%error, start, draws = rng.draws(), "expression could not be evaluated");
                    ExprOutcome::Invalid { error }
                }
            };
            ExportEntity::Expr { start: *start, offset: *offset, text: covered.trim_end().to_string(), outcome }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{Operator, parse};

    fn evaluated(entity: &ExportEntity) -> &EvaluatedNode {
        match entity.outcome() {
            Some(ExprOutcome::Evaluated { node, .. }) => node,
            other => panic!("expected an evaluated expression, got {other:?}"),
        }
    }

    #[test]
    fn texts_follow_utf16_ranges() {
        let message = parse("掷骰 d20 和 **重击**🎲");
        let exported = evaluate_entities(&message, Seed(1));
        let texts: Vec<&str> = exported.iter().map(ExportEntity::text).collect();
        assert_eq!(texts, vec!["掷骰 ", "d20", " 和 ", "重击", "🎲"]);
        assert!(matches!(exported[1], ExportEntity::Expr { start: 3, offset: 3, .. }));
    }

    #[test]
    fn expressions_share_one_rng() {
        let message = parse("roll 1d20+3 and 3d6");
        let exported = evaluate_entities(&message, Seed(12345));

        let texts: Vec<&str> = exported.iter().map(ExportEntity::text).collect();
        assert_eq!(texts, vec!["roll ", "1d20+3", " and ", "3d6"]);

        let first = evaluated(&exported[1]);
        assert_eq!(first.value(), 13);
        assert_eq!(first.to_string(), "1d20=10+3=13");
        assert!(matches!(first, EvaluatedNode::Binary { op: Operator::Add, .. }));

        let second = evaluated(&exported[3]);
        assert_eq!(second, &EvaluatedNode::Roll { counter: 3, face: 6, values: vec![1, 5, 5], value: 11 });
    }

    #[test]
    fn each_message_starts_from_its_own_seed() {
        let message = parse("3d6");
        let exported = evaluate_entities(&message, Seed(12345));
        assert_eq!(
            evaluated(&exported[0]),
            &EvaluatedNode::Roll { counter: 3, face: 6, values: vec![4, 1, 5], value: 10 }
        );
    }

    #[test]
    fn invalid_expression_does_not_abort_the_message() {
        let message = parse("1/0 then 1d20");
        let exported = evaluate_entities(&message, Seed(12345));

        assert_eq!(exported[0].text(), "1/0");
        assert_eq!(exported[0].outcome(), Some(&ExprOutcome::Invalid { error: EvalError::DivisionByZero }));
        assert_eq!(evaluated(&exported[2]).value(), 10);
    }

    #[test]
    fn markup_is_resolved_against_the_text() {
        let message = parse("**hit** [map](https://m.io) d20 ");
        let exported = evaluate_entities(&message, Seed(99));

        assert_eq!(exported[0], ExportEntity::Strong { start: 0, offset: 3, text: "hit".into() });
        assert_eq!(
            exported[2],
            ExportEntity::Link { start: 4, offset: 3, text: "map".into(), href: "https://m.io".into() }
        );
        let ExportEntity::Expr { text, offset, .. } = &exported[4] else {
            panic!("expected an expression, got {:?}", exported[4]);
        };
        assert_eq!(*offset, 3);
        assert_eq!(text, "d20");
        assert_eq!(exported[5].text(), " ");
        assert_eq!(evaluated(&exported[4]).value(), 7);
    }

    #[test]
    fn corrupt_ranges_export_empty_text() {
        let message = ParseResult { text: "ab".into(), entities: vec![Entity::Text { start: 1, offset: 9 }] };
        let exported = evaluate_entities(&message, Seed(1));
        assert_eq!(exported, vec![ExportEntity::Text { start: 1, offset: 9, text: String::new() }]);
    }
}
