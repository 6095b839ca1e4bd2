use crate::combinator::{MAX_EXPR_DEPTH, Parser};
use crate::engine::BucketMask;
use crate::entity::utf16_len;
use crate::rules::expr::grammar;
use crate::{Entity, ExprNode, Rule};

/// A dice or arithmetic expression. A lone number is left to the text rules.
///
/// The consumed source, inner whitespace included, is copied to the output
/// text unchanged and the entity covers exactly that copy.
///
/// An expression nested deeper than `MAX_EXPR_DEPTH` is not cut short: the
/// whole run of expression tokens becomes a single `Text` entity.
fn expression() -> Parser<Entity> {
    let grammar = grammar::expr();
    Parser::new(move |state, env| {
        state.take_too_deep();
        let parsed = grammar.run(state, env);
        if state.take_too_deep() {
            let len = grammar::token_run(state.rest);
            if len == 0 {
                return None;
            }
            let source = &state.rest[..len];
            tracing::debug!(len, max = MAX_EXPR_DEPTH, "expression too deep, kept as text");
            let entity = Entity::Text { start: state.offset(), offset: utf16_len(source) };
            return Some((entity, state.advance(len).append(source)));
        }
        let (node, next) = parsed?;
        if matches!(node, ExprNode::Num { .. }) {
            return None;
        }
        let consumed = next.consumed_since(state);
        let entity = Entity::Expr { start: next.offset(), offset: utf16_len(consumed), node };
        Some((entity, next.append(consumed)))
    })
}

fn rule_expression() -> Rule {
    rule! {
        name: "expression",
        buckets: BucketMask::HAS_DIGITS | BucketMask::HAS_DICE,
        expression: true,
        parser: expression(),
    }
}

pub fn get() -> Vec<Rule> {
    vec![rule_expression()]
}
