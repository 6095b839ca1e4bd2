//! Arithmetic and dice grammar.
//!
//! ```text
//! expr  := expr2 ( ws ('+'|'-') ws expr2 )*
//! expr2 := atom  ( ws ('×'|'*'|'÷'|'/') ws atom )*
//! atom  := roll | num | '(' ws expr ws ')' | '（' ws expr ws '）' | '[' ws expr ws ']'
//! roll  := [0-9]{0,3} 'd' [0-9]{0,4}      ('d' not followed by an ASCII letter)
//! num   := [0-9]{1,5}
//! ```
//!
//! Both binary levels fold their operands to the right, so `10 - 3 - 2` is
//! `10 - (3 - 2)`. Operator chains are read in a loop and only brackets
//! recurse.
//!
//! Depth is charged where the tree grows: every operand after the first of a
//! chain sits one level below its predecessor, and every bracket one level
//! below its surroundings. Going past `MAX_EXPR_DEPTH` fails the match and
//! marks the run too deep, so the caller can drop the whole expression
//! instead of keeping whatever part of it fit.
//!
//! `expr` is built once into a static; brackets reach it again through
//! `Parser::new(expr_step)`, so the parser graph holds no reference cycles.

use once_cell::sync::Lazy;

use crate::combinator::{MAX_EXPR_DEPTH, Parser, RegexMatch, State, choice, nested, regex, whitespace};
use crate::{Env, ExprNode, Operator};

/// Full expression (additive level).
pub(crate) fn expr() -> Parser<ExprNode> {
    static GRAMMAR: Lazy<Parser<ExprNode>> = Lazy::new(|| chain(chain(atom(), multiplicative()), additive()));
    GRAMMAR.clone()
}

fn expr_step<'s>(state: &State<'s>, env: &Env) -> Option<(ExprNode, State<'s>)> {
    expr().run(state, env)
}

/// `operand ( ws op ws operand )*`, folded to the right. Trailing whitespace
/// is only consumed when an operator and an operand follow it.
fn chain(operand: Parser<ExprNode>, op: Parser<Operator>) -> Parser<ExprNode> {
    let op = whitespace().with(op.skip(whitespace()));
    Parser::new(move |state, env| {
        let (first, mut current) = operand.run(state, env)?;
        let mut rest = Vec::new();
        while let Some((o, after_op)) = op.run(&current, env) {
            let depth = state.depth.saturating_add(u16::try_from(rest.len() + 1).unwrap_or(u16::MAX));
            if depth >= MAX_EXPR_DEPTH {
                state.mark_too_deep();
                return None;
            }
            let Some((r, next)) = operand.run(&after_op.at_depth(depth), env) else {
                break;
            };
            rest.push((o, r));
            current = next.at_depth(state.depth);
        }
        Some((fold_right(first, rest), current))
    })
}

/// `a op1 b op2 c` becomes `a op1 (b op2 c)`.
fn fold_right(first: ExprNode, rest: Vec<(Operator, ExprNode)>) -> ExprNode {
    let mut tail = rest.into_iter().rev();
    let Some((mut op, mut node)) = tail.next() else {
        return first;
    };
    for (prev_op, l) in tail {
        node = ExprNode::binary(op, l, node);
        op = prev_op;
    }
    ExprNode::binary(op, first, node)
}

fn additive() -> Parser<Operator> {
    regex(regex!(r"^[-+]")).then(|m: RegexMatch, state, _env| Some((Operator::from_symbol(m.whole())?, state)))
}

fn multiplicative() -> Parser<Operator> {
    regex(regex!(r"^[*/×÷]")).then(|m: RegexMatch, state, _env| Some((Operator::from_symbol(m.whole())?, state)))
}

fn atom() -> Parser<ExprNode> {
    choice(vec![
        roll(),
        num(),
        grouped(regex(regex!(r"^\(")), regex(regex!(r"^\)"))),
        grouped(regex(regex!(r"^（")), regex(regex!(r"^）"))),
        grouped(regex(regex!(r"^\[")), regex(regex!(r"^\]"))),
    ])
}

/// A bracketed expression, one level deeper than its surroundings.
fn grouped(open: Parser<RegexMatch>, close: Parser<RegexMatch>) -> Parser<ExprNode> {
    nested(open.with(whitespace()).with(Parser::new(expr_step)).skip(whitespace()).skip(close))
}

/// `NdF`, `dF`, `Nd` or `d`. Missing counter is 1, missing face is
/// `Env::default_face`.
fn roll() -> Parser<ExprNode> {
    regex(regex!(r"^([0-9]{0,3})d([0-9]{0,4})")).then(|m: RegexMatch, state, env| {
        let face_digits = m.group(2);
        // A "d" followed by a letter starts a word ("dog"), not a roll.
        if face_digits.is_empty() && state.rest.starts_with(|c: char| c.is_ascii_alphabetic()) {
            return None;
        }
        let counter = match m.group(1) {
            "" => 1,
            digits => digits.parse().ok()?,
        };
        let face = match face_digits {
            "" => env.default_face,
            digits => digits.parse().ok()?,
        };
        Some((ExprNode::roll(counter, face), state))
    })
}

fn num() -> Parser<ExprNode> {
    regex(regex!(r"^[0-9]{1,5}")).then(|m: RegexMatch, state, _env| Some((ExprNode::num(m.whole().parse().ok()?), state)))
}

/// Length in bytes of the run of expression tokens at the start of `s`:
/// numbers, rolls, operators and brackets, with whitespace between them.
/// Used to keep an over-deep expression together as text.
pub(crate) fn token_run(s: &str) -> usize {
    let token = regex!(r"^[\s\x{FEFF}--\x{85}]*(?:[0-9]{0,3}d[0-9]{0,4}|[0-9]+|[-+*/×÷()（）\[\]])");
    let mut end = 0;
    while let Some(m) = token.find(&s[end..]) {
        let after = end + m.end();
        if m.as_str().ends_with('d') && s[after..].starts_with(|c: char| c.is_ascii_alphabetic()) {
            break;
        }
        end = after;
    }
    end
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn token_run_stops_at_words_and_trailing_space() {
        assert_eq!(token_run("1 + (2d6) × 3 then"), "1 + (2d6) × 3".len());
        assert_eq!(token_run("1+1 dog"), 3);
        assert_eq!(token_run("（1）d20!"), "（1）d20".len());
        assert_eq!(token_run("word"), 0);
    }

    #[test]
    fn single_operand_folds_to_itself() {
        assert_eq!(fold_right(ExprNode::roll(1, 6), Vec::new()), ExprNode::roll(1, 6));
    }

    #[test]
    fn fold_right_nests_to_the_right() {
        let node = fold_right(ExprNode::num(10), vec![(Operator::Sub, ExprNode::num(3)), (Operator::Sub, ExprNode::num(2))]);
        assert_eq!(
            node,
            ExprNode::binary(Operator::Sub, ExprNode::num(10), ExprNode::binary(Operator::Sub, ExprNode::num(3), ExprNode::num(2)))
        );
    }
}
