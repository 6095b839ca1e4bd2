use crate::combinator::{Parser, RegexMatch, State, choice, regex};
use crate::entity::utf16_len;
use crate::{Entity, Env, Rule};

/// A run of ASCII digits.
fn digits() -> Parser<String> {
    regex(regex!(r"^[0-9]+")).map(|m| m.whole().to_string())
}

/// A single whitespace character directly followed by a non-whitespace one.
/// Only the whitespace is consumed, so whatever follows gets its own chance
/// at every rule.
///
/// Whitespace here is the chat clients' set: U+FEFF counts, U+0085 does not.
fn lone_space() -> Parser<String> {
    Parser::new(lone_space_step)
}

fn lone_space_step<'s>(state: &State<'s>, _env: &Env) -> Option<(String, State<'s>)> {
    let caps = regex!(r"^([\s\x{FEFF}--\x{85}])[^\s\x{FEFF}--\x{85}]").captures(state.rest)?;
    let space = caps.get(1)?;
    Some((space.as_str().to_string(), state.advance(space.end())))
}

/// One character of anything, then up to the next character that may open
/// another construct, then any trailing whitespace.
fn word_run() -> Parser<String> {
    regex(regex!(r"(?s)^.[^0-9*@\[(（#\s\x{FEFF}--\x{85}]*[\s\x{FEFF}--\x{85}]*")).map(|m: RegexMatch| m.whole().to_string())
}

/// Plain text. Consumes at least one character of any non-empty input.
fn span() -> Parser<Entity> {
    choice(vec![digits(), lone_space(), word_run()]).then(|content: String, state, _env| {
        let entity = Entity::Text { start: state.offset(), offset: utf16_len(&content) };
        Some((entity, state.append(&content)))
    })
}

fn rule_span() -> Rule {
    rule! {
        name: "span",
        parser: span(),
    }
}

pub fn get() -> Vec<Rule> {
    vec![rule_span()]
}
