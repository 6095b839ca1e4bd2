use crate::combinator::{Parser, RegexMatch, regex};
use crate::engine::BucketMask;
use crate::entity::utf16_len;
use crate::{Entity, Rule};

/// `**content**` on one line; the markers are dropped from the text.
///
/// Any line terminator ends the line here: `\r`, U+2028 and U+2029 as well
/// as `\n`.
fn strong() -> Parser<Entity> {
    regex(regex!(r"^\*\*([^\n\r\x{2028}\x{2029}]+?)\*\*")).then(|m: RegexMatch, state, _env| {
        let content = m.group(1);
        let entity = Entity::Strong { start: state.offset(), offset: utf16_len(content) };
        Some((entity, state.append(content)))
    })
}

/// `[title](url)`. The title runs to the first `]`, the url to the first `)`.
fn link() -> Parser<Entity> {
    regex(regex!(r"^\[([^\]\n]+)\]\(([^)\n]+)\)")).then(|m: RegexMatch, state, _env| {
        let title = m.group(1);
        let entity = Entity::Link { start: state.offset(), offset: utf16_len(title), href: m.group(2).to_string() };
        Some((entity, state.append(title)))
    })
}

/// A bare `http(s)://` URL, linked to itself.
fn auto_url() -> Parser<Entity> {
    regex(regex!(
        r"^https?://(www\.)?[-a-zA-Z0-9@:%._+~#=]{1,256}\.[a-zA-Z0-9()]{1,6}(?-u:\b)([-a-zA-Z0-9()@:%_+.~#?&/=]*)"
    ))
    .then(|m: RegexMatch, state, _env| {
        let url = m.whole();
        let entity = Entity::Link { start: state.offset(), offset: utf16_len(url), href: url.to_string() };
        Some((entity, state.append(url)))
    })
}

fn rule_strong() -> Rule {
    rule! {
        name: "strong",
        buckets: BucketMask::HAS_DOUBLE_STAR,
        parser: strong(),
    }
}

fn rule_link() -> Rule {
    rule! {
        name: "link",
        buckets: BucketMask::HAS_LINK_SYNTAX,
        parser: link(),
    }
}

fn rule_auto_url() -> Rule {
    rule! {
        name: "auto_url",
        buckets: BucketMask::HAS_URL_SCHEME,
        parser: auto_url(),
    }
}

/// Markup rules in priority order.
pub fn get() -> Vec<Rule> {
    vec![rule_strong(), rule_link(), rule_auto_url()]
}
