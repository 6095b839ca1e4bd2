//! Entity reduction.
//!
//! The `span` rule emits many small `Text` pieces (a word, a single space, a
//! digit run). A single left fold merges every run of adjacent `Text`
//! entities into one:
//!
//! ```text
//! [Text 0+5, Text 5+1, Expr 6+4, Text 10+2, Text 12+3]
//!   ──▶ [Text 0+6, Expr 6+4, Text 10+5]
//! ```
//!
//! Postcondition: no two consecutive entities are both `Text`.

use crate::Entity;

/// Merge adjacent `Text` entities, keeping the earlier `start`.
pub(crate) fn merge_text_entities(entities: Vec<Entity>) -> Vec<Entity> {
    let mut merged: Vec<Entity> = Vec::with_capacity(entities.len());
    for entity in entities {
        if let Entity::Text { offset: more, .. } = &entity {
            if let Some(Entity::Text { offset, .. }) = merged.last_mut() {
                *offset += *more;
                continue;
            }
        }
        merged.push(entity);
    }
    merged
}
