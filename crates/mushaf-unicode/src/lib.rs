// this_file: crates/mushaf-unicode/src/lib.rs

//! Text handling for the Mushaf engine.
//!
//! Raw feed text is cleaned per encoding, tagged, split into words and
//! assembled into the immutable [`Book`](mushaf_core::content::Book).
//! Rasm reduction and structural validation live here too, since both
//! are pure functions over normalized text.

pub mod normalize;
pub mod rasm;
pub mod translation;
pub mod validate;

pub use normalize::{CleanScript, TextNormalizer};
pub use rasm::reduce as reduce_rasm;
pub use validate::{validate_book, IssueKind, ValidationIssue, ValidationMode};

/// Render `n` with Arabic-Indic digits (U+0660..U+0669)
pub fn arabic_indic(n: u32) -> String {
    n.to_string()
        .chars()
        .map(|d| match d.to_digit(10) {
            Some(v) => char::from_u32(0x0660 + v).unwrap_or(d),
            None => d,
        })
        .collect()
}


#[cfg(test)]
mod proptests;
