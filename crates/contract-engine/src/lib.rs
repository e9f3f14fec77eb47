//! Contract document engine.
//!
//! The pure text layer of the contract pipeline: French number spelling,
//! `{{placeholder}}` substitution into clause bodies, and assembly of the
//! final self-contained contract document. No I/O happens here; callers
//! provide the lease data and get a `String` back.

pub mod assemble;
pub mod numerals;
pub mod substitution;

pub use assemble::{assemble, contract_number, LogoAsset, RenderOptions, PAGE_BREAK_HTML};
pub use numerals::to_words;
pub use substitution::{
    format_amount, render, unknown_tokens, SubstitutionContext, PLACEHOLDER_NAMES,
    UNSPECIFIED_FIELD,
};
