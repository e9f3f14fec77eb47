//! Placeholder substitution over clause text.
//!
//! Clause authors write `{{placeholder}}` tokens drawn from a fixed set of
//! nine identifiers; everything else in the clause body is left untouched.
//! Unknown tokens are deliberately left verbatim so a typo in a clause can
//! never fail a render; [`unknown_tokens`] lets the storage layer warn about
//! them at authoring time instead.

use lazy_static::lazy_static;
use regex::Regex;

use lease_types::{LandlordProfile, LeaseSnapshot};

use crate::numerals::to_words;

/// Fallback shown for optional fields the landlord never filled in.
pub const UNSPECIFIED_FIELD: &str = "Non renseigné";

/// The closed set of recognized placeholder identifiers.
pub const PLACEHOLDER_NAMES: [&str; 9] = [
    "rent_amount",
    "rent_amount_words",
    "deposit_amount",
    "deposit_amount_words",
    "bank_name",
    "bank_account",
    "unit_number",
    "bedrooms",
    "bathrooms",
];

lazy_static! {
    static ref TOKEN_RE: Regex = Regex::new(r"\{\{([A-Za-z0-9_]+)\}\}").unwrap();
}

/// Replacement values for one render, computed fresh from the lease and
/// landlord every time and never cached.
///
/// This is a closed record, not a dictionary: the nine fields here are the
/// nine placeholders clause authors can use, checked at compile time.
#[derive(Debug, Clone, PartialEq)]
pub struct SubstitutionContext {
    pub rent_amount: String,
    pub rent_amount_words: String,
    pub deposit_amount: String,
    pub deposit_amount_words: String,
    pub bank_name: String,
    pub bank_account: String,
    pub unit_number: String,
    pub bedrooms: String,
    pub bathrooms: String,
}

impl SubstitutionContext {
    /// Builds the substitution values for a lease.
    ///
    /// Amounts are formatted with two decimals and no thousands separator;
    /// word forms spell the integer part only. `fallback` fills optional
    /// landlord fields that are absent.
    pub fn from_lease(lease: &LeaseSnapshot, landlord: &LandlordProfile, fallback: &str) -> Self {
        let deposit = lease.resolved_deposit();
        Self {
            rent_amount: format_amount(lease.rent_amount),
            rent_amount_words: to_words(lease.rent_amount.trunc() as u64),
            deposit_amount: format_amount(deposit),
            deposit_amount_words: to_words(deposit.trunc() as u64),
            bank_name: landlord.bank_name.clone(),
            bank_account: landlord
                .bank_account
                .clone()
                .unwrap_or_else(|| fallback.to_string()),
            unit_number: lease.property.unit_number.clone(),
            bedrooms: lease.property.bedrooms.to_string(),
            bathrooms: lease.property.bathrooms.to_string(),
        }
    }

    fn entries(&self) -> [(&'static str, &str); 9] {
        [
            ("rent_amount", &self.rent_amount),
            ("rent_amount_words", &self.rent_amount_words),
            ("deposit_amount", &self.deposit_amount),
            ("deposit_amount_words", &self.deposit_amount_words),
            ("bank_name", &self.bank_name),
            ("bank_account", &self.bank_account),
            ("unit_number", &self.unit_number),
            ("bedrooms", &self.bedrooms),
            ("bathrooms", &self.bathrooms),
        ]
    }
}

/// Fixed two-decimal currency figure, no thousands separators ("2100.00").
pub fn format_amount(amount: f64) -> String {
    format!("{:.2}", amount)
}

/// Substitutes every known `{{placeholder}}` token in `content`.
///
/// Pure string transform. Unknown tokens stay verbatim, and since
/// substituted values contain no `{{...}}` sequences the transform is
/// idempotent: a second pass over already-substituted text is a no-op.
pub fn render(content: &str, ctx: &SubstitutionContext) -> String {
    let mut out = content.to_string();
    for (name, value) in ctx.entries() {
        let token = format!("{{{{{}}}}}", name);
        if out.contains(&token) {
            out = out.replace(&token, value);
        }
    }
    out
}

/// Lists `{{...}}` tokens in `content` that are not in the recognized set.
///
/// Rendering never fails on these; this is the authoring-time hook for
/// surfacing clause typos in logs.
pub fn unknown_tokens(content: &str) -> Vec<String> {
    TOKEN_RE
        .captures_iter(content)
        .map(|cap| cap[1].to_string())
        .filter(|name| !PLACEHOLDER_NAMES.contains(&name.as_str()))
        .collect()
}
