//! French spelling of integer amounts ("sept cents", "soixante-onze").
//!
//! Covers 0–999 exactly, including the irregular soixante-dix and
//! quatre-vingt families. Amounts of 1000 and above fall back to the plain
//! digit string: mille/million composition is not implemented, and deposits
//! (3x rent) regularly land in that range, so callers must expect digits
//! there.

const UNITS: [&str; 10] = [
    "zéro", "un", "deux", "trois", "quatre", "cinq", "six", "sept", "huit", "neuf",
];

const TEENS: [&str; 10] = [
    "dix", "onze", "douze", "treize", "quatorze", "quinze", "seize", "dix-sept", "dix-huit",
    "dix-neuf",
];

// Indexed by tens digit; 7/8/9 go through the irregular families instead.
const TENS: [&str; 7] = ["", "", "vingt", "trente", "quarante", "cinquante", "soixante"];

/// Spells a non-negative integer amount in French.
///
/// Fractional subunits are never spelled here; callers format cents with a
/// fixed two-decimal display and pass only the integer part.
pub fn to_words(n: u64) -> String {
    if n >= 1000 {
        return n.to_string();
    }
    below_thousand(n as usize)
}

fn below_thousand(n: usize) -> String {
    if n < 100 {
        return below_hundred(n);
    }

    let hundreds = n / 100;
    let rest = n % 100;

    let mut out = if hundreds == 1 {
        "cent".to_string()
    } else if rest == 0 {
        // "cent" takes an s when multiplied and not followed by another word
        format!("{} cents", UNITS[hundreds])
    } else {
        format!("{} cent", UNITS[hundreds])
    };

    if rest != 0 {
        out.push(' ');
        out.push_str(&below_hundred(rest));
    }
    out
}

fn below_hundred(n: usize) -> String {
    match n {
        0..=9 => UNITS[n].to_string(),
        10..=19 => TEENS[n - 10].to_string(),
        70..=79 => format!("soixante-{}", TEENS[n - 70]),
        80 => "quatre-vingt".to_string(),
        81..=89 => format!("quatre-vingt-{}", UNITS[n - 80]),
        90..=99 => format!("quatre-vingt-{}", TEENS[n - 90]),
        _ => {
            let tens = n / 10;
            let ones = n % 10;
            if ones == 0 {
                TENS[tens].to_string()
            } else {
                format!("{}-{}", TENS[tens], UNITS[ones])
            }
        }
    }
}
