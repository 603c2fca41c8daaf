//! Column classification. Pure functions of the header text only: the same
//! rules govern sort-key coercion and which columns get a sort affordance.

/// True when the column holds numeric data: the title ends with the word
/// `Score` (this covers the `S<n> Score` columns), carries a parenthesized
/// percentage like `(60%)`, or is exactly `Rank`.
pub fn is_numeric_column(header: &str) -> bool {
    let h = header.trim();
    h.eq_ignore_ascii_case("Rank") || ends_with_word(h, "Score") || has_percent_paren(h)
}

/// Columns that get a sort affordance in the header: the numeric ones plus
/// `Rank` (numeric anyway; kept explicit so the affordance cannot silently
/// drift off the rank column). Purely presentational; every column sorts.
pub fn is_sortable_column(header: &str) -> bool {
    is_numeric_column(header) || header.trim().eq_ignore_ascii_case("Rank")
}

/// Coerce a cell to a number by dropping every character that is not a digit,
/// sign, or decimal point. Anything unparseable (including empty text and the
/// `-` placeholder) becomes negative infinity, so blank numeric cells always
/// sort last in descending order and first in ascending.
pub fn to_number(raw: &str) -> f64 {
    let cleaned: String = raw
        .chars()
        .filter(|c| c.is_ascii_digit() || matches!(*c, '.' | '+' | '-'))
        .collect();
    cleaned.parse::<f64>().unwrap_or(f64::NEG_INFINITY)
}

fn ends_with_word(h: &str, word: &str) -> bool {
    let Some(prefix) = h.strip_suffix(word) else {
        return false;
    };
    match prefix.chars().next_back() {
        None => true,
        Some(c) => !c.is_ascii_alphanumeric(),
    }
}

fn has_percent_paren(h: &str) -> bool {
    let bytes = h.as_bytes();
    for (i, &b) in bytes.iter().enumerate() {
        if b != b'(' {
            continue;
        }
        let digits = bytes[i + 1..].iter().take_while(|b| b.is_ascii_digit()).count();
        if digits == 0 {
            continue;
        }
        if bytes[i + 1 + digits..].starts_with(b"%)") {
            return true;
        }
    }
    false
}
