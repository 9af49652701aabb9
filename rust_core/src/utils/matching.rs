//! Team name normalization and string distance.
//!
//! Every comparison in the resolver goes through [`normalize`] first so that
//! "Man. City", "MAN CITY" and "Man City" collapse onto the same key.

use strsim::levenshtein;

/// Fold a lowercase Latin-extended letter onto its ASCII base.
/// Returns `None` for characters that have no folding.
fn fold_latin(c: char) -> Option<&'static str> {
    let folded = match c {
        'à' | 'á' | 'â' | 'ã' | 'ä' | 'å' | 'ā' | 'ă' | 'ą' => "a",
        'æ' => "ae",
        'ç' | 'ć' | 'č' | 'ĉ' | 'ċ' => "c",
        'ď' | 'đ' | 'ð' => "d",
        'è' | 'é' | 'ê' | 'ë' | 'ē' | 'ė' | 'ę' | 'ě' | 'ĕ' => "e",
        'ğ' | 'ģ' | 'ĝ' | 'ġ' => "g",
        'ĥ' | 'ħ' => "h",
        'ì' | 'í' | 'î' | 'ï' | 'ī' | 'į' | 'ı' | 'ĭ' | 'ĩ' => "i",
        'ĵ' => "j",
        'ķ' => "k",
        'ł' | 'ľ' | 'ĺ' | 'ļ' | 'ŀ' => "l",
        'ñ' | 'ń' | 'ň' | 'ņ' => "n",
        'ò' | 'ó' | 'ô' | 'õ' | 'ö' | 'ø' | 'ō' | 'ő' | 'ŏ' => "o",
        'œ' => "oe",
        'ř' | 'ŕ' | 'ŗ' => "r",
        'ş' | 'ś' | 'š' | 'ș' | 'ŝ' => "s",
        'ß' => "ss",
        'ţ' | 'ť' | 'ț' | 'ŧ' => "t",
        'þ' => "th",
        'ù' | 'ú' | 'û' | 'ü' | 'ū' | 'ů' | 'ű' | 'ų' | 'ŭ' | 'ũ' => "u",
        'ŵ' => "w",
        'ý' | 'ÿ' | 'ŷ' => "y",
        'ž' | 'ź' | 'ż' => "z",
        _ => return None,
    };
    Some(folded)
}

/// Normalize a raw team name for comparison.
///
/// Lowercases, folds Latin-extended letters to ASCII, maps any whitespace to a
/// single space and drops everything that is not `[a-z0-9 ]`. The result is
/// trimmed. Internal runs of spaces are kept as they are.
///
/// The output alphabet is closed under this function, so
/// `normalize(&normalize(s)) == normalize(s)` for every `s`.
pub fn normalize(raw: &str) -> String {
    let mut out = String::with_capacity(raw.len());

    // Uppercase forms like 'İ' lowercase to a base letter plus a combining
    // mark; the mark is dropped below.
    for c in raw.chars().flat_map(char::to_lowercase) {
        if c.is_ascii_lowercase() || c.is_ascii_digit() {
            out.push(c);
        } else if c.is_whitespace() {
            out.push(' ');
        } else if let Some(folded) = fold_latin(c) {
            out.push_str(folded);
        }
    }

    out.trim().to_string()
}

/// Character-level Levenshtein distance between two strings.
///
/// Symmetric, and zero exactly when the strings are equal.
pub fn edit_distance(a: &str, b: &str) -> usize {
    levenshtein(a, b)
}

/// Combined home + away distance between a scraped pairing and a candidate
/// pairing. All four names are expected to be normalized already.
pub fn pairing_distance(home: &str, away: &str, cand_home: &str, cand_away: &str) -> usize {
    edit_distance(home, cand_home) + edit_distance(away, cand_away)
}
