//! Spoken punctuation normalizer

/// Spoken phrases and the symbols they stand for, applied in this order.
pub const SPOKEN_PUNCTUATION: &[(&str, &str)] = &[
    ("full stop", "."),
    ("period", "."),
    ("comma", ","),
    ("exclamation mark", "!"),
    ("question mark", "?"),
    ("colon", ":"),
    ("semicolon", ";"),
    ("new line", "\n"),
    ("newline", "\n"),
    ("new paragraph", "\n\n"),
];

/// Rewrite dictated punctuation phrases into literal symbols.
///
/// The text is lower-cased and padded with a space on each side so every
/// phrase can be matched as `" <phrase> "`. A match becomes `"<symbol> "`:
/// the symbol absorbs the leading space and keeps the trailing one, so the
/// next phrase still has its boundary. Each phrase is re-scanned until it
/// no longer occurs, so adjacent repeats (`"comma comma"`) are all rewritten.
/// The padding is trimmed at the end.
///
/// Case information is not preserved in the result.
pub fn normalize(text: &str) -> String {
    let mut padded = format!(" {} ", text.to_lowercase());

    for (phrase, symbol) in SPOKEN_PUNCTUATION {
        let pattern = format!(" {phrase} ");
        let replacement = format!("{symbol} ");
        // A replacement re-creates the leading space of an adjacent repeat
        while padded.contains(&pattern) {
            padded = padded.replace(&pattern, &replacement);
        }
    }

    padded.trim().to_string()
}
