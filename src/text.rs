/// Text canonicalisation shared by every comparison.
///
/// `normalize` is total: it never fails and maps absent or blank input to "".

/// UTF-8 apostrophe (U+2019) mis-decoded as Windows-1252, as it shows up in
/// text extracted from some PDF and Word exports.
const MOJIBAKE_APOSTROPHE: &str = "\u{e2}\u{20ac}\u{2122}";

/// Lower-case, trim, repair the mojibake apostrophe and collapse doubled spaces.
///
/// The doubled-space collapse is a single non-overlapping pass, so a run of
/// four spaces becomes two.
pub fn normalize(text: &str) -> String {
    let lowered = text.to_lowercase();
    let trimmed = lowered.trim();
    if trimmed.is_empty() {
        return String::new();
    }
    trimmed.replace(MOJIBAKE_APOSTROPHE, "'").replace("  ", " ")
}

/// `normalize` for nullable fields.
pub fn normalize_opt(text: Option<&str>) -> String {
    text.map(normalize).unwrap_or_default()
}

/// Join already-extracted fragments with single spaces, the way every
/// semantic category builds its input text.
pub fn join_words<I, S>(parts: I) -> String
where
    I: IntoIterator<Item = S>,
    S: AsRef<str>,
{
    parts
        .into_iter()
        .map(|s| s.as_ref().to_string())
        .collect::<Vec<_>>()
        .join(" ")
}
