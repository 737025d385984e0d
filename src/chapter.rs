use regex::Regex;
use std::sync::LazyLock;

/// GoPro chapter marker: "GX" followed by the two-digit chapter number.
static CHAPTER_MARKER: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?i)GX(\d\d)").expect("chapter marker pattern is valid"));

const FIRST_CHAPTER: &str = "01";

/// Width of the recording identifier that follows the chapter digits
/// (`GX02` + `0001`).
const IDENTIFIER_LEN: usize = 4;

/// Rewrite a chapter 2+ filename so it shares the base name of chapter 1,
/// with the original chapter number appended after the identifier.
///
/// `GX020001.MP4` becomes `GX010001-02.MP4`. Names without a marker, or
/// already on chapter 01, are returned unchanged.
pub fn normalize(name: &str) -> String {
    let Some(caps) = CHAPTER_MARKER.captures(name) else {
        return name.to_string();
    };
    let (Some(marker), Some(chapter)) = (caps.get(0), caps.get(1)) else {
        return name.to_string();
    };
    if chapter.as_str() == FIRST_CHAPTER {
        return name.to_string();
    }

    // "GX" keeps its original case; offsets are relative to the marker
    let prefix_end = marker.start() + 2;
    let id_start = marker.end();
    let id_end = (id_start + IDENTIFIER_LEN).min(name.len());

    match (
        name.get(..prefix_end),
        name.get(id_start..id_end),
        name.get(id_end..),
    ) {
        (Some(prefix), Some(identifier), Some(rest)) => format!(
            "{prefix}{FIRST_CHAPTER}{identifier}-{}{rest}",
            chapter.as_str()
        ),
        _ => name.to_string(),
    }
}
