//! Output file naming.
//!
//! `<stem>_<YYYYmmddHHMMSS>.<format>` where the stem is the first 20
//! characters of the text with everything except ASCII letters, digits and
//! CJK ideographs (U+4E00..=U+9FA5) replaced by `_`. Two calls within the
//! same second with the same text produce the same name.

use chrono::{DateTime, TimeZone};

/// Stem used when the text yields nothing.
pub const FALLBACK_STEM: &str = "tts_audio";

const STEM_CHARS: usize = 20;

fn is_kept(c: char) -> bool {
    c.is_ascii_alphanumeric() || ('\u{4e00}'..='\u{9fa5}').contains(&c)
}

/// Sanitised, length-capped stem derived from `text`.
pub fn file_stem(text: &str) -> String {
    let stem: String = text
        .chars()
        .take(STEM_CHARS)
        .map(|c| if is_kept(c) { c } else { '_' })
        .collect();
    if stem.is_empty() {
        FALLBACK_STEM.to_string()
    } else {
        stem
    }
}

/// `<stem>_<timestamp>.<format>` for `text` written at `now`.
///
/// Underscores are never collapsed: a stem ending in replaced punctuation
/// keeps its own `_` before the separator, so `"Hello, 世界!"` becomes
/// `Hello__世界__<timestamp>.mp3`.
pub fn output_file_name<Tz: TimeZone>(text: &str, format: &str, now: &DateTime<Tz>) -> String
where
    Tz::Offset: std::fmt::Display,
{
    format!(
        "{}_{}.{}",
        file_stem(text),
        now.format("%Y%m%d%H%M%S"),
        format
    )
}
