use std::time::{SystemTime, UNIX_EPOCH};

use url::Url;

use crate::domain::{AppError, Item};

/// Byte cap for a stem. Also keeps it under 255 UTF-16 units.
const MAX_STEM_BYTES: usize = 200;

/// Device names Windows refuses as file names, with or without an extension.
const RESERVED_NAMES: &[&str] = &[
    "CON", "PRN", "AUX", "NUL", "COM1", "COM2", "COM3", "COM4", "COM5", "COM6", "COM7", "COM8",
    "COM9", "LPT1", "LPT2", "LPT3", "LPT4", "LPT5", "LPT6", "LPT7", "LPT8", "LPT9",
];

/// Downloader template field used when no usable title is known.
pub const TITLE_FIELD: &str = "%(title)s";

/// Get current Unix timestamp in seconds
pub fn get_timestamp() -> u64 {
    SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .map(|d| d.as_secs())
        .unwrap_or(0)
}

/// Sanitize filename to remove invalid characters
pub fn sanitize_filename(filename: &str) -> String {
    let replaced: String = filename
        .chars()
        .map(|c| match c {
            '<' | '>' | ':' | '"' | '/' | '\\' | '|' | '?' | '*' => '_',
            c if c.is_control() => '_',
            _ => c,
        })
        .collect();

    let trimmed = trim_name(&replaced);
    let clean = trim_name(truncate_bytes(trimmed, MAX_STEM_BYTES));

    if is_reserved_name(clean) {
        format!("_{clean}")
    } else {
        clean.to_string()
    }
}

fn trim_name(name: &str) -> &str {
    name.trim().trim_matches(|c: char| c == '.' || c == ' ').trim()
}

/// Longest prefix of `s` within `max` bytes, ending on a char boundary.
fn truncate_bytes(s: &str, max: usize) -> &str {
    if s.len() <= max {
        return s;
    }
    let mut end = max;
    while !s.is_char_boundary(end) {
        end -= 1;
    }
    &s[..end]
}

fn is_reserved_name(name: &str) -> bool {
    let base = name.split('.').next().unwrap_or(name).trim_end();
    RESERVED_NAMES.iter().any(|reserved| reserved.eq_ignore_ascii_case(base))
}

/// File stem for an item inside the downloader's output template.
pub fn output_stem(item: &Item) -> String {
    if !item.title_resolved {
        return TITLE_FIELD.to_string();
    }
    let clean = sanitize_filename(&item.title);
    if clean.is_empty() {
        TITLE_FIELD.to_string()
    } else {
        // `%` starts a template field for the downloader
        clean.replace('%', "%%")
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum LinkKind {
    Single(String),
    Playlist(String),
}

pub fn classify_link(input: &str) -> Result<LinkKind, AppError> {
    let link = input.trim();
    if link.is_empty() {
        return Err(AppError::InvalidInput);
    }

    let is_playlist = match Url::parse(link) {
        Ok(url) => url.query_pairs().any(|(key, _)| key == "list"),
        Err(_) => link.contains("list="),
    };

    if is_playlist {
        Ok(LinkKind::Playlist(link.to_string()))
    } else {
        Ok(LinkKind::Single(link.to_string()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_timestamp() {
        let ts = get_timestamp();
        assert!(ts > 1700000000); // Sanity check
    }

    #[test]
    fn test_sanitize_filename() {
        assert_eq!(sanitize_filename("test/file.mp3"), "test_file.mp3");
        assert_eq!(sanitize_filename("normal-name.mp3"), "normal-name.mp3");
        assert_eq!(sanitize_filename("  ..hidden.. "), "hidden");
        assert_eq!(sanitize_filename("a\tb\nc"), "a_b_c");
    }

    #[test]
    fn test_sanitize_truncates() {
        let long = "x".repeat(400);
        assert_eq!(sanitize_filename(&long).len(), MAX_STEM_BYTES);

        let cjk = sanitize_filename(&"影".repeat(200));
        assert!(cjk.len() <= MAX_STEM_BYTES);
        assert_eq!(cjk.chars().count(), 66);
        assert!(format!("{cjk}.webm").len() <= 255);

        let emoji = sanitize_filename(&"😀".repeat(200));
        assert!(emoji.len() <= MAX_STEM_BYTES);
        assert!(format!("{emoji}.webm").encode_utf16().count() <= 255);
    }

    #[test]
    fn test_sanitize_trims_after_truncating() {
        let dotted = format!("{}.tail", "x".repeat(MAX_STEM_BYTES - 1));
        assert_eq!(sanitize_filename(&dotted), "x".repeat(MAX_STEM_BYTES - 1));

        let spaced = format!("{} tail", "x".repeat(MAX_STEM_BYTES - 1));
        assert_eq!(sanitize_filename(&spaced), "x".repeat(MAX_STEM_BYTES - 1));
    }

    #[test]
    fn test_sanitize_reserved_device_names() {
        assert_eq!(sanitize_filename("CON"), "_CON");
        assert_eq!(sanitize_filename("nul"), "_nul");
        assert_eq!(sanitize_filename("Com1.live"), "_Com1.live");
        assert_eq!(sanitize_filename("LPT1 "), "_LPT1");
        assert_eq!(sanitize_filename("CONCERT"), "CONCERT");
        assert_eq!(sanitize_filename("COM10"), "COM10");
        assert_eq!(output_stem(&Item::resolved("u", "AUX", true)), "_AUX");
    }

    #[test]
    fn test_output_stem() {
        assert_eq!(output_stem(&Item::placeholder("u", "Single video")), TITLE_FIELD);
        assert_eq!(output_stem(&Item::resolved("u", "...", true)), TITLE_FIELD);
        assert_eq!(output_stem(&Item::resolved("u", "   ", true)), TITLE_FIELD);
        assert_eq!(output_stem(&Item::resolved("u", "100% Live: Tour", true)), "100%% Live_ Tour");
    }

    #[test]
    fn test_classify_link() {
        assert_eq!(classify_link("   "), Err(AppError::InvalidInput));
        assert_eq!(
            classify_link(" https://www.youtube.com/watch?v=abc "),
            Ok(LinkKind::Single("https://www.youtube.com/watch?v=abc".into()))
        );
        assert_eq!(
            classify_link("https://www.youtube.com/playlist?list=PL123"),
            Ok(LinkKind::Playlist("https://www.youtube.com/playlist?list=PL123".into()))
        );
        assert_eq!(
            classify_link("youtube.com/watch?v=x&list=PL1"),
            Ok(LinkKind::Playlist("youtube.com/watch?v=x&list=PL1".into()))
        );
    }
}
