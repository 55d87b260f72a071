//! Export filename derivation.
//!
//! Turns selected quotes into the `ExportRecord` batch shared by the save and
//! download endpoints. Every function here is pure.

use super::models::{ExportRecord, QuoteItem};

/// Audio extension served by the catalog.
const AUDIO_EXTENSION: &str = ".ogg";

/// Filename used when the URL has no `.ogg` segment.
const FALLBACK_FILENAME: &str = "audio.ogg";

/// Extension of the files the backend produces.
const OUTPUT_EXTENSION: &str = ".mp3";

/// Default character budget for a quote suffix.
pub const DEFAULT_SUFFIX_LENGTH: usize = 50;

/// Characters that are not allowed in filenames on common filesystems.
const HOSTILE_CHARS: &[char] = &['<', '>', ':', '"', '/', '\\', '|', '?', '*'];

/// Straight and curly apostrophes.
const APOSTROPHES: &[char] = &['\'', '\u{2018}', '\u{2019}'];

/// Trailing punctuation stripped from quote suffixes.
const TRAILING_PUNCTUATION: &[char] = &['.', ',', '!', ';', ':'];

/// Returns the `/`-separated segment of `audio_url` that ends in `.ogg`.
#[must_use]
pub fn extract_filename(audio_url: &str) -> &str {
    audio_url
        .split('/')
        .find(|part| part.ends_with(AUDIO_EXTENSION))
        .unwrap_or(FALLBACK_FILENAME)
}

/// Replaces filesystem-hostile characters with `_`.
#[must_use]
pub fn sanitize_filename(name: &str) -> String {
    name.chars()
        .map(|c| if HOSTILE_CHARS.contains(&c) { '_' } else { c })
        .collect()
}

/// Normalizes quote text into a filename-safe suffix of at most `max_length` chars.
///
/// Texts over budget are cut at the last space when that space lies beyond
/// 60% of the budget; otherwise the hard character cut is kept.
#[must_use]
pub fn create_quote_suffix(text: Option<&str>, max_length: usize) -> String {
    let Some(text) = text.filter(|t| !t.is_empty()) else {
        return String::new();
    };

    let stripped: String = text
        .chars()
        .filter(|c| !HOSTILE_CHARS.contains(c) && !APOSTROPHES.contains(c))
        .collect();
    let sanitized = stripped.trim_end_matches(TRAILING_PUNCTUATION).trim();

    if sanitized.chars().count() <= max_length {
        return sanitized.to_string();
    }

    let truncated: Vec<char> = sanitized.chars().take(max_length).collect();

    // last_space > 0.6 * max_length, in integers.
    match truncated.iter().rposition(|c| *c == ' ') {
        Some(last_space) if last_space * 5 > max_length * 3 => {
            truncated[..last_space].iter().collect()
        }
        _ => truncated.into_iter().collect(),
    }
}

/// Builds the export record for one selected quote.
#[must_use]
pub fn build_export_record(item: &QuoteItem) -> ExportRecord {
    let source = extract_filename(&item.quote.audio_url);
    let base_name = sanitize_filename(source.strip_suffix(AUDIO_EXTENSION).unwrap_or(source));
    let suffix = create_quote_suffix(item.quote.text.as_deref(), DEFAULT_SUFFIX_LENGTH);

    let filename = if suffix.is_empty() {
        format!("{base_name}{OUTPUT_EXTENSION}")
    } else {
        format!("{base_name} - {suffix}{OUTPUT_EXTENSION}")
    };

    ExportRecord {
        audio_url: item.quote.audio_url.clone(),
        filename,
        unit_name: sanitize_filename(&item.unit_name),
        category_name: sanitize_filename(&item.category_name),
    }
}

/// Builds the payload shared by save-to-sounds and batch download.
#[must_use]
pub fn prepare_export(items: &[QuoteItem]) -> Vec<ExportRecord> {
    items.iter().map(build_export_record).collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::Quote;

    fn item(url: &str, text: Option<&str>) -> QuoteItem {
        QuoteItem::new(
            Quote {
                audio_url: url.into(),
                text: text.map(String::from),
            },
            "Marine",
            "What",
        )
    }

    #[test]
    fn test_extract_filename() {
        assert_eq!(extract_filename("https://host/path/voice.ogg"), "voice.ogg");
        assert_eq!(extract_filename("https://host/path/noextension"), "audio.ogg");
        assert_eq!(extract_filename("local/dir/clip.ogg"), "clip.ogg");
        assert_eq!(extract_filename(""), "audio.ogg");
    }

    #[test]
    fn test_sanitize_filename_replaces_hostile_chars() {
        assert_eq!(sanitize_filename(r#"a<b>c:d"e/f\g|h?i*j"#), "a_b_c_d_e_f_g_h_i_j");
        assert_eq!(sanitize_filename("SCV"), "SCV");
    }

    #[test]
    fn test_sanitize_filename_is_idempotent() {
        for s in ["", "plain", "a/b", r#"<>:"/\|?*"#, "Zerg: rush?", "über/größe"] {
            let once = sanitize_filename(s);
            assert_eq!(sanitize_filename(&once), once);
        }
    }

    #[test]
    fn test_quote_suffix_empty() {
        assert_eq!(create_quote_suffix(Some(""), 50), "");
        assert_eq!(create_quote_suffix(None, 50), "");
    }

    #[test]
    fn test_quote_suffix_strips_trailing_punctuation() {
        assert_eq!(create_quote_suffix(Some("Attack!!!"), 50), "Attack");
        assert_eq!(create_quote_suffix(Some("Yes, sir..."), 50), "Yes, sir");
    }

    #[test]
    fn test_quote_suffix_strips_hostile_and_apostrophes() {
        assert_eq!(
            create_quote_suffix(Some("You\u{2019}re \"it\": go?"), 50),
            "Youre it go"
        );
        assert_eq!(create_quote_suffix(Some("Can't stop"), 50), "Cant stop");
    }

    #[test]
    fn test_quote_suffix_hard_cut_single_token() {
        let text = "a".repeat(100);
        assert_eq!(create_quote_suffix(Some(&text), 50), "a".repeat(50));
    }

    #[test]
    fn test_quote_suffix_cuts_at_word_boundary() {
        // 40 chars, a space at index 40, then more words.
        let text = format!("{} {}", "b".repeat(40), "c".repeat(30));
        let suffix = create_quote_suffix(Some(&text), 50);
        assert_eq!(suffix, "b".repeat(40));
    }

    #[test]
    fn test_quote_suffix_keeps_hard_cut_when_space_too_early() {
        // Last space at index 10, below the 30-char threshold.
        let text = format!("{} {}", "d".repeat(10), "e".repeat(60));
        let suffix = create_quote_suffix(Some(&text), 50);
        assert_eq!(suffix.chars().count(), 50);
        assert!(suffix.starts_with(&"d".repeat(10)));
    }

    #[test]
    fn test_export_record_with_suffix() {
        let record = build_export_record(&item(
            "https://host/path/voice.ogg",
            Some("Zerg rush incoming!"),
        ));
        assert_eq!(record.filename, "voice - Zerg rush incoming.mp3");
        assert_eq!(record.audio_url, "https://host/path/voice.ogg");
    }

    #[test]
    fn test_export_record_without_suffix() {
        let record = build_export_record(&item("https://host/path/voice.ogg", None));
        assert_eq!(record.filename, "voice.mp3");

        let record = build_export_record(&item("https://host/noext", Some("...")));
        assert_eq!(record.filename, "audio.mp3");
    }

    #[test]
    fn test_export_record_sanitizes_names() {
        let mut it = item("https://host/v.ogg", Some("Hi"));
        it.unit_name = "Marine/Marauder".into();
        it.category_name = "Pissed?".into();

        let record = build_export_record(&it);
        assert_eq!(record.unit_name, "Marine_Marauder");
        assert_eq!(record.category_name, "Pissed_");
    }

    #[test]
    fn test_filenames_never_contain_hostile_chars() {
        let texts = [
            Some(r#"What? <now> "go" / \ | *"#),
            Some("::::"),
            None,
            Some("Normal line."),
        ];
        for text in texts {
            let record = build_export_record(&item("https://h/x/y:z.ogg", text));
            assert!(!record.filename.is_empty());
            assert!(!record.filename.contains(HOSTILE_CHARS));
        }
    }

    #[test]
    fn test_prepare_export_preserves_order() {
        let items = vec![
            item("https://h/a.ogg", Some("One")),
            item("https://h/b.ogg", Some("Two")),
        ];
        let records = prepare_export(&items);
        assert_eq!(records.len(), 2);
        assert_eq!(records[0].filename, "a - One.mp3");
        assert_eq!(records[1].filename, "b - Two.mp3");
    }
}
