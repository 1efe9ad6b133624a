//! Title derivation for day documents.
//!
//! A bucket's title comes from the first non-empty line of the first
//! text-bearing post. Channel posts decorate titles heavily with
//! pictographs, so those are stripped (together with stray variation
//! selectors and zero-width joiners) before the title reaches front matter
//! or the slugifier.
//!
//! Extraction knows two modes:
//!
//! - **strict** — only the `«Title» — Author` / `Title — Author` shapes
//!   count; anything else yields `None` and the caller falls back to a
//!   synthetic title.
//! - **lenient** — the quoted-only shape also counts, and as a last resort
//!   the first line itself is used, capped at 140 characters.

use std::sync::LazyLock;

use regex::Regex;

/// Pictographic blocks: flags, symbols, emoticons, transport, dingbats and
/// the miscellaneous-symbols ranges, plus variation selectors and ZWJ.
static PICTOGRAPHS_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(concat!(
        "[",
        "\u{1F1E6}-\u{1F1FF}",
        "\u{1F300}-\u{1F5FF}",
        "\u{1F600}-\u{1F64F}",
        "\u{1F680}-\u{1F6FF}",
        "\u{1F700}-\u{1F77F}",
        "\u{1F780}-\u{1F7FF}",
        "\u{1F800}-\u{1F8FF}",
        "\u{1F900}-\u{1F9FF}",
        "\u{1FA00}-\u{1FA6F}",
        "\u{1FA70}-\u{1FAFF}",
        "\u{2700}-\u{27BF}",
        "\u{2600}-\u{26FF}",
        "\u{FE0E}\u{FE0F}\u{200D}",
        "]+",
    ))
    .unwrap()
});

static MULTI_SPACE_RE: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"\s{2,}").unwrap());

/// `«Title» — Author`
static QUOTED_DASHED_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r#"^["“«](.+?)["”»]\s*[-—:]\s*(.+)$"#).unwrap());

/// `Title — Author`
static DASHED_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^(.+?)\s*[-—:]\s*(.+)$").unwrap());

/// `«Title»`
static QUOTED_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r#"^["“«](.+?)["”»]\s*$"#).unwrap());

const LENIENT_TITLE_CAP: usize = 140;

/// Returns the first line with any non-whitespace content, trimmed.
pub fn first_nonempty_line(text: &str) -> &str {
    text.lines()
        .map(str::trim)
        .find(|line| !line.is_empty())
        .unwrap_or("")
}

/// Strips pictographs and lone modifiers, then collapses whitespace.
pub fn strip_decorations(s: &str) -> String {
    let stripped = PICTOGRAPHS_RE.replace_all(s, "");
    MULTI_SPACE_RE.replace_all(&stripped, " ").trim().to_string()
}

/// Extracts a title from reconstructed body text.
///
/// Returns `None` when there is no usable line, or in strict mode when the
/// line does not match a title-author shape.
pub fn extract_title(text: &str, strict: bool) -> Option<String> {
    let line = first_nonempty_line(text);
    if line.is_empty() {
        return None;
    }

    for pattern in [&*QUOTED_DASHED_RE, &*DASHED_RE] {
        if let Some(caps) = pattern.captures(line) {
            return Some(format!("{} — {}", caps[1].trim(), caps[2].trim()));
        }
    }
    if strict {
        return None;
    }
    if let Some(caps) = QUOTED_RE.captures(line) {
        return Some(caps[1].trim().to_string());
    }

    // Last resort: the line itself, capped.
    let capped: String = line.chars().take(LENIENT_TITLE_CAP).collect();
    Some(capped.trim().to_string())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_first_nonempty_line() {
        assert_eq!(first_nonempty_line("\n\n  \n  hello \nworld"), "hello");
        assert_eq!(first_nonempty_line(""), "");
        assert_eq!(first_nonempty_line("   \n \t "), "");
    }

    #[test]
    fn test_strip_decorations() {
        assert_eq!(strip_decorations("🔥 New album 🎵"), "New album");
        assert_eq!(strip_decorations("plain title"), "plain title");
        assert_eq!(strip_decorations("a   b\t\tc"), "a b c");
        // variation selector and ZWJ leftovers
        assert_eq!(strip_decorations("star\u{FE0F} title\u{200D}"), "star title");
    }

    #[test]
    fn test_extract_quoted_dashed() {
        assert_eq!(
            extract_title("«Кино» — Виктор Цой\nrest", false),
            Some("Кино — Виктор Цой".to_string())
        );
        assert_eq!(
            extract_title("\"Album\" - Artist", true),
            Some("Album — Artist".to_string())
        );
    }

    #[test]
    fn test_extract_dashed() {
        assert_eq!(
            extract_title("Title — Author", true),
            Some("Title — Author".to_string())
        );
        assert_eq!(
            extract_title("Name: Value", false),
            Some("Name — Value".to_string())
        );
    }

    #[test]
    fn test_extract_quoted_only_lenient() {
        assert_eq!(extract_title("«Одно»", false), Some("Одно".to_string()));
        assert_eq!(extract_title("«Одно»", true), None);
    }

    #[test]
    fn test_lenient_fallback_caps_length() {
        let long = "x".repeat(300);
        let title = extract_title(&long, false).unwrap();
        assert_eq!(title.chars().count(), 140);
    }

    #[test]
    fn test_strict_rejects_plain_line() {
        assert_eq!(extract_title("just words here", true), None);
        assert_eq!(extract_title("", true), None);
        assert_eq!(extract_title("", false), None);
    }
}
