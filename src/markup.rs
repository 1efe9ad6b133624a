//! Markdown reconstruction from raw text and annotations.
//!
//! The origin service stores formatting out-of-band: a post is plain text
//! plus a list of annotations, each addressing a sub-range in **UTF-16 code
//! units**. Rust strings iterate over code points, so slicing by those
//! offsets directly would corrupt anything outside the Basic Multilingual
//! Plane (most emoji take two code units). All span arithmetic here happens
//! on a `Vec<u16>` buffer; the result is decoded back to a `String` once,
//! at the end.
//!
//! Replacement spans are applied in descending order of start offset, so a
//! splice never invalidates the offsets of spans not yet applied.
//!
//! # Example
//!
//! ```
//! use telepress::markup::reconstruct;
//! use telepress::message::{Entity, EntityKind};
//! use telepress::diagnostics::Diagnostics;
//!
//! let mut diags = Diagnostics::new();
//! let md = reconstruct("Hello world", &[Entity::styled(EntityKind::Bold, 0, 5)], &mut diags);
//! assert_eq!(md, "**Hello** world");
//! ```

use std::sync::LazyLock;

use regex::Regex;

use crate::diagnostics::{DiagnosticKind, Diagnostics};
use crate::message::{Entity, EntityKind};

/// `[label]()` with a blank target — produced by some archived posts;
/// pointed at `#` so the markdown stays valid.
static EMPTY_LINK_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"\[([^\]]*)\]\(\s*\)").unwrap());

/// One pending replacement, in UTF-16 code-unit coordinates.
struct Span {
    start: usize,
    end: usize,
    replacement: String,
}

/// Rebuilds marked-up text from raw text plus annotations.
///
/// Unrecognized annotation kinds pass through without markup. Annotations
/// with a missing offset/length, a zero length, or an out-of-range span are
/// skipped with a diagnostic. Overlapping spans are a defect in the source
/// data; the later (lower-start) span of an overlapping pair is skipped
/// loudly rather than splicing into already-replaced text.
pub fn reconstruct(raw_text: &str, entities: &[Entity], diagnostics: &mut Diagnostics) -> String {
    if raw_text.is_empty() || entities.is_empty() {
        return raw_text.to_string();
    }

    let mut units: Vec<u16> = raw_text.encode_utf16().collect();
    let mut spans = collect_spans(&units, entities, diagnostics);
    if spans.is_empty() {
        return raw_text.to_string();
    }

    // Descending by start; ties broken by end so the wider span goes first.
    spans.sort_by(|a, b| b.start.cmp(&a.start).then(b.end.cmp(&a.end)));

    // `floor` is the start of the last applied span. Anything reaching past
    // it overlaps text that has already been replaced.
    let mut floor = usize::MAX;
    for span in spans {
        if span.end > floor {
            diagnostics.warn(
                DiagnosticKind::OverlappingAnnotation,
                format!("span {}..{} overlaps an applied span", span.start, span.end),
            );
            continue;
        }
        floor = span.start;
        units.splice(span.start..span.end, span.replacement.encode_utf16());
    }

    String::from_utf16_lossy(&units)
}

/// Converts each renderable entity into a replacement span.
fn collect_spans(units: &[u16], entities: &[Entity], diagnostics: &mut Diagnostics) -> Vec<Span> {
    let mut spans = Vec::new();

    for entity in entities {
        if !entity.kind.is_rendered() {
            continue;
        }
        let (Some(offset), Some(length)) = (entity.offset, entity.length) else {
            diagnostics.warn(
                DiagnosticKind::InvalidAnnotation,
                format!("{:?} annotation without offset/length", entity.kind),
            );
            continue;
        };
        if length == 0 {
            continue;
        }
        let start = offset as usize;
        let end = start + length as usize;
        if end > units.len() {
            diagnostics.warn(
                DiagnosticKind::AnnotationOutOfRange,
                format!("span {start}..{end} exceeds text length {}", units.len()),
            );
            continue;
        }

        let content = String::from_utf16_lossy(&units[start..end]);
        let replacement = match entity.kind {
            EntityKind::TextLink => {
                let Some(url) = entity.url.as_deref() else {
                    diagnostics.warn(
                        DiagnosticKind::InvalidAnnotation,
                        "text-link annotation without a URL",
                    );
                    continue;
                };
                format!("[{}]({url})", escape_link_label(&content))
            }
            EntityKind::BareLink => format!("[{content}]({content})"),
            EntityKind::Bold => format!("**{content}**"),
            EntityKind::Italic => format!("*{content}*"),
            // No native markdown for these two; Hugo passes inline HTML through.
            EntityKind::Underline => format!("<u>{content}</u>"),
            EntityKind::Spoiler => format!("<span class=\"spoiler\">{content}</span>"),
            EntityKind::Strikethrough => format!("~~{content}~~"),
            EntityKind::InlineCode => format!("`{content}`"),
            EntityKind::CodeBlock => match entity.language.as_deref() {
                Some(lang) if !lang.is_empty() => format!("```{lang}\n{content}\n```"),
                _ => format!("```\n{content}\n```"),
            },
            EntityKind::Other => continue,
        };

        spans.push(Span {
            start,
            end,
            replacement,
        });
    }

    spans
}

/// Escapes square brackets so the label cannot terminate the link early.
fn escape_link_label(label: &str) -> String {
    label.replace('[', "\\[").replace(']', "\\]")
}

/// Normalizes reconstructed markdown for titling and assembly.
///
/// CRLF becomes LF, empty link targets become `#`, and the result is
/// trimmed with exactly one trailing newline.
pub fn normalize_markdown(md: &str) -> String {
    let md = md.replace("\r\n", "\n");
    let md = EMPTY_LINK_RE.replace_all(&md, "[$1](#)");
    format!("{}\n", md.trim())
}
