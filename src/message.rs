//! Archived channel post records.
//!
//! This module provides [`Message`], the normalized representation of one
//! archived channel post, together with its style annotations ([`Entity`])
//! and recovered link descriptors ([`ExternalLink`]). The ingestion layer
//! produces these records once (one JSON object per NDJSON line); the
//! conversion pipeline treats them as read-only from then on.
//!
//! # Overview
//!
//! A record consists of:
//! - **Required**: `id` and `raw_text` (possibly empty)
//! - **Optional**: `date_utc`, `link`, `entities`, `links`, `media_files`
//!
//! Entity `offset`/`length` values are expressed in UTF-16 code units, the
//! addressing unit of the origin service — see [`crate::markup`] for the
//! slicing rules.
//!
//! # Examples
//!
//! ```
//! use telepress::message::{Message, Entity, EntityKind};
//! use chrono::Utc;
//!
//! let msg = Message::new(42, "Hello, world!")
//!     .with_date(Utc::now())
//!     .with_entity(Entity::styled(EntityKind::Bold, 0, 5));
//!
//! assert!(msg.has_text());
//! assert_eq!(msg.entities.len(), 1);
//! ```

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// One archived channel post.
///
/// All optional collections default to empty so partially-populated records
/// from older archive runs still deserialize. Unknown fields in the
/// exchange format (view counts, forward flags, …) are ignored.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Message {
    /// Post identifier, unique within the source channel and monotonically
    /// assigned by the origin service.
    pub id: u64,

    /// UTC timestamp of the post. Records without one are dropped from
    /// aggregation with a diagnostic.
    #[serde(default)]
    pub date_utc: Option<DateTime<Utc>>,

    /// Canonical public URL of the post, when the channel has a username.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub link: Option<String>,

    /// Plain text of the post, as a sequence of code points.
    #[serde(default)]
    pub raw_text: String,

    /// Style and link annotations over `raw_text`, in UTF-16 code units.
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub entities: Vec<Entity>,

    /// Link descriptors recovered by the ingestion layer, including ones
    /// that never appear as literal text (inline keyboard buttons).
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub links: Vec<ExternalLink>,

    /// Relative paths of downloaded media files, resolved against the
    /// archive base directory.
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub media_files: Vec<String>,

    /// Whether the post carried media at the source, regardless of whether
    /// the ingestion layer downloaded it.
    #[serde(default)]
    pub has_media: bool,
}

impl Message {
    /// Creates a record with only id and text; everything else empty.
    pub fn new(id: u64, raw_text: impl Into<String>) -> Self {
        Self {
            id,
            date_utc: None,
            link: None,
            raw_text: raw_text.into(),
            entities: Vec::new(),
            links: Vec::new(),
            media_files: Vec::new(),
            has_media: false,
        }
    }

    /// Builder method to set the UTC timestamp.
    #[must_use]
    pub fn with_date(mut self, date: DateTime<Utc>) -> Self {
        self.date_utc = Some(date);
        self
    }

    /// Builder method to set the canonical post URL.
    #[must_use]
    pub fn with_link(mut self, link: impl Into<String>) -> Self {
        self.link = Some(link.into());
        self
    }

    /// Builder method to append an annotation.
    #[must_use]
    pub fn with_entity(mut self, entity: Entity) -> Self {
        self.entities.push(entity);
        self
    }

    /// Builder method to append a recovered link descriptor.
    #[must_use]
    pub fn with_external_link(mut self, link: ExternalLink) -> Self {
        self.links.push(link);
        self
    }

    /// Builder method to append a media file path.
    #[must_use]
    pub fn with_media_file(mut self, path: impl Into<String>) -> Self {
        self.media_files.push(path.into());
        self.has_media = true;
        self
    }

    /// Returns `true` if the post has any non-whitespace text.
    pub fn has_text(&self) -> bool {
        !self.raw_text.trim().is_empty()
    }
}

/// Annotation kinds understood by the reconstruction step.
///
/// The serialized names are the origin service's wire names. Kinds the
/// converter does not render (mentions, hashtags, custom emoji, …) collapse
/// into [`Other`](EntityKind::Other) and pass through without markup.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum EntityKind {
    /// A link whose visible label differs from its target URL.
    #[serde(rename = "MessageEntityTextUrl")]
    TextLink,

    /// A URL appearing literally in the text.
    #[serde(rename = "MessageEntityUrl")]
    BareLink,

    #[serde(rename = "MessageEntityBold")]
    Bold,

    #[serde(rename = "MessageEntityItalic")]
    Italic,

    #[serde(rename = "MessageEntityUnderline")]
    Underline,

    #[serde(rename = "MessageEntityStrike")]
    Strikethrough,

    #[serde(rename = "MessageEntitySpoiler")]
    Spoiler,

    #[serde(rename = "MessageEntityCode")]
    InlineCode,

    /// A fenced block, optionally tagged with a language.
    #[serde(rename = "MessageEntityPre")]
    CodeBlock,

    /// Any annotation kind the converter does not render.
    #[serde(other)]
    Other,
}

impl EntityKind {
    /// Returns `true` for kinds the reconstruction step renders.
    pub fn is_rendered(self) -> bool {
        self != EntityKind::Other
    }
}

/// A style or link annotation over a sub-range of a post's raw text.
///
/// `offset` and `length` count UTF-16 code units. Either may be absent in
/// malformed records; such entities are skipped with a diagnostic rather
/// than failing the whole reconstruction.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Entity {
    #[serde(rename = "type")]
    pub kind: EntityKind,

    #[serde(default)]
    pub offset: Option<u32>,

    #[serde(default)]
    pub length: Option<u32>,

    /// Target URL, for [`EntityKind::TextLink`].
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub url: Option<String>,

    /// Language tag, for [`EntityKind::CodeBlock`].
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub language: Option<String>,
}

impl Entity {
    /// Creates a styling annotation (no URL, no language).
    pub fn styled(kind: EntityKind, offset: u32, length: u32) -> Self {
        Self {
            kind,
            offset: Some(offset),
            length: Some(length),
            url: None,
            language: None,
        }
    }

    /// Creates a text-link annotation pointing at `url`.
    pub fn text_link(offset: u32, length: u32, url: impl Into<String>) -> Self {
        Self {
            kind: EntityKind::TextLink,
            offset: Some(offset),
            length: Some(length),
            url: Some(url.into()),
            language: None,
        }
    }

    /// Creates a fenced-block annotation with an optional language tag.
    pub fn code_block(offset: u32, length: u32, language: Option<String>) -> Self {
        Self {
            kind: EntityKind::CodeBlock,
            offset: Some(offset),
            length: Some(length),
            url: None,
            language,
        }
    }
}

/// A link recovered by the ingestion layer.
///
/// `source` distinguishes links found in entities from ones attached to
/// inline keyboard buttons; button links never occur as literal text, which
/// is why the "See also" fallback exists.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ExternalLink {
    pub url: String,

    /// Visible label, when one exists.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub text: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub offset: Option<u32>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub length: Option<u32>,

    /// `"entity"` or `"button"`.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub source: Option<String>,
}

impl ExternalLink {
    /// Creates a descriptor with only a URL.
    pub fn new(url: impl Into<String>) -> Self {
        Self {
            url: url.into(),
            text: None,
            offset: None,
            length: None,
            source: None,
        }
    }

    /// Creates a button-sourced descriptor.
    pub fn button(url: impl Into<String>) -> Self {
        Self {
            url: url.into(),
            text: None,
            offset: None,
            length: None,
            source: Some("button".to_string()),
        }
    }
}
