//! # Telepress
//!
//! A Rust library for converting an archived Telegram channel into a
//! Hugo-ready static site.
//!
//! ## Overview
//!
//! Telepress reads the NDJSON archive produced by a channel-archiving step
//! (one JSON record per post, with UTF-16 annotation offsets and relative
//! media paths) and turns it into one Markdown document per calendar day:
//!
//! - posts are grouped by local calendar day in a configurable time zone;
//! - Telegram's offset-based annotations are reconstructed into Markdown;
//! - internal `t.me` post links are rewritten into Hugo `relref` links,
//!   resolved against a map covering the whole run;
//! - titles and collision-free slugs are derived per day;
//! - media is copied into the site tree and linked into the body.
//!
//! ## Quick Start
//!
//! ```rust,no_run
//! use std::path::Path;
//!
//! use telepress::config::ConvertConfig;
//! use telepress::convert::convert;
//! use telepress::diagnostics::Diagnostics;
//! use telepress::ndjson::read_messages;
//! use telepress::prelude::*;
//!
//! fn main() -> Result<()> {
//!     let archive = Path::new("tg_export/messages.ndjson");
//!     let messages = read_messages(archive)?;
//!
//!     let config = ConvertConfig::new().with_time_zone(chrono_tz::Europe::Berlin);
//!     let mut diagnostics = Diagnostics::new();
//!     let summary = convert(messages, Path::new("tg_export"), &config, &mut diagnostics)?;
//!
//!     println!("{} documents written", summary.written);
//!     Ok(())
//! }
//! ```
//!
//! ## Module Structure
//!
//! - [`ndjson`] — archive ingestion ([`read_messages`](ndjson::read_messages))
//! - [`message`] — archived post model ([`Message`], [`message::Entity`])
//! - [`markup`] — UTF-16 annotation reconstruction ([`markup::reconstruct`])
//! - [`links`] — internal link rewriting ([`links::rewrite`], [`links::IdentifierMap`])
//! - [`title`] / [`slug`] — naming ([`title::extract_title`], [`slug::SlugRegistry`])
//! - [`bucket`] — day aggregation, pass 1 ([`bucket::plan_days`])
//! - [`media`] — media copying ([`media::copy_media`])
//! - [`assemble`] — document assembly, pass 2 ([`assemble::assemble`])
//! - [`convert`] — end-to-end pipeline ([`convert::convert`])
//! - [`config`] — run configuration ([`config::ConvertConfig`])
//! - [`diagnostics`] — skip-and-continue reporting ([`diagnostics::Diagnostics`])
//! - [`cli`] — CLI types (behind the `cli` feature)
//! - [`error`] — unified error types ([`TelepressError`], [`Result`])
//! - [`prelude`] — convenient re-exports

pub mod assemble;
pub mod bucket;
#[cfg(feature = "cli")]
pub mod cli;
pub mod config;
pub mod convert;
pub mod diagnostics;
pub mod error;
pub mod links;
pub mod markup;
pub mod media;
pub mod message;
pub mod ndjson;
pub mod slug;
pub mod title;

// Re-export the main types at the crate root for convenience
pub use error::{Result, TelepressError};
pub use message::Message;

/// Convenient re-exports for common usage.
///
/// Import everything you need with a single line:
///
/// ```rust
/// use telepress::prelude::*;
/// ```
pub mod prelude {
    // Core message type
    pub use crate::Message;

    // Error types
    pub use crate::error::{Result, TelepressError};

    // Pipeline entry points
    pub use crate::convert::convert;
    pub use crate::ndjson::read_messages;

    // Run configuration and reporting
    pub use crate::assemble::RunSummary;
    pub use crate::config::{ConvertConfig, ImagePlacement};
    pub use crate::diagnostics::{DiagnosticKind, Diagnostics};
}
