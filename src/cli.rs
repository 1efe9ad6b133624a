//! Command-line interface definition using clap.
//!
//! This module defines:
//! - [`Args`] - CLI argument structure (for use with clap)
//! - [`Placement`] - image placement options as a clap value enum
//!
//! The placement enum mirrors [`crate::config::ImagePlacement`]; the clap
//! wrapper exists so the library type stays free of CLI derive macros.

use std::str::FromStr;

use clap::{Parser, ValueEnum};
use chrono_tz::Tz;

use crate::config::{ConvertConfig, ImagePlacement};
use crate::error::{Result, TelepressError};

/// Convert an archived Telegram channel into Hugo-ready day documents.
#[derive(Parser, Debug, Clone)]
#[command(name = "telepress")]
#[command(version, about, long_about = None)]
#[command(after_help = "EXAMPLES:
    telepress
    telepress --ndjson archive/messages.ndjson --out site/content/blog
    telepress --tz Europe/Berlin --image-placement top
    telepress --dry-run --skip-empty
    telepress --source-link --append-id")]
pub struct Args {
    /// Path to the archived NDJSON message file
    #[arg(long, default_value = "tg_export/messages.ndjson")]
    pub ndjson: String,

    /// Directory for generated documents
    #[arg(long, default_value = "site/content/blog")]
    pub out: String,

    /// Directory media files are copied into
    #[arg(long = "static", default_value = "site/static/images")]
    pub static_dir: String,

    /// Display time zone (IANA name) for day grouping and timestamps
    #[arg(long, default_value = "Europe/Amsterdam", value_name = "ZONE")]
    pub tz: String,

    /// Where image links are placed in the body
    #[arg(long, value_enum, default_value = "bottom")]
    pub image_placement: Placement,

    /// Append a `Source: <url>` trailer to each post
    #[arg(long)]
    pub source_link: bool,

    /// Only accept `Title — Author` shapes when extracting titles
    #[arg(long)]
    pub strict_title: bool,

    /// Report what would be written without writing documents
    #[arg(long)]
    pub dry_run: bool,

    /// Skip days that produce neither text nor inline images
    #[arg(long)]
    pub skip_empty: bool,

    /// Append `-tg<first id>` to each document slug
    #[arg(long)]
    pub append_id: bool,

    /// Overwrite pre-existing documents instead of renaming around them
    #[arg(long)]
    pub overwrite: bool,
}

impl Args {
    /// Builds the library configuration from parsed arguments.
    ///
    /// Fails on an unknown time-zone name.
    pub fn to_config(&self) -> Result<ConvertConfig> {
        let tz =
            Tz::from_str(&self.tz).map_err(|_| TelepressError::invalid_time_zone(&self.tz))?;

        Ok(ConvertConfig::new()
            .with_out_dir(&self.out)
            .with_media_dir(&self.static_dir)
            .with_time_zone(tz)
            .with_image_placement(self.image_placement.into())
            .with_source_link(self.source_link)
            .with_strict_title(self.strict_title)
            .with_dry_run(self.dry_run)
            .with_skip_empty(self.skip_empty)
            .with_append_id(self.append_id)
            .with_overwrite(self.overwrite))
    }
}

/// Image placement options.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, ValueEnum)]
pub enum Placement {
    /// Images immediately after the front matter
    Top,

    /// Images after the text body
    #[default]
    Bottom,

    /// Copy images but do not link them into the body
    None,
}

impl From<Placement> for ImagePlacement {
    fn from(value: Placement) -> Self {
        match value {
            Placement::Top => ImagePlacement::Top,
            Placement::Bottom => ImagePlacement::Bottom,
            Placement::None => ImagePlacement::None,
        }
    }
}

impl std::fmt::Display for Placement {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        ImagePlacement::from(*self).fmt(f)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let args = Args::parse_from(["telepress"]);
        assert_eq!(args.ndjson, "tg_export/messages.ndjson");
        assert_eq!(args.tz, "Europe/Amsterdam");
        assert_eq!(args.image_placement, Placement::Bottom);
        assert!(!args.dry_run);
    }

    #[test]
    fn test_to_config() {
        let args = Args::parse_from([
            "telepress",
            "--tz",
            "Europe/Berlin",
            "--image-placement",
            "top",
            "--dry-run",
            "--append-id",
        ]);
        let config = args.to_config().unwrap();
        assert_eq!(config.time_zone, chrono_tz::Europe::Berlin);
        assert_eq!(config.image_placement, ImagePlacement::Top);
        assert!(config.dry_run);
        assert!(config.append_id);
    }

    #[test]
    fn test_bad_time_zone_is_error() {
        let args = Args::parse_from(["telepress", "--tz", "Mars/Olympus"]);
        let err = args.to_config().unwrap_err();
        assert!(err.to_string().contains("Mars/Olympus"));
    }

    #[test]
    fn test_placement_conversion() {
        assert_eq!(ImagePlacement::from(Placement::None), ImagePlacement::None);
        assert_eq!(Placement::Top.to_string(), "top");
    }
}
