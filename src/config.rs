//! Conversion configuration.
//!
//! [`ConvertConfig`] carries every knob of a run, with defaults matching a
//! conventional Hugo layout (`site/content/blog` + `site/static/images`).
//! Builder methods follow the `with_*` naming used across the crate.
//!
//! # Example
//!
//! ```
//! use telepress::config::{ConvertConfig, ImagePlacement};
//!
//! let config = ConvertConfig::new()
//!     .with_time_zone(chrono_tz::Europe::Berlin)
//!     .with_image_placement(ImagePlacement::Top)
//!     .with_dry_run(true);
//!
//! assert!(config.dry_run);
//! ```

use std::path::PathBuf;

use chrono_tz::Tz;
use serde::{Deserialize, Serialize};

/// Where image links are inserted relative to the text body.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ImagePlacement {
    /// Images immediately after the front matter.
    Top,

    /// Images after the text body (default).
    #[default]
    Bottom,

    /// Images copied but not linked into the body.
    None,
}

impl ImagePlacement {
    /// Returns all supported placement names.
    pub fn all_names() -> &'static [&'static str] {
        &["top", "bottom", "none"]
    }
}

impl std::fmt::Display for ImagePlacement {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ImagePlacement::Top => write!(f, "top"),
            ImagePlacement::Bottom => write!(f, "bottom"),
            ImagePlacement::None => write!(f, "none"),
        }
    }
}

impl std::str::FromStr for ImagePlacement {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "top" => Ok(ImagePlacement::Top),
            "bottom" => Ok(ImagePlacement::Bottom),
            "none" => Ok(ImagePlacement::None),
            _ => Err(format!(
                "Unknown placement: '{}'. Expected one of: {}",
                s,
                ImagePlacement::all_names().join(", ")
            )),
        }
    }
}

/// Settings for one conversion run.
#[derive(Debug, Clone)]
pub struct ConvertConfig {
    /// Directory for generated documents.
    pub out_dir: PathBuf,

    /// Directory media files are copied into.
    pub media_dir: PathBuf,

    /// Site-relative URL prefix for copied images.
    pub image_url_prefix: String,

    /// Prefix of destination references handed to `relref` (the content
    /// subdirectory documents land in).
    pub relref_prefix: String,

    /// Display time zone for day keys and front-matter timestamps.
    pub time_zone: Tz,

    /// Where image links go in the body.
    pub image_placement: ImagePlacement,

    /// Append a `Source: <url>` trailer per post.
    pub source_link: bool,

    /// Only accept `Title — Author` shapes when extracting titles.
    pub strict_title: bool,

    /// Report what would be written without writing documents.
    pub dry_run: bool,

    /// Skip buckets that produce neither text nor inline images.
    pub skip_empty: bool,

    /// Append `-tg<first id>` to each bucket's slug.
    pub append_id: bool,

    /// Allow overwriting pre-existing documents instead of reserving their
    /// names away.
    pub overwrite: bool,
}

impl Default for ConvertConfig {
    fn default() -> Self {
        Self {
            out_dir: PathBuf::from("site/content/blog"),
            media_dir: PathBuf::from("site/static/images"),
            image_url_prefix: "/images".to_string(),
            relref_prefix: "blog".to_string(),
            time_zone: chrono_tz::Europe::Amsterdam,
            image_placement: ImagePlacement::default(),
            source_link: false,
            strict_title: false,
            dry_run: false,
            skip_empty: false,
            append_id: false,
            overwrite: false,
        }
    }
}

impl ConvertConfig {
    /// Creates a configuration with default values.
    pub fn new() -> Self {
        Self::default()
    }

    #[must_use]
    pub fn with_out_dir(mut self, dir: impl Into<PathBuf>) -> Self {
        self.out_dir = dir.into();
        self
    }

    #[must_use]
    pub fn with_media_dir(mut self, dir: impl Into<PathBuf>) -> Self {
        self.media_dir = dir.into();
        self
    }

    #[must_use]
    pub fn with_image_url_prefix(mut self, prefix: impl Into<String>) -> Self {
        self.image_url_prefix = prefix.into();
        self
    }

    #[must_use]
    pub fn with_relref_prefix(mut self, prefix: impl Into<String>) -> Self {
        self.relref_prefix = prefix.into();
        self
    }

    #[must_use]
    pub fn with_time_zone(mut self, tz: Tz) -> Self {
        self.time_zone = tz;
        self
    }

    #[must_use]
    pub fn with_image_placement(mut self, placement: ImagePlacement) -> Self {
        self.image_placement = placement;
        self
    }

    #[must_use]
    pub fn with_source_link(mut self, enabled: bool) -> Self {
        self.source_link = enabled;
        self
    }

    #[must_use]
    pub fn with_strict_title(mut self, enabled: bool) -> Self {
        self.strict_title = enabled;
        self
    }

    #[must_use]
    pub fn with_dry_run(mut self, enabled: bool) -> Self {
        self.dry_run = enabled;
        self
    }

    #[must_use]
    pub fn with_skip_empty(mut self, enabled: bool) -> Self {
        self.skip_empty = enabled;
        self
    }

    #[must_use]
    pub fn with_append_id(mut self, enabled: bool) -> Self {
        self.append_id = enabled;
        self
    }

    #[must_use]
    pub fn with_overwrite(mut self, enabled: bool) -> Self {
        self.overwrite = enabled;
        self
    }

    /// Destination reference string for a bucket slug, as handed to relref.
    pub fn reference_for(&self, slug: &str) -> String {
        format!("{}/{slug}.md", self.relref_prefix)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::str::FromStr;

    #[test]
    fn test_defaults() {
        let config = ConvertConfig::new();
        assert_eq!(config.out_dir, PathBuf::from("site/content/blog"));
        assert_eq!(config.time_zone, chrono_tz::Europe::Amsterdam);
        assert_eq!(config.image_placement, ImagePlacement::Bottom);
        assert!(!config.dry_run);
    }

    #[test]
    fn test_builder_chain() {
        let config = ConvertConfig::new()
            .with_out_dir("content/posts")
            .with_relref_prefix("posts")
            .with_strict_title(true)
            .with_overwrite(true);
        assert_eq!(config.reference_for("a-day"), "posts/a-day.md");
        assert!(config.strict_title);
        assert!(config.overwrite);
    }

    #[test]
    fn test_placement_from_str() {
        assert_eq!(
            ImagePlacement::from_str("top").unwrap(),
            ImagePlacement::Top
        );
        assert_eq!(
            ImagePlacement::from_str("NONE").unwrap(),
            ImagePlacement::None
        );
        assert!(ImagePlacement::from_str("sideways").is_err());
    }

    #[test]
    fn test_placement_display_roundtrip() {
        for name in ImagePlacement::all_names() {
            let placement = ImagePlacement::from_str(name).unwrap();
            assert_eq!(placement.to_string(), *name);
        }
    }
}
