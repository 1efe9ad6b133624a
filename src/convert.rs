//! End-to-end conversion: ingestion output in, site documents out.

use std::fs;
use std::path::Path;

use crate::assemble::{RunSummary, assemble};
use crate::bucket::plan_days;
use crate::config::ConvertConfig;
use crate::diagnostics::Diagnostics;
use crate::error::Result;
use crate::message::Message;
use crate::slug::SlugRegistry;

/// Runs both pipeline passes over an already-ingested archive.
///
/// `media_base` is the directory the posts' relative media paths resolve
/// against (typically the archive directory next to the NDJSON file).
/// Unless overwriting is enabled, document names already present in the
/// output directory are reserved away so reruns never clobber earlier
/// output.
pub fn convert(
    messages: Vec<Message>,
    media_base: &Path,
    config: &ConvertConfig,
    diagnostics: &mut Diagnostics,
) -> Result<RunSummary> {
    if !config.dry_run {
        fs::create_dir_all(&config.out_dir)?;
        fs::create_dir_all(&config.media_dir)?;
    }

    let mut registry = SlugRegistry::new();
    if !config.overwrite {
        registry.seed_from_dir(&config.out_dir)?;
    }

    let plan = plan_days(messages, config, &mut registry, diagnostics);
    assemble(&plan, media_base, config, diagnostics)
}
