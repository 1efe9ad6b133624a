//! Media copying for day documents.
//!
//! Media referenced by a bucket's posts is copied into the site-wide media
//! directory under `<timestamp>-<slug>-<index><ext>` names, collision-
//! avoided with `-2`, `-3`, … suffixes so repeated runs never overwrite a
//! previous run's files. Only recognized image extensions produce a
//! site-relative link for body placement; other media is copied but not
//! linked inline.

use std::fs;
use std::path::{Path, PathBuf};

use chrono::DateTime;
use chrono_tz::Tz;

use crate::diagnostics::{DiagnosticKind, Diagnostics};
use crate::error::Result;

/// Extensions treated as displayable images.
const IMAGE_EXTS: [&str; 6] = ["jpg", "jpeg", "png", "webp", "gif", "bmp"];

/// Returns `true` if the path's extension marks a displayable image.
pub fn is_image(path: &Path) -> bool {
    path.extension()
        .and_then(|ext| ext.to_str())
        .is_some_and(|ext| IMAGE_EXTS.contains(&ext.to_ascii_lowercase().as_str()))
}

/// Returns `path` if free, otherwise the first `<stem>-N<ext>` variant
/// that does not exist yet (N starting at 2).
pub fn ensure_unique_path(path: PathBuf) -> PathBuf {
    if !path.exists() {
        return path;
    }
    let stem = path
        .file_stem()
        .and_then(|s| s.to_str())
        .unwrap_or("file")
        .to_string();
    let ext = path
        .extension()
        .and_then(|s| s.to_str())
        .map(|e| format!(".{e}"))
        .unwrap_or_default();

    let mut n = 2;
    loop {
        let candidate = path.with_file_name(format!("{stem}-{n}{ext}"));
        if !candidate.exists() {
            return candidate;
        }
        n += 1;
    }
}

/// Copies `sources` into `media_dir` and returns site-relative links for
/// the image files among them.
///
/// Destination names embed the bucket timestamp and slug plus a 1-based
/// index. A source that does not exist is skipped with a diagnostic, not
/// an error.
pub fn copy_media(
    sources: &[PathBuf],
    media_dir: &Path,
    stamp: &DateTime<Tz>,
    slug: &str,
    image_url_prefix: &str,
    diagnostics: &mut Diagnostics,
) -> Result<Vec<String>> {
    if sources.is_empty() {
        return Ok(Vec::new());
    }
    fs::create_dir_all(media_dir)?;

    let prefix = stamp.format("%Y-%m-%d-%H-%M-%S").to_string();
    let mut links = Vec::new();

    for (index, source) in sources.iter().enumerate() {
        if !source.exists() {
            diagnostics.warn(
                DiagnosticKind::MediaNotFound,
                source.display().to_string(),
            );
            continue;
        }
        let ext = source
            .extension()
            .and_then(|s| s.to_str())
            .map(|e| format!(".{}", e.to_ascii_lowercase()))
            .unwrap_or_default();
        let name = format!("{prefix}-{slug}-{}{ext}", index + 1);
        let dest = ensure_unique_path(media_dir.join(name));

        fs::copy(source, &dest)?;

        if is_image(&dest) {
            if let Some(file_name) = dest.file_name().and_then(|n| n.to_str()) {
                links.push(format!("{image_url_prefix}/{file_name}"));
            }
        }
    }

    Ok(links)
}
