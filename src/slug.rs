//! Slug derivation and collision-free reservation.
//!
//! A slug is the filesystem- and URL-safe name of a day document: derived
//! from the title, lowercase, ASCII-only, `-`-separated, length-capped.
//! Uniqueness is handled by [`SlugRegistry`], an explicit reservation set
//! seeded from any pre-existing documents in the output directory — not a
//! process-wide singleton, so the aggregation pass stays testable in
//! isolation.

use std::collections::HashSet;
use std::path::Path;

use crate::error::Result;

const MAX_SLUG_LEN: usize = 80;

/// Derives a slug from a title.
///
/// Runs of non-alphanumeric characters collapse into single `-` separators;
/// the result is capped at 80 bytes without cutting through a word. Titles
/// with no ASCII-alphanumeric content at all produce `"post"`.
pub fn slugify(title: &str) -> String {
    let mut slug = String::new();
    let mut pending_sep = false;

    for c in title.chars() {
        if c.is_ascii_alphanumeric() {
            if pending_sep && !slug.is_empty() {
                if slug.len() + 1 >= MAX_SLUG_LEN {
                    break;
                }
                slug.push('-');
            }
            pending_sep = false;
            if slug.len() >= MAX_SLUG_LEN {
                break;
            }
            slug.push(c.to_ascii_lowercase());
        } else {
            pending_sep = true;
        }
    }

    if slug.is_empty() {
        "post".to_string()
    } else {
        slug
    }
}

/// Reservation set for slugs assigned during a run.
///
/// Collisions — against buckets already named in this run or against
/// pre-existing documents — are resolved by appending `-2`, `-3`, … and
/// every assigned name is reserved immediately.
#[derive(Debug, Default)]
pub struct SlugRegistry {
    used: HashSet<String>,
}

impl SlugRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Reserves the stems of all `.md` files already present in `dir`.
    ///
    /// A missing directory reserves nothing (the first run creates it).
    pub fn seed_from_dir(&mut self, dir: &Path) -> Result<()> {
        if !dir.is_dir() {
            return Ok(());
        }
        for entry in dir.read_dir()? {
            let path = entry?.path();
            if path.extension().is_some_and(|ext| ext == "md") {
                if let Some(stem) = path.file_stem().and_then(|s| s.to_str()) {
                    self.used.insert(stem.to_string());
                }
            }
        }
        Ok(())
    }

    /// Returns `true` if `slug` has been reserved.
    pub fn is_reserved(&self, slug: &str) -> bool {
        self.used.contains(slug)
    }

    /// Reserves `base` or its first free `-N` variant (N starting at 2).
    pub fn reserve(&mut self, base: &str) -> String {
        let mut candidate = base.to_string();
        let mut n = 2;
        while self.used.contains(&candidate) {
            candidate = format!("{base}-{n}");
            n += 1;
        }
        self.used.insert(candidate.clone());
        candidate
    }
}
