//! Document assembly — pass 2 of the pipeline.
//!
//! Runs strictly after [`crate::bucket::plan_days`] has completed: every
//! rewrite here reads the finished identifier map, never a partial one.
//! For each bucket, in ascending day order, the text-bearing posts are
//! reconstructed, rewritten and joined with horizontal rules; the bucket's
//! media is copied and image links placed per configuration; and the final
//! document (TOML front matter + body) is written under the bucket's slug.

use std::fs;
use std::path::{Path, PathBuf};

use crate::bucket::{DayBucket, DayPlan};
use crate::config::{ConvertConfig, ImagePlacement};
use crate::diagnostics::{DiagnosticKind, Diagnostics};
use crate::error::Result;
use crate::links::{append_see_also, missing_references, post_ids_from_links, rewrite};
use crate::markup::{normalize_markdown, reconstruct};
use crate::media::copy_media;
use crate::message::Message;

/// What happened to one bucket's document.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DocumentReport {
    /// Destination file name (`<slug>.md`).
    pub name: String,

    /// Size of the document that was (or would have been) written.
    pub bytes: usize,

    /// `false` in dry-run mode or when the bucket was skipped as empty.
    pub written: bool,
}

/// Per-run outcome: processed vs. written counts plus per-document reports,
/// so a partial run is observable rather than silent.
#[derive(Debug, Default)]
pub struct RunSummary {
    pub buckets: usize,
    pub written: usize,
    pub reports: Vec<DocumentReport>,
}

/// Assembles and writes every bucket of a completed plan.
///
/// `media_base` is the archive directory the posts' relative media paths
/// resolve against.
pub fn assemble(
    plan: &DayPlan,
    media_base: &Path,
    config: &ConvertConfig,
    diagnostics: &mut Diagnostics,
) -> Result<RunSummary> {
    let mut summary = RunSummary::default();

    for bucket in &plan.buckets {
        summary.buckets += 1;
        let report = assemble_bucket(bucket, plan, media_base, config, diagnostics)?;
        if report.written {
            summary.written += 1;
        }
        summary.reports.push(report);
    }

    Ok(summary)
}

fn assemble_bucket(
    bucket: &DayBucket,
    plan: &DayPlan,
    media_base: &Path,
    config: &ConvertConfig,
    diagnostics: &mut Diagnostics,
) -> Result<DocumentReport> {
    let body = render_body(&bucket.messages, plan, config, diagnostics);

    // Media is copied even in dry-run; only the document write is held back.
    let media_sources = collect_media(&bucket.messages, media_base);
    let image_links = copy_media(
        &media_sources,
        &config.media_dir,
        &bucket.date,
        &bucket.slug,
        &config.image_url_prefix,
        diagnostics,
    )?;

    let name = format!("{}.md", bucket.slug);

    if config.skip_empty && body.is_empty() && image_links.is_empty() {
        diagnostics.warn(DiagnosticKind::EmptyDocument, format!("skipped {name}"));
        return Ok(DocumentReport {
            name,
            bytes: 0,
            written: false,
        });
    }

    let content = compose_document(bucket, &body, &image_links, config);
    let bytes = content.len();

    if config.dry_run {
        return Ok(DocumentReport {
            name,
            bytes,
            written: false,
        });
    }

    fs::create_dir_all(&config.out_dir)?;
    fs::write(config.out_dir.join(&name), content)?;

    Ok(DocumentReport {
        name,
        bytes,
        written: true,
    })
}

/// Joins the bucket's post bodies with horizontal rules, rewriting internal
/// references against the completed map and appending per-post "See also"
/// fallbacks and source trailers.
fn render_body(
    messages: &[Message],
    plan: &DayPlan,
    config: &ConvertConfig,
    diagnostics: &mut Diagnostics,
) -> String {
    let mut parts: Vec<String> = Vec::new();

    for message in messages {
        if message.has_media && message.media_files.is_empty() {
            diagnostics.warn(
                DiagnosticKind::MediaNotDownloaded,
                format!("post {} has media the archive never downloaded", message.id),
            );
        }
        if !message.has_text() {
            continue;
        }

        let md = reconstruct(&message.raw_text, &message.entities, diagnostics);
        let md = normalize_markdown(&md);
        let mut md = rewrite(&md, &plan.id_map);

        let candidates = post_ids_from_links(&message.links);
        let missing = missing_references(&md, &candidates, &plan.id_map);
        if !missing.is_empty() {
            md = append_see_also(&md, &missing);
        }

        if config.source_link {
            if let Some(link) = message.link.as_deref() {
                md = format!("{}\n\nSource: {link}", md.trim_end());
            }
        }

        let trimmed = md.trim();
        if !trimmed.is_empty() {
            parts.push(trimmed.to_string());
        }
    }

    parts.join("\n\n---\n\n")
}

/// Resolves every media path of the bucket against the archive base, in
/// ascending post order.
fn collect_media(messages: &[Message], media_base: &Path) -> Vec<PathBuf> {
    messages
        .iter()
        .flat_map(|m| m.media_files.iter())
        .map(|rel| media_base.join(rel))
        .collect()
}

/// Front matter plus placed images plus body.
fn compose_document(
    bucket: &DayBucket,
    body: &str,
    image_links: &[String],
    config: &ConvertConfig,
) -> String {
    let mut chunks: Vec<String> = Vec::new();

    if config.image_placement == ImagePlacement::Top && !image_links.is_empty() {
        for link in image_links {
            chunks.push(format!("![]({link})"));
        }
        chunks.push(String::new());
    }

    if !body.is_empty() {
        chunks.push(body.to_string());
    }

    if config.image_placement == ImagePlacement::Bottom && !image_links.is_empty() {
        if !body.is_empty() {
            chunks.push(String::new());
        }
        for link in image_links {
            chunks.push(format!("![]({link})"));
        }
    }

    let content_body = format!("{}\n", chunks.join("\n").trim_end());
    format!("{}{content_body}", front_matter(&bucket.title, &bucket.date))
}

/// TOML front matter: escaped title, offset-bearing timestamp, empty tags.
fn front_matter(title: &str, date: &chrono::DateTime<chrono_tz::Tz>) -> String {
    let safe_title = title.replace('\\', "\\\\").replace('"', "\\\"");
    let date_str = date.format("%Y-%m-%dT%H:%M:%S%:z");
    format!("+++\ntitle = \"{safe_title}\"\ndate = \"{date_str}\"\ntags = []\n+++\n\n")
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::bucket::plan_days;
    use crate::slug::SlugRegistry;
    use chrono::{TimeZone, Utc};

    fn at(d: u32, h: u32) -> chrono::DateTime<Utc> {
        Utc.with_ymd_and_hms(2025, 7, d, h, 0, 0).unwrap()
    }

    fn run(
        messages: Vec<Message>,
        config: &ConvertConfig,
        diagnostics: &mut Diagnostics,
    ) -> RunSummary {
        let plan = plan_days(messages, config, &mut SlugRegistry::new(), diagnostics);
        assemble(&plan, Path::new("/nonexistent-archive"), config, diagnostics).unwrap()
    }

    fn temp_config() -> (tempfile::TempDir, ConvertConfig) {
        let dir = tempfile::tempdir().unwrap();
        let config = ConvertConfig::new()
            .with_out_dir(dir.path().join("blog"))
            .with_media_dir(dir.path().join("images"));
        (dir, config)
    }

    #[test]
    fn test_bodies_joined_with_rules() {
        let (dir, config) = temp_config();
        let messages = vec![
            Message::new(1, "first").with_date(at(5, 8)),
            Message::new(2, "second").with_date(at(5, 9)),
        ];
        let summary = run(messages, &config, &mut Diagnostics::new());
        assert_eq!(summary.buckets, 1);
        assert_eq!(summary.written, 1);

        let doc = fs::read_to_string(dir.path().join("blog/first.md")).unwrap();
        assert!(doc.contains("first\n\n---\n\nsecond"));
        assert!(doc.starts_with("+++\ntitle = \"first\"\n"));
        assert!(doc.contains("tags = []"));
    }

    #[test]
    fn test_front_matter_has_zone_offset() {
        let (dir, config) = temp_config();
        let messages = vec![Message::new(1, "hello").with_date(at(5, 8))];
        run(messages, &config, &mut Diagnostics::new());

        let doc = fs::read_to_string(dir.path().join("blog/hello.md")).unwrap();
        // Amsterdam summer time.
        assert!(doc.contains("date = \"2025-07-05T10:00:00+02:00\""));
    }

    #[test]
    fn test_title_quotes_escaped() {
        let (dir, config) = temp_config();
        let messages = vec![Message::new(1, "He said \"hi\" — Author").with_date(at(5, 8))];
        run(messages, &config, &mut Diagnostics::new());

        let doc = fs::read_to_string(dir.path().join("blog/he-said-hi-author.md")).unwrap();
        assert!(doc.contains("title = \"He said \\\"hi\\\" — Author\""));
    }

    #[test]
    fn test_dry_run_reports_without_writing() {
        let (dir, config) = temp_config();
        let config = config.with_dry_run(true);
        let messages = vec![Message::new(1, "hello").with_date(at(5, 8))];
        let summary = run(messages, &config, &mut Diagnostics::new());

        assert_eq!(summary.buckets, 1);
        assert_eq!(summary.written, 0);
        assert_eq!(summary.reports.len(), 1);
        assert!(!summary.reports[0].written);
        assert!(summary.reports[0].bytes > 0);
        assert!(!dir.path().join("blog/hello.md").exists());
    }

    #[test]
    fn test_internal_reference_rewritten_across_days() {
        let (dir, config) = temp_config();
        let messages = vec![
            Message::new(1, "Target — Post").with_date(at(5, 8)),
            // References a post in a *later* bucket: requires the full map.
            Message::new(2, "see https://t.me/ch/3").with_date(at(6, 8)),
            Message::new(3, "Future — Post").with_date(at(7, 8)),
        ];
        run(messages, &config, &mut Diagnostics::new());

        let doc = fs::read_to_string(dir.path().join("blog/see-https-t-me-ch-3.md")).unwrap();
        assert!(doc.contains("{{< relref \"blog/future-post.md\" >}}"));
    }

    #[test]
    fn test_unresolved_reference_left_alone() {
        let (dir, config) = temp_config();
        let messages = vec![Message::new(1, "see https://t.me/ch/999").with_date(at(5, 8))];
        run(messages, &config, &mut Diagnostics::new());

        let doc =
            fs::read_to_string(dir.path().join("blog/see-https-t-me-ch-999.md")).unwrap();
        assert!(doc.contains("see https://t.me/ch/999"));
        assert!(!doc.contains("relref"));
    }

    #[test]
    fn test_see_also_for_button_only_reference() {
        let (dir, config) = temp_config();
        let messages = vec![
            Message::new(1, "Target — Post").with_date(at(5, 8)),
            Message::new(2, "plain text")
                .with_date(at(6, 8))
                .with_external_link(crate::message::ExternalLink::button(
                    "https://t.me/ch/1",
                )),
        ];
        run(messages, &config, &mut Diagnostics::new());

        let doc = fs::read_to_string(dir.path().join("blog/plain-text.md")).unwrap();
        assert!(doc.contains("**See also:**"));
        assert!(doc.contains("{{< relref \"blog/target-post.md\" >}}"));
    }

    #[test]
    fn test_no_see_also_when_reference_in_text() {
        let (dir, config) = temp_config();
        let messages = vec![
            Message::new(1, "Target — Post").with_date(at(5, 8)),
            Message::new(2, "see https://t.me/ch/1")
                .with_date(at(6, 8))
                .with_external_link(crate::message::ExternalLink::button(
                    "https://t.me/ch/1",
                )),
        ];
        run(messages, &config, &mut Diagnostics::new());

        let doc =
            fs::read_to_string(dir.path().join("blog/see-https-t-me-ch-1.md")).unwrap();
        assert!(!doc.contains("See also"));
    }

    #[test]
    fn test_source_link_trailer() {
        let (dir, config) = temp_config();
        let config = config.with_source_link(true);
        let messages = vec![Message::new(1, "hello")
            .with_date(at(5, 8))
            .with_link("https://t.me/ch/1")];
        run(messages, &config, &mut Diagnostics::new());

        let doc = fs::read_to_string(dir.path().join("blog/hello.md")).unwrap();
        assert!(doc.contains("Source: https://t.me/ch/1"));
    }

    #[test]
    fn test_skip_empty_bucket() {
        let (_dir, config) = temp_config();
        let config = config.with_skip_empty(true);
        let mut diags = Diagnostics::new();
        let messages = vec![Message::new(1, "   ").with_date(at(5, 8))];
        let summary = run(messages, &config, &mut diags);

        assert_eq!(summary.buckets, 1);
        assert_eq!(summary.written, 0);
        assert_eq!(diags.count_of(DiagnosticKind::EmptyDocument), 1);
    }

    #[test]
    fn test_undownloaded_media_diagnostic() {
        let (_dir, config) = temp_config();
        let mut diags = Diagnostics::new();
        let mut message = Message::new(1, "text").with_date(at(5, 8));
        message.has_media = true;
        run(vec![message], &config, &mut diags);

        assert_eq!(diags.count_of(DiagnosticKind::MediaNotDownloaded), 1);
    }

    #[test]
    fn test_image_placement_top_and_bottom() {
        let cases: [(ImagePlacement, fn(&str) -> bool); 2] = [
            (ImagePlacement::Top, |doc| {
                doc.find("![](").unwrap() < doc.find("body text").unwrap()
            }),
            (ImagePlacement::Bottom, |doc| {
                doc.find("body text").unwrap() < doc.find("![](").unwrap()
            }),
        ];
        for (placement, check) in cases {
            let dir = tempfile::tempdir().unwrap();
            let archive = tempfile::tempdir().unwrap();
            std::fs::write(archive.path().join("p.jpg"), "img").unwrap();

            let config = ConvertConfig::new()
                .with_out_dir(dir.path().join("blog"))
                .with_media_dir(dir.path().join("images"))
                .with_image_placement(placement);

            let messages = vec![Message::new(1, "body text")
                .with_date(at(5, 8))
                .with_media_file("p.jpg")];
            let mut diags = Diagnostics::new();
            let plan = plan_days(messages, &config, &mut SlugRegistry::new(), &mut diags);
            assemble(&plan, archive.path(), &config, &mut diags).unwrap();

            let doc = fs::read_to_string(dir.path().join("blog/body-text.md")).unwrap();
            // The title repeats the body text, so only look past the
            // closing front-matter fence.
            let body = doc.split_once("+++\n\n").expect("front matter fence").1;
            assert!(check(body), "placement {placement} wrong:\n{doc}");
        }
    }

    #[test]
    fn test_image_placement_none_copies_but_does_not_link() {
        let dir = tempfile::tempdir().unwrap();
        let archive = tempfile::tempdir().unwrap();
        std::fs::write(archive.path().join("p.jpg"), "img").unwrap();

        let config = ConvertConfig::new()
            .with_out_dir(dir.path().join("blog"))
            .with_media_dir(dir.path().join("images"))
            .with_image_placement(ImagePlacement::None);

        let messages = vec![Message::new(1, "body text")
            .with_date(at(5, 8))
            .with_media_file("p.jpg")];
        let mut diags = Diagnostics::new();
        let plan = plan_days(messages, &config, &mut SlugRegistry::new(), &mut diags);
        assemble(&plan, archive.path(), &config, &mut diags).unwrap();

        let doc = fs::read_to_string(dir.path().join("blog/body-text.md")).unwrap();
        assert!(!doc.contains("![]("));
        assert_eq!(fs::read_dir(dir.path().join("images")).unwrap().count(), 1);
    }
}
