//! Day aggregation — pass 1 of the pipeline.
//!
//! Every post is assigned to a calendar-day bucket in the configured time
//! zone; each bucket gets its title, its collision-free slug and its front
//! matter timestamp here, and the global identifier map is completed for
//! **all** buckets before assembly touches any of them. Posts can reference
//! buckets not yet visited in iteration order, so assembly must never see a
//! partial map — [`plan_days`] returning a fully-built [`DayPlan`] is the
//! read-only handoff that guarantees it.

use std::collections::BTreeMap;

use chrono::{DateTime, Utc};
use chrono_tz::Tz;

use crate::config::ConvertConfig;
use crate::diagnostics::{DiagnosticKind, Diagnostics};
use crate::links::IdentifierMap;
use crate::markup::{normalize_markdown, reconstruct};
use crate::message::Message;
use crate::slug::{SlugRegistry, slugify};
use crate::title::{extract_title, strip_decorations};

/// All posts of one calendar day, with the derived naming.
#[derive(Debug)]
pub struct DayBucket {
    /// Day key, `YYYY-MM-DD` in the configured zone.
    pub day: String,

    /// Cleaned title for front matter.
    pub title: String,

    /// Reserved, unique document slug.
    pub slug: String,

    /// Timestamp of the earliest post, in the configured zone.
    pub date: DateTime<Tz>,

    /// Posts of the day, ascending by identifier.
    pub messages: Vec<Message>,
}

/// Output of pass 1: buckets in ascending day order plus the completed
/// identifier map. Immutable from here on.
#[derive(Debug)]
pub struct DayPlan {
    pub buckets: Vec<DayBucket>,
    pub id_map: IdentifierMap,
}

/// Groups posts into day buckets and derives titles, slugs and the
/// identifier map.
///
/// Posts without a resolvable timestamp are dropped with a diagnostic.
/// Buckets come out in ascending day-key order, which also makes slug
/// collision suffixes reproducible across runs on the same input.
pub fn plan_days(
    messages: Vec<Message>,
    config: &ConvertConfig,
    registry: &mut SlugRegistry,
    diagnostics: &mut Diagnostics,
) -> DayPlan {
    // Timestamps travel with the messages so the bucket never has to
    // re-derive them from the record.
    let mut grouped: BTreeMap<String, Vec<(DateTime<Utc>, Message)>> = BTreeMap::new();

    for message in messages {
        let Some(date_utc) = message.date_utc else {
            diagnostics.warn(
                DiagnosticKind::MissingTimestamp,
                format!("post {} dropped from aggregation", message.id),
            );
            continue;
        };
        let local = date_utc.with_timezone(&config.time_zone);
        let day = local.format("%Y-%m-%d").to_string();
        grouped.entry(day).or_default().push((date_utc, message));
    }

    let mut buckets = Vec::with_capacity(grouped.len());
    let mut id_map = IdentifierMap::new();

    for (day, mut dated) in grouped {
        dated.sort_by_key(|(_, m)| m.id);

        // Lowest-id post stamps the bucket; all posts share the local day.
        let date = dated[0].0.with_timezone(&config.time_zone);
        let msgs: Vec<Message> = dated.into_iter().map(|(_, m)| m).collect();

        let title = derive_title(&day, &msgs, config, diagnostics);

        let mut base = slugify(&title);
        if config.append_id {
            base = format!("{base}-tg{}", msgs[0].id);
        }
        let slug = registry.reserve(&base);

        let reference = config.reference_for(&slug);
        for msg in &msgs {
            id_map.insert(msg.id, reference.clone());
        }

        buckets.push(DayBucket {
            day,
            title,
            slug,
            date,
            messages: msgs,
        });
    }

    DayPlan { buckets, id_map }
}

/// Title of a bucket: extracted from the first text-bearing post, with a
/// synthetic day-key fallback.
fn derive_title(
    day: &str,
    msgs: &[Message],
    config: &ConvertConfig,
    diagnostics: &mut Diagnostics,
) -> String {
    let extracted = msgs
        .iter()
        .find(|m| m.has_text())
        .and_then(|m| {
            let body = normalize_markdown(&reconstruct(&m.raw_text, &m.entities, diagnostics));
            extract_title(&body, config.strict_title)
        })
        .map(|t| strip_decorations(&t))
        .filter(|t| !t.is_empty());

    extracted.unwrap_or_else(|| format!("Posts from {day}"))
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{TimeZone, Utc};

    fn config() -> ConvertConfig {
        ConvertConfig::new().with_time_zone(chrono_tz::Europe::Amsterdam)
    }

    fn at(y: i32, mo: u32, d: u32, h: u32) -> chrono::DateTime<Utc> {
        Utc.with_ymd_and_hms(y, mo, d, h, 0, 0).unwrap()
    }

    #[test]
    fn test_groups_by_local_day() {
        // 23:30 UTC on Jul 4 is already Jul 5 in Amsterdam (UTC+2 in summer).
        let msgs = vec![
            Message::new(1, "late").with_date(at(2025, 7, 4, 23)),
            Message::new(2, "early").with_date(at(2025, 7, 5, 6)),
            Message::new(3, "other day").with_date(at(2025, 7, 6, 12)),
        ];
        let plan = plan_days(msgs, &config(), &mut SlugRegistry::new(), &mut Diagnostics::new());

        assert_eq!(plan.buckets.len(), 2);
        assert_eq!(plan.buckets[0].day, "2025-07-05");
        assert_eq!(plan.buckets[0].messages.len(), 2);
        assert_eq!(plan.buckets[1].day, "2025-07-06");
    }

    #[test]
    fn test_messages_sorted_by_id_within_bucket() {
        let msgs = vec![
            Message::new(5, "b").with_date(at(2025, 7, 5, 10)),
            Message::new(2, "a").with_date(at(2025, 7, 5, 9)),
        ];
        let plan = plan_days(msgs, &config(), &mut SlugRegistry::new(), &mut Diagnostics::new());
        let ids: Vec<u64> = plan.buckets[0].messages.iter().map(|m| m.id).collect();
        assert_eq!(ids, vec![2, 5]);
        // The lowest-id post stamps the bucket even when it arrives later.
        assert_eq!(
            plan.buckets[0].date,
            at(2025, 7, 5, 9).with_timezone(&chrono_tz::Europe::Amsterdam)
        );
    }

    #[test]
    fn test_missing_timestamp_dropped_with_diagnostic() {
        let mut diags = Diagnostics::new();
        let msgs = vec![
            Message::new(1, "no date"),
            Message::new(2, "dated").with_date(at(2025, 7, 5, 10)),
        ];
        let plan = plan_days(msgs, &config(), &mut SlugRegistry::new(), &mut diags);

        assert_eq!(plan.buckets.len(), 1);
        assert_eq!(diags.count_of(DiagnosticKind::MissingTimestamp), 1);
        assert!(!plan.id_map.contains_key(&1));
    }

    #[test]
    fn test_title_from_first_text_message() {
        let msgs = vec![
            Message::new(1, "").with_date(at(2025, 7, 5, 8)),
            Message::new(2, "Song — Artist\nmore").with_date(at(2025, 7, 5, 9)),
        ];
        let plan = plan_days(msgs, &config(), &mut SlugRegistry::new(), &mut Diagnostics::new());
        assert_eq!(plan.buckets[0].title, "Song — Artist");
        assert_eq!(plan.buckets[0].slug, "song-artist");
    }

    #[test]
    fn test_synthetic_title_when_no_text() {
        let msgs = vec![Message::new(1, "").with_date(at(2025, 7, 5, 8))];
        let plan = plan_days(msgs, &config(), &mut SlugRegistry::new(), &mut Diagnostics::new());
        assert_eq!(plan.buckets[0].title, "Posts from 2025-07-05");
        assert_eq!(plan.buckets[0].slug, "posts-from-2025-07-05");
    }

    #[test]
    fn test_strict_mode_falls_back_to_synthetic() {
        let cfg = config().with_strict_title(true);
        let msgs = vec![Message::new(1, "no dash here").with_date(at(2025, 7, 5, 8))];
        let plan = plan_days(msgs, &cfg, &mut SlugRegistry::new(), &mut Diagnostics::new());
        assert_eq!(plan.buckets[0].title, "Posts from 2025-07-05");
    }

    #[test]
    fn test_id_map_covers_all_buckets_before_return() {
        let msgs = vec![
            Message::new(1, "One — A").with_date(at(2025, 7, 5, 8)),
            Message::new(2, "Two — B").with_date(at(2025, 7, 6, 8)),
        ];
        let plan = plan_days(msgs, &config(), &mut SlugRegistry::new(), &mut Diagnostics::new());
        assert_eq!(plan.id_map.get(&1), Some(&"blog/one-a.md".to_string()));
        assert_eq!(plan.id_map.get(&2), Some(&"blog/two-b.md".to_string()));
    }

    #[test]
    fn test_slug_collisions_get_suffixes() {
        let msgs = vec![
            Message::new(1, "Same Title").with_date(at(2025, 7, 5, 8)),
            Message::new(2, "Same Title").with_date(at(2025, 7, 6, 8)),
        ];
        let mut registry = SlugRegistry::new();
        let plan = plan_days(msgs, &config(), &mut registry, &mut Diagnostics::new());
        assert_eq!(plan.buckets[0].slug, "same-title");
        assert_eq!(plan.buckets[1].slug, "same-title-2");
    }

    #[test]
    fn test_append_id_suffix() {
        let cfg = config().with_append_id(true);
        let msgs = vec![Message::new(41, "Hi — There").with_date(at(2025, 7, 5, 8))];
        let plan = plan_days(msgs, &cfg, &mut SlugRegistry::new(), &mut Diagnostics::new());
        assert_eq!(plan.buckets[0].slug, "hi-there-tg41");
    }

    #[test]
    fn test_decorations_stripped_from_title() {
        let msgs = vec![Message::new(1, "🔥 Hot — Take 🔥").with_date(at(2025, 7, 5, 8))];
        let plan = plan_days(msgs, &config(), &mut SlugRegistry::new(), &mut Diagnostics::new());
        assert_eq!(plan.buckets[0].title, "Hot — Take");
    }
}
