//! Internal cross-reference rewriting.
//!
//! Posts reference each other through canonical per-post URLs of the shape
//! `https://t.me/<channel>/<id>` (private channels insert a `/c/<digits>`
//! segment). Once day grouping has assigned every post id to a destination
//! document, those references are rewritten into Hugo `relref` links so the
//! generated site resolves them by path instead of by a URL that no longer
//! exists.
//!
//! Three literal forms are recognized, each by its own pass, in order:
//!
//! 1. `[label](https://t.me/…/123)` — keeps the label
//! 2. `<https://t.me/…/123>` — URL becomes the label
//! 3. a bare `https://t.me/…/123` outside any markup — URL becomes the label
//!
//! Each pass runs over the previous pass's output; a rewritten span no
//! longer matches any of the raw forms, which is what makes the whole
//! rewrite idempotent. Identifiers absent from the map are left untouched.

use std::collections::{HashMap, HashSet};
use std::sync::LazyLock;

use regex::{Captures, Regex};

use crate::message::ExternalLink;

/// Mapping from source post identifier to destination document reference
/// (e.g. `blog/2025-07-05-title.md`). Built in full by the aggregation pass
/// before any rewrite happens.
pub type IdentifierMap = HashMap<u64, String>;

const POST_URL: &str = r"https?://t\.me/(?:c/\d+/)?\w+/(?P<id>\d+)";

/// Form 1: markup-wrapped link with a canonical target.
static MD_LINK_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(&format!(r"\[(?P<text>[^\]]+)\]\((?P<url>{POST_URL})\)")).unwrap()
});

/// Form 2: angle-bracket autolink.
static AUTOLINK_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(&format!(r"<(?P<url>{POST_URL})>")).unwrap());

/// Forms 3 and scanning: a canonical URL anywhere.
static BARE_URL_RE: LazyLock<Regex> = LazyLock::new(|| Regex::new(POST_URL).unwrap());

/// Renders a Hugo relref link construct.
fn relref(label: &str, reference: &str) -> String {
    format!("[{label}]({{{{< relref \"{reference}\" >}}}})")
}

/// Rewrites all three internal-reference forms against the identifier map.
///
/// Unresolvable identifiers are left exactly as written. Running the result
/// through `rewrite` again is a no-op.
pub fn rewrite(md: &str, map: &IdentifierMap) -> String {
    let md = MD_LINK_RE.replace_all(md, |caps: &Captures| {
        match lookup(caps.name("id").map(|m| m.as_str()), map) {
            Some(reference) => relref(&caps["text"], reference),
            None => caps[0].to_string(),
        }
    });

    let md = AUTOLINK_RE.replace_all(&md, |caps: &Captures| {
        match lookup(caps.name("id").map(|m| m.as_str()), map) {
            Some(reference) => relref(&caps["url"], reference),
            None => caps[0].to_string(),
        }
    });

    rewrite_bare(&md, map)
}

/// Bare-URL pass. The regex crate has no lookaround, so the "outside any
/// markup" condition is checked against the neighbouring characters by hand:
/// a URL preceded by `(`, `<` or `[`, or followed by `)`, is part of a
/// wrapped form (possibly an unresolved one, or a label produced by the
/// earlier passes) and is left alone.
fn rewrite_bare(md: &str, map: &IdentifierMap) -> String {
    let mut out = String::with_capacity(md.len());
    let mut last = 0;

    for caps in BARE_URL_RE.captures_iter(md) {
        let whole = caps.get(0).expect("match always has group 0");
        let wrapped = md[..whole.start()]
            .chars()
            .next_back()
            .is_some_and(|c| c == '(' || c == '<' || c == '[')
            || md[whole.end()..].chars().next().is_some_and(|c| c == ')');

        out.push_str(&md[last..whole.start()]);
        match lookup(caps.name("id").map(|m| m.as_str()), map) {
            Some(reference) if !wrapped => out.push_str(&relref(whole.as_str(), reference)),
            _ => out.push_str(whole.as_str()),
        }
        last = whole.end();
    }

    out.push_str(&md[last..]);
    out
}

fn lookup<'a>(id: Option<&str>, map: &'a IdentifierMap) -> Option<&'a String> {
    id.and_then(|s| s.parse::<u64>().ok()).and_then(|i| map.get(&i))
}

/// Extracts post identifiers from recovered link descriptors, unique and
/// in first-seen order.
pub fn post_ids_from_links(links: &[ExternalLink]) -> Vec<u64> {
    let mut seen = HashSet::new();
    let mut ids = Vec::new();
    for link in links {
        if let Some(caps) = BARE_URL_RE.captures(&link.url) {
            if let Some(id) = caps.name("id").and_then(|m| m.as_str().parse::<u64>().ok()) {
                if seen.insert(id) {
                    ids.push(id);
                }
            }
        }
    }
    ids
}

/// Computes the "See also" fallback for one post.
///
/// Button-style links reference other posts without ever appearing as text
/// in the body. For every candidate id that resolves in the map, the
/// already-rewritten body is scanned for any canonical URL carrying that
/// id; only ids that are textually absent produce an entry. Returns the
/// destination references in candidate order.
pub fn missing_references<'a>(
    rewritten_body: &str,
    candidate_ids: &[u64],
    map: &'a IdentifierMap,
) -> Vec<&'a String> {
    let present: HashSet<u64> = BARE_URL_RE
        .captures_iter(rewritten_body)
        .filter_map(|caps| caps.name("id").and_then(|m| m.as_str().parse().ok()))
        .collect();

    candidate_ids
        .iter()
        .filter(|id| !present.contains(id))
        .filter_map(|id| map.get(id))
        .collect()
}

/// Appends a "See also" list to a body. `references` must be non-empty.
pub fn append_see_also(body: &str, references: &[&String]) -> String {
    let mut out = String::from(body.trim_end());
    out.push_str("\n\n**See also:**\n");
    for reference in references {
        out.push_str(&format!("- {}\n", relref(reference, reference)));
    }
    out
}
