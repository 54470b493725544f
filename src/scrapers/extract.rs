//! Apply [`OutletRules`] to raw HTML.
//!
//! Everything here is synchronous and network-free: the listing page and each
//! article page are handed in as strings, which keeps the per-outlet rules
//! testable against saved fixtures.

use super::rules::{DateSource, OutletRules, TitleSource};
use crate::error::ScrapeError;
use crate::models::ArticleRecord;
use crate::utils::{collapse_whitespace, trim_chars};
use regex::Regex;
use scraper::{ElementRef, Html, Selector};
use serde_json::Value;
use std::collections::HashSet;
use tracing::debug;
use url::Url;

/// One article link found on a listing page.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ListingEntry {
    pub link: String,
    /// Anchor text, whitespace-collapsed.
    pub title: String,
}

/// How a single field is read from a parsed page.
#[derive(Debug)]
enum Field {
    ListingAnchor,
    FirstText(Selector),
    AllText(Selector),
    Attr(Selector, &'static str),
    JsonLd(String),
}

/// [`OutletRules`] with every selector and pattern parsed up front, so a bad
/// rule fails before any request is made.
#[derive(Debug)]
pub struct CompiledRules {
    rules: OutletRules,
    base_url: Url,
    item: Selector,
    anchor: Selector,
    title: Field,
    date: Field,
    container: Option<Selector>,
    paragraphs: Selector,
    remove: Vec<Selector>,
    strip_pattern: Option<Regex>,
    date_pattern: Option<Regex>,
    json_ld: Selector,
}

fn selector(css: &str) -> Result<Selector, ScrapeError> {
    Selector::parse(css).map_err(|e| ScrapeError::Selector {
        selector: css.to_string(),
        reason: e.to_string(),
    })
}

impl CompiledRules {
    pub fn new(rules: &OutletRules) -> Result<Self, ScrapeError> {
        let title = match &rules.title {
            TitleSource::ListingAnchor => Field::ListingAnchor,
            TitleSource::Selector(css) => Field::FirstText(selector(css)?),
            TitleSource::Meta(css) => Field::Attr(selector(css)?, "content"),
            TitleSource::JsonLd(key) => Field::JsonLd(key.clone()),
        };
        let date = match &rules.date.source {
            DateSource::TimeDatetime => Field::Attr(selector("time[datetime]")?, "datetime"),
            DateSource::Selector(css) => Field::AllText(selector(css)?),
            DateSource::Meta(css) => Field::Attr(selector(css)?, "content"),
            DateSource::JsonLd(key) => Field::JsonLd(key.clone()),
        };

        Ok(Self {
            base_url: Url::parse(&rules.listing.base_url)?,
            item: selector(&rules.listing.item_selector)?,
            anchor: selector(&rules.listing.anchor_selector)?,
            title,
            date,
            container: rules.body.container.as_deref().map(selector).transpose()?,
            paragraphs: selector(&rules.body.paragraphs)?,
            remove: rules
                .body
                .remove
                .iter()
                .map(|css| selector(css))
                .collect::<Result<_, _>>()?,
            strip_pattern: rules.body.strip_pattern.as_deref().map(Regex::new).transpose()?,
            date_pattern: rules.date.strip_pattern.as_deref().map(Regex::new).transpose()?,
            json_ld: selector(r#"script[type="application/ld+json"]"#)?,
            rules: rules.clone(),
        })
    }
}

fn is_absolute(href: &str) -> bool {
    href.starts_with("http://") || href.starts_with("https://") || href.starts_with("//")
}

/// Collect article links from a listing page, in page order.
///
/// Hrefs are filtered by the listing rule, resolved against the base URL
/// and de-duplicated.
pub fn extract_listing(rules: &CompiledRules, html: &str) -> Vec<ListingEntry> {
    let listing = &rules.rules.listing;
    let document = Html::parse_document(html);
    let max_items = listing.max_items.unwrap_or(usize::MAX);

    let mut seen = HashSet::new();
    let mut entries = Vec::new();
    for item in document.select(&rules.item).take(max_items) {
        let anchor = if rules.anchor.matches(&item) {
            Some(item)
        } else {
            item.select(&rules.anchor).next()
        };
        let Some(anchor) = anchor else { continue };
        let Some(href) = anchor.value().attr("href").map(str::trim) else {
            continue;
        };

        if listing.relative_only && is_absolute(href) {
            continue;
        }
        if !listing.include.iter().all(|needle| href.contains(needle.as_str()))
            || listing.exclude.iter().any(|needle| href.contains(needle.as_str()))
        {
            continue;
        }

        let link = match rules.base_url.join(href) {
            Ok(resolved) => resolved.to_string(),
            Err(e) => {
                debug!(%href, error = %e, "Skipping unresolvable href");
                continue;
            }
        };
        if seen.insert(link.clone()) {
            entries.push(ListingEntry {
                link,
                title: collapse_whitespace(&anchor.text().collect::<String>()),
            });
        }
    }
    entries
}

/// Text of `element`, skipping any subtree in `removed`.
fn text_without<'a>(element: ElementRef<'a>, removed: &[ElementRef<'a>]) -> String {
    let mut out = String::new();
    for node in element.descendants() {
        let Some(text) = node.value().as_text() else { continue };
        if node
            .ancestors()
            .filter_map(ElementRef::wrap)
            .any(|ancestor| removed.contains(&ancestor))
        {
            continue;
        }
        let text: &str = text;
        out.push_str(text);
    }
    out
}

/// String fields of every JSON-LD object on the page, flattening arrays and `@graph`.
fn json_ld_field(document: &Html, json_ld: &Selector, key: &str) -> Option<String> {
    fn find(value: &Value, key: &str) -> Option<String> {
        match value {
            Value::Array(items) => items.iter().find_map(|v| find(v, key)),
            Value::Object(map) => map
                .get(key)
                .and_then(Value::as_str)
                .map(str::to_string)
                .or_else(|| map.get("@graph").and_then(|g| find(g, key))),
            _ => None,
        }
    }

    document.select(json_ld).find_map(|script| {
        let raw = script.text().collect::<String>();
        match serde_json::from_str::<Value>(&raw) {
            Ok(value) => find(&value, key),
            Err(e) => {
                debug!(error = %e, "Ignoring malformed JSON-LD block");
                None
            }
        }
    })
}

fn read_field(document: &Html, rules: &CompiledRules, field: &Field, entry: &ListingEntry) -> Option<String> {
    match field {
        Field::ListingAnchor => Some(entry.title.clone()),
        Field::FirstText(sel) => document
            .select(sel)
            .next()
            .map(|el| el.text().collect::<String>()),
        Field::AllText(sel) => {
            let parts: Vec<String> = document
                .select(sel)
                .map(|el| el.text().collect::<String>())
                .collect();
            (!parts.is_empty()).then(|| parts.join(" "))
        }
        Field::Attr(sel, attr) => document
            .select(sel)
            .find_map(|el| el.value().attr(attr))
            .map(str::to_string),
        Field::JsonLd(key) => json_ld_field(document, &rules.json_ld, key),
    }
}

fn clean_date(rules: &CompiledRules, raw: &str) -> Option<String> {
    let rule = &rules.rules.date;
    let mut date = trim_chars(raw, rule.trim_start, rule.trim_end);
    for phrase in &rule.strip {
        date = date.replace(phrase.as_str(), " ");
    }
    let mut date = collapse_whitespace(&date);
    if let Some(pattern) = &rules.date_pattern {
        date = collapse_whitespace(&pattern.replace_all(&date, ""));
    }
    (!date.is_empty()).then_some(date)
}

fn body_text(document: &Html, rules: &CompiledRules) -> String {
    let body = &rules.rules.body;
    let removed: Vec<ElementRef<'_>> = rules
        .remove
        .iter()
        .flat_map(|sel| document.select(sel))
        .collect();

    let paragraphs: Vec<ElementRef<'_>> = match &rules.container {
        Some(container) => match document.select(container).next() {
            Some(scope) => scope.select(&rules.paragraphs).collect(),
            None => Vec::new(),
        },
        None => document.select(&rules.paragraphs).collect(),
    };

    let mut text = paragraphs
        .into_iter()
        .map(|p| {
            let t = text_without(p, &removed);
            if body.strip_newlines { t.replace('\n', "") } else { t }
        })
        .filter(|t| !t.trim().is_empty())
        .collect::<Vec<_>>()
        .join(" ");

    if body.first_line_only {
        text = text.split('\n').next().unwrap_or_default().to_string();
    }
    for phrase in &body.strip_phrases {
        text = text.replace(phrase.as_str(), " ");
    }
    if let Some(pattern) = &rules.strip_pattern {
        text = pattern.replace_all(&text, "").into_owned();
    }
    text.trim().to_string()
}

/// Build a record from one article page.
///
/// Returns `None` when the page has no usable title or publication date;
/// undated records are dropped rather than stored.
pub fn extract_article(rules: &CompiledRules, entry: &ListingEntry, html: &str) -> Option<ArticleRecord> {
    let document = Html::parse_document(html);

    let title = read_field(&document, rules, &rules.title, entry)
        .map(|t| collapse_whitespace(&t))
        .filter(|t| !t.is_empty());
    let Some(title) = title else {
        debug!(link = %entry.link, "No title; dropping article");
        return None;
    };

    let date = read_field(&document, rules, &rules.date, entry).and_then(|raw| clean_date(rules, &raw));
    let Some(date) = date else {
        debug!(link = %entry.link, "No publication date; dropping article");
        return None;
    };

    Some(ArticleRecord {
        publisher: rules.rules.publisher.clone(),
        date: Some(date),
        link: entry.link.clone(),
        title,
        body_text: body_text(&document, rules),
    })
}
