//! Declarative extraction rules for one outlet.
//!
//! Each outlet's site structure is described as data rather than code so a
//! redesign only means editing rules (built-in or from the YAML config).
//! Rules serialize to YAML with `serde`, which is also what the `rules`
//! command prints.

use serde::{Deserialize, Serialize};

/// Everything needed to turn an outlet's listing page into article records.
#[derive(Debug, Clone, PartialEq, Deserialize, Serialize)]
pub struct OutletRules {
    /// Value written to the `publisher` column of every record.
    pub publisher: String,
    pub listing: ListingRule,
    pub title: TitleSource,
    pub date: DateRule,
    pub body: BodyRule,
}

/// Where article links come from.
#[derive(Debug, Clone, PartialEq, Deserialize, Serialize)]
pub struct ListingRule {
    /// Section front page to scrape.
    pub url: String,
    /// Elements on the listing page that each stand for one article.
    pub item_selector: String,
    /// Link element inside each item.
    #[serde(default = "default_anchor")]
    pub anchor_selector: String,
    /// Relative links are resolved against this URL.
    pub base_url: String,
    /// Stop after this many listing items.
    #[serde(default)]
    pub max_items: Option<usize>,
    /// Every one of these must occur in the raw href.
    #[serde(default)]
    pub include: Vec<String>,
    /// None of these may occur in the raw href.
    #[serde(default)]
    pub exclude: Vec<String>,
    /// Skip hrefs that are already absolute (usually cross-site promos).
    #[serde(default)]
    pub relative_only: bool,
}

fn default_anchor() -> String {
    "a".to_string()
}

/// Where a text field is read from.
#[derive(Debug, Clone, PartialEq, Deserialize, Serialize)]
#[serde(tag = "from", content = "value", rename_all = "snake_case")]
pub enum TitleSource {
    /// Text of the listing anchor that linked to the article.
    ListingAnchor,
    /// Text of the first match on the article page.
    Selector(String),
    /// `content` attribute of the first matching `<meta>` element.
    Meta(String),
    /// Top-level string field of the first JSON-LD block on the article page.
    JsonLd(String),
}

/// Where the publication date comes from on the article page.
#[derive(Debug, Clone, PartialEq, Deserialize, Serialize)]
#[serde(tag = "from", content = "value", rename_all = "snake_case")]
pub enum DateSource {
    /// `datetime` attribute of the first `<time>` element.
    TimeDatetime,
    /// Joined text of every match.
    Selector(String),
    /// `content` attribute of the first matching `<meta>` element.
    Meta(String),
    /// Top-level string field of the first JSON-LD block.
    JsonLd(String),
}

/// Publication date extraction plus the cleanup applied to the raw value.
#[derive(Debug, Clone, PartialEq, Deserialize, Serialize)]
pub struct DateRule {
    pub source: DateSource,
    /// Characters dropped from the front of the raw value.
    #[serde(default)]
    pub trim_start: usize,
    /// Characters dropped from the end of the raw value.
    #[serde(default)]
    pub trim_end: usize,
    /// Phrases removed before whitespace is collapsed.
    #[serde(default)]
    pub strip: Vec<String>,
    /// Regex whose matches are removed after whitespace is collapsed.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub strip_pattern: Option<String>,
}

/// Body text extraction and cleanup.
#[derive(Debug, Clone, PartialEq, Deserialize, Serialize)]
pub struct BodyRule {
    /// If set, only the first match is searched for paragraphs.
    #[serde(default)]
    pub container: Option<String>,
    /// Elements whose text makes up the body, joined with single spaces.
    pub paragraphs: String,
    /// Subtrees whose text is ignored (share buttons, related links).
    #[serde(default)]
    pub remove: Vec<String>,
    /// Delete newlines inside each paragraph before joining.
    #[serde(default)]
    pub strip_newlines: bool,
    /// Boilerplate phrases removed from the joined body.
    #[serde(default)]
    pub strip_phrases: Vec<String>,
    /// Regex whose matches are removed from the joined body.
    #[serde(default)]
    pub strip_pattern: Option<String>,
    /// Keep only the text before the first newline of the joined body.
    #[serde(default)]
    pub first_line_only: bool,
}

impl DateRule {
    pub fn new(source: DateSource) -> Self {
        Self {
            source,
            trim_start: 0,
            trim_end: 0,
            strip: Vec::new(),
            strip_pattern: None,
        }
    }
}

impl BodyRule {
    pub fn paragraphs(selector: &str) -> Self {
        Self {
            container: None,
            paragraphs: selector.to_string(),
            remove: Vec::new(),
            strip_newlines: false,
            strip_phrases: Vec::new(),
            strip_pattern: None,
            first_line_only: false,
        }
    }

    pub fn within(container: &str, selector: &str) -> Self {
        Self {
            container: Some(container.to_string()),
            ..Self::paragraphs(selector)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_rules_from_yaml_with_defaults() {
        let yaml = r#"
publisher: Example
listing:
  url: https://example.com/politics
  item_selector: h2
  base_url: https://example.com
title:
  from: listing_anchor
date:
  source:
    from: meta
    value: "meta[property='article:published_time']"
  trim_end: 6
body:
  paragraphs: "article p"
  strip_phrases: ["Subscribe now"]
"#;
        let rules: OutletRules = serde_yaml::from_str(yaml).unwrap();
        assert_eq!(rules.listing.anchor_selector, "a");
        assert_eq!(rules.listing.max_items, None);
        assert!(!rules.listing.relative_only);
        assert_eq!(rules.title, TitleSource::ListingAnchor);
        assert_eq!(
            rules.date.source,
            DateSource::Meta("meta[property='article:published_time']".to_string())
        );
        assert_eq!(rules.date.trim_end, 6);
        assert_eq!(rules.body.container, None);
        assert_eq!(rules.body.strip_phrases, vec!["Subscribe now"]);
    }

    #[test]
    fn test_body_within_sets_container() {
        let body = BodyRule::within("div.entry-content", "p");
        assert_eq!(body.container.as_deref(), Some("div.entry-content"));
        assert_eq!(body.paragraphs, "p");
        assert!(!body.first_line_only);
    }
}
