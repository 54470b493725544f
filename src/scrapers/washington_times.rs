//! Washington Times politics scraper.
//!
//! The date lives in the article's byline (`div.meta span.source`) next to
//! the wire credit and the leading `-` separators, which are stripped. Only the first line of the body is
//! kept; the `article-toplinks` related-story block is ignored.

use super::rules::{BodyRule, DateRule, DateSource, ListingRule, OutletRules, TitleSource};

pub fn rules() -> OutletRules {
    OutletRules {
        publisher: "washington_times".to_string(),
        listing: ListingRule {
            url: "https://www.washingtontimes.com/news/politics/".to_string(),
            item_selector: "h2.article-headline".to_string(),
            anchor_selector: "a".to_string(),
            base_url: "https://www.washingtontimes.com".to_string(),
            max_items: None,
            include: vec![],
            exclude: vec![],
            relative_only: false,
        },
        title: TitleSource::ListingAnchor,
        date: DateRule {
            strip: vec![
                "Associated Press".to_string(),
                "The Washington Times".to_string(),
            ],
            strip_pattern: Some(r"^[-\s]+".to_string()),
            ..DateRule::new(DateSource::Selector("div.meta span.source".to_string()))
        },
        body: BodyRule {
            remove: vec!["div.article-toplinks".to_string()],
            first_line_only: true,
            ..BodyRule::within("div.bigtext", "p")
        },
    }
}
