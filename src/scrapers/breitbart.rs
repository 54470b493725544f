//! Breitbart politics scraper.
//!
//! Listing items are `<h2>` headlines on [breitbart.com/politics](https://www.breitbart.com/politics/);
//! only the first 30 are followed. The publication date comes from the first
//! `<time datetime>` with its ten-character millisecond and zone suffix removed.

use super::rules::{BodyRule, DateRule, DateSource, ListingRule, OutletRules, TitleSource};

pub fn rules() -> OutletRules {
    OutletRules {
        publisher: "Breitbart".to_string(),
        listing: ListingRule {
            url: "https://www.breitbart.com/politics/".to_string(),
            item_selector: "h2".to_string(),
            anchor_selector: "a".to_string(),
            base_url: "https://www.breitbart.com".to_string(),
            max_items: Some(30),
            include: vec![],
            exclude: vec![],
            relative_only: false,
        },
        title: TitleSource::ListingAnchor,
        date: DateRule {
            trim_end: 10,
            ..DateRule::new(DateSource::TimeDatetime)
        },
        body: BodyRule::within("div.entry-content", "p"),
    }
}
