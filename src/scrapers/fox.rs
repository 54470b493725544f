//! Fox News politics scraper.
//!
//! Listing items are `<article>` cards on [foxnews.com/politics](https://www.foxnews.com/politics).
//! Absolute links (cross-site promos) and video pages (`/v/`) are skipped.
//! Headline and publication date come from the article's JSON-LD metadata;
//! copyright and newsletter boilerplate is stripped from the body.

use super::rules::{BodyRule, DateRule, DateSource, ListingRule, OutletRules, TitleSource};

pub fn rules() -> OutletRules {
    OutletRules {
        publisher: "Fox".to_string(),
        listing: ListingRule {
            url: "https://www.foxnews.com/politics".to_string(),
            item_selector: "article".to_string(),
            anchor_selector: "a".to_string(),
            base_url: "https://www.foxnews.com".to_string(),
            max_items: None,
            include: vec![],
            exclude: vec!["/v/".to_string()],
            relative_only: true,
        },
        title: TitleSource::JsonLd("headline".to_string()),
        date: DateRule::new(DateSource::JsonLd("datePublished".to_string())),
        body: BodyRule {
            strip_newlines: true,
            strip_phrases: vec![
                "All market data delayed 20 minutes.".to_string(),
                "Get all the stories you need-to-know from the most powerful name in news delivered first thing every morning to your inbox Subscribed You've successfully subscribed to this newsletter!".to_string(),
            ],
            strip_pattern: Some(
                r"This material may not be published, broadcast, rewritten,\s*or redistributed\. ©\d{4} FOX News Network, LLC\. All rights reserved\.".to_string(),
            ),
            ..BodyRule::within("div.article-body", "p")
        },
    }
}
