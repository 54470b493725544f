//! NBC News politics scraper.
//!
//! Video and live-blog pages have no `<time>` element; those records have no
//! date and are dropped. The raw `datetime` value has its weekday prefix and
//! zone suffix sliced off.

use super::rules::{BodyRule, DateRule, DateSource, ListingRule, OutletRules, TitleSource};

pub fn rules() -> OutletRules {
    OutletRules {
        publisher: "nbc".to_string(),
        listing: ListingRule {
            url: "https://www.nbcnews.com/politics".to_string(),
            item_selector: "h2.teaseCard__headline, h2.title___2T5qK".to_string(),
            anchor_selector: "a".to_string(),
            base_url: "https://www.nbcnews.com".to_string(),
            max_items: None,
            include: vec![],
            exclude: vec![],
            relative_only: false,
        },
        title: TitleSource::ListingAnchor,
        date: DateRule {
            trim_start: 4,
            trim_end: 24,
            ..DateRule::new(DateSource::TimeDatetime)
        },
        body: BodyRule::paragraphs("div.article-body__content"),
    }
}
