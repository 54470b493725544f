//! AP News politics scraper.
//!
//! Listing links are the headline anchors on
//! [apnews.com/apf-politics](https://apnews.com/apf-politics). Title and date
//! are read from Open Graph / article meta tags. Datelines such as
//! `WASHINGTON (AP) —` are stripped from the body.

use super::rules::{BodyRule, DateRule, DateSource, ListingRule, OutletRules, TitleSource};

pub fn rules() -> OutletRules {
    OutletRules {
        publisher: "AP".to_string(),
        listing: ListingRule {
            url: "https://apnews.com/apf-politics".to_string(),
            item_selector: "a[class^='Component-headline']".to_string(),
            anchor_selector: "a".to_string(),
            base_url: "https://apnews.com".to_string(),
            max_items: None,
            include: vec![],
            exclude: vec![],
            relative_only: false,
        },
        title: TitleSource::Meta("meta[property='og:title']".to_string()),
        date: DateRule::new(DateSource::Meta(
            "meta[property='article:published_time']".to_string(),
        )),
        body: BodyRule {
            strip_newlines: true,
            strip_phrases: vec![
                "___ Catch up on the 2020 election campaign with AP experts on our weekly politics podcast, “Ground Game.".to_string(),
            ],
            strip_pattern: Some(r"[A-Z][A-Z .,]* \(AP\) [-—]\s?".to_string()),
            ..BodyRule::paragraphs("div.Article p")
        },
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::scrapers::extract::{CompiledRules, extract_article, extract_listing};

    #[test]
    fn test_apnews_fixture() {
        let compiled = CompiledRules::new(&rules()).unwrap();
        let listing = r#"
            <div><a class="Component-headline-0-2-106" href="/article/abc123">Vote count</a></div>
            <div><a class="Component-link" href="/hub/politics">Hub</a></div>
        "#;
        let entries = extract_listing(&compiled, listing);
        assert_eq!(entries.len(), 1);
        assert_eq!(entries[0].link, "https://apnews.com/article/abc123");

        let article = r#"
            <meta property="og:title" content="Vote count continues">
            <meta property="article:published_time" content="2020-11-04T15:00:00Z">
            <div class="Article">
              <p>WASHINGTON (AP) — Officials kept counting.</p>
              <p>DETROIT (AP) - More later.</p>
            </div>
        "#;
        let record = extract_article(&compiled, &entries[0], article).unwrap();
        assert_eq!(record.publisher, "AP");
        assert_eq!(record.title, "Vote count continues");
        assert_eq!(record.date.as_deref(), Some("2020-11-04T15:00:00Z"));
        assert_eq!(record.body_text, "Officials kept counting. More later.");
    }
}
