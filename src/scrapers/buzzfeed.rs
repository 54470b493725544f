//! BuzzFeed News politics scraper.
//!
//! Body text comes from the `subbuzz-text` modules, which embed inline CSS
//! blocks (`{...}`) that are removed with a pattern.

use super::rules::{BodyRule, DateRule, DateSource, ListingRule, OutletRules, TitleSource};

pub fn rules() -> OutletRules {
    OutletRules {
        publisher: "buzzfeed".to_string(),
        listing: ListingRule {
            url: "https://www.buzzfeednews.com/section/politics".to_string(),
            item_selector: "h2".to_string(),
            anchor_selector: "a".to_string(),
            base_url: "https://www.buzzfeednews.com".to_string(),
            max_items: Some(30),
            include: vec![],
            exclude: vec![],
            relative_only: false,
        },
        title: TitleSource::ListingAnchor,
        date: DateRule::new(DateSource::Selector(
            "div.news-article-header__timestamps".to_string(),
        )),
        body: BodyRule {
            strip_newlines: true,
            strip_pattern: Some(r" \{[^}]*\}".to_string()),
            ..BodyRule::paragraphs("div[data-module='subbuzz-text']")
        },
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::scrapers::extract::{CompiledRules, ListingEntry, extract_article};

    #[test]
    fn test_buzzfeed_fixture() {
        let compiled = CompiledRules::new(&rules()).unwrap();
        let entry = ListingEntry {
            link: "https://www.buzzfeednews.com/article/reporter/story".to_string(),
            title: "A Story".to_string(),
        };
        let article = r#"
            <div class="news-article-header__timestamps">
              Posted on October 1, 2020, at 9:00 a.m. ET
            </div>
            <div data-module="subbuzz-text"><p>First bit.</p> .x {color: red}</div>
            <div data-module="subbuzz-text"><p>Second bit.</p></div>
        "#;
        let record = extract_article(&compiled, &entry, article).unwrap();
        assert_eq!(record.publisher, "buzzfeed");
        assert_eq!(
            record.date.as_deref(),
            Some("Posted on October 1, 2020, at 9:00 a.m. ET")
        );
        assert_eq!(record.body_text, "First bit. .x Second bit.");
    }
}
