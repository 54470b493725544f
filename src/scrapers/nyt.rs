//! New York Times politics scraper.
//!
//! Headlines on the section page carry generated CSS class names, so these
//! rules are the most likely to need a config override after a redesign.
//! Body text is read from the story column blocks with the inline
//! "advertisement" block ignored.

use super::rules::{BodyRule, DateRule, DateSource, ListingRule, OutletRules, TitleSource};

pub fn rules() -> OutletRules {
    OutletRules {
        publisher: "new_york_times".to_string(),
        listing: ListingRule {
            url: "https://www.nytimes.com/section/politics".to_string(),
            item_selector: "h2.css-l2vidh.e4e4i5l1".to_string(),
            anchor_selector: "a".to_string(),
            base_url: "https://www.nytimes.com".to_string(),
            max_items: None,
            include: vec![],
            exclude: vec![],
            relative_only: false,
        },
        title: TitleSource::ListingAnchor,
        date: DateRule {
            trim_end: 15,
            ..DateRule::new(DateSource::TimeDatetime)
        },
        body: BodyRule {
            remove: vec!["div.css-9tf9ac".to_string()],
            ..BodyRule::paragraphs("div.css-53u6y8, div.css-1fanzo5")
        },
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::scrapers::extract::{CompiledRules, extract_article, extract_listing};

    #[test]
    fn test_nyt_fixture() {
        let compiled = CompiledRules::new(&rules()).unwrap();
        let listing = r#"
            <h2 class="css-l2vidh e4e4i5l1"><a href="/2020/10/01/us/politics/debate.html">Debate Takeaways</a></h2>
            <h2 class="css-other"><a href="/2020/10/01/opinion/x.html">Opinion</a></h2>
        "#;
        let entries = extract_listing(&compiled, listing);
        assert_eq!(entries.len(), 1);
        assert_eq!(
            entries[0].link,
            "https://www.nytimes.com/2020/10/01/us/politics/debate.html"
        );

        let article = r#"
            <time datetime="2020-10-01T05:00:00-04:00">Oct. 1, 2020</time>
            <div class="css-53u6y8"><p>Opening.</p></div>
            <div class="css-9tf9ac"><p>Advertisement</p></div>
            <div class="css-1fanzo5"><p>Closing.</p></div>
        "#;
        let record = extract_article(&compiled, &entries[0], article).unwrap();
        assert_eq!(record.publisher, "new_york_times");
        assert_eq!(record.title, "Debate Takeaways");
        assert_eq!(record.date.as_deref(), Some("2020-10-01"));
        assert_eq!(record.body_text, "Opening. Closing.");
    }
}
