//! Politico politics scraper.
//!
//! Listing `<h3>` headlines link to several content types; only `/news/`
//! stories are followed. The headline is read from the article page.

use super::rules::{BodyRule, DateRule, DateSource, ListingRule, OutletRules, TitleSource};

pub fn rules() -> OutletRules {
    OutletRules {
        publisher: "politico".to_string(),
        listing: ListingRule {
            url: "https://www.politico.com/politics".to_string(),
            item_selector: "h3".to_string(),
            anchor_selector: "a".to_string(),
            base_url: "https://www.politico.com".to_string(),
            max_items: None,
            include: vec!["/news/".to_string()],
            exclude: vec![],
            relative_only: false,
        },
        title: TitleSource::Selector("h2.headline".to_string()),
        date: DateRule {
            trim_end: 9,
            ..DateRule::new(DateSource::TimeDatetime)
        },
        body: BodyRule::paragraphs("p.story-text__paragraph"),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::scrapers::extract::{CompiledRules, extract_article, extract_listing};

    #[test]
    fn test_politico_fixture() {
        let compiled = CompiledRules::new(&rules()).unwrap();
        let listing = r#"
            <h3><a href="https://www.politico.com/news/2020/10/01/court-pick-424">Court pick</a></h3>
            <h3><a href="https://www.politico.com/newsletters/playbook">Playbook</a></h3>
        "#;
        let entries = extract_listing(&compiled, listing);
        assert_eq!(entries.len(), 1);

        let article = r#"
            <h2 class="headline"> Senate sets date
              for court hearing </h2>
            <time datetime="2020-10-01 12:00:00">10/01/2020</time>
            <p class="story-text__paragraph">Hearings begin Monday.</p>
            <p class="caption">Photo credit</p>
        "#;
        let record = extract_article(&compiled, &entries[0], article).unwrap();
        assert_eq!(record.publisher, "politico");
        assert_eq!(record.title, "Senate sets date for court hearing");
        assert_eq!(record.date.as_deref(), Some("2020-10-01"));
        assert_eq!(record.body_text, "Hearings begin Monday.");
    }
}
