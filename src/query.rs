use crate::models::NewsItem;

/// Which subset of the news table a view wants. All variants preserve the
/// original row order; none re-sort.
#[derive(Debug, Clone)]
pub enum Predicate {
    /// No restriction.
    Any,
    /// Case-insensitive substring over title or body.
    Text(String),
    /// Exact match on the topic cluster label.
    Topic(String),
    /// Case-insensitive substring of the company name in the title.
    Company(String),
}

impl Predicate {
    /// An empty or whitespace-only search box means "no filter".
    pub fn from_search(query: Option<&str>) -> Self {
        match query {
            Some(q) if !q.trim().is_empty() => Predicate::Text(q.trim().to_string()),
            _ => Predicate::Any,
        }
    }

    pub fn matches(&self, item: &NewsItem) -> bool {
        match self {
            Predicate::Any => true,
            Predicate::Text(q) => {
                let q = q.to_lowercase();
                item.title.to_lowercase().contains(&q) || item.body.to_lowercase().contains(&q)
            }
            Predicate::Topic(t) => item.cluster == *t,
            Predicate::Company(name) => {
                item.title.to_lowercase().contains(&name.to_lowercase())
            }
        }
    }
}

pub fn filter<'a>(records: &'a [NewsItem], predicate: &Predicate) -> Vec<&'a NewsItem> {
    records.iter().filter(|r| predicate.matches(r)).collect()
}

/// 1-based page slice `[(page-1)*size, page*size)`, clipped to the available
/// length. A page past the end is an empty slice, not an error.
pub fn paginate<T>(records: &[T], page: usize, page_size: usize) -> &[T] {
    let page = page.max(1);
    let page_size = page_size.max(1);
    let start = (page - 1).saturating_mul(page_size).min(records.len());
    let end = start.saturating_add(page_size).min(records.len());
    &records[start..end]
}

/// Upper bound for the page selector; mirrors the original UI's
/// `len / page_size + 1`.
pub fn page_count(len: usize, page_size: usize) -> usize {
    len / page_size.max(1) + 1
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::Sentiment;

    fn item(title: &str, body: &str, cluster: &str) -> NewsItem {
        NewsItem {
            title: title.to_string(),
            body: body.to_string(),
            date: "2024-01-01".to_string(),
            source: "Portal".to_string(),
            sentiment: Sentiment::Neutral,
            relevance: 0.5,
            keywords: String::new(),
            link: String::new(),
            cluster: cluster.to_string(),
            theme: "Geral".to_string(),
        }
    }

    fn numbered(n: usize) -> Vec<NewsItem> {
        (1..=n).map(|i| item(&format!("r{}", i), "", "c")).collect()
    }

    #[test]
    fn empty_predicate_is_identity() {
        let records = numbered(5);
        let view = filter(&records, &Predicate::from_search(None));
        assert_eq!(view.len(), 5);
        for (i, r) in view.iter().enumerate() {
            assert_eq!(r.title, format!("r{}", i + 1));
        }
        // Blank search text behaves the same.
        let view = filter(&records, &Predicate::from_search(Some("   ")));
        assert_eq!(view.len(), 5);
    }

    #[test]
    fn text_match_is_case_insensitive_over_title_and_body() {
        let records = vec![
            item("Acme opens plant", "details", "c"),
            item("Other news", "the ACME deal closed", "c"),
            item("Unrelated", "nothing here", "c"),
        ];
        let view = filter(&records, &Predicate::Text("acme".to_string()));
        assert_eq!(view.len(), 2);
        assert_eq!(view[0].title, "Acme opens plant");
        assert_eq!(view[1].title, "Other news");
    }

    #[test]
    fn topic_match_is_exact() {
        let records = vec![item("a", "", "energia"), item("b", "", "energia-jan")];
        let view = filter(&records, &Predicate::Topic("energia".to_string()));
        assert_eq!(view.len(), 1);
        assert_eq!(view[0].title, "a");
    }

    #[test]
    fn company_match_looks_only_at_titles() {
        let records = vec![
            item("Acme expands", "", "c"),
            item("Market dips", "Acme mentioned in passing", "c"),
        ];
        let view = filter(&records, &Predicate::Company("acme".to_string()));
        assert_eq!(view.len(), 1);
        assert_eq!(view[0].title, "Acme expands");
    }

    #[test]
    fn pages_concatenate_back_to_the_input() {
        let records = numbered(10);
        for page_size in [1, 3, 8, 10, 25] {
            let mut rebuilt = Vec::new();
            for page in 1..=page_count(records.len(), page_size) {
                rebuilt.extend(paginate(&records, page, page_size).iter());
            }
            assert_eq!(rebuilt.len(), records.len(), "page_size={}", page_size);
            for (a, b) in rebuilt.iter().zip(records.iter()) {
                assert_eq!(a.title, b.title);
            }
        }
    }

    #[test]
    fn second_page_of_ten_by_eight_is_the_tail() {
        let records = numbered(10);
        let page = paginate(&records, 2, 8);
        assert_eq!(page.len(), 2);
        assert_eq!(page[0].title, "r9");
        assert_eq!(page[1].title, "r10");
    }

    #[test]
    fn page_beyond_the_end_is_empty() {
        let records = numbered(10);
        assert!(paginate(&records, 7, 8).is_empty());
        assert!(paginate::<NewsItem>(&[], 1, 8).is_empty());
    }

    #[test]
    fn page_count_matches_the_ui_bound() {
        assert_eq!(page_count(0, 8), 1);
        assert_eq!(page_count(8, 8), 2);
        assert_eq!(page_count(10, 8), 2);
    }
}
