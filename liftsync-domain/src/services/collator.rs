// Collator
// Indexes walked pages by traversal index and flattens their items in order.

use std::collections::BTreeMap;

use crate::entities::{Page, Record};

pub type Collation = BTreeMap<usize, Page>;

pub fn collate(pages: impl IntoIterator<Item = Page>) -> Collation {
    pages.into_iter().map(|page| (page.index, page)).collect()
}

/// Items of every page, ascending page index, original item order within a page.
pub fn flatten(collated: Collation) -> Vec<Record> {
    collated.into_values().flat_map(|page| page.items).collect()
}

#[cfg(test)]
mod tests {
    use serde_json::json;

    use super::*;

    fn record(tag: &str) -> Record {
        serde_json::from_value(json!({ "id": tag })).expect("record")
    }

    fn page(index: usize, tags: &[&str]) -> Page {
        Page {
            index,
            cursor: None,
            items: tags.iter().map(|tag| record(tag)).collect(),
            has_more: false,
        }
    }

    #[test]
    fn flatten_concatenates_in_page_order() {
        let collated = collate(vec![page(0, &["a", "b"]), page(1, &["c"])]);
        assert_eq!(flatten(collated), vec![record("a"), record("b"), record("c")]);
    }

    #[test]
    fn collation_orders_by_index_not_arrival() {
        let collated = collate(vec![page(2, &["e"]), page(0, &["a"]), page(1, &["c", "d"])]);
        assert_eq!(collated.keys().copied().collect::<Vec<_>>(), vec![0, 1, 2]);
        assert_eq!(
            flatten(collated),
            vec![record("a"), record("c"), record("d"), record("e")]
        );
    }

    #[test]
    fn empty_pages_contribute_nothing() {
        let collated = collate(vec![page(0, &[]), page(1, &["x"]), page(2, &[])]);
        assert_eq!(flatten(collated), vec![record("x")]);
        assert!(flatten(Collation::new()).is_empty());
    }
}
