//! Keyword index over control IDs, titles and statements.

use std::collections::HashMap;

use crate::models::Control;

/// Words of this many characters or fewer are not indexed.
const MIN_KEYWORD_CHARS: usize = 3;

/// Maps lowercase keywords to the IDs of the controls that contain them.
///
/// Each keyword keeps its control IDs in first-seen order without duplicates.
/// Only whole keywords are answered; partial and multi-word queries are left
/// to a full scan by the caller.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SearchIndex {
    entries: HashMap<String, Vec<String>>,
}

impl SearchIndex {
    /// Build an index from a set of controls.
    ///
    /// Pass controls in a stable order (the programs use ascending ID) to get
    /// a stable result order from [`SearchIndex::lookup`].
    pub fn build<'a, I>(controls: I) -> Self
    where
        I: IntoIterator<Item = &'a Control>,
    {
        let mut index = Self::default();

        for control in controls {
            index.add(&control.id.to_lowercase(), &control.id);

            for text in [&control.title, &control.description] {
                for word in text.to_lowercase().split_whitespace() {
                    if word.chars().count() > MIN_KEYWORD_CHARS {
                        index.add(word, &control.id);
                    }
                }
            }
        }

        index
    }

    fn add(&mut self, keyword: &str, control_id: &str) {
        let ids = self.entries.entry(keyword.to_string()).or_default();
        if !ids.iter().any(|id| id == control_id) {
            ids.push(control_id.to_string());
        }
    }

    /// Control IDs indexed under `keyword` (matched case-insensitively).
    pub fn lookup(&self, keyword: &str) -> Option<&[String]> {
        self.entries
            .get(&keyword.to_lowercase())
            .map(|ids| ids.as_slice())
    }

    /// Number of distinct keywords
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::Impact;

    fn control(id: &str, title: &str, description: &str) -> Control {
        let mut control = Control::new(id, title, Impact::High);
        control.description = description.to_string();
        control
    }

    fn sample() -> Vec<Control> {
        vec![
            control(
                "AC-1",
                "Access Control Policy and Procedures",
                "The organization develops an access control policy.",
            ),
            control(
                "AC-2",
                "Account Management",
                "Manage system access and user accounts.",
            ),
        ]
    }

    #[test]
    fn test_indexes_id_and_long_words() {
        let controls = sample();
        let index = SearchIndex::build(&controls);

        assert_eq!(index.lookup("ac-1"), Some(&["AC-1".to_string()][..]));
        assert_eq!(index.lookup("AC-2"), Some(&["AC-2".to_string()][..]));
        assert_eq!(index.lookup("policy"), Some(&["AC-1".to_string()][..]));
        // three-letter words are skipped
        assert!(index.lookup("and").is_none());
        assert!(index.lookup("the").is_none());
    }

    #[test]
    fn test_ids_deduplicated_in_first_seen_order() {
        let controls = sample();
        let index = SearchIndex::build(&controls);

        // "access" appears twice in AC-1 and once in AC-2
        assert_eq!(
            index.lookup("access"),
            Some(&["AC-1".to_string(), "AC-2".to_string()][..])
        );
    }

    #[test]
    fn test_tokens_keep_punctuation() {
        let controls = sample();
        let index = SearchIndex::build(&controls);

        assert!(index.lookup("policy.").is_some());
        assert!(index.lookup("accounts.").is_some());
        assert!(index.lookup("accounts").is_none());
        assert!(index.lookup("procedures").is_some());
    }

    #[test]
    fn test_rebuild_answers_identically() {
        let controls = sample();
        let first = SearchIndex::build(&controls);
        let second = SearchIndex::build(&controls);

        assert_eq!(first, second);
        assert_eq!(first.len(), second.len());
        assert!(!first.is_empty());
    }

    #[test]
    fn test_empty_index() {
        let index = SearchIndex::build(std::iter::empty::<&Control>());
        assert!(index.is_empty());
        assert!(index.lookup("access").is_none());
    }
}
