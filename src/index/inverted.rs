use std::collections::HashMap;
use crate::analysis::token::Token;
use crate::core::types::DocId;
use crate::index::posting::{Posting, PostingList};

/// Term representation: a normalized token scoped to the field it came from.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct Term {
    pub field: String,
    pub text: String,
}

impl Term {
    pub fn new(field: &str, text: &str) -> Self {
        Term {
            field: field.to_string(),
            text: text.to_string(),
        }
    }
}

/// Inverted index structure. Derived from the document store; a posting list
/// is dropped as soon as its last document leaves it.
#[derive(Debug, Default)]
pub struct InvertedIndex {
    pub postings: HashMap<Term, PostingList>,
    pub total_tokens: usize,
}

impl InvertedIndex {
    pub fn new() -> Self {
        InvertedIndex {
            postings: HashMap::new(),
            total_tokens: 0,
        }
    }

    /// Add the analyzed tokens of one field of one document.
    pub fn add_document(&mut self, doc_id: DocId, field: &str, tokens: &[Token]) {
        for (text, term_freq) in group_tokens(tokens) {
            self.postings.entry(Term::new(field, text))
                .or_insert_with(PostingList::new)
                .add_posting(Posting { doc_id, term_freq });
        }

        self.total_tokens += tokens.len();
    }

    /// Undo [`InvertedIndex::add_document`] for the same tokens.
    pub fn remove_document(&mut self, doc_id: DocId, field: &str, tokens: &[Token]) {
        for (text, _) in group_tokens(tokens) {
            let term = Term::new(field, text);
            if let Some(list) = self.postings.get_mut(&term) {
                list.remove(doc_id);
                if list.is_empty() {
                    self.postings.remove(&term);
                }
            }
        }

        self.total_tokens = self.total_tokens.saturating_sub(tokens.len());
    }

    pub fn search_term(&self, term: &Term) -> Option<&PostingList> {
        self.postings.get(term)
    }

    pub fn contains(&self, term: &Term, doc_id: DocId) -> bool {
        self.postings.get(term).is_some_and(|list| list.contains(doc_id))
    }

    pub fn iter(&self) -> impl Iterator<Item = (&Term, &PostingList)> {
        self.postings.iter()
    }

    pub fn term_count(&self) -> usize {
        self.postings.len()
    }

    pub fn posting_count(&self) -> usize {
        self.postings.values().map(PostingList::len).sum()
    }

    /// Every term whose posting list mentions `doc_id`. Full scan.
    pub fn terms_for_document(&self, doc_id: DocId) -> Vec<&Term> {
        self.postings
            .iter()
            .filter(|(_, list)| list.contains(doc_id))
            .map(|(term, _)| term)
            .collect()
    }
}

/// Distinct token texts with their frequency, in first-seen order.
fn group_tokens(tokens: &[Token]) -> Vec<(&str, u32)> {
    let mut order: Vec<(&str, u32)> = Vec::new();
    let mut index: HashMap<&str, usize> = HashMap::new();

    for token in tokens {
        match index.get(token.text.as_str()) {
            Some(&slot) => order[slot].1 += 1,
            None => {
                index.insert(token.text.as_str(), order.len());
                order.push((token.text.as_str(), 1));
            }
        }
    }

    order
}

#[cfg(test)]
mod tests {
    use super::*;

    fn tokens(words: &[&str]) -> Vec<Token> {
        words.iter()
            .enumerate()
            .map(|(i, w)| Token::new(w.to_string(), i as u32, 0))
            .collect()
    }

    #[test]
    fn term_frequencies_are_counted_per_field() {
        let mut index = InvertedIndex::new();
        index.add_document(DocId(1), "title", &tokens(&["search", "engines", "search"]));
        index.add_document(DocId(1), "body", &tokens(&["search"]));

        let title = index.search_term(&Term::new("title", "search")).unwrap();
        assert_eq!(title.get(DocId(1)).unwrap().term_freq, 2);
        assert_eq!(index.search_term(&Term::new("body", "search")).unwrap().len(), 1);
        assert_eq!(index.total_tokens, 4);
    }

    #[test]
    fn removal_prunes_empty_lists() {
        let mut index = InvertedIndex::new();
        let words = tokens(&["advanced", "elasticsearch"]);
        index.add_document(DocId(2), "title", &words);
        index.add_document(DocId(3), "title", &tokens(&["elasticsearch"]));

        index.remove_document(DocId(2), "title", &words);

        assert!(index.search_term(&Term::new("title", "advanced")).is_none());
        assert!(!index.contains(&Term::new("title", "elasticsearch"), DocId(2)));
        assert!(index.contains(&Term::new("title", "elasticsearch"), DocId(3)));
        assert!(index.terms_for_document(DocId(2)).is_empty());
    }
}
