use crate::analysis::token::Token;
use unicode_segmentation::UnicodeSegmentation;

pub trait Tokenizer: Send + Sync {
    fn tokenize(&self, text: &str) -> Vec<Token>;

    fn name(&self) -> &str;
}

/// Standard Unicode tokenizer.
///
/// Words come from Unicode word segmentation and are then split again on
/// every non-alphanumeric character, so `"PHP & Elasticsearch"` and
/// `"search-engine's"` both break into plain alphanumeric runs. Case is left
/// alone; lowercasing is a filter.
#[derive(Debug, Clone)]
pub struct StandardTokenizer {
    pub max_token_length: usize,
}

impl Default for StandardTokenizer {
    fn default() -> Self {
        StandardTokenizer {
            max_token_length: 255,
        }
    }
}

impl StandardTokenizer {
    pub fn new(max_token_length: usize) -> Self {
        StandardTokenizer {
            max_token_length: max_token_length.max(1),
        }
    }

    fn push_run(&self, run: &str, offset: usize, position: &mut u32, tokens: &mut Vec<Token>) {
        // Overlong runs are emitted in max_token_length chunks.
        let mut chunk_start = 0;
        let mut chars = 0;
        for (idx, _) in run.char_indices() {
            if chars == self.max_token_length {
                tokens.push(Token::new(run[chunk_start..idx].to_string(), *position, offset + chunk_start));
                *position += 1;
                chunk_start = idx;
                chars = 0;
            }
            chars += 1;
        }
        if chunk_start < run.len() {
            tokens.push(Token::new(run[chunk_start..].to_string(), *position, offset + chunk_start));
            *position += 1;
        }
    }
}

impl Tokenizer for StandardTokenizer {
    fn tokenize(&self, text: &str) -> Vec<Token> {
        let mut tokens = Vec::new();
        let mut position = 0u32;

        for (word_offset, word) in text.unicode_word_indices() {
            let mut run_start: Option<usize> = None;

            for (idx, c) in word.char_indices() {
                match (c.is_alphanumeric(), run_start) {
                    (true, None) => run_start = Some(idx),
                    (false, Some(start)) => {
                        self.push_run(&word[start..idx], word_offset + start, &mut position, &mut tokens);
                        run_start = None;
                    }
                    _ => {}
                }
            }

            if let Some(start) = run_start {
                self.push_run(&word[start..], word_offset + start, &mut position, &mut tokens);
            }
        }

        tokens
    }

    fn name(&self) -> &str {
        "standard"
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn texts(tokens: &[Token]) -> Vec<&str> {
        tokens.iter().map(|t| t.text.as_str()).collect()
    }

    #[test]
    fn splits_on_non_alphanumeric() {
        let tokens = StandardTokenizer::default().tokenize("PHP & Elasticsearch, search-engine's v2");
        assert_eq!(texts(&tokens), vec!["PHP", "Elasticsearch", "search", "engine", "s", "v2"]);
    }

    #[test]
    fn records_offsets_and_positions() {
        let text = "New Search Trends";
        let tokens = StandardTokenizer::default().tokenize(text);
        assert_eq!(tokens.len(), 3);
        assert_eq!(tokens[1].position, 1);
        assert_eq!(&text[tokens[2].offset..tokens[2].offset + tokens[2].length], "Trends");
    }

    #[test]
    fn chunks_overlong_tokens() {
        let tokens = StandardTokenizer::new(4).tokenize("abcdefghij");
        assert_eq!(texts(&tokens), vec!["abcd", "efgh", "ij"]);
        assert_eq!(tokens[2].offset, 8);
    }

    #[test]
    fn empty_and_punctuation_only_input() {
        assert!(StandardTokenizer::default().tokenize("").is_empty());
        assert!(StandardTokenizer::default().tokenize(" -- & !").is_empty());
    }
}
