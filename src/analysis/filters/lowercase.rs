use crate::analysis::filter::TokenFilter;
use crate::analysis::token::Token;

/// Unicode lowercasing. Offsets keep pointing at the original text.
pub struct LowercaseFilter;

impl TokenFilter for LowercaseFilter {
    fn filter(&self, mut tokens: Vec<Token>) -> Vec<Token> {
        for token in tokens.iter_mut().filter(|t| t.text.chars().any(char::is_uppercase)) {
            token.text = token.text.to_lowercase();
        }
        tokens
    }

    fn name(&self) -> &str {
        "lowercase"
    }
}
