use crate::analysis::token::Token;

/// One stage of an analyzer chain after the tokenizer. Filters may rewrite
/// or drop tokens but never reorder them.
pub trait TokenFilter: Send + Sync {
    fn filter(&self, tokens: Vec<Token>) -> Vec<Token>;

    fn name(&self) -> &str;
}
