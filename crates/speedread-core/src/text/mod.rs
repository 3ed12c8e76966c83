//! Text pipeline: normalization, punctuation stripping, ORP placement and
//! tokenization into positioned word/break tokens.

mod normalize;
mod orp;
mod punctuation;
mod tokenizer;

pub use normalize::normalize;
pub use orp::{OrpParts, locate, orp_index};
pub use punctuation::{PunctuationSplit, split_punctuation};
pub use tokenizer::{
    PARAGRAPH_MARK, Token, TokenKind, TokenizedText, token_at_offset, tokenize, word_tokens,
};
