use core::ops::Range;

use log::debug;
use uuid::Uuid;

use super::{normalize::normalize, orp::orp_index, punctuation::split_punctuation};

/// Glyph shown in place of a paragraph break.
pub const PARAGRAPH_MARK: &str = "¶";

#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub enum TokenKind {
    Word,
    Break,
}

/// One unit of reading.
///
/// `char_start..char_end` is a byte range into the normalized text the token
/// came from; for words that slice equals `display`.
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct Token {
    pub id: Uuid,
    pub display: String,
    pub core: String,
    pub kind: TokenKind,
    pub orp_index: usize,
    pub char_start: usize,
    pub char_end: usize,
}

impl Token {
    fn word(display: &str, span: Range<usize>) -> Self {
        let core = split_punctuation(display).core;
        Self {
            id: Uuid::new_v4(),
            display: display.to_owned(),
            core: core.to_owned(),
            kind: TokenKind::Word,
            orp_index: orp_index(core),
            char_start: span.start,
            char_end: span.end,
        }
    }

    fn paragraph_break(span: Range<usize>) -> Self {
        Self {
            id: Uuid::new_v4(),
            display: PARAGRAPH_MARK.to_owned(),
            core: String::new(),
            kind: TokenKind::Break,
            orp_index: 0,
            char_start: span.start,
            char_end: span.end,
        }
    }

    pub fn is_break(&self) -> bool {
        self.kind == TokenKind::Break
    }

    pub fn span(&self) -> Range<usize> {
        self.char_start..self.char_end
    }
}

/// Result of [`tokenize`]: the normalized text and the tokens positioned in it.
#[derive(Clone, Debug, Default, Eq, PartialEq)]
pub struct TokenizedText {
    pub full_text: String,
    pub tokens: Vec<Token>,
}

/// Normalize `raw` and cut it into word tokens with a single break token
/// between consecutive paragraphs.
pub fn tokenize(raw: &str) -> TokenizedText {
    let full_text = normalize(raw);
    let mut tokens = Vec::new();
    let mut last_word_end: Option<usize> = None;

    for paragraph in paragraph_spans(&full_text) {
        let mut cursor = paragraph.start;
        let mut first_in_paragraph = true;

        while let Some(word) = next_word_at(&full_text, cursor, paragraph.end) {
            if first_in_paragraph {
                // Paragraphs with no words are folded into the surrounding break.
                if let Some(previous_end) = last_word_end {
                    tokens.push(Token::paragraph_break(previous_end..word.start));
                }
                first_in_paragraph = false;
            }

            tokens.push(Token::word(&full_text[word.clone()], word.clone()));
            last_word_end = Some(word.end);
            cursor = word.end;
        }
    }

    debug!(
        "tokenized {} bytes into {} tokens",
        full_text.len(),
        tokens.len()
    );

    TokenizedText { full_text, tokens }
}

/// Byte ranges of paragraphs, separated by runs of two or more newlines.
fn paragraph_spans(text: &str) -> Vec<Range<usize>> {
    let bytes = text.as_bytes();
    let mut spans = Vec::new();
    let mut start = 0usize;
    let mut cursor = 0usize;

    while cursor < bytes.len() {
        if bytes[cursor] != b'\n' {
            cursor += 1;
            continue;
        }

        let run_start = cursor;
        while cursor < bytes.len() && bytes[cursor] == b'\n' {
            cursor += 1;
        }
        if cursor - run_start >= 2 {
            spans.push(start..run_start);
            start = cursor;
        }
    }

    spans.push(start..bytes.len());
    spans
}

/// Next whitespace-delimited word starting at or after `cursor`, bounded by `end`.
fn next_word_at(text: &str, cursor: usize, end: usize) -> Option<Range<usize>> {
    let window = &text[cursor..end];
    let start = cursor + window.find(|ch: char| !ch.is_whitespace())?;
    let len = text[start..end]
        .find(char::is_whitespace)
        .unwrap_or(end - start);

    Some(start..start + len)
}

/// Index of the token covering byte `offset`.
///
/// Offsets in a gap resolve to the preceding token, offsets before the first
/// token (or any offset into an empty sequence) to `0`, and offsets past the
/// end to the last token.
pub fn token_at_offset(tokens: &[Token], offset: usize) -> usize {
    tokens
        .partition_point(|token| token.char_start <= offset)
        .saturating_sub(1)
}

/// Word tokens only, in document order.
pub fn word_tokens(tokens: &[Token]) -> impl Iterator<Item = &Token> {
    tokens.iter().filter(|token| token.kind == TokenKind::Word)
}
