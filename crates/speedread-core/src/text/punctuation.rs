/// A word split around its alphanumeric core.
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub struct PunctuationSplit<'a> {
    pub leading: &'a str,
    pub core: &'a str,
    pub trailing: &'a str,
}

// Alphabetic rather than the letter category: combining vowel signs such as
// Devanagari U+0940 stay attached to the core instead of being split off as
// trailing punctuation.
fn is_word_char(ch: char) -> bool {
    ch.is_alphanumeric()
}

/// Split `word` into leading punctuation, alphanumeric core and trailing
/// punctuation.
///
/// The leading span is measured first and the trailing span only from what
/// remains, so the two never overlap. A word made only of punctuation keeps
/// the whole input as its core with empty punctuation spans, which means the
/// three parts always concatenate back to `word`.
pub fn split_punctuation(word: &str) -> PunctuationSplit<'_> {
    let core_start = word
        .char_indices()
        .find(|&(_, ch)| is_word_char(ch))
        .map_or(word.len(), |(idx, _)| idx);

    if core_start == word.len() {
        return PunctuationSplit {
            leading: "",
            core: word,
            trailing: "",
        };
    }

    let rest = &word[core_start..];
    let core_len = rest
        .char_indices()
        .rev()
        .find(|&(_, ch)| is_word_char(ch))
        .map_or(0, |(idx, ch)| idx + ch.len_utf8());

    PunctuationSplit {
        leading: &word[..core_start],
        core: &rest[..core_len],
        trailing: &rest[core_len..],
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn parts(word: &str) -> (&str, &str, &str) {
        let split = split_punctuation(word);
        (split.leading, split.core, split.trailing)
    }

    #[test]
    fn strips_leading_punctuation() {
        assert_eq!(parts("\"Hello"), ("\"", "Hello", ""));
    }

    #[test]
    fn strips_trailing_punctuation() {
        assert_eq!(parts("world!"), ("", "world", "!"));
    }

    #[test]
    fn strips_both_sides() {
        assert_eq!(parts("\"Hello,\""), ("\"", "Hello", ",\""));
        assert_eq!(parts("...wait..."), ("...", "wait", "..."));
    }

    #[test]
    fn keeps_inner_punctuation() {
        assert_eq!(parts("don't"), ("", "don't", ""));
        assert_eq!(parts("(e.g.)"), ("(", "e.g", ".)"));
    }

    #[test]
    fn plain_word_is_all_core() {
        assert_eq!(parts("hello"), ("", "hello", ""));
    }

    #[test]
    fn unicode_letters_and_digits_are_core() {
        assert_eq!(parts("¿Qué?"), ("¿", "Qué", "?"));
        assert_eq!(parts("«мир»"), ("«", "мир", "»"));
        assert_eq!(parts("42%"), ("", "42", "%"));
    }

    #[test]
    fn combining_vowel_signs_stay_in_core() {
        assert_eq!(parts("की"), ("", "की", ""));
        assert_eq!(parts("(हिंदी)"), ("(", "हिंदी", ")"));
    }

    #[test]
    fn punctuation_only_word_falls_back_to_whole_input() {
        assert_eq!(parts("—"), ("", "—", ""));
        assert_eq!(parts("..."), ("", "...", ""));
        assert_eq!(parts(""), ("", "", ""));
    }
}
