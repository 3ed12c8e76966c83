/// Zero-width no-break space; files saved with a byte order mark start with it.
const BYTE_ORDER_MARK: char = '\u{FEFF}';

fn is_inline_space(ch: char) -> bool {
    ch.is_whitespace() || ch == BYTE_ORDER_MARK
}

/// Canonicalize raw text before tokenization.
///
/// CRLF and lone CR become LF, runs of three or more newlines collapse to a
/// single blank line, other whitespace runs (byte order marks included)
/// collapse to one space, and the result is trimmed. Applying it twice yields the same string.
pub fn normalize(raw: &str) -> String {
    let mut out = String::with_capacity(raw.len());
    let mut chars = raw.chars().peekable();
    let mut newline_run = 0usize;
    let mut in_blank = false;

    while let Some(ch) = chars.next() {
        let ch = if ch == '\r' {
            if chars.peek() == Some(&'\n') {
                chars.next();
            }
            '\n'
        } else {
            ch
        };

        if ch == '\n' {
            in_blank = false;
            newline_run += 1;
            if newline_run <= 2 {
                out.push('\n');
            }
            continue;
        }
        newline_run = 0;

        if is_inline_space(ch) {
            if !in_blank {
                out.push(' ');
                in_blank = true;
            }
            continue;
        }

        in_blank = false;
        out.push(ch);
    }

    let trimmed = out.trim_matches(is_inline_space);
    if trimmed.len() == out.len() {
        out
    } else {
        trimmed.to_owned()
    }
}

#[cfg(test)]
mod tests {
    use super::normalize;

    #[test]
    fn unifies_line_endings() {
        assert_eq!(normalize("a\r\nb\rc\nd"), "a\nb\nc\nd");
    }

    #[test]
    fn collapses_three_or_more_newlines() {
        assert_eq!(normalize("one\n\n\n\n\ntwo"), "one\n\ntwo");
        assert_eq!(normalize("one\r\n\r\n\r\ntwo"), "one\n\ntwo");
        assert_eq!(normalize("one\n\ntwo"), "one\n\ntwo");
    }

    #[test]
    fn collapses_inline_whitespace() {
        assert_eq!(normalize("a \t  b\u{00A0}\u{2003}c"), "a b c");
    }

    #[test]
    fn trims_edges() {
        assert_eq!(normalize("\n\n  hello world \t\n"), "hello world");
        assert_eq!(normalize(""), "");
        assert_eq!(normalize(" \n\t\r\n "), "");
    }

    #[test]
    fn strips_byte_order_mark() {
        assert_eq!(normalize("\u{FEFF}Hello world"), "Hello world");
        assert_eq!(normalize("\u{FEFF}\r\nHello"), "Hello");
        assert_eq!(normalize("a\u{FEFF}b"), "a b");
    }

    #[test]
    fn is_idempotent() {
        let samples = [
            "",
            "plain",
            "  a\r\n\r\n\r\n b \t c\n",
            "x\n \n \ny",
            "tail spaces   \n\n\n\n",
            "\u{3000}wide\u{3000}space",
        ];
        for sample in samples {
            let once = normalize(sample);
            assert_eq!(normalize(&once), once, "sample {sample:?}");
        }
    }
}
