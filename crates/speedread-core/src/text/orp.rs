use super::punctuation::split_punctuation;

/// Fixation index for a core word, by character count.
///
/// | chars | index |
/// |-------|-------|
/// | 0..=1 | 0 |
/// | 2..=5 | 1 |
/// | 6..=9 | 2 |
/// | 10..=13 | 3 |
/// | 14.. | 4 |
pub fn orp_index(core: &str) -> usize {
    match core.chars().count() {
        0..=1 => 0,
        2..=5 => 1,
        6..=9 => 2,
        10..=13 => 3,
        _ => 4,
    }
}

/// A displayed word cut around its ORP letter.
#[derive(Clone, Debug, Default, Eq, PartialEq)]
pub struct OrpParts {
    pub left: String,
    pub orp: String,
    pub right: String,
}

/// Cut `display` at `orp_index` (counted in characters of its core),
/// re-attaching leading punctuation on the left and trailing punctuation on
/// the right. Indices past the end of the core clamp to its last character.
pub fn locate(display: &str, orp_index: usize) -> OrpParts {
    if display.is_empty() {
        return OrpParts::default();
    }

    let split = split_punctuation(display);
    let char_count = split.core.chars().count();
    let index = orp_index.min(char_count.saturating_sub(1));

    let mut boundaries = split
        .core
        .char_indices()
        .map(|(idx, _)| idx)
        .chain(core::iter::once(split.core.len()))
        .skip(index);
    let orp_start = boundaries.next().unwrap_or(split.core.len());
    let orp_end = boundaries.next().unwrap_or(split.core.len());

    let mut left = String::with_capacity(split.leading.len() + orp_start);
    left.push_str(split.leading);
    left.push_str(&split.core[..orp_start]);

    let mut right = String::with_capacity(split.core.len() - orp_end + split.trailing.len());
    right.push_str(&split.core[orp_end..]);
    right.push_str(split.trailing);

    OrpParts {
        left,
        orp: split.core[orp_start..orp_end].to_owned(),
        right,
    }
}
