//! Word dwell times derived from the reading rate and punctuation.

pub const COMMA_MULTIPLIER: f64 = 1.5;
pub const SEMICOLON_MULTIPLIER: f64 = 1.5;
pub const COLON_MULTIPLIER: f64 = 1.5;
pub const PERIOD_MULTIPLIER: f64 = 2.0;
pub const QUESTION_MULTIPLIER: f64 = 2.0;
pub const EXCLAMATION_MULTIPLIER: f64 = 2.0;
pub const PARAGRAPH_MULTIPLIER: f64 = 2.5;

/// Nominal dwell time of one word in milliseconds.
pub fn base_interval_ms(wpm: u16) -> f64 {
    60_000.0 / f64::from(wpm.max(1))
}

/// Extra dwell factor for a token, keyed on its last visible character.
pub fn punctuation_multiplier(display: &str, is_break: bool) -> f64 {
    if is_break {
        return PARAGRAPH_MULTIPLIER;
    }

    match display.trim_end().chars().next_back() {
        Some(',') => COMMA_MULTIPLIER,
        Some(';') => SEMICOLON_MULTIPLIER,
        Some(':') => COLON_MULTIPLIER,
        Some('.') => PERIOD_MULTIPLIER,
        Some('?') => QUESTION_MULTIPLIER,
        Some('!') => EXCLAMATION_MULTIPLIER,
        _ => 1.0,
    }
}

/// Milliseconds to hold a token before advancing.
///
/// Without punctuation pauses this is the unrounded base interval; with them
/// the scaled value is rounded to a whole millisecond.
pub fn delay_ms(wpm: u16, display: &str, is_break: bool, punctuation_pause: bool) -> f64 {
    let base = base_interval_ms(wpm);
    if !punctuation_pause {
        return base;
    }

    (base * punctuation_multiplier(display, is_break)).round()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn base_interval_is_exact() {
        assert_eq!(base_interval_ms(60), 1000.0);
        assert_eq!(base_interval_ms(300), 200.0);
        assert_eq!(base_interval_ms(600), 100.0);
        assert_eq!(base_interval_ms(50), 1200.0);
        assert_eq!(base_interval_ms(1000), 60.0);
    }

    #[test]
    fn base_interval_matches_division_across_range() {
        for wpm in 50..=1000u16 {
            assert_eq!(base_interval_ms(wpm), 60_000.0 / f64::from(wpm));
        }
    }

    #[test]
    fn clause_punctuation() {
        assert_eq!(punctuation_multiplier("well,", false), 1.5);
        assert_eq!(punctuation_multiplier("thus;", false), 1.5);
        assert_eq!(punctuation_multiplier("note:", false), 1.5);
    }

    #[test]
    fn sentence_punctuation() {
        assert_eq!(punctuation_multiplier("end.", false), 2.0);
        assert_eq!(punctuation_multiplier("why?", false), 2.0);
        assert_eq!(punctuation_multiplier("wow!", false), 2.0);
    }

    #[test]
    fn only_last_visible_character_counts() {
        assert_eq!(punctuation_multiplier("end.  ", false), 2.0);
        assert_eq!(punctuation_multiplier("\"end.\"", false), 1.0);
        assert_eq!(punctuation_multiplier("e.g", false), 1.0);
        assert_eq!(punctuation_multiplier("", false), 1.0);
    }

    #[test]
    fn breaks_use_paragraph_factor() {
        assert_eq!(punctuation_multiplier("¶", true), 2.5);
        assert_eq!(punctuation_multiplier("end.", true), 2.5);
    }

    #[test]
    fn delay_scales_only_when_enabled() {
        assert_eq!(delay_ms(300, "hello.", false, true), 400.0);
        assert_eq!(delay_ms(300, "hello.", false, false), 200.0);
        assert_eq!(delay_ms(300, "hello", false, true), 200.0);
        assert_eq!(delay_ms(300, "¶", true, true), 500.0);
        assert_eq!(delay_ms(300, "¶", true, false), 200.0);
    }

    #[test]
    fn scaled_delay_is_rounded() {
        // 60000 / 7 = 8571.43; * 1.5 = 12857.14
        assert_eq!(delay_ms(7, "a,", false, true), 12857.0);
        assert_eq!(delay_ms(7, "a", false, false), 60_000.0 / 7.0);
    }
}
