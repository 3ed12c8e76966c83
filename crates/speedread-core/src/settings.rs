//! Reader settings owned by the playback engine.

use log::debug;

pub const MIN_WPM: u16 = 50;
pub const MAX_WPM: u16 = 1000;
/// Rate change applied per faster/slower input.
pub const WPM_STEP: u16 = 25;

#[derive(Clone, Copy, Debug, Default, Eq, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "kebab-case"))]
pub enum ReadingMode {
    /// Transport controls only; hold events are ignored.
    #[default]
    Autoplay,
    /// Words advance only while a hold is active.
    HoldSpace,
}

#[derive(Clone, Copy, Debug, Eq, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct ReaderSettings {
    pub wpm: u16,
    pub mode: ReadingMode,
    pub punctuation_pause: bool,
    pub soft_rewind: bool,
    pub soft_rewind_words: usize,
}

impl Default for ReaderSettings {
    fn default() -> Self {
        Self {
            wpm: 300,
            mode: ReadingMode::Autoplay,
            punctuation_pause: true,
            soft_rewind: false,
            soft_rewind_words: 3,
        }
    }
}

impl ReaderSettings {
    /// Apply the fields present in `patch`. `wpm` is clamped to
    /// `MIN_WPM..=MAX_WPM`.
    pub fn merge(&mut self, patch: SettingsPatch) {
        if let Some(wpm) = patch.wpm {
            self.wpm = clamp_wpm(i32::from(wpm));
        }
        if let Some(mode) = patch.mode {
            self.mode = mode;
        }
        if let Some(enabled) = patch.punctuation_pause {
            self.punctuation_pause = enabled;
        }
        if let Some(enabled) = patch.soft_rewind {
            self.soft_rewind = enabled;
        }
        if let Some(words) = patch.soft_rewind_words {
            self.soft_rewind_words = words;
        }
        debug!("settings merged: {:?}", self);
    }

    pub fn merged(mut self, patch: SettingsPatch) -> Self {
        self.merge(patch);
        self
    }

    /// Same settings with `wpm` pulled into `MIN_WPM..=MAX_WPM`.
    pub fn clamped(self) -> Self {
        Self {
            wpm: clamp_wpm(i32::from(self.wpm)),
            ..self
        }
    }
}

pub fn clamp_wpm(wpm: i32) -> u16 {
    wpm.clamp(i32::from(MIN_WPM), i32::from(MAX_WPM)) as u16
}

/// Partial settings update; `None` fields keep their current value.
#[derive(Clone, Copy, Debug, Default, Eq, PartialEq)]
pub struct SettingsPatch {
    pub wpm: Option<u16>,
    pub mode: Option<ReadingMode>,
    pub punctuation_pause: Option<bool>,
    pub soft_rewind: Option<bool>,
    pub soft_rewind_words: Option<usize>,
}

impl SettingsPatch {
    pub const fn new() -> Self {
        Self {
            wpm: None,
            mode: None,
            punctuation_pause: None,
            soft_rewind: None,
            soft_rewind_words: None,
        }
    }

    pub const fn wpm(mut self, wpm: u16) -> Self {
        self.wpm = Some(wpm);
        self
    }

    pub const fn mode(mut self, mode: ReadingMode) -> Self {
        self.mode = Some(mode);
        self
    }

    pub const fn punctuation_pause(mut self, enabled: bool) -> Self {
        self.punctuation_pause = Some(enabled);
        self
    }

    pub const fn soft_rewind(mut self, enabled: bool) -> Self {
        self.soft_rewind = Some(enabled);
        self
    }

    pub const fn soft_rewind_words(mut self, words: usize) -> Self {
        self.soft_rewind_words = Some(words);
        self
    }
}
