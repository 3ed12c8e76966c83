use std::path::PathBuf;

use clap::{Parser, ValueEnum};
use speedread_core::{ReaderSettings, ReadingMode, SettingsPatch, settings::clamp_wpm};

#[derive(Clone, Copy, Debug, Eq, PartialEq, ValueEnum)]
pub(super) enum ModeArg {
    Autoplay,
    Hold,
}

impl From<ModeArg> for ReadingMode {
    fn from(mode: ModeArg) -> Self {
        match mode {
            ModeArg::Autoplay => ReadingMode::Autoplay,
            ModeArg::Hold => ReadingMode::HoldSpace,
        }
    }
}

#[derive(Debug, Parser)]
#[command(author, version, about = "Read a text file one word at a time")]
pub(super) struct Cli {
    /// UTF-8 text file to read.
    #[arg(value_name = "FILE")]
    pub input: PathBuf,

    /// Reading rate in words per minute (50-1000).
    #[arg(short, long)]
    pub wpm: Option<u16>,

    #[arg(short, long, value_enum)]
    pub mode: Option<ModeArg>,

    /// Hold every word for the same time regardless of punctuation.
    #[arg(long, overrides_with = "punctuation_pause")]
    pub no_punctuation_pause: bool,

    /// Lengthen pauses after punctuation and paragraph breaks.
    #[arg(long, overrides_with = "no_punctuation_pause")]
    pub punctuation_pause: bool,

    /// Step back this many tokens when resuming from a pause; 0 disables it.
    #[arg(long, value_name = "WORDS")]
    pub soft_rewind: Option<usize>,

    /// Token index to start from; overrides saved progress.
    #[arg(long, value_name = "INDEX")]
    pub start: Option<usize>,

    /// Ignore and do not write the progress file.
    #[arg(long)]
    pub no_resume: bool,

    /// Start playing immediately instead of waiting for a toggle.
    #[arg(long)]
    pub autostart: bool,
}

impl Cli {
    /// Apply the flags given on the command line on top of `base`, which is
    /// either the defaults or the settings saved with the last session.
    pub(super) fn settings(&self, base: ReaderSettings) -> ReaderSettings {
        let mut patch = SettingsPatch::new();
        if let Some(wpm) = self.wpm {
            patch = patch.wpm(clamp_wpm(i32::from(wpm)));
        }
        if let Some(mode) = self.mode {
            patch = patch.mode(mode.into());
        }
        if self.no_punctuation_pause {
            patch = patch.punctuation_pause(false);
        } else if self.punctuation_pause {
            patch = patch.punctuation_pause(true);
        }
        if let Some(words) = self.soft_rewind {
            patch = patch.soft_rewind(words > 0).soft_rewind_words(words);
        }
        base.merged(patch)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_match_reader_defaults() {
        let cli = Cli::parse_from(["speedread", "book.txt"]);
        assert_eq!(cli.settings(ReaderSettings::default()), ReaderSettings::default());
        assert!(!cli.autostart);
        assert_eq!(cli.start, None);
    }

    #[test]
    fn flags_map_onto_settings() {
        let cli = Cli::parse_from([
            "speedread",
            "book.txt",
            "--wpm",
            "5000",
            "--mode",
            "hold",
            "--no-punctuation-pause",
            "--soft-rewind",
            "4",
        ]);
        let settings = cli.settings(ReaderSettings::default());
        assert_eq!(settings.wpm, 1000);
        assert_eq!(settings.mode, ReadingMode::HoldSpace);
        assert!(!settings.punctuation_pause);
        assert!(settings.soft_rewind);
        assert_eq!(settings.soft_rewind_words, 4);
    }

    #[test]
    fn saved_settings_survive_unless_overridden() {
        let saved = ReaderSettings {
            wpm: 450,
            mode: ReadingMode::HoldSpace,
            punctuation_pause: false,
            soft_rewind: true,
            soft_rewind_words: 5,
        };

        let cli = Cli::parse_from(["speedread", "book.txt"]);
        assert_eq!(cli.settings(saved), saved);

        let cli = Cli::parse_from([
            "speedread",
            "book.txt",
            "--mode",
            "autoplay",
            "--punctuation-pause",
            "--soft-rewind",
            "0",
        ]);
        let settings = cli.settings(saved);
        assert_eq!(settings.wpm, 450);
        assert_eq!(settings.mode, ReadingMode::Autoplay);
        assert!(settings.punctuation_pause);
        assert!(!settings.soft_rewind);
    }
}
