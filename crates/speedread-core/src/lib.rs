//! Portable RSVP reading core: tokenizer, ORP placement, word timing and the
//! playback engine. Hosts supply a [`engine::Scheduler`] and render snapshots.

pub mod engine;
pub mod input;
pub mod settings;
pub mod text;
pub mod timing;

pub use engine::{
    EngineSnapshot, ManualScheduler, PlaybackState, ReaderEngine, Scheduler, SubscriptionId,
};
pub use settings::{ReaderSettings, ReadingMode, SettingsPatch};
pub use text::{OrpParts, Token, TokenKind, TokenizedText};
