//! Pure playback state machine.
//!
//! [`transition`] mutates a [`MachineState`] for one [`Command`] and returns
//! the side effects the shell has to perform, in order. Nothing here touches a
//! timer or a listener, so every transition can be checked directly.

use std::sync::Arc;

use heapless::Vec as HeaplessVec;
use log::debug;

use crate::{
    settings::{ReaderSettings, ReadingMode, SettingsPatch, clamp_wpm},
    text::Token,
    timing,
};

/// Upper bound on effects produced by a single command.
pub const MAX_EFFECTS: usize = 4;

pub type Effects = HeaplessVec<Effect, MAX_EFFECTS>;

#[derive(Clone, Copy, Debug, Default, Eq, PartialEq)]
pub enum PlaybackState {
    #[default]
    Idle,
    Playing,
    Paused,
}

/// Externally visible engine state, emitted on every change.
#[derive(Clone, Debug, PartialEq)]
pub struct EngineSnapshot {
    pub tokens: Arc<[Token]>,
    pub current_index: usize,
    pub state: PlaybackState,
    pub settings: ReaderSettings,
    pub paused_at: Option<usize>,
}

impl EngineSnapshot {
    pub fn current_token(&self) -> Option<&Token> {
        self.tokens.get(self.current_index)
    }

    pub fn is_at_end(&self) -> bool {
        self.current_index + 1 >= self.tokens.len()
    }
}

#[derive(Clone, Debug, PartialEq)]
pub enum Command {
    Load {
        tokens: Arc<[Token]>,
        start_index: usize,
    },
    Play,
    Pause,
    Stop,
    TogglePlayPause,
    HoldStart,
    HoldEnd,
    StepForward(usize),
    StepBackward(usize),
    SeekTo(usize),
    AdjustWpm(i32),
    UpdateSettings(SettingsPatch),
    /// The outstanding scheduled advance fired.
    Advance,
}

#[derive(Clone, Debug, PartialEq)]
pub enum Effect {
    /// Drop the outstanding scheduled advance, if any.
    CancelPending,
    /// Issue the single outstanding advance after `delay_ms`.
    Schedule { delay_ms: f64 },
    Notify(EngineSnapshot),
}

#[derive(Clone, Debug)]
pub struct MachineState {
    tokens: Arc<[Token]>,
    current_index: usize,
    playback: PlaybackState,
    settings: ReaderSettings,
    paused_at: Option<usize>,
    advance_pending: bool,
}

impl Default for MachineState {
    fn default() -> Self {
        Self::new(ReaderSettings::default())
    }
}

impl MachineState {
    pub fn new(settings: ReaderSettings) -> Self {
        Self {
            tokens: Arc::from(Vec::new()),
            current_index: 0,
            playback: PlaybackState::Idle,
            settings: settings.clamped(),
            paused_at: None,
            advance_pending: false,
        }
    }

    pub fn snapshot(&self) -> EngineSnapshot {
        EngineSnapshot {
            tokens: Arc::clone(&self.tokens),
            current_index: self.current_index,
            state: self.playback,
            settings: self.settings,
            paused_at: self.paused_at,
        }
    }

    pub fn playback(&self) -> PlaybackState {
        self.playback
    }

    pub fn current_index(&self) -> usize {
        self.current_index
    }

    pub fn settings(&self) -> &ReaderSettings {
        &self.settings
    }

    pub fn tokens(&self) -> &Arc<[Token]> {
        &self.tokens
    }

    pub fn advance_pending(&self) -> bool {
        self.advance_pending
    }

    fn clamp_index(&self, index: usize) -> usize {
        index.min(self.tokens.len().saturating_sub(1))
    }

    fn is_playing(&self) -> bool {
        self.playback == PlaybackState::Playing
    }
}

fn emit(effects: &mut Effects, effect: Effect) {
    if effects.push(effect).is_err() {
        debug_assert!(false, "effect buffer overflow");
    }
}

fn notify(state: &MachineState, effects: &mut Effects) {
    emit(effects, Effect::Notify(state.snapshot()));
}

fn cancel_pending(state: &mut MachineState, effects: &mut Effects) {
    if state.advance_pending {
        state.advance_pending = false;
        emit(effects, Effect::CancelPending);
    }
}

/// Apply one command and return the effects to perform, in order.
pub fn transition(state: &mut MachineState, command: Command) -> Effects {
    let mut effects = Effects::new();

    match command {
        Command::Load {
            tokens,
            start_index,
        } => load(state, tokens, start_index, &mut effects),
        Command::Play => play(state, &mut effects),
        Command::Pause => pause(state, &mut effects),
        Command::Stop => stop(state, &mut effects),
        Command::TogglePlayPause => {
            if state.is_playing() {
                pause(state, &mut effects);
            } else {
                play(state, &mut effects);
            }
        }
        Command::HoldStart => {
            if state.settings.mode == ReadingMode::HoldSpace && !state.is_playing() {
                play(state, &mut effects);
            }
        }
        Command::HoldEnd => {
            if state.settings.mode == ReadingMode::HoldSpace && state.is_playing() {
                pause(state, &mut effects);
            }
        }
        Command::StepForward(count) => {
            let target = state.current_index.saturating_add(count);
            reposition(state, target, &mut effects);
        }
        Command::StepBackward(count) => {
            let target = state.current_index.saturating_sub(count);
            reposition(state, target, &mut effects);
        }
        Command::SeekTo(index) => reposition(state, index, &mut effects),
        Command::AdjustWpm(delta) => {
            let wpm = clamp_wpm(i32::from(state.settings.wpm).saturating_add(delta));
            update_settings(state, SettingsPatch::new().wpm(wpm), &mut effects);
        }
        Command::UpdateSettings(patch) => update_settings(state, patch, &mut effects),
        Command::Advance => advance(state, &mut effects),
    }

    effects
}

fn load(state: &mut MachineState, tokens: Arc<[Token]>, start_index: usize, effects: &mut Effects) {
    cancel_pending(state, effects);
    state.tokens = tokens;
    state.current_index = state.clamp_index(start_index);
    state.playback = PlaybackState::Idle;
    state.paused_at = None;
    debug!(
        "loaded {} tokens at index {}",
        state.tokens.len(),
        state.current_index
    );
    notify(state, effects);
}

fn play(state: &mut MachineState, effects: &mut Effects) {
    if state.is_playing() || state.tokens.is_empty() {
        return;
    }

    cancel_pending(state, effects);
    if state.playback == PlaybackState::Paused && state.settings.soft_rewind {
        let rewound = state
            .current_index
            .saturating_sub(state.settings.soft_rewind_words);
        debug!("soft rewind {} -> {}", state.current_index, rewound);
        state.current_index = rewound;
    }

    state.playback = PlaybackState::Playing;
    state.paused_at = None;
    schedule_next(state, effects);
    notify(state, effects);
}

fn pause(state: &mut MachineState, effects: &mut Effects) {
    if !state.is_playing() {
        return;
    }

    cancel_pending(state, effects);
    state.playback = PlaybackState::Paused;
    state.paused_at = Some(state.current_index);
    notify(state, effects);
}

fn stop(state: &mut MachineState, effects: &mut Effects) {
    cancel_pending(state, effects);
    state.playback = PlaybackState::Idle;
    state.paused_at = None;
    notify(state, effects);
}

/// Move to `target` (clamped), keeping the current play/pause status.
fn reposition(state: &mut MachineState, target: usize, effects: &mut Effects) {
    cancel_pending(state, effects);
    state.current_index = state.clamp_index(target);
    notify(state, effects);

    if state.is_playing() {
        schedule_next(state, effects);
    }
}

fn update_settings(state: &mut MachineState, patch: SettingsPatch, effects: &mut Effects) {
    state.settings.merge(patch);
    notify(state, effects);
}

fn advance(state: &mut MachineState, effects: &mut Effects) {
    if !state.is_playing() || !state.advance_pending {
        return;
    }

    state.advance_pending = false;
    state.current_index = state.clamp_index(state.current_index + 1);
    notify(state, effects);
    schedule_next(state, effects);
}

/// Issue the next advance, or pause when the last token is on screen.
fn schedule_next(state: &mut MachineState, effects: &mut Effects) {
    if !state.is_playing() {
        return;
    }

    if state.current_index + 1 >= state.tokens.len() {
        debug!("end of text at index {}", state.current_index);
        state.playback = PlaybackState::Paused;
        state.paused_at = Some(state.current_index);
        notify(state, effects);
        return;
    }

    let token = &state.tokens[state.current_index];
    let delay_ms = timing::delay_ms(
        state.settings.wpm,
        &token.display,
        token.is_break(),
        state.settings.punctuation_pause,
    );
    state.advance_pending = true;
    emit(effects, Effect::Schedule { delay_ms });
}
