//! Timer-driven RSVP playback engine.
//!
//! [`ReaderEngine`] is a thin shell around [`machine::transition`]: it feeds
//! commands to the pure state machine, then performs the returned effects
//! against the injected [`Scheduler`] and the registered listeners.
//!
//! Everything runs on the caller's thread. Listeners are invoked
//! synchronously in registration order while the engine is mutably borrowed,
//! so they cannot call back into it. A panicking listener unwinds through the
//! engine call that triggered it and later listeners are not notified.

pub mod machine;
mod scheduler;

use std::sync::Arc;

use log::debug;

use crate::{
    input::{InputEvent, InputOutcome},
    settings::{ReaderSettings, ReadingMode, SettingsPatch, WPM_STEP},
    text::Token,
};

pub use machine::{Command, Effect, EngineSnapshot, PlaybackState};
pub use scheduler::{ManualHandle, ManualScheduler, ScheduledAdvance, Scheduler};

use machine::MachineState;

type Listener = Box<dyn FnMut(&EngineSnapshot)>;

#[derive(Clone, Copy, Debug, Eq, Hash, PartialEq)]
pub struct SubscriptionId(u64);

pub struct ReaderEngine<S>
where
    S: Scheduler,
{
    machine: MachineState,
    scheduler: S,
    pending: Option<S::Handle>,
    listeners: Vec<(SubscriptionId, Listener)>,
    next_subscription: u64,
    destroyed: bool,
}

impl<S> ReaderEngine<S>
where
    S: Scheduler,
{
    pub fn new(scheduler: S) -> Self {
        Self::with_settings(scheduler, ReaderSettings::default())
    }

    pub fn with_settings(scheduler: S, settings: ReaderSettings) -> Self {
        Self {
            machine: MachineState::new(settings),
            scheduler,
            pending: None,
            listeners: Vec::new(),
            next_subscription: 0,
            destroyed: false,
        }
    }

    pub fn snapshot(&self) -> EngineSnapshot {
        self.machine.snapshot()
    }

    pub fn state(&self) -> PlaybackState {
        self.machine.playback()
    }

    pub fn current_index(&self) -> usize {
        self.machine.current_index()
    }

    pub fn settings(&self) -> &ReaderSettings {
        self.machine.settings()
    }

    pub fn tokens(&self) -> &[Token] {
        self.machine.tokens()
    }

    pub fn has_pending_advance(&self) -> bool {
        self.pending.is_some()
    }

    pub fn scheduler(&self) -> &S {
        &self.scheduler
    }

    pub fn scheduler_mut(&mut self) -> &mut S {
        &mut self.scheduler
    }

    pub fn load(&mut self, tokens: impl Into<Arc<[Token]>>, start_index: usize) {
        self.dispatch(Command::Load {
            tokens: tokens.into(),
            start_index,
        });
    }

    pub fn play(&mut self) {
        self.dispatch(Command::Play);
    }

    pub fn pause(&mut self) {
        self.dispatch(Command::Pause);
    }

    pub fn stop(&mut self) {
        self.dispatch(Command::Stop);
    }

    pub fn toggle_play_pause(&mut self) {
        self.dispatch(Command::TogglePlayPause);
    }

    pub fn hold_start(&mut self) {
        self.dispatch(Command::HoldStart);
    }

    pub fn hold_end(&mut self) {
        self.dispatch(Command::HoldEnd);
    }

    pub fn step_forward(&mut self, count: usize) {
        self.dispatch(Command::StepForward(count));
    }

    pub fn step_backward(&mut self, count: usize) {
        self.dispatch(Command::StepBackward(count));
    }

    pub fn seek_to(&mut self, index: usize) {
        self.dispatch(Command::SeekTo(index));
    }

    pub fn adjust_wpm(&mut self, delta: i32) {
        self.dispatch(Command::AdjustWpm(delta));
    }

    /// Merge `patch` into the settings. An advance that is already scheduled
    /// keeps its delay; new values apply from the next one.
    pub fn update_settings(&mut self, patch: SettingsPatch) {
        self.dispatch(Command::UpdateSettings(patch));
    }

    pub fn set_wpm(&mut self, wpm: u16) {
        self.update_settings(SettingsPatch::new().wpm(wpm));
    }

    pub fn set_mode(&mut self, mode: ReadingMode) {
        self.update_settings(SettingsPatch::new().mode(mode));
    }

    pub fn set_punctuation_pause(&mut self, enabled: bool) {
        self.update_settings(SettingsPatch::new().punctuation_pause(enabled));
    }

    pub fn set_soft_rewind(&mut self, enabled: bool) {
        self.update_settings(SettingsPatch::new().soft_rewind(enabled));
    }

    /// Deliver an expired timer. Handles other than the single outstanding
    /// advance are stale and ignored.
    pub fn fire(&mut self, handle: S::Handle) {
        if self.pending != Some(handle) {
            debug!("ignoring stale timer {:?}", handle);
            return;
        }

        self.pending = None;
        self.dispatch(Command::Advance);
    }

    pub fn apply_input(&mut self, event: InputEvent) -> InputOutcome {
        match event {
            InputEvent::TogglePlayPause => self.toggle_play_pause(),
            InputEvent::HoldStart => self.hold_start(),
            InputEvent::HoldEnd => self.hold_end(),
            InputEvent::StepForward => self.step_forward(1),
            InputEvent::StepBackward => self.step_backward(1),
            InputEvent::Faster => self.adjust_wpm(i32::from(WPM_STEP)),
            InputEvent::Slower => self.adjust_wpm(-i32::from(WPM_STEP)),
            InputEvent::SeekStart => self.seek_to(0),
            InputEvent::Stop => self.stop(),
            InputEvent::Quit => return InputOutcome::Quit,
        }
        InputOutcome::Continue
    }

    /// Register `listener` for every snapshot emitted from now on.
    ///
    /// After [`destroy`](Self::destroy) the listener is dropped immediately;
    /// the returned id is still fresh but `unsubscribe` on it returns `false`.
    pub fn subscribe<F>(&mut self, listener: F) -> SubscriptionId
    where
        F: FnMut(&EngineSnapshot) + 'static,
    {
        self.next_subscription += 1;
        let id = SubscriptionId(self.next_subscription);
        if !self.destroyed {
            self.listeners.push((id, Box::new(listener)));
        }
        id
    }

    /// Remove the listener registered under `id`. Returns `false` when it was
    /// already gone.
    pub fn unsubscribe(&mut self, id: SubscriptionId) -> bool {
        let before = self.listeners.len();
        self.listeners.retain(|(listener_id, _)| *listener_id != id);
        self.listeners.len() != before
    }

    /// Cancel any pending advance and drop all listeners. The engine ignores
    /// every command afterwards.
    pub fn destroy(&mut self) {
        self.cancel_pending();
        self.listeners.clear();
        self.destroyed = true;
    }

    pub fn is_destroyed(&self) -> bool {
        self.destroyed
    }

    fn dispatch(&mut self, command: Command) {
        if self.destroyed {
            return;
        }

        for effect in machine::transition(&mut self.machine, command) {
            match effect {
                Effect::CancelPending => self.cancel_pending(),
                Effect::Schedule { delay_ms } => {
                    self.cancel_pending();
                    let handle = self.scheduler.schedule(delay_ms);
                    debug!(
                        "advance from {} scheduled in {:.0}ms at {:.0}",
                        self.machine.current_index(),
                        delay_ms,
                        self.scheduler.now()
                    );
                    self.pending = Some(handle);
                }
                Effect::Notify(snapshot) => self.notify(&snapshot),
            }
        }
    }

    fn cancel_pending(&mut self) {
        if let Some(handle) = self.pending.take() {
            self.scheduler.cancel(handle);
        }
    }

    fn notify(&mut self, snapshot: &EngineSnapshot) {
        for (_, listener) in self.listeners.iter_mut() {
            listener(snapshot);
        }
    }
}

impl<S> Drop for ReaderEngine<S>
where
    S: Scheduler,
{
    fn drop(&mut self) {
        self.cancel_pending();
    }
}
