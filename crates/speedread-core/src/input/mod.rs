//! Input abstraction layer.

mod mock;

pub use mock::ScriptedInput;

/// Logical actions consumed by the reader engine.
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub enum InputEvent {
    TogglePlayPause,
    HoldStart,
    HoldEnd,
    StepForward,
    StepBackward,
    Faster,
    Slower,
    SeekStart,
    Stop,
    Quit,
}

/// What the host should do after an input was applied.
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub enum InputOutcome {
    Continue,
    Quit,
}

/// Polled input provider.
pub trait InputProvider {
    type Error;

    fn poll_event(&mut self) -> Result<Option<InputEvent>, Self::Error>;
}
