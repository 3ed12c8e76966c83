use std::{
    io::{self, BufRead},
    sync::mpsc::{self, Receiver, TryRecvError},
    thread,
};

use speedread_core::input::{InputEvent, InputProvider};

/// Line commands typed on stdin. A bare Enter toggles play/pause.
pub(super) const HELP: &str = "commands: <enter>/p toggle, h hold, r release, n next, b back, \
+ faster, - slower, 0 restart, s stop, q quit";

pub(super) fn parse_command(line: &str) -> Option<InputEvent> {
    match line.trim() {
        "" | "p" => Some(InputEvent::TogglePlayPause),
        "h" => Some(InputEvent::HoldStart),
        "r" => Some(InputEvent::HoldEnd),
        "n" | "f" => Some(InputEvent::StepForward),
        "b" => Some(InputEvent::StepBackward),
        "+" | "=" => Some(InputEvent::Faster),
        "-" | "_" => Some(InputEvent::Slower),
        "0" => Some(InputEvent::SeekStart),
        "s" => Some(InputEvent::Stop),
        "q" | "quit" | "exit" => Some(InputEvent::Quit),
        _ => None,
    }
}

/// Non-blocking input fed by a background stdin reader.
pub(super) struct StdinInput {
    events: Receiver<InputEvent>,
    closed: bool,
}

impl StdinInput {
    pub(super) fn spawn() -> io::Result<Self> {
        let (tx, rx) = mpsc::channel();
        thread::Builder::new()
            .name("stdin-input".into())
            .spawn(move || {
                for line in io::stdin().lock().lines() {
                    let Ok(line) = line else {
                        break;
                    };
                    match parse_command(&line) {
                        Some(event) => {
                            if tx.send(event).is_err() {
                                break;
                            }
                        }
                        None => log::warn!("unknown command {:?}; {}", line.trim(), HELP),
                    }
                }
            })?;

        Ok(Self {
            events: rx,
            closed: false,
        })
    }

    /// Whether stdin reached EOF and every queued event was consumed.
    pub(super) fn is_closed(&self) -> bool {
        self.closed
    }
}

impl InputProvider for StdinInput {
    type Error = core::convert::Infallible;

    fn poll_event(&mut self) -> Result<Option<InputEvent>, Self::Error> {
        match self.events.try_recv() {
            Ok(event) => Ok(Some(event)),
            Err(TryRecvError::Empty) => Ok(None),
            Err(TryRecvError::Disconnected) => {
                self.closed = true;
                Ok(None)
            }
        }
    }
}
