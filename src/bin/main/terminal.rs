use std::io::{self, IsTerminal, Write};

use speedread_core::{EngineSnapshot, PlaybackState, text::locate};

use super::{LINE_COLUMNS, ORP_ANCHOR_PERCENT};

const ORP_ON: &str = "\x1b[1;31m";
const DIM_ON: &str = "\x1b[2m";
const RESET: &str = "\x1b[0m";
const CLEAR_LINE: &str = "\r\x1b[2K";

#[derive(Clone, Copy, Debug, Eq, PartialEq)]
struct RenderKey {
    index: usize,
    state: PlaybackState,
    wpm: u16,
    token_count: usize,
}

impl RenderKey {
    fn of(snapshot: &EngineSnapshot) -> Self {
        Self {
            index: snapshot.current_index,
            state: snapshot.state,
            wpm: snapshot.settings.wpm,
            token_count: snapshot.tokens.len(),
        }
    }
}

/// Single-line RSVP renderer. The ORP letter of every word lands on the same
/// column.
pub(super) struct TerminalRenderer<W: Write> {
    out: W,
    color: bool,
    last: Option<RenderKey>,
}

impl TerminalRenderer<io::Stdout> {
    pub(super) fn stdout() -> Self {
        let out = io::stdout();
        let color = out.is_terminal();
        Self::new(out, color)
    }
}

impl<W: Write> TerminalRenderer<W> {
    pub(super) fn new(out: W, color: bool) -> Self {
        Self {
            out,
            color,
            last: None,
        }
    }

    /// Redraw when the snapshot differs from the last one drawn. Returns
    /// whether anything was written.
    pub(super) fn render(&mut self, snapshot: &EngineSnapshot) -> io::Result<bool> {
        let key = RenderKey::of(snapshot);
        if self.last == Some(key) {
            return Ok(false);
        }

        let line = render_line(snapshot, self.color);
        if self.color {
            write!(self.out, "{CLEAR_LINE}{line}")?;
        } else {
            writeln!(self.out, "{line}")?;
        }
        self.out.flush()?;
        self.last = Some(key);
        Ok(true)
    }

    pub(super) fn finish(&mut self) -> io::Result<()> {
        if self.color {
            writeln!(self.out)?;
        }
        self.out.flush()
    }

    #[cfg(test)]
    fn into_inner(self) -> W {
        self.out
    }
}

fn anchor_column() -> usize {
    LINE_COLUMNS * ORP_ANCHOR_PERCENT / 100
}

fn state_label(state: PlaybackState) -> &'static str {
    match state {
        PlaybackState::Idle => "ready",
        PlaybackState::Playing => "playing",
        PlaybackState::Paused => "paused",
    }
}

pub(super) fn render_line(snapshot: &EngineSnapshot, color: bool) -> String {
    let anchor = anchor_column();
    let mut line = String::with_capacity(LINE_COLUMNS + 32);

    match snapshot.current_token() {
        None => {
            line.push_str(&" ".repeat(anchor));
            line.push_str("(no text)");
        }
        Some(token) if token.is_break() => {
            line.push_str(&" ".repeat(anchor));
            if color {
                line.push_str(DIM_ON);
                line.push_str(&token.display);
                line.push_str(RESET);
            } else {
                line.push_str(&token.display);
            }
        }
        Some(token) => {
            let parts = locate(&token.display, token.orp_index);
            let left_cols = parts.left.chars().count();
            line.push_str(&" ".repeat(anchor.saturating_sub(left_cols)));
            line.push_str(&parts.left);
            if color {
                line.push_str(ORP_ON);
                line.push_str(&parts.orp);
                line.push_str(RESET);
            } else {
                line.push_str(&parts.orp);
            }
            line.push_str(&parts.right);
        }
    }

    let status = format!(
        "  [{}/{} {} wpm {}]",
        snapshot.current_index + 1,
        snapshot.tokens.len(),
        snapshot.settings.wpm,
        state_label(snapshot.state)
    );
    if color {
        line.push_str(DIM_ON);
        line.push_str(&status);
        line.push_str(RESET);
    } else {
        line.push_str(&status);
    }

    line
}

#[cfg(test)]
mod tests {
    use speedread_core::{ManualScheduler, ReaderEngine, text::tokenize};

    use super::*;

    fn snapshot_at(text: &str, index: usize) -> EngineSnapshot {
        let mut engine = ReaderEngine::new(ManualScheduler::new());
        engine.load(tokenize(text).tokens, index);
        engine.snapshot()
    }

    #[test]
    fn orp_letter_sits_on_anchor_column() {
        for (text, orp) in [("a", "a"), ("hello", "e"), ("programming", "g"), ("\"Hello,\"", "e")] {
            let line = render_line(&snapshot_at(text, 0), false);
            let column: String = line.chars().skip(anchor_column()).take(1).collect();
            assert_eq!(column, orp, "text {text:?}");
        }
    }

    #[test]
    fn break_shows_paragraph_mark() {
        let line = render_line(&snapshot_at("one.\n\ntwo", 1), false);
        assert!(line.contains('¶'));
        assert!(line.contains("[2/3 300 wpm ready]"));
    }

    #[test]
    fn empty_text_has_placeholder() {
        let line = render_line(&snapshot_at("", 0), false);
        assert!(line.contains("(no text)"));
    }

    #[test]
    fn unchanged_snapshot_is_not_redrawn() {
        let snapshot = snapshot_at("one two", 0);
        let mut renderer = TerminalRenderer::new(Vec::new(), false);
        assert!(renderer.render(&snapshot).unwrap());
        assert!(!renderer.render(&snapshot).unwrap());

        let output = String::from_utf8(renderer.into_inner()).unwrap();
        assert_eq!(output.lines().count(), 1);
    }
}
