//! Outbound command channel writing JSON lines.

use snake_arena_core::{InputCommand, OutboundChannel};
use std::{
    cell::{Cell, RefCell},
    io::{self, Write},
};
use tracing::warn;

/// Writes each command as one JSON object per line.
///
/// A write failure marks the channel disconnected so later commands are
/// dropped by the dispatcher instead of retried.
#[derive(Debug)]
pub(crate) struct LineChannel<W: Write> {
    connected: Cell<bool>,
    writer: RefCell<W>,
}

impl<W: Write> LineChannel<W> {
    pub(crate) fn new(writer: W, connected: bool) -> Self {
        Self {
            connected: Cell::new(connected),
            writer: RefCell::new(writer),
        }
    }

    #[cfg(test)]
    pub(crate) fn into_inner(self) -> W {
        self.writer.into_inner()
    }
}

impl LineChannel<io::Stdout> {
    pub(crate) fn stdout(connected: bool) -> Self {
        Self::new(io::stdout(), connected)
    }
}

impl<W: Write> OutboundChannel for LineChannel<W> {
    fn is_connected(&self) -> bool {
        self.connected.get()
    }

    fn send(&self, command: InputCommand) {
        let written = write_line(&mut *self.writer.borrow_mut(), &command);
        if let Err(error) = written {
            warn!(%error, "command channel write failed, disconnecting");
            self.connected.set(false);
        }
    }
}

fn write_line<W: Write>(writer: &mut W, command: &InputCommand) -> io::Result<()> {
    serde_json::to_writer(&mut *writer, command)?;
    writer.write_all(b"\n")?;
    writer.flush()
}
