//! Forwarding of recognised directions to the outbound channel.

use snake_arena_core::{Direction, InputCommand, OutboundChannel};
use tracing::debug;

/// What happened to a direction handed to [`CommandDispatcher::dispatch`].
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum DispatchOutcome {
    /// The command was sent.
    Sent(InputCommand),
    /// The channel was disconnected and the command was dropped.
    Dropped,
}

/// Converts directions to commands and sends them while the channel is connected.
///
/// Commands produced while disconnected are dropped, not queued.
#[derive(Debug)]
pub struct CommandDispatcher<C> {
    channel: C,
    sent: u64,
    dropped: u64,
}

impl<C: OutboundChannel> CommandDispatcher<C> {
    /// Creates a dispatcher writing to `channel`.
    #[must_use]
    pub const fn new(channel: C) -> Self {
        Self {
            channel,
            sent: 0,
            dropped: 0,
        }
    }

    /// Sends the command for `direction` if the channel is connected.
    pub fn dispatch(&mut self, direction: Direction) -> DispatchOutcome {
        let command = direction.unit_command();
        if !self.channel.is_connected() {
            self.dropped += 1;
            debug!(%direction, "channel disconnected, dropping command");
            return DispatchOutcome::Dropped;
        }

        self.channel.send(command);
        self.sent += 1;
        DispatchOutcome::Sent(command)
    }

    /// Number of commands sent so far.
    #[must_use]
    pub const fn sent(&self) -> u64 {
        self.sent
    }

    /// Number of commands dropped because the channel was disconnected.
    #[must_use]
    pub const fn dropped(&self) -> u64 {
        self.dropped
    }

    /// Channel the dispatcher writes to.
    #[must_use]
    pub const fn channel(&self) -> &C {
        &self.channel
    }
}
