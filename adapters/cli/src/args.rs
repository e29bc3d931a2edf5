//! Command-line flags.

use clap::Parser;
use std::path::PathBuf;

/// Real-time Snake Arena client.
///
/// Renders snapshots from a replay file or a local demo world and writes the
/// player's direction commands to stdout as JSON lines.
#[derive(Parser, Debug)]
#[command(author, version, about, long_about = None)]
pub(crate) struct Args {
    /// TOML file with client settings.
    #[arg(long, value_name = "PATH")]
    pub(crate) config: Option<PathBuf>,
    /// JSON-lines file of snapshots to replay.
    #[arg(long, value_name = "PATH", conflicts_with = "demo")]
    pub(crate) replay: Option<PathBuf>,
    /// Run against the built-in demo world (the default without --replay).
    #[arg(long)]
    pub(crate) demo: bool,
    /// Identifier of the local player.
    #[arg(long)]
    pub(crate) player_id: Option<String>,
    /// Treat the command channel as disconnected; commands are dropped.
    #[arg(long)]
    pub(crate) offline: bool,
    /// Seed for the demo world.
    #[arg(long, default_value_t = 0)]
    pub(crate) seed: u64,
    /// Synchronise presentation with the display refresh rate.
    #[arg(long, overrides_with = "no_vsync")]
    pub(crate) vsync: bool,
    /// Present frames as fast as possible.
    #[arg(long = "no-vsync", overrides_with = "vsync")]
    pub(crate) no_vsync: bool,
    /// Log frame timing once per second.
    #[arg(long)]
    pub(crate) show_fps: bool,
    /// Run this many frames without opening a window.
    #[arg(long, value_name = "FRAMES")]
    pub(crate) headless: Option<u64>,
    /// Log filter, e.g. `debug` or `snake_arena_system_sync=trace`. Overrides RUST_LOG.
    #[arg(long, value_name = "FILTER")]
    pub(crate) log_level: Option<String>,
}

impl Args {
    /// Vsync preference given on the command line, if any.
    pub(crate) fn vsync(&self) -> Option<bool> {
        if self.no_vsync {
            Some(false)
        } else if self.vsync {
            Some(true)
        } else {
            None
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::CommandFactory;

    #[test]
    fn command_definition_is_consistent() {
        Args::command().debug_assert();
    }

    #[test]
    fn later_vsync_flag_wins() {
        let args = Args::parse_from(["snake-arena", "--vsync", "--no-vsync"]);
        assert_eq!(args.vsync(), Some(false));

        let args = Args::parse_from(["snake-arena", "--no-vsync", "--vsync"]);
        assert_eq!(args.vsync(), Some(true));

        assert_eq!(Args::parse_from(["snake-arena"]).vsync(), None);
    }

    #[test]
    fn replay_and_demo_are_exclusive() {
        let result = Args::try_parse_from(["snake-arena", "--demo", "--replay", "x.jsonl"]);

        assert!(result.is_err());
    }

    #[test]
    fn flags_parse_into_fields() {
        let args = Args::parse_from([
            "snake-arena",
            "--player-id",
            "alice",
            "--offline",
            "--seed",
            "12",
            "--headless",
            "30",
        ]);

        assert_eq!(args.player_id.as_deref(), Some("alice"));
        assert!(args.offline);
        assert_eq!(args.seed, 12);
        assert_eq!(args.headless, Some(30));
    }
}
