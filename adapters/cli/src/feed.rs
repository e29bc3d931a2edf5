//! Background snapshot sources.
//!
//! Each feed runs on its own thread and hands values to the client thread
//! through a channel. `None` stands for "no data" (a line that failed to
//! decode). A disconnected channel means the source has stopped.

use crate::demo::DemoWorld;
use anyhow::{Context, Result};
use snake_arena_core::{decode_snapshot, Snapshot};
use std::{
    fs::File,
    io::{BufRead, BufReader},
    path::Path,
    sync::mpsc::{self, Receiver, Sender},
    thread,
    time::Duration,
};
use tracing::{debug, info, warn};

/// Receiving end of a snapshot feed.
pub(crate) type FeedReceiver = Receiver<Option<Snapshot>>;

const MIN_DEMO_INTERVAL: Duration = Duration::from_millis(1);

/// Streams a JSON-lines file of snapshots, one line per `interval`.
pub(crate) fn spawn_replay(path: &Path, interval: Duration) -> Result<FeedReceiver> {
    let file = File::open(path)
        .with_context(|| format!("failed to open replay at {}", path.display()))?;
    let source = path.display().to_string();
    let (sender, receiver) = mpsc::channel();

    let _handle = thread::Builder::new()
        .name("replay-feed".to_owned())
        .spawn(move || {
            info!(%source, "replay started");
            let sent = replay_lines(BufReader::new(file), &sender, interval);
            info!(%source, sent, "replay finished");
        })
        .context("failed to spawn replay thread")?;

    Ok(receiver)
}

/// Streams snapshots from a seeded [`DemoWorld`] until the client goes away.
pub(crate) fn spawn_demo(seed: u64, player_id: &str, interval: Duration) -> Result<FeedReceiver> {
    let mut world = DemoWorld::new(seed, player_id);
    let interval = interval.max(MIN_DEMO_INTERVAL);
    let (sender, receiver) = mpsc::channel();

    let _handle = thread::Builder::new()
        .name("demo-feed".to_owned())
        .spawn(move || {
            info!(seed, "demo world started");
            while sender.send(Some(world.step())).is_ok() {
                thread::sleep(interval);
            }
            debug!("demo world stopped, client went away");
        })
        .context("failed to spawn demo thread")?;

    Ok(receiver)
}

/// Sends every non-blank line as a snapshot and returns how many were sent.
///
/// Malformed lines are sent as absence. Stops at the first read error or
/// when the receiver is gone.
fn replay_lines<R: BufRead>(
    reader: R,
    sender: &Sender<Option<Snapshot>>,
    interval: Duration,
) -> usize {
    let mut sent = 0;
    for (index, line) in reader.lines().enumerate() {
        let line = match line {
            Ok(line) => line,
            Err(error) => {
                warn!(line = index + 1, %error, "replay read failed");
                break;
            }
        };
        if line.trim().is_empty() {
            continue;
        }

        let update = match decode_snapshot(&line) {
            Ok(snapshot) => Some(snapshot),
            Err(error) => {
                warn!(line = index + 1, %error, "malformed snapshot, publishing absence");
                None
            }
        };
        if sender.send(update).is_err() {
            debug!("client stopped listening to replay");
            break;
        }
        sent += 1;

        if !interval.is_zero() {
            thread::sleep(interval);
        }
    }
    sent
}
