//! Wires a snapshot feed, the bridge, gestures and the frame driver together.

use crate::feed::FeedReceiver;
use snake_arena_core::{OutboundChannel, Snapshot};
use snake_arena_system_frame_driver::{FrameDriver, FrameScheduler};
use snake_arena_system_gesture::{CommandDispatcher, GestureEngine, InputSurface};
use snake_arena_system_sync::{ScoreWatcher, SnapshotBridge, StalePolicy, Subscription};
use std::{cell::RefCell, rc::Rc, sync::mpsc::TryRecvError};
use tracing::info;

/// One running client: everything between the feed and the host.
///
/// The frame driver runs while a snapshot is held and stops on absence, so an
/// idle client only shows the host's cleared background.
pub(crate) struct ClientSession<S, I, C>
where
    S: FrameScheduler + 'static,
    I: InputSurface + ?Sized + 'static,
    C: OutboundChannel + 'static,
{
    bridge: SnapshotBridge,
    feed: FeedReceiver,
    feed_open: bool,
    watcher: ScoreWatcher,
    dispatcher: Rc<RefCell<CommandDispatcher<C>>>,
    driver: Rc<FrameDriver<S>>,
    _presence: Subscription,
    _gestures: GestureEngine<I>,
}

impl<S, I, C> ClientSession<S, I, C>
where
    S: FrameScheduler + 'static,
    I: InputSurface + ?Sized + 'static,
    C: OutboundChannel + 'static,
{
    /// Starts a session; `paint` is called once per frame with the latest snapshot.
    pub(crate) fn start<P>(
        player_id: &str,
        stale_policy: StalePolicy,
        host: (S, Rc<I>),
        channel: C,
        feed: FeedReceiver,
        mut paint: P,
    ) -> Self
    where
        P: FnMut(&Snapshot) + 'static,
    {
        let (scheduler, input) = host;
        let bridge = SnapshotBridge::with_policy(stale_policy);

        let frame_bridge = bridge.clone();
        let driver = Rc::new(FrameDriver::new(scheduler, move || {
            if let Some(snapshot) = frame_bridge.latest() {
                paint(&snapshot);
            }
        }));

        let presence_driver = Rc::downgrade(&driver);
        let presence = bridge.subscribe(move |snapshot| {
            if let Some(driver) = presence_driver.upgrade() {
                driver.set_active(snapshot.is_some());
            }
        });

        let dispatcher = Rc::new(RefCell::new(CommandDispatcher::new(channel)));
        let gesture_dispatcher = Rc::clone(&dispatcher);
        let gestures = GestureEngine::mount(input, move |direction| {
            let _ = gesture_dispatcher.borrow_mut().dispatch(direction);
        });

        info!(player_id, ?stale_policy, "client session started");
        Self {
            bridge,
            feed,
            feed_open: true,
            watcher: ScoreWatcher::new(player_id),
            dispatcher,
            driver,
            _presence: presence,
            _gestures: gestures,
        }
    }

    /// Publishes everything the feed delivered since the last call and
    /// reports score changes for the local player.
    pub(crate) fn pump(&mut self) {
        while self.feed_open {
            match self.feed.try_recv() {
                Ok(update) => {
                    let _ = self.bridge.publish(update);
                }
                Err(TryRecvError::Empty) => break,
                Err(TryRecvError::Disconnected) => {
                    info!("snapshot feed closed");
                    self.feed_open = false;
                    let _ = self.bridge.publish(None);
                }
            }
        }
        let _ = self.watcher.poll(&self.bridge);
    }

    /// Whether the feed may still deliver snapshots.
    pub(crate) fn is_feed_open(&self) -> bool {
        self.feed_open
    }

    #[cfg(test)]
    pub(crate) fn bridge(&self) -> &SnapshotBridge {
        &self.bridge
    }

    #[cfg(test)]
    pub(crate) fn is_drawing(&self) -> bool {
        self.driver.is_active()
    }
}

impl<S, I, C> Drop for ClientSession<S, I, C>
where
    S: FrameScheduler + 'static,
    I: InputSurface + ?Sized + 'static,
    C: OutboundChannel + 'static,
{
    fn drop(&mut self) {
        let dispatcher = self.dispatcher.borrow();
        info!(
            frames_drawn = self.driver.invocations(),
            commands_sent = dispatcher.sent(),
            commands_dropped = dispatcher.dropped(),
            final_score = ?self.watcher.last_score(),
            "client session closed"
        );
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use snake_arena_core::{GridSize, InputCommand};
    use snake_arena_system_frame_driver::FrameQueue;
    use snake_arena_system_gesture::{EventHub, Key, KeyEvent};
    use std::{
        cell::Cell,
        sync::mpsc::{self, Sender},
        time::Duration,
    };

    #[derive(Default)]
    struct RecordingChannel {
        connected: Cell<bool>,
        sent: RefCell<Vec<InputCommand>>,
    }

    impl OutboundChannel for RecordingChannel {
        fn is_connected(&self) -> bool {
            self.connected.get()
        }

        fn send(&self, command: InputCommand) {
            self.sent.borrow_mut().push(command);
        }
    }

    struct Harness {
        session: ClientSession<Rc<FrameQueue>, EventHub, Rc<RecordingChannel>>,
        queue: Rc<FrameQueue>,
        hub: Rc<EventHub>,
        channel: Rc<RecordingChannel>,
        feed: Option<Sender<Option<Snapshot>>>,
        painted: Rc<RefCell<Vec<u64>>>,
    }

    impl Harness {
        fn new() -> Self {
            let queue = Rc::new(FrameQueue::new());
            let hub = Rc::new(EventHub::new());
            let channel = Rc::new(RecordingChannel::default());
            let (sender, receiver) = mpsc::channel();
            let painted = Rc::new(RefCell::new(Vec::new()));
            let sink = Rc::clone(&painted);
            let session = ClientSession::start(
                "me",
                StalePolicy::RejectOlder,
                (Rc::clone(&queue), Rc::clone(&hub)),
                Rc::clone(&channel),
                receiver,
                move |snapshot: &Snapshot| sink.borrow_mut().push(snapshot.sequence),
            );
            Self {
                session,
                queue,
                hub,
                channel,
                feed: Some(sender),
                painted,
            }
        }

        fn deliver(&self, update: Option<u64>) {
            let snapshot = update.map(|sequence| {
                let mut snapshot = Snapshot::empty(GridSize::new(8, 8));
                snapshot.sequence = sequence;
                snapshot
            });
            if let Some(feed) = &self.feed {
                feed.send(snapshot).expect("session listening");
            }
        }

        fn frame(&mut self) {
            self.session.pump();
            let _ = self.queue.run_frame(Duration::ZERO);
        }
    }

    #[test]
    fn idle_until_first_snapshot_then_repaints_every_frame() {
        let mut harness = Harness::new();
        harness.frame();
        assert!(!harness.session.is_drawing());

        harness.deliver(Some(1));
        for _ in 0..3 {
            harness.frame();
        }

        assert_eq!(*harness.painted.borrow(), vec![1, 1, 1]);
    }

    #[test]
    fn absence_stops_painting() {
        let mut harness = Harness::new();
        harness.deliver(Some(1));
        harness.frame();

        harness.deliver(None);
        harness.frame();
        harness.frame();

        assert_eq!(*harness.painted.borrow(), vec![1]);
        assert!(harness.session.bridge().latest().is_none());
    }

    #[test]
    fn only_the_newest_queued_snapshot_is_painted() {
        let mut harness = Harness::new();
        harness.deliver(Some(1));
        harness.deliver(Some(3));
        harness.deliver(Some(2));

        harness.frame();

        assert_eq!(*harness.painted.borrow(), vec![3]);
    }

    #[test]
    fn closed_feed_becomes_absence() {
        let mut harness = Harness::new();
        harness.deliver(Some(4));
        harness.frame();

        harness.feed = None;
        harness.frame();

        assert!(!harness.session.is_feed_open());
        assert!(harness.session.bridge().latest().is_none());
        assert!(!harness.session.is_drawing());
    }

    #[test]
    fn key_presses_reach_the_channel_only_when_connected() {
        let mut harness = Harness::new();
        harness
            .hub
            .dispatch_key(&mut KeyEvent::on_surface(Key::ArrowLeft));
        assert!(harness.channel.sent.borrow().is_empty());

        harness.channel.connected.set(true);
        harness
            .hub
            .dispatch_key(&mut KeyEvent::on_surface(Key::Character('D')));
        harness.frame();

        assert_eq!(
            *harness.channel.sent.borrow(),
            vec![InputCommand::from(snake_arena_core::Direction::Right)]
        );
    }
}
