//! Raw input events as delivered by a host's input surface.

use glam::Vec2;

/// Logical key reported by a keyboard event.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum Key {
    /// Up arrow.
    ArrowUp,
    /// Down arrow.
    ArrowDown,
    /// Left arrow.
    ArrowLeft,
    /// Right arrow.
    ArrowRight,
    /// Printable character key.
    Character(char),
    /// Any other key.
    Other,
}

/// Element that had focus when an event fired.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum EventTarget {
    /// A text-entry control such as an input field or text area.
    TextEntry,
    /// Anything else, including the game surface itself.
    #[default]
    Surface,
}

/// Key press delivered to listeners.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct KeyEvent {
    key: Key,
    target: EventTarget,
    default_prevented: bool,
}

impl KeyEvent {
    /// Creates a key press aimed at the provided target.
    #[must_use]
    pub const fn new(key: Key, target: EventTarget) -> Self {
        Self {
            key,
            target,
            default_prevented: false,
        }
    }

    /// Creates a key press aimed at the game surface.
    #[must_use]
    pub const fn on_surface(key: Key) -> Self {
        Self::new(key, EventTarget::Surface)
    }

    /// Key that was pressed.
    #[must_use]
    pub const fn key(&self) -> Key {
        self.key
    }

    /// Element that had focus.
    #[must_use]
    pub const fn target(&self) -> EventTarget {
        self.target
    }

    /// Asks the host to skip its default handling of the event.
    pub fn prevent_default(&mut self) {
        self.default_prevented = true;
    }

    /// Whether a listener suppressed the host's default handling.
    #[must_use]
    pub const fn default_prevented(&self) -> bool {
        self.default_prevented
    }
}

/// Stage of a touch interaction.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum TouchPhase {
    /// A contact touched the surface.
    Start,
    /// A contact moved while touching the surface.
    Move,
    /// A contact left the surface.
    End,
    /// The host aborted the interaction.
    Cancel,
}

/// Single contact point in surface coordinates (y grows downward).
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct TouchPoint {
    /// Host-assigned identifier stable for the lifetime of the contact.
    pub id: u64,
    /// Position of the contact.
    pub position: Vec2,
}

impl TouchPoint {
    /// Creates a new contact point.
    #[must_use]
    pub const fn new(id: u64, position: Vec2) -> Self {
        Self { id, position }
    }
}

/// Touch interaction delivered to listeners.
#[derive(Clone, Debug, PartialEq)]
pub struct TouchEvent {
    phase: TouchPhase,
    touches: Vec<TouchPoint>,
    changed_touches: Vec<TouchPoint>,
    default_prevented: bool,
}

impl TouchEvent {
    /// Creates a touch event.
    ///
    /// `touches` lists the contacts still on the surface; `changed_touches`
    /// lists the contacts this event is about.
    #[must_use]
    pub fn new(
        phase: TouchPhase,
        touches: Vec<TouchPoint>,
        changed_touches: Vec<TouchPoint>,
    ) -> Self {
        Self {
            phase,
            touches,
            changed_touches,
            default_prevented: false,
        }
    }

    /// Single contact touching down at `position`.
    #[must_use]
    pub fn start(position: Vec2) -> Self {
        let point = TouchPoint::new(0, position);
        Self::new(TouchPhase::Start, vec![point], vec![point])
    }

    /// Single contact moving to `position`.
    #[must_use]
    pub fn moved(position: Vec2) -> Self {
        let point = TouchPoint::new(0, position);
        Self::new(TouchPhase::Move, vec![point], vec![point])
    }

    /// Single contact lifting off at `position`.
    #[must_use]
    pub fn end(position: Vec2) -> Self {
        Self::new(
            TouchPhase::End,
            Vec::new(),
            vec![TouchPoint::new(0, position)],
        )
    }

    /// Stage of the interaction.
    #[must_use]
    pub const fn phase(&self) -> TouchPhase {
        self.phase
    }

    /// Contacts still on the surface.
    #[must_use]
    pub fn touches(&self) -> &[TouchPoint] {
        &self.touches
    }

    /// Contacts this event is about.
    #[must_use]
    pub fn changed_touches(&self) -> &[TouchPoint] {
        &self.changed_touches
    }

    /// Asks the host to skip its default handling (scrolling) of the event.
    pub fn prevent_default(&mut self) {
        self.default_prevented = true;
    }

    /// Whether a listener suppressed the host's default handling.
    #[must_use]
    pub const fn default_prevented(&self) -> bool {
        self.default_prevented
    }
}
