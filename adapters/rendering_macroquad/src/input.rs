//! Translates macroquad's polled input state into gesture events.

use glam::Vec2;
use macroquad::input::{
    is_key_down, is_key_pressed, is_mouse_button_down, is_mouse_button_pressed,
    is_mouse_button_released, mouse_position, touches, KeyCode, MouseButton,
    TouchPhase as MacroquadTouchPhase,
};
use snake_arena_system_gesture::{
    EventHub, Key, KeyEvent, TouchEvent, TouchPhase, TouchPoint,
};

/// Touch identifier used for the left mouse button acting as a pointer.
const MOUSE_POINTER_ID: u64 = u64::MAX;

const KEY_BINDINGS: [(KeyCode, Key); 8] = [
    (KeyCode::Up, Key::ArrowUp),
    (KeyCode::Down, Key::ArrowDown),
    (KeyCode::Left, Key::ArrowLeft),
    (KeyCode::Right, Key::ArrowRight),
    (KeyCode::W, Key::Character('w')),
    (KeyCode::A, Key::Character('a')),
    (KeyCode::S, Key::Character('s')),
    (KeyCode::D, Key::Character('d')),
];

/// Phase of a polled contact, before it is grouped into events.
#[doc(hidden)]
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum RawPhase {
    /// Contact appeared this frame.
    Started,
    /// Contact is down and did not move.
    Stationary,
    /// Contact is down and moved.
    Moved,
    /// Contact lifted this frame.
    Ended,
    /// Host aborted the contact.
    Cancelled,
}

/// One contact as polled from the window this frame.
#[doc(hidden)]
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct RawTouch {
    /// Contact identifier.
    pub id: u64,
    /// Polled phase.
    pub phase: RawPhase,
    /// Position in window pixels.
    pub position: Vec2,
}

/// Groups one frame of polled contacts into touch events.
///
/// Events are emitted in start, move, end, cancel order, each listing the
/// contacts still down in `touches` and the contacts it concerns in
/// `changed_touches`. Phases without contacts produce no event.
#[doc(hidden)]
#[must_use]
pub fn translate_touches(raw: &[RawTouch]) -> Vec<TouchEvent> {
    let point = |touch: &RawTouch| TouchPoint::new(touch.id, touch.position);
    let down: Vec<TouchPoint> = raw
        .iter()
        .filter(|touch| !matches!(touch.phase, RawPhase::Ended | RawPhase::Cancelled))
        .map(point)
        .collect();

    [
        (RawPhase::Started, TouchPhase::Start),
        (RawPhase::Moved, TouchPhase::Move),
        (RawPhase::Ended, TouchPhase::End),
        (RawPhase::Cancelled, TouchPhase::Cancel),
    ]
    .into_iter()
    .filter_map(|(raw_phase, phase)| {
        let changed: Vec<TouchPoint> = raw
            .iter()
            .filter(|touch| touch.phase == raw_phase)
            .map(point)
            .collect();
        (!changed.is_empty()).then(|| TouchEvent::new(phase, down.clone(), changed))
    })
    .collect()
}

/// Applies shift to a bound character key.
fn shifted(key: Key, shift: bool) -> Key {
    match key {
        Key::Character(character) if shift => Key::Character(character.to_ascii_uppercase()),
        other => other,
    }
}

/// Polls keys, touches and the mouse pointer once per frame.
#[derive(Debug, Default)]
pub(crate) struct InputPoller {
    mouse_down: bool,
    last_mouse: Vec2,
}

impl InputPoller {
    pub(crate) fn poll(&mut self, hub: &EventHub) {
        let shift = is_key_down(KeyCode::LeftShift) || is_key_down(KeyCode::RightShift);
        for (code, key) in KEY_BINDINGS {
            if is_key_pressed(code) {
                let mut event = KeyEvent::on_surface(shifted(key, shift));
                hub.dispatch_key(&mut event);
            }
        }

        let mut raw: Vec<RawTouch> = touches()
            .into_iter()
            .map(|touch| RawTouch {
                id: touch.id,
                phase: match touch.phase {
                    MacroquadTouchPhase::Started => RawPhase::Started,
                    MacroquadTouchPhase::Stationary => RawPhase::Stationary,
                    MacroquadTouchPhase::Moved => RawPhase::Moved,
                    MacroquadTouchPhase::Ended => RawPhase::Ended,
                    MacroquadTouchPhase::Cancelled => RawPhase::Cancelled,
                },
                position: Vec2::new(touch.position.x, touch.position.y),
            })
            .collect();
        if let Some(pointer) = self.poll_mouse() {
            raw.push(pointer);
        }

        for mut event in translate_touches(&raw) {
            hub.dispatch_touch(&mut event);
        }
    }

    fn poll_mouse(&mut self) -> Option<RawTouch> {
        let (x, y) = mouse_position();
        let position = Vec2::new(x, y);
        let moved = position != self.last_mouse;
        self.last_mouse = position;

        let button = ButtonState {
            pressed: is_mouse_button_pressed(MouseButton::Left),
            released: is_mouse_button_released(MouseButton::Left),
            down: is_mouse_button_down(MouseButton::Left),
        };
        let phase = mouse_phase(&mut self.mouse_down, button, moved)?;

        Some(RawTouch {
            id: MOUSE_POINTER_ID,
            phase,
            position,
        })
    }
}

/// Left-button edges and level sampled in one frame.
#[derive(Clone, Copy, Debug, Default)]
struct ButtonState {
    pressed: bool,
    released: bool,
    down: bool,
}

/// Phase of the mouse pointer this frame, tracking whether it is held in `held`.
fn mouse_phase(held: &mut bool, button: ButtonState, moved: bool) -> Option<RawPhase> {
    if button.pressed {
        // A click that also lifted this frame is a tap, never a swipe.
        *held = !button.released;
        return (*held).then_some(RawPhase::Started);
    }
    if !*held {
        return None;
    }
    if button.released || !button.down {
        *held = false;
        return Some(RawPhase::Ended);
    }
    Some(if moved {
        RawPhase::Moved
    } else {
        RawPhase::Stationary
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn shift_uppercases_character_bindings_only() {
        assert_eq!(shifted(Key::Character('w'), true), Key::Character('W'));
        assert_eq!(shifted(Key::Character('w'), false), Key::Character('w'));
        assert_eq!(shifted(Key::ArrowUp, true), Key::ArrowUp);
    }

    const PRESS: ButtonState = ButtonState {
        pressed: true,
        released: false,
        down: true,
    };
    const HOLD: ButtonState = ButtonState {
        pressed: false,
        released: false,
        down: true,
    };
    const RELEASE: ButtonState = ButtonState {
        pressed: false,
        released: true,
        down: false,
    };

    #[test]
    fn drag_runs_from_press_to_release() {
        let mut held = false;

        assert_eq!(mouse_phase(&mut held, PRESS, false), Some(RawPhase::Started));
        assert_eq!(mouse_phase(&mut held, HOLD, true), Some(RawPhase::Moved));
        assert_eq!(mouse_phase(&mut held, HOLD, false), Some(RawPhase::Stationary));
        assert_eq!(mouse_phase(&mut held, RELEASE, false), Some(RawPhase::Ended));
        assert!(!held);
        assert_eq!(mouse_phase(&mut held, ButtonState::default(), true), None);
    }

    #[test]
    fn click_within_one_frame_leaves_pointer_released() {
        let mut held = false;
        let click = ButtonState {
            pressed: true,
            released: true,
            down: false,
        };

        assert_eq!(mouse_phase(&mut held, click, false), None);
        assert!(!held);
        assert_eq!(mouse_phase(&mut held, ButtonState::default(), true), None);
        assert_eq!(mouse_phase(&mut held, PRESS, false), Some(RawPhase::Started));
    }
}
