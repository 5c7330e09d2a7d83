// Copyright (c) 2024 Mike Tsao. All rights reserved.

//! Toolkit-neutral input events, and the [InputRouter] that decides which
//! instrument receives the physical keyboard.

use crate::{types::Note, uid::Uid};
use std::collections::BTreeSet;

/// Recommended imports for easy onboarding.
pub mod prelude {
    pub use super::{
        InputRouter, KeyInput, Modifiers, PhysicalKey, PointerInput, PointerTracker,
    };
}

/// The keys that instruments care about.
#[derive(Clone, Copy, Debug, Eq, Hash, PartialEq)]
pub enum PhysicalKey {
    /// A printable key, lower-cased for letters.
    Char(char),
    #[allow(missing_docs)]
    ArrowLeft,
    #[allow(missing_docs)]
    ArrowRight,
    #[allow(missing_docs)]
    ArrowUp,
    #[allow(missing_docs)]
    ArrowDown,
    /// Anything else. Instruments ignore it.
    Other,
}
impl From<char> for PhysicalKey {
    fn from(value: char) -> Self {
        Self::Char(value.to_ascii_lowercase())
    }
}

/// Modifier keys held during a key event.
#[derive(Clone, Copy, Debug, Default, Eq, PartialEq)]
pub struct Modifiers {
    #[allow(missing_docs)]
    pub shift: bool,
    #[allow(missing_docs)]
    pub ctrl: bool,
    #[allow(missing_docs)]
    pub alt: bool,
    /// Cmd on Mac, Ctrl elsewhere.
    pub command: bool,
}
impl Modifiers {
    /// Whether any modifier is down.
    pub fn any(&self) -> bool {
        self.shift || self.ctrl || self.alt || self.command
    }
}

/// One physical key transition.
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub struct KeyInput {
    #[allow(missing_docs)]
    pub key: PhysicalKey,
    /// true for key-down, false for key-up.
    pub pressed: bool,
    /// true if this key-down was generated by the OS's auto-repeat.
    pub repeat: bool,
    #[allow(missing_docs)]
    pub modifiers: Modifiers,
}
impl KeyInput {
    /// A plain key-down with no modifiers.
    pub fn down(key: impl Into<PhysicalKey>) -> Self {
        Self {
            key: key.into(),
            pressed: true,
            repeat: false,
            modifiers: Modifiers::default(),
        }
    }

    /// A plain key-up with no modifiers.
    pub fn up(key: impl Into<PhysicalKey>) -> Self {
        Self {
            pressed: false,
            ..Self::down(key)
        }
    }

    /// Marks this event as an auto-repeat.
    pub fn repeated(mut self) -> Self {
        self.repeat = true;
        self
    }

    #[allow(missing_docs)]
    pub fn with_modifiers(mut self, modifiers: Modifiers) -> Self {
        self.modifiers = modifiers;
        self
    }
}

/// Pointer transitions on a single key or pad, identified by its note.
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub enum PointerInput {
    /// The primary button went down over the unit.
    Down(Note),
    /// The primary button was released over the unit.
    Up(Note),
    /// The pointer moved onto the unit. `button_held` is true when the user is
    /// dragging across units with the button down.
    Enter {
        #[allow(missing_docs)]
        note: Note,
        #[allow(missing_docs)]
        button_held: bool,
    },
    /// The pointer moved off the unit.
    Leave(Note),
}

/// Owns the single "armed" reference that decides which instrument hears the
/// physical keyboard.
///
/// Widgets [subscribe](InputRouter::subscribe) when mounted and
/// [unsubscribe](InputRouter::unsubscribe) when unmounted. At most one
/// subscriber is armed at any time.
#[derive(Debug, Default)]
pub struct InputRouter {
    subscribers: BTreeSet<Uid>,
    armed: Option<Uid>,
}
impl InputRouter {
    #[allow(missing_docs)]
    pub fn subscribe(&mut self, uid: Uid) {
        self.subscribers.insert(uid);
    }

    /// Removes the subscriber. If it was armed, nothing is armed afterward.
    pub fn unsubscribe(&mut self, uid: Uid) {
        self.subscribers.remove(&uid);
        if self.armed == Some(uid) {
            self.armed = None;
        }
    }

    #[allow(missing_docs)]
    pub fn is_subscribed(&self, uid: Uid) -> bool {
        self.subscribers.contains(&uid)
    }

    /// Makes `uid` the armed target. Returns the previously armed target, which
    /// the caller is responsible for disarming. Returns `Err(())` and changes
    /// nothing if `uid` isn't subscribed.
    #[allow(clippy::result_unit_err)]
    pub fn arm(&mut self, uid: Uid) -> Result<Option<Uid>, ()> {
        if !self.is_subscribed(uid) {
            log::debug!("refusing to arm unsubscribed widget {uid}");
            return Err(());
        }
        let previous = self.armed.replace(uid);
        Ok(previous.filter(|p| *p != uid))
    }

    /// Clears the armed target, returning it.
    pub fn disarm(&mut self) -> Option<Uid> {
        self.armed.take()
    }

    #[allow(missing_docs)]
    pub fn armed(&self) -> Option<Uid> {
        self.armed
    }

    /// Whether a keyboard event should be delivered to `uid`.
    pub fn routes_to(&self, uid: Uid) -> bool {
        self.armed == Some(uid)
    }
}

/// Turns per-frame pointer snapshots (which unit is under the pointer, and the
/// primary button's state) into [PointerInput] transitions.
///
/// Immediate-mode toolkits only report the current state, so something has to
/// remember what was under the pointer last frame.
#[derive(Clone, Copy, Debug, Default, Eq, PartialEq)]
pub struct PointerTracker {
    over: Option<Note>,
}
impl PointerTracker {
    /// The unit that was under the pointer at the last update.
    pub fn over(&self) -> Option<Note> {
        self.over
    }

    /// Compares this frame's snapshot with the last one and returns the
    /// transitions, in the order they should be handled.
    pub fn update(
        &mut self,
        hovered: Option<Note>,
        button_down: bool,
        button_pressed: bool,
        button_released: bool,
    ) -> Vec<PointerInput> {
        let mut transitions = Vec::default();
        if hovered != self.over {
            if let Some(previous) = self.over {
                transitions.push(PointerInput::Leave(previous));
            }
            if let Some(note) = hovered {
                transitions.push(PointerInput::Enter {
                    note,
                    button_held: button_down && !button_pressed,
                });
            }
            self.over = hovered;
        }
        if let Some(note) = hovered {
            if button_pressed {
                transitions.push(PointerInput::Down(note));
            }
            if button_released {
                transitions.push(PointerInput::Up(note));
            }
        }
        transitions
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn key_input_builders() {
        let k = KeyInput::down('A');
        assert_eq!(k.key, PhysicalKey::Char('a'));
        assert!(k.pressed);
        assert!(!k.repeat);
        assert!(!KeyInput::up('a').pressed);
        assert!(KeyInput::down('a').repeated().repeat);
        assert!(KeyInput::down('a')
            .with_modifiers(Modifiers {
                ctrl: true,
                ..Default::default()
            })
            .modifiers
            .any());
    }

    #[test]
    fn only_one_target_is_armed() {
        let mut router = InputRouter::default();
        router.subscribe(Uid(1));
        router.subscribe(Uid(2));

        assert_eq!(router.arm(Uid(1)), Ok(None));
        assert!(router.routes_to(Uid(1)));
        assert_eq!(router.arm(Uid(2)), Ok(Some(Uid(1))));
        assert!(!router.routes_to(Uid(1)));
        assert!(router.routes_to(Uid(2)));

        assert_eq!(router.arm(Uid(2)), Ok(None), "re-arming isn't a handoff");
    }

    #[test]
    fn unsubscribed_widgets_cannot_be_armed() {
        let mut router = InputRouter::default();
        assert!(router.arm(Uid(7)).is_err());
        assert_eq!(router.armed(), None);
    }

    #[test]
    fn unsubscribing_the_armed_widget_disarms() {
        let mut router = InputRouter::default();
        router.subscribe(Uid(1));
        let _ = router.arm(Uid(1));
        router.unsubscribe(Uid(1));
        assert_eq!(router.armed(), None);
        assert_eq!(router.disarm(), None);
    }

    #[test]
    fn pointer_tracker_synthesizes_transitions() {
        let mut tracker = PointerTracker::default();
        assert!(tracker.update(None, false, false, false).is_empty());

        assert_eq!(
            tracker.update(Some(60), true, true, false),
            vec![
                PointerInput::Enter {
                    note: 60,
                    button_held: false
                },
                PointerInput::Down(60)
            ]
        );
        assert!(tracker.update(Some(60), true, false, false).is_empty());
        assert_eq!(
            tracker.update(Some(62), true, false, false),
            vec![
                PointerInput::Leave(60),
                PointerInput::Enter {
                    note: 62,
                    button_held: true
                }
            ]
        );
        assert_eq!(
            tracker.update(Some(62), false, false, true),
            vec![PointerInput::Up(62)]
        );
        assert_eq!(
            tracker.update(None, false, false, false),
            vec![PointerInput::Leave(62)]
        );
        assert_eq!(tracker.over(), None);
    }
}
