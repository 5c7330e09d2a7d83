// Copyright (c) 2024 Mike Tsao. All rights reserved.

use crate::input::{KeyInput, Modifiers, PhysicalKey};
use eframe::egui::{Context, Event, Key};

/// Translates an egui keyboard event into a toolkit-neutral [KeyInput].
/// Returns None for events that aren't key transitions.
pub fn key_input_from_event(event: &Event) -> Option<KeyInput> {
    match event {
        Event::Key {
            key,
            pressed,
            repeat,
            modifiers,
            ..
        } => Some(KeyInput {
            key: physical_key(*key),
            pressed: *pressed,
            repeat: *repeat,
            modifiers: Modifiers {
                shift: modifiers.shift,
                ctrl: modifiers.ctrl,
                alt: modifiers.alt,
                command: modifiers.mac_cmd,
            },
        }),
        _ => None,
    }
}

/// All the key transitions egui collected this frame, in order.
pub fn key_inputs(ctx: &Context) -> Vec<KeyInput> {
    ctx.input(|i| i.events.iter().filter_map(key_input_from_event).collect())
}

fn physical_key(key: Key) -> PhysicalKey {
    match key {
        Key::ArrowLeft => PhysicalKey::ArrowLeft,
        Key::ArrowRight => PhysicalKey::ArrowRight,
        Key::ArrowUp => PhysicalKey::ArrowUp,
        Key::ArrowDown => PhysicalKey::ArrowDown,
        Key::Semicolon => PhysicalKey::Char(';'),
        Key::OpenBracket => PhysicalKey::Char('['),
        Key::CloseBracket => PhysicalKey::Char(']'),
        _ => {
            // Letter keys are named by their uppercase letter.
            let mut chars = key.name().chars();
            match (chars.next(), chars.next()) {
                (Some(c), None) if c.is_ascii_alphabetic() => PhysicalKey::from(c),
                _ => PhysicalKey::Other,
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn key_event(key: Key, pressed: bool) -> Event {
        Event::Key {
            key,
            physical_key: None,
            pressed,
            repeat: false,
            modifiers: Default::default(),
        }
    }

    #[test]
    fn translates_keys() {
        let input = key_input_from_event(&key_event(Key::A, true)).unwrap();
        assert_eq!(input.key, PhysicalKey::Char('a'));
        assert!(input.pressed);
        assert!(!input.modifiers.any());

        let input = key_input_from_event(&key_event(Key::Semicolon, false)).unwrap();
        assert_eq!(input.key, PhysicalKey::Char(';'));
        assert!(!input.pressed);

        assert_eq!(
            key_input_from_event(&key_event(Key::ArrowLeft, true)).map(|k| k.key),
            Some(PhysicalKey::ArrowLeft)
        );
        assert_eq!(
            key_input_from_event(&key_event(Key::Num1, true)).map(|k| k.key),
            Some(PhysicalKey::Other)
        );
        assert!(key_input_from_event(&Event::Text("a".to_string())).is_none());
    }
}
