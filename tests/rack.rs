// Copyright (c) 2024 Mike Tsao. All rights reserved.

use float_cmp::approx_eq;
use more_asserts::assert_gt;
use playkeys::prelude::*;

// One bus carries every widget's events, tagged by who sent them.
#[test]
fn shared_bus_tags_every_widget() {
    let mut rack = InstrumentRack::default();
    let piano = rack.mount(Piano::default());
    let drums = rack.mount(DrumPad::default());
    let mut dial = Dial::default();
    dial.attach(rack.peripheral_sink());
    let mut circle = CircleOfFifths::default();
    circle.attach(rack.peripheral_sink());

    rack.arm(piano);
    rack.handle_key(&KeyInput::down('j'));
    rack.handle_pointer(drums, &PointerInput::Down(0));
    dial.begin_drag(100.0);
    dial.drag_to(75.0);
    dial.end_drag();
    circle.select(1);

    let events = rack.drain();
    assert_eq!(events.len(), 5);
    assert_eq!(events[0].uid, piano);
    assert_eq!(
        events[0].event,
        WidgetEvent::from(NoteEvent::note_on(47, DEFAULT_VELOCITY, NoteSource::Keyboard))
    );
    assert_eq!(events[1].uid, drums);
    assert_eq!(events[2].uid, events[3].uid);
    assert_ne!(events[3].uid, events[4].uid);
    match events[3].event {
        WidgetEvent::Dial(DialEvent::Changed { value }) => {
            assert!(approx_eq!(f64, value, 25.0, epsilon = 1e-4))
        }
        ref other => panic!("unexpected {other:?}"),
    }
    assert_eq!(
        events[4].event,
        WidgetEvent::from(CircleEvent::Selected {
            key: "G".to_string()
        })
    );
}

#[test]
fn handing_the_keyboard_around() {
    let mut rack = InstrumentRack::default();
    let uids = [
        rack.mount(Piano::default()),
        rack.mount(Marimba::default()),
        rack.mount(DrumPad::default()),
    ];
    for uid in uids {
        assert!(rack.arm(uid));
        rack.handle_key(&KeyInput::down('d'));
        let events = rack.drain();
        assert_eq!(events.len(), 1);
        assert_eq!(events[0].uid, uid);
        assert_eq!(
            rack.iter().filter(|(_, i)| i.is_armed()).count(),
            1,
            "exactly one armed instrument"
        );
        rack.handle_key(&KeyInput::up('d'));
        rack.drain();
    }
}

#[test]
fn events_serialize_for_the_host() {
    let mut rack = InstrumentRack::default();
    let marimba = rack.mount(Marimba::default());
    rack.arm(marimba);
    rack.handle_key(&KeyInput::down(PhysicalKey::ArrowUp));
    let events = rack.drain();
    let json = serde_json::to_string(&events[0]).unwrap();
    assert_gt!(json.len(), 0);
    assert!(json.contains(r#""type":"pitch-bend""#), "{json}");
    assert!(json.contains(r#""value":200"#), "{json}");
}

#[test]
fn settings_drive_a_fresh_piano() {
    let settings = PianoSettings {
        focus_octave: 4,
        key_range: 14,
        note_hints: true,
        ..Default::default()
    };
    let mut rack = InstrumentRack::default();
    let uid = rack.mount(Piano::new_with(&settings));
    rack.arm(uid);
    rack.handle_key(&KeyInput::down('a'));
    let events = rack.drain();
    assert_eq!(
        events[0].event,
        WidgetEvent::from(NoteEvent::note_on(60, DEFAULT_VELOCITY, NoteSource::Keyboard))
    );
    match rack.get(uid) {
        Some(AnyInstrument::Piano(piano)) => {
            assert_eq!(piano.white_key_count(), 14);
            assert_eq!(piano.settings(), settings);
        }
        _ => panic!("expected a piano"),
    }
}
