// Copyright (c) 2024 Mike Tsao. All rights reserved.

use eframe::egui::{CentralPanel, Context, ScrollArea, TopBottomPanel};
use playkeys::{
    egui::{
        key_inputs, CircleOfFifthsWidget, DialWidget, DrumPadWidget, MarimbaWidget, PianoWidget,
    },
    prelude::*,
};
use std::{collections::VecDeque, path::PathBuf};
use strum::IntoEnumIterator;

pub(crate) struct PlaykeysDemo {
    rack: InstrumentRack,
    piano: Uid,
    marimba: Uid,
    drums: Uid,
    dial: Dial,
    circle: CircleOfFifths,

    settings: Settings,
    settings_path: PathBuf,
    event_log: VecDeque<String>,
}
impl PlaykeysDemo {
    pub(crate) const NAME: &'static str = "playkeys";
    const EVENT_LOG_LEN: usize = 12;

    pub(crate) fn new_with(settings: Settings, settings_path: PathBuf) -> Self {
        let mut rack = InstrumentRack::default();
        let piano = rack.mount(Piano::new_with(&settings.piano));
        let marimba = rack.mount(Marimba::default());
        let drums = rack.mount(DrumPad::default());
        let mut dial = settings.dial.build();
        dial.attach(rack.peripheral_sink());
        let mut circle = CircleOfFifths::default();
        circle.attach(rack.peripheral_sink());

        let mut r = Self {
            rack,
            piano,
            marimba,
            drums,
            dial,
            circle,
            settings,
            settings_path,
            event_log: Default::default(),
        };
        r.arm(r.settings.armed);
        r
    }

    fn arm(&mut self, choice: ArmedInstrument) {
        match choice {
            ArmedInstrument::Piano => {
                self.rack.arm(self.piano);
            }
            ArmedInstrument::Marimba => {
                self.rack.arm(self.marimba);
            }
            ArmedInstrument::Drums => {
                self.rack.arm(self.drums);
            }
            ArmedInstrument::Unarmed => {
                self.rack.disarm();
            }
        }
    }

    fn armed_choice(&self) -> ArmedInstrument {
        match self.rack.armed() {
            Some(uid) if uid == self.piano => ArmedInstrument::Piano,
            Some(uid) if uid == self.marimba => ArmedInstrument::Marimba,
            Some(uid) if uid == self.drums => ArmedInstrument::Drums,
            _ => ArmedInstrument::Unarmed,
        }
    }

    fn handle_input_events(&mut self, ctx: &Context) {
        for input in key_inputs(ctx) {
            self.rack.handle_key(&input);
        }
    }

    fn handle_events(&mut self) {
        for emitted in self.rack.drain() {
            match &emitted.event {
                WidgetEvent::Note(event) => {
                    log::debug!("{}: {:?}", emitted.uid, event.to_midi_message());
                }
                WidgetEvent::Dial(DialEvent::Changed { .. }) => {
                    self.settings.dial = DialSettings::capture(&self.dial);
                    self.settings.needs_save();
                }
                WidgetEvent::Dial(DialEvent::Adjusted { .. }) => continue,
                WidgetEvent::Circle(_) => {}
            }
            let line = match serde_json::to_string(&emitted.event) {
                Ok(json) => format!("{} {json}", emitted.uid),
                Err(e) => format!("{} <{e}>", emitted.uid),
            };
            log::info!("{line}");
            self.event_log.push_front(line);
            self.event_log.truncate(Self::EVENT_LOG_LEN);
        }
    }

    // Arrow keys and the hint checkboxes can change the piano, so its settings
    // are compared after each frame.
    fn sync_piano_settings(&mut self) {
        if let Some(AnyInstrument::Piano(piano)) = self.rack.get(self.piano) {
            let current = piano.settings();
            if current != self.settings.piano {
                self.settings.piano = current;
                self.settings.needs_save();
            }
        }
    }

    fn show_top(&mut self, ui: &mut eframe::egui::Ui) {
        ui.horizontal(|ui| {
            ui.label("Keyboard plays:");
            let mut choice = self.armed_choice();
            for option in ArmedInstrument::iter() {
                ui.radio_value(&mut choice, option, option.to_string());
            }
            if choice != self.armed_choice() {
                self.arm(choice);
                self.settings.armed = choice;
                self.settings.needs_save();
            }
            ui.separator();
            self.rack.with_instrument(self.piano, |instrument| {
                if let AnyInstrument::Piano(piano) = instrument {
                    let mut note_hints = piano.note_hints();
                    if ui.checkbox(&mut note_hints, "Note names").changed() {
                        piano.set_note_hints(note_hints);
                    }
                    let mut midi_hints = piano.midi_hints();
                    if ui.checkbox(&mut midi_hints, "MIDI numbers").changed() {
                        piano.set_midi_hints(midi_hints);
                    }
                    ui.label(format!("Octave {}", piano.focus_octave()));
                }
            });
        });
    }

    fn show_center(&mut self, ui: &mut eframe::egui::Ui) {
        self.rack.with_instrument(self.piano, |instrument| {
            if let AnyInstrument::Piano(piano) = instrument {
                ui.add(PianoWidget::widget(piano));
            }
        });
        ui.add_space(8.0);
        self.rack.with_instrument(self.marimba, |instrument| {
            if let AnyInstrument::Marimba(marimba) = instrument {
                ui.add(MarimbaWidget::widget(marimba));
            }
        });
        ui.add_space(8.0);
        ui.horizontal(|ui| {
            self.rack.with_instrument(self.drums, |instrument| {
                if let AnyInstrument::DrumPad(drums) = instrument {
                    ui.add(DrumPadWidget::widget(drums));
                }
            });
            ui.vertical(|ui| {
                ui.add(DialWidget::widget(&mut self.dial));
                ui.add(CircleOfFifthsWidget::widget(&mut self.circle));
            });
            ScrollArea::vertical().show(ui, |ui| {
                for line in self.event_log.iter() {
                    ui.monospace(line);
                }
            });
        });
    }
}
impl eframe::App for PlaykeysDemo {
    fn update(&mut self, ctx: &Context, _: &mut eframe::Frame) {
        self.handle_input_events(ctx);

        TopBottomPanel::top("top-panel")
            .resizable(false)
            .show(ctx, |ui| self.show_top(ui));
        CentralPanel::default().show(ctx, |ui| self.show_center(ui));

        self.handle_events();
        self.sync_piano_settings();
    }

    fn on_exit(&mut self, _gl: Option<&eframe::glow::Context>) {
        if !self.settings.has_been_saved() {
            if let Err(e) = self.settings.save(&self.settings_path) {
                log::warn!("Couldn't save settings: {e:?}");
            }
        }
    }
}
