// Copyright (c) 2024 Mike Tsao. All rights reserved.

//! Persistent preferences. [Settings] is what a host saves between sessions;
//! [PianoSettings] and [DialSettings] are the pieces that configure
//! individual widgets.

use crate::{dial::Dial, traits::HasSettings, types::Note};
use derivative::Derivative;
use serde::{Deserialize, Serialize};
use std::{
    fs::File,
    io::{Read, Write},
    path::{Path, PathBuf},
};
use strum_macros::{Display, EnumIter};
use thiserror::Error;

/// Why settings couldn't be loaded or saved.
#[derive(Debug, Error)]
pub enum SettingsError {
    #[allow(missing_docs)]
    #[error("couldn't read {path:?}: {source}")]
    Read {
        path: PathBuf,
        source: std::io::Error,
    },
    #[allow(missing_docs)]
    #[error("couldn't parse {path:?}: {source}")]
    Parse {
        path: PathBuf,
        source: serde_json::Error,
    },
    #[allow(missing_docs)]
    #[error("couldn't write {path:?}: {source}")]
    Write {
        path: PathBuf,
        source: std::io::Error,
    },
}

/// The saved shape of a [Piano](crate::instruments::Piano).
#[derive(Clone, Debug, Derivative, PartialEq, Serialize, Deserialize)]
#[derivative(Default)]
#[serde(rename_all = "kebab-case", default)]
pub struct PianoSettings {
    #[allow(missing_docs)]
    #[derivative(Default(value = "12"))]
    pub min_note: Note,
    #[allow(missing_docs)]
    #[derivative(Default(value = "107"))]
    pub max_note: Note,
    /// Width of the visible window, in white keys.
    #[derivative(Default(value = "28"))]
    pub key_range: u8,
    /// The octave whose C starts the visible window.
    #[derivative(Default(value = "2"))]
    pub focus_octave: i8,
    #[allow(missing_docs)]
    pub note_hints: bool,
    #[allow(missing_docs)]
    pub midi_hints: bool,
}

/// The saved shape of a [Dial].
#[derive(Clone, Debug, Derivative, PartialEq, Serialize, Deserialize)]
#[derivative(Default)]
#[serde(rename_all = "kebab-case", default)]
pub struct DialSettings {
    #[allow(missing_docs)]
    pub min: f64,
    #[allow(missing_docs)]
    #[derivative(Default(value = "100.0"))]
    pub max: f64,
    #[allow(missing_docs)]
    pub value: f64,
}
impl DialSettings {
    /// Builds a new [Dial] from these settings.
    pub fn build(&self) -> Dial {
        Dial::new_with(self.min, self.max, self.value)
    }

    /// Captures the current state of a [Dial].
    pub fn capture(dial: &Dial) -> Self {
        Self {
            min: dial.min(),
            max: dial.max(),
            value: dial.value(),
        }
    }
}

/// Which instrument receives the physical keyboard at startup.
#[derive(Clone, Copy, Debug, Default, Display, EnumIter, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum ArmedInstrument {
    #[default]
    #[allow(missing_docs)]
    Piano,
    #[allow(missing_docs)]
    Marimba,
    #[allow(missing_docs)]
    Drums,
    /// Nothing is armed; the keyboard only drives the rest of the host.
    Unarmed,
}

/// Global preferences.
#[derive(Debug, Default, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case", default)]
pub struct Settings {
    #[allow(missing_docs)]
    pub piano: PianoSettings,
    #[allow(missing_docs)]
    pub dial: DialSettings,
    #[allow(missing_docs)]
    pub armed: ArmedInstrument,

    #[serde(skip)]
    has_been_saved: bool,
}
impl Settings {
    /// The default filename, relative to the working directory.
    pub const FILENAME: &'static str = "playkeys-settings.json";

    /// Reads settings from `path`.
    pub fn load(path: &Path) -> anyhow::Result<Self> {
        let mut contents = String::new();
        File::open(path)
            .and_then(|mut f| f.read_to_string(&mut contents))
            .map_err(|source| SettingsError::Read {
                path: path.to_path_buf(),
                source,
            })?;
        let mut settings: Self =
            serde_json::from_str(&contents).map_err(|source| SettingsError::Parse {
                path: path.to_path_buf(),
                source,
            })?;
        settings.mark_clean();
        Ok(settings)
    }

    /// Reads settings from `path`, falling back to defaults if anything goes
    /// wrong.
    pub fn load_or_default(path: &Path) -> Self {
        match Self::load(path) {
            Ok(settings) => settings,
            Err(e) => {
                log::warn!("Using default settings: {e:?}");
                Self::default()
            }
        }
    }

    /// Writes settings to `path`, creating parent directories as needed.
    pub fn save(&mut self, path: &Path) -> anyhow::Result<()> {
        let json = serde_json::to_string_pretty(&self)
            .map_err(|_| anyhow::format_err!("Unable to serialize settings JSON"))?;
        if let Some(dir) = path.parent() {
            std::fs::create_dir_all(dir).map_err(|source| SettingsError::Write {
                path: dir.to_path_buf(),
                source,
            })?;
        }
        File::create(path)
            .and_then(|mut f| f.write_all(json.as_bytes()))
            .map_err(|source| SettingsError::Write {
                path: path.to_path_buf(),
                source,
            })?;
        self.mark_clean();
        Ok(())
    }
}
impl HasSettings for Settings {
    fn has_been_saved(&self) -> bool {
        self.has_been_saved
    }

    fn needs_save(&mut self) {
        self.has_been_saved = false;
    }

    fn mark_clean(&mut self) {
        self.has_been_saved = true;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::instruments::Piano;
    use float_cmp::approx_eq;
    use strum::IntoEnumIterator;

    fn temp_path(name: &str) -> PathBuf {
        std::env::temp_dir()
            .join(format!("playkeys-test-{}", std::process::id()))
            .join(name)
    }

    #[test]
    fn defaults_match_piano_defaults() {
        let settings = PianoSettings::default();
        let piano = Piano::default();
        assert_eq!(piano.settings(), settings);
        assert_eq!(settings.key_range, 28);
        assert_eq!(settings.focus_octave, 2);
    }

    #[test]
    fn partial_json_fills_in_defaults() {
        let settings: Settings =
            serde_json::from_str(r#"{"piano": {"focus-octave": 4}, "armed": "drums"}"#).unwrap();
        assert_eq!(settings.piano.focus_octave, 4);
        assert_eq!(settings.piano.max_note, 107);
        assert_eq!(settings.armed, ArmedInstrument::Drums);
        assert!(approx_eq!(f64, settings.dial.max, 100.0));
    }

    #[test]
    fn save_then_load() {
        let path = temp_path("save_then_load.json");
        let mut settings = Settings::default();
        settings.piano.note_hints = true;
        settings.dial.value = 42.0;
        settings.armed = ArmedInstrument::Marimba;
        settings.needs_save();
        assert!(!settings.has_been_saved());

        assert!(settings.save(&path).is_ok());
        assert!(settings.has_been_saved());

        let loaded = Settings::load(&path).unwrap();
        assert!(loaded.has_been_saved());
        assert_eq!(loaded.piano, settings.piano);
        assert_eq!(loaded.dial, settings.dial);
        assert_eq!(loaded.armed, ArmedInstrument::Marimba);
        let _ = std::fs::remove_file(&path);
    }

    #[test]
    fn missing_or_bad_files_fall_back() {
        let missing = temp_path("does-not-exist.json");
        assert!(Settings::load(&missing).is_err());
        assert_eq!(
            Settings::load_or_default(&missing).piano,
            PianoSettings::default()
        );

        let bad = temp_path("bad.json");
        std::fs::create_dir_all(bad.parent().unwrap()).unwrap();
        std::fs::write(&bad, "{ not json").unwrap();
        let e = Settings::load(&bad).unwrap_err();
        assert!(matches!(
            e.downcast_ref::<SettingsError>(),
            Some(SettingsError::Parse { .. })
        ));
        let _ = std::fs::remove_file(&bad);
    }

    #[test]
    fn dial_settings() {
        let dial = DialSettings {
            min: -1.0,
            max: 1.0,
            value: 0.25,
        }
        .build();
        let captured = DialSettings::capture(&dial);
        assert!(approx_eq!(f64, captured.value, 0.25, epsilon = 1e-9));
        assert!(approx_eq!(f64, captured.min, -1.0));
    }

    #[test]
    fn armed_instrument_names() {
        let names: Vec<String> = ArmedInstrument::iter().map(|a| a.to_string()).collect();
        assert_eq!(names, vec!["Piano", "Marimba", "Drums", "Unarmed"]);
    }
}
