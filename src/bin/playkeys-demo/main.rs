// Copyright (c) 2024 Mike Tsao. All rights reserved.

//! A window full of playable widgets. Type on the keyboard to play whichever
//! instrument is armed, or click and drag across any of them.

use anyhow::anyhow;
use demo::PlaykeysDemo;
use eframe::egui::ViewportBuilder;
use playkeys::prelude::*;
use std::path::PathBuf;

mod demo;

fn main() -> anyhow::Result<()> {
    env_logger::init();

    let settings_path = PathBuf::from(Settings::FILENAME);
    let settings = Settings::load_or_default(&settings_path);

    let options = eframe::NativeOptions {
        viewport: ViewportBuilder::default()
            .with_title(PlaykeysDemo::NAME)
            .with_inner_size(eframe::epaint::vec2(1024.0, 640.0))
            .to_owned(),
        ..Default::default()
    };

    if let Err(e) = eframe::run_native(
        PlaykeysDemo::NAME,
        options,
        Box::new(|_cc| Box::new(PlaykeysDemo::new_with(settings, settings_path))),
    ) {
        Err(anyhow!("eframe::run_native(): {:?}", e))
    } else {
        Ok(())
    }
}
