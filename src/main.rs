// Copyright (c) 2025, Jason Jenkins
// SPDX-License-Identifier: BSD-3-Clause

//! Wavejotter
//!
//! A desktop application for listening to audio files and marking time
//! ranges in them with text labels.

mod app;
mod error;
mod io;
mod models;
mod session;
mod ui;
mod util;

use anyhow::Result;
use app::WavejotterApp;

fn main() -> Result<()> {
    // Initialize logging
    env_logger::init();

    let options = eframe::NativeOptions {
        viewport: egui::ViewportBuilder::default()
            .with_inner_size([1280.0, 800.0])
            .with_min_inner_size([800.0, 600.0])
            .with_title("Wavejotter"),
        ..Default::default()
    };

    eframe::run_native(
        "Wavejotter",
        options,
        Box::new(|_cc| Ok(Box::new(WavejotterApp::new()))),
    )
    .map_err(|e| anyhow::anyhow!("Application error: {}", e))?;

    Ok(())
}
