// Copyright (c) 2025, Jason Jenkins
// SPDX-License-Identifier: BSD-3-Clause

//! Audio file decoding and playback.
//!
//! Decoding and output are handed to `rodio`; this module only opens files,
//! reports their duration, and drives a single playback sink.

use crate::models::track::TrackId;
use anyhow::{Context, Result};
use rodio::{Decoder, OutputStream, OutputStreamHandle, Sink, Source};
use std::fs::File;
use std::io::BufReader;
use std::path::Path;
use std::time::Duration;

type FileDecoder = Decoder<BufReader<File>>;

fn open_decoder(path: &Path) -> Result<FileDecoder> {
    let file = File::open(path).with_context(|| format!("Failed to open {}", path.display()))?;
    let decoder = Decoder::new(BufReader::new(file))
        .with_context(|| format!("Unsupported audio file {}", path.display()))?;
    Ok(decoder)
}

/// Duration of an audio file in seconds.
///
/// Falls back to counting samples when the container does not declare a
/// length, so this can be slow and should run off the UI thread.
pub fn probe_duration(path: &Path) -> Result<f64> {
    let decoder = open_decoder(path)?;
    if let Some(duration) = decoder.total_duration() {
        return Ok(duration.as_secs_f64());
    }
    let frame_rate = f64::from(decoder.sample_rate()) * f64::from(decoder.channels());
    if frame_rate <= 0.0 {
        anyhow::bail!("Audio file {} reports no sample rate", path.display());
    }
    let samples = decoder.count() as f64;
    Ok(samples / frame_rate)
}

struct AudioOutput {
    // Dropping the stream stops all output
    _stream: OutputStream,
    _handle: OutputStreamHandle,
    sink: Sink,
}

/// Plays one track at a time.
pub struct AudioPlayer {
    output: Option<AudioOutput>,
    loaded: Option<TrackId>,
    playing: bool,
}

impl Default for AudioPlayer {
    fn default() -> Self {
        Self::new()
    }
}

impl AudioPlayer {
    /// Open the default output device. Without one, the player stays silent
    /// and reports an error on every attach.
    pub fn new() -> Self {
        let output = match Self::open_output() {
            Ok(output) => Some(output),
            Err(e) => {
                log::error!("Audio output unavailable: {:#}", e);
                None
            }
        };
        Self {
            output,
            loaded: None,
            playing: false,
        }
    }

    fn open_output() -> Result<AudioOutput> {
        let (stream, handle) = OutputStream::try_default().context("No default audio device")?;
        let sink = Sink::try_new(&handle).context("Failed to create audio sink")?;
        Ok(AudioOutput {
            _stream: stream,
            _handle: handle,
            sink,
        })
    }

    /// Queue a track for playback, paused at the beginning.
    pub fn attach(&mut self, track: &TrackId) -> Result<()> {
        let output = self.output.as_ref().context("Audio output unavailable")?;
        let decoder = open_decoder(&track.to_path())?;
        output.sink.clear();
        output.sink.append(decoder);
        output.sink.pause();
        self.loaded = Some(track.clone());
        self.playing = false;
        log::info!("Attached audio for {}", track);
        Ok(())
    }

    /// Drop whatever is queued.
    pub fn detach(&mut self) {
        if let Some(output) = &self.output {
            output.sink.clear();
        }
        self.loaded = None;
        self.playing = false;
    }

    pub fn loaded(&self) -> Option<&TrackId> {
        self.loaded.as_ref()
    }

    pub fn play(&mut self) {
        if let (Some(output), Some(_)) = (&self.output, &self.loaded) {
            output.sink.play();
            self.playing = true;
        }
    }

    pub fn pause(&mut self) {
        if let Some(output) = &self.output {
            output.sink.pause();
        }
        self.playing = false;
    }

    pub fn seek(&mut self, seconds: f64) {
        let Some(output) = &self.output else {
            return;
        };
        if let Err(e) = output.sink.try_seek(Duration::from_secs_f64(seconds.max(0.0))) {
            log::warn!("Seek to {:.2}s failed: {}", seconds, e);
        }
    }

    /// Current playback position in seconds.
    pub fn position(&self) -> f64 {
        self.output
            .as_ref()
            .map(|o| o.sink.get_pos().as_secs_f64())
            .unwrap_or(0.0)
    }

    pub fn is_playing(&self) -> bool {
        self.playing
    }

    /// Whether a playing track ran out of samples. Clears the playing flag.
    pub fn take_finished(&mut self) -> bool {
        let drained = self.output.as_ref().map(|o| o.sink.empty()).unwrap_or(false);
        if self.playing && drained {
            self.playing = false;
            return true;
        }
        false
    }
}
