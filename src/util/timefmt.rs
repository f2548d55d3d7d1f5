// Copyright (c) 2025, Jason Jenkins
// SPDX-License-Identifier: BSD-3-Clause

//! Time formatting for the transport, lists, and text export.

/// Format seconds as `m:ss.cc` (hundredths).
pub fn format_centis(seconds: f64) -> String {
    let seconds = seconds.max(0.0);
    let (mins, secs) = split_minutes(seconds);
    let centis = ((seconds % 1.0) * 100.0).floor() as u64;
    format!("{}:{:02}.{:02}", mins, secs, centis)
}

/// Format seconds as `m:ss.d` (tenths).
pub fn format_tenths(seconds: f64) -> String {
    let seconds = seconds.max(0.0);
    let (mins, secs) = split_minutes(seconds);
    let tenths = ((seconds % 1.0) * 10.0).floor() as u64;
    format!("{}:{:02}.{}", mins, secs, tenths)
}

fn split_minutes(seconds: f64) -> (u64, u64) {
    let mins = (seconds / 60.0).floor() as u64;
    let secs = (seconds % 60.0).floor() as u64;
    (mins, secs)
}
