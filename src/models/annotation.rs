// Copyright (c) 2025, Jason Jenkins
// SPDX-License-Identifier: BSD-3-Clause

//! Annotation data structures.
//!
//! An annotation is a labeled time range on one audio track. Times are
//! seconds from the start of the track.

use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Prefix of every annotation id minted by the application.
pub const ID_PREFIX: &str = "ann-";

/// A labeled time range on a single track.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Annotation {
    pub id: String,
    pub start: f64,
    pub end: f64,
    #[serde(default)]
    pub text: String,
}

impl Annotation {
    /// Create an unlabeled annotation with a freshly minted id.
    pub fn new(start: f64, end: f64) -> Self {
        Self {
            id: mint_id(),
            start,
            end,
            text: String::new(),
        }
    }

    /// Whether `time` falls inside the annotation (inclusive on both ends).
    pub fn contains(&self, time: f64) -> bool {
        time >= self.start && time <= self.end
    }
}

/// Mint a new globally unique annotation id.
pub fn mint_id() -> String {
    format!("{}{}", ID_PREFIX, Uuid::new_v4().simple())
}

/// Return the annotations ordered by start time.
///
/// The input is left untouched; stored order is insertion order.
pub fn sorted_by_start(annotations: &[Annotation]) -> Vec<&Annotation> {
    let mut sorted: Vec<&Annotation> = annotations.iter().collect();
    sorted.sort_by(|a, b| a.start.total_cmp(&b.start));
    sorted
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_new_annotation_is_unlabeled_with_fresh_id() {
        let a = Annotation::new(3.5, 4.25);
        let b = Annotation::new(3.5, 4.25);

        assert!(a.id.starts_with(ID_PREFIX));
        assert_ne!(a.id, b.id);
        assert_eq!(a.text, "");
        assert_eq!(a.start, 3.5);
        assert_eq!(a.end, 4.25);
    }

    #[test]
    fn test_sorted_by_start_keeps_source_order() {
        let annotations = vec![
            Annotation { id: "b".into(), start: 5.0, end: 6.0, text: String::new() },
            Annotation { id: "a".into(), start: 1.0, end: 2.0, text: String::new() },
        ];

        let sorted = sorted_by_start(&annotations);
        assert_eq!(sorted[0].id, "a");
        assert_eq!(sorted[1].id, "b");
        assert_eq!(annotations[0].id, "b");
    }

    #[test]
    fn test_missing_text_defaults_to_empty() {
        let ann: Annotation = serde_json::from_str(r#"{"id":"x","start":1.0,"end":2.0}"#).unwrap();
        assert_eq!(ann.text, "");
    }
}
