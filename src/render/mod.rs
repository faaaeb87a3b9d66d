//! Rendering adapters: segments to a component tree, and to the terminal.

pub mod ansi;
pub mod component;

pub use component::{Component, DecorationState};

use crate::message::Segment;

/// Render segments straight to an ANSI-styled string.
pub fn to_ansi(segments: &[Segment]) -> String {
    ansi::to_ansi(&Component::from_segments(segments))
}

/// Concatenated segment text without styling.
pub fn to_plain(segments: &[Segment]) -> String {
    segments.iter().map(Segment::content).collect()
}
