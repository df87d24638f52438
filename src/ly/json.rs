//! JSON serialization types for translated tunes

use crate::translator::{Header, TuneContext};
use serde::Serialize;

/// Top-level JSON structure for a translated tune
#[derive(Debug, Clone, Serialize)]
pub struct TuneJson {
    /// Tune title
    #[serde(skip_serializing_if = "String::is_empty")]
    pub title: String,
    /// Composer name
    #[serde(skip_serializing_if = "String::is_empty")]
    pub composer: String,
    /// Rhythm label (reel, jig, ...)
    #[serde(skip_serializing_if = "String::is_empty")]
    pub rhythm: String,
    /// Key as LilyPond pitch and mode (e.g. "fis minor")
    pub key: String,
    /// Time signature (e.g. "6/8")
    pub time: String,
    /// Translated melody lines
    pub melody: Vec<String>,
}

impl TuneJson {
    /// Create a TuneJson from a translated tune
    pub fn new(header: &Header, context: &TuneContext) -> Self {
        Self {
            title: header.title.clone(),
            composer: header.composer.clone(),
            rhythm: header.rhythm.clone(),
            key: format!(
                "{} {}",
                context.key_signature.lilypond_pitch(),
                context.key_signature.mode.lilypond()
            ),
            time: format!(
                "{}/{}",
                context.time_signature.numerator, context.time_signature.denominator
            ),
            melody: context.output.clone(),
        }
    }
}
