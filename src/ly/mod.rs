//! LilyPond output: file writer and JSON inspection model

pub mod json;
pub mod writer;

pub use json::TuneJson;
pub use writer::LyWriter;
