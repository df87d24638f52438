//! ABC translator - parses ABC tune notation and builds LilyPond output
//!
//! The driver classifies input lines and feeds the tune context; the
//! per-character transcription lives in `transcribe`.

pub mod bar;
pub mod context;
pub mod key;
pub mod meter;
pub mod note;
pub mod transcribe;

use crate::error::{Error, Result};
use crate::ly::LyWriter;
pub use context::TuneContext;
use std::fs::File;
use std::io::{BufRead, BufReader, Read};
use std::path::Path;

/// Header fields extracted from tagged information lines
#[derive(Debug, Default, Clone)]
pub struct Header {
    pub title: String,
    pub composer: String,
    pub rhythm: String,
}

/// What a raw input line is
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum LineKind {
    Blank,
    Comment,
    Info,
    Music,
}

/// Main translator state: header fields plus the tune context
pub struct Translator {
    pub header: Header,
    pub context: TuneContext,
}

impl Translator {
    pub fn new() -> Self {
        Self {
            header: Header::default(),
            context: TuneContext::new(),
        }
    }

    /// Translate ABC input to a LilyPond file
    pub fn translate<R: Read>(&mut self, input: R, output: &Path) -> Result<()> {
        self.read_input(input)?;

        let mut writer = LyWriter::new(output)?;
        writer.write_score(&self.header, &self.context)?;

        Ok(())
    }

    /// Translate an ABC file to a LilyPond file
    pub fn translate_file(&mut self, input: &Path, output: &Path) -> Result<()> {
        self.context.filename = input.display().to_string();

        let file = File::open(input).map_err(|e| {
            Error::Io(std::io::Error::new(
                e.kind(),
                format!("Failed to open '{}': {}", input.display(), e),
            ))
        })?;
        self.read_input(file)?;

        let mut writer = LyWriter::new(output)?;
        writer.write_score(&self.header, &self.context)?;

        Ok(())
    }

    /// Read and process ABC input
    pub fn read_input<R: Read>(&mut self, input: R) -> Result<()> {
        let reader = BufReader::new(input);
        let lines = reader
            .lines()
            .collect::<std::io::Result<Vec<String>>>()?;

        // The last music line gets the force-flush flag
        let last_music = lines
            .iter()
            .rposition(|line| Self::classify(line) == LineKind::Music);

        for (index, raw) in lines.iter().enumerate() {
            self.context.line_number = index + 1;
            let line = raw.trim_end();

            match Self::classify(line) {
                LineKind::Blank | LineKind::Comment => {}
                LineKind::Info => self.read_info_line(line)?,
                LineKind::Music => {
                    self.context
                        .translate_notes(line, Some(index) == last_music)?;
                }
            }
        }

        Ok(())
    }

    /// Process a tagged information line
    ///
    /// `T:`/`C:`/`R:` fill the header (first title wins); `M:` and `K:`
    /// are routed into the tune context; other tags are ignored.
    pub fn read_info_line(&mut self, line: &str) -> Result<()> {
        let body = if line.len() > 2 { &line[2..] } else { "" };
        match line.bytes().next() {
            Some(b'T') => {
                if self.header.title.is_empty() {
                    self.header.title = normalize_field(body);
                }
            }
            Some(b'C') => self.header.composer = normalize_field(body),
            Some(b'R') => self.header.rhythm = normalize_field(body),
            Some(b'M') | Some(b'K') => self.context.read_info_line(line)?,
            _ => {}
        }
        Ok(())
    }

    fn classify(line: &str) -> LineKind {
        if line.trim().is_empty() {
            return LineKind::Blank;
        }
        let bytes = line.as_bytes();
        if bytes[0] == b'%' {
            return LineKind::Comment;
        }
        if bytes[0].is_ascii_uppercase() && bytes.get(1) == Some(&b':') {
            return LineKind::Info;
        }
        LineKind::Music
    }
}

impl Default for Translator {
    fn default() -> Self {
        Self::new()
    }
}

/// Trim a header field and collapse runs of whitespace to single spaces
fn normalize_field(text: &str) -> String {
    text.split_whitespace().collect::<Vec<_>>().join(" ")
}
