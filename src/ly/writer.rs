//! LilyPond file writer

use crate::error::Result;
use crate::translator::{Header, TuneContext};
use std::fs::File;
use std::io::{BufWriter, Write};
use std::path::Path;

/// LilyPond language version stamped into the output
const LILYPOND_VERSION: &str = "2.12.2";

/// LilyPond file writer
pub struct LyWriter {
    file: BufWriter<File>,
}

impl LyWriter {
    /// Create a new LilyPond writer
    pub fn new(path: &Path) -> Result<Self> {
        let file = File::create(path)?;
        Ok(Self {
            file: BufWriter::new(file),
        })
    }

    /// Write the complete score: version, header, melody and score blocks
    pub fn write_score(&mut self, header: &Header, context: &TuneContext) -> Result<()> {
        writeln!(self.file, "\\version \"{}\"", LILYPOND_VERSION)?;
        writeln!(self.file)?;

        self.write_header(header)?;

        writeln!(self.file)?;
        writeln!(self.file, "melody = {{")?;
        writeln!(self.file, "  \\clef treble")?;
        writeln!(
            self.file,
            "  \\key {} \\{}",
            context.key_signature.lilypond_pitch(),
            context.key_signature.mode.lilypond()
        )?;
        writeln!(
            self.file,
            "  \\time {}/{}",
            context.time_signature.numerator, context.time_signature.denominator
        )?;
        writeln!(self.file)?;
        for line in &context.output {
            writeln!(self.file, "  {}", line)?;
        }
        writeln!(self.file, "}}")?;

        writeln!(self.file)?;
        writeln!(self.file, "\\score {{")?;
        writeln!(self.file, "  \\new Staff \\melody")?;
        writeln!(self.file, "  \\layout {{ }}")?;
        writeln!(self.file, "  \\midi {{ }}")?;
        writeln!(self.file, "}}")?;

        self.file.flush()?;
        Ok(())
    }

    fn write_header(&mut self, header: &Header) -> Result<()> {
        writeln!(self.file, "\\header {{")?;
        writeln!(self.file, "  title = \"{}\"", header.title)?;
        writeln!(self.file, "  composer = \"{}\"", header.composer)?;
        if !header.rhythm.is_empty() {
            writeln!(self.file, "  meter = \"{}\"", header.rhythm)?;
        }
        writeln!(self.file, "}}")?;
        Ok(())
    }
}
