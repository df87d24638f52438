//! Tune-wide translation state

use super::bar::Alternative;
use super::key::{KeySignature, PitchMap};
use super::meter::TimeSignature;
use super::note::Note;
use crate::error::{Error, Result, SyntaxCause, SyntaxError};
use num_rational::Rational64;

/// All mutable state for one tune being translated
///
/// Owned by the driver and mutated in place by the transcriber and the
/// bar controller; a fresh context is required per tune.
#[derive(Debug, Clone)]
pub struct TuneContext {
    /// Source file name used in diagnostics
    pub filename: String,
    /// 1-based number of the line currently being processed
    pub line_number: usize,
    /// Raw text of the line currently being processed
    pub(crate) source_line: String,

    pub key_signature: KeySignature,
    /// Diatonic spelling of the 7 natural letters under the key
    pub pitch_map: PitchMap,
    pub time_signature: TimeSignature,
    /// Denominator applied to notes without an explicit duration token
    pub default_note_duration: u32,

    /// Depth of open repeat/alternative blocks
    pub indent_level: usize,
    pub alternative: Alternative,
    /// Bars consumed by the first ending
    pub alternative_bar_count: u32,
    /// Bars left before the second ending closes
    pub alternative_count_down: u32,
    /// Whether the first ending's bracket has already been closed (`:|`
    /// seen, `[2` still to come)
    pub(crate) first_ending_closed: bool,

    pub in_triplet: bool,
    /// Notes emitted so far in the open triplet group (0..=3)
    pub triplet_count: u8,
    /// The next note's duration must be halved
    pub in_broken_rhythm: bool,

    /// Last completed note, for tie-pitch validation
    pub prev_note: Option<Note>,
    /// Chord annotation waiting for its note
    pub(crate) pending_chord: Option<String>,

    /// Output text of the bar currently being assembled
    pub pending_line: String,
    /// The next emitted note needs no separator before it
    pub first_note_of_bar: bool,
    /// No bar boundary has been flushed yet (anacrusis detection)
    pub(crate) first_bar: bool,
    /// Accumulated duration of the current bar, as a fraction of a whole
    /// note
    pub(crate) bar_duration: Rational64,

    /// Completed output lines, in emission order
    pub output: Vec<String>,
}

impl TuneContext {
    pub fn new() -> Self {
        let time_signature = TimeSignature::default();
        Self {
            filename: String::new(),
            line_number: 0,
            source_line: String::new(),
            key_signature: KeySignature::default(),
            pitch_map: PitchMap::identity(),
            default_note_duration: time_signature.default_note_duration(),
            time_signature,
            indent_level: 0,
            alternative: Alternative::None,
            alternative_bar_count: 0,
            alternative_count_down: 0,
            first_ending_closed: false,
            in_triplet: false,
            triplet_count: 0,
            in_broken_rhythm: false,
            prev_note: None,
            pending_chord: None,
            pending_line: String::new(),
            first_note_of_bar: true,
            first_bar: true,
            bar_duration: Rational64::from_integer(0),
            output: Vec::new(),
        }
    }

    /// Dispatch an information line (`M:` or `K:`) into the tune state
    ///
    /// After music output has begun, a change additionally emits the
    /// matching `\time` or `\key` line.
    pub fn read_info_line(&mut self, line: &str) -> Result<()> {
        self.source_line = line.to_string();
        let body = if line.len() > 2 { &line[2..] } else { "" };
        match line.bytes().next() {
            Some(b'M') => {
                match TimeSignature::parse(body) {
                    Some(signature) => {
                        self.default_note_duration = signature.default_note_duration();
                        self.time_signature = signature;
                        if self.music_started() {
                            let text = format!(
                                "\\time {}/{}",
                                signature.numerator, signature.denominator
                            );
                            self.push_line(&text);
                        }
                    }
                    None => {
                        eprintln!(
                            "Warning: ignoring unrecognized meter '{}'",
                            body.trim()
                        );
                    }
                }
            }
            Some(b'K') => {
                let signature = KeySignature::parse(body)
                    .map_err(|e| self.syntax_error(2 + e.offset, e.cause))?;
                self.pitch_map = signature.pitch_map();
                self.key_signature = signature;
                if self.music_started() {
                    let text = format!(
                        "\\key {} \\{}",
                        signature.lilypond_pitch(),
                        signature.mode.lilypond()
                    );
                    self.push_line(&text);
                }
            }
            _ => {}
        }
        Ok(())
    }

    fn music_started(&self) -> bool {
        !self.output.is_empty() || !self.pending_line.is_empty()
    }

    /// Append a completed line to the output, indented to the current
    /// nesting depth
    pub(crate) fn push_line(&mut self, text: &str) {
        let mut line = "  ".repeat(self.indent_level);
        line.push_str(text);
        self.output.push(line);
    }

    /// Serialize a completed note into the pending line
    pub(crate) fn dump_note(&mut self, note: Note) {
        if self.first_note_of_bar {
            self.first_note_of_bar = false;
        } else {
            self.pending_line.push(' ');
        }
        if self.in_triplet && self.triplet_count == 0 {
            self.pending_line.push_str("\\times 2/3 { ");
        }
        self.pending_line.push_str(&note.render());
        if note.tied {
            self.pending_line.push_str(" ~");
        }

        let mut played = note.written_duration();
        if self.in_triplet {
            played *= Rational64::new(2, 3);
            self.triplet_count += 1;
            if self.triplet_count == 3 {
                self.pending_line.push_str(" }");
                self.in_triplet = false;
                self.triplet_count = 0;
            }
        }
        self.bar_duration += played;
        self.prev_note = Some(note);
    }

    /// Flush the pending bar into the output with a closing glyph
    ///
    /// Returns whether anything was flushed. The first flushed bar of the
    /// tune is checked for an anacrusis and prefixed with a `\partial`
    /// marker when shorter than a full measure.
    pub(crate) fn flush_bar(&mut self, glyph: &str) -> bool {
        if self.pending_line.is_empty() {
            return false;
        }
        let mut line = String::new();
        if self.first_bar {
            self.first_bar = false;
            if let Some(marker) = self.partial_measure_marker() {
                line.push_str(&marker);
                line.push(' ');
            }
        }
        line.push_str(&self.pending_line);
        line.push(' ');
        line.push_str(glyph);
        self.push_line(&line);
        self.reset_bar();
        true
    }

    /// Force-flush the pending line without a bar glyph (end of tune)
    pub(crate) fn flush_pending(&mut self) {
        if self.pending_line.is_empty() {
            return;
        }
        let line = self.pending_line.clone();
        self.push_line(&line);
        self.reset_bar();
    }

    fn reset_bar(&mut self) {
        self.pending_line.clear();
        self.first_note_of_bar = true;
        self.bar_duration = Rational64::from_integer(0);
    }

    /// Anacrusis marker for the first bar, when its accumulated duration
    /// falls short of a full measure
    fn partial_measure_marker(&self) -> Option<String> {
        let zero = Rational64::from_integer(0);
        let measure = self.time_signature.measure_duration();
        if self.bar_duration <= zero || self.bar_duration >= measure {
            return None;
        }
        let numerator = *self.bar_duration.numer();
        let denominator = *self.bar_duration.denom();
        if numerator == 1 {
            Some(format!("\\partial {}", denominator))
        } else {
            Some(format!("\\partial {}*{}", denominator, numerator))
        }
    }

    /// Build a positioned syntax diagnostic for the current line
    pub(crate) fn syntax_error(&self, column: usize, cause: SyntaxCause) -> Error {
        Error::Syntax(SyntaxError {
            filename: self.filename.clone(),
            line: self.line_number,
            column,
            source_line: self.source_line.clone(),
            cause,
        })
    }
}

impl Default for TuneContext {
    fn default() -> Self {
        Self::new()
    }
}
