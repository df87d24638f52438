//! Per-line note-stream transcription
//!
//! One musical event at a time: bar, chord annotation, triplet marker,
//! accidental, rest or pitch, octave marks, tie validation, duration
//! tokens, tie marker, dump. State lives in the TuneContext so a phrase
//! may span input lines.

use super::bar::{BarGlyph, BarToken};
use super::context::TuneContext;
use super::note::{Accidental, Note};
use crate::error::{Result, SyntaxCause};

impl TuneContext {
    /// Translate one line of music, appending completed lines to the
    /// output
    ///
    /// `is_final_line` force-flushes the pending partial line without a
    /// bar glyph; otherwise a line break with pending content closes the
    /// bar as if a plain bar line had been read.
    pub fn translate_notes(&mut self, line: &str, is_final_line: bool) -> Result<()> {
        self.source_line = line.to_string();
        let bytes = line.as_bytes();
        let mut pos = 0;

        while pos < bytes.len() {
            let b = bytes[pos];

            if b == b' ' || b == b'\t' {
                pos += 1;
                continue;
            }

            if let Some((token, length)) = BarToken::scan(&bytes[pos..]) {
                pos += length;
                self.handle_bar(token);
                continue;
            }

            if b == b'"' {
                pos += 1;
                let start = pos;
                while pos < bytes.len() && bytes[pos] != b'"' {
                    pos += 1;
                }
                if pos >= bytes.len() {
                    return Err(self.syntax_error(
                        bytes.len(),
                        SyntaxCause::UnterminatedChordAnnotation,
                    ));
                }
                self.pending_chord = Some(line[start..pos].to_string());
                pos += 1;
                continue;
            }

            if b == b'(' && bytes.get(pos + 1) == Some(&b'3') {
                self.in_triplet = true;
                self.triplet_count = 0;
                pos += 2;
                continue;
            }

            self.read_music_event(line, &mut pos)?;
        }

        if is_final_line {
            self.flush_pending();
        } else if !self.pending_line.is_empty() {
            self.handle_bar(BarToken::Bar(BarGlyph::Single));
        }
        Ok(())
    }

    /// Parse one note or rest starting at the cursor and dump it
    fn read_music_event(&mut self, line: &str, pos: &mut usize) -> Result<()> {
        let bytes = line.as_bytes();
        let mut note = Note::new(self.default_note_duration);
        note.chord = self.pending_chord.take();

        // Accidental, longest match first
        let accidental = if bytes[*pos] == b'^' && bytes.get(*pos + 1) == Some(&b'^') {
            *pos += 2;
            Some(Accidental::DoubleSharp)
        } else if bytes[*pos] == b'_' && bytes.get(*pos + 1) == Some(&b'_') {
            *pos += 2;
            Some(Accidental::DoubleFlat)
        } else if bytes[*pos] == b'^' {
            *pos += 1;
            Some(Accidental::Sharp)
        } else if bytes[*pos] == b'_' {
            *pos += 1;
            Some(Accidental::Flat)
        } else if bytes[*pos] == b'=' {
            *pos += 1;
            Some(Accidental::Natural)
        } else {
            None
        };

        // Rest or pitch letter; the letter case selects the base octave
        match bytes.get(*pos).copied() {
            Some(b'z') if accidental.is_none() => {
                note.set_rest();
                *pos += 1;
            }
            Some(b) if b.is_ascii_alphabetic() && b.to_ascii_lowercase() >= b'a'
                && b.to_ascii_lowercase() <= b'g' =>
            {
                let upper = b.is_ascii_uppercase();
                let letter = b.to_ascii_lowercase() as char;
                note.octave = if upper { 1 } else { 2 };
                note.pitch = match accidental {
                    Some(accidental) => accidental.spell(letter),
                    None => self.pitch_map.get(letter).to_string(),
                };
                *pos += 1;

                // Octave marks: `,` only descends from uppercase, `'`
                // only ascends from lowercase
                while let Some(&mark) = bytes.get(*pos) {
                    match mark {
                        b',' => {
                            if !upper {
                                return Err(self.syntax_error(
                                    *pos,
                                    SyntaxCause::InvalidOctaveCombination,
                                ));
                            }
                            note.octave -= 1;
                        }
                        b'\'' => {
                            if upper {
                                return Err(self.syntax_error(
                                    *pos,
                                    SyntaxCause::InvalidOctaveCombination,
                                ));
                            }
                            note.octave += 1;
                        }
                        _ => break,
                    }
                    *pos += 1;
                }
            }
            _ => {
                return Err(self.syntax_error(*pos, SyntaxCause::NotAPitch));
            }
        }

        // A tied note must be followed by the same resolved pitch
        if let Some(prev) = &self.prev_note {
            if prev.tied && (prev.pitch != note.pitch || prev.octave != note.octave) {
                return Err(self.syntax_error(*pos, SyntaxCause::TiedPitchMismatch));
            }
        }

        // Duration: broken-rhythm carry-in, then one of the marker forms
        if self.in_broken_rhythm {
            note.duration *= 2;
            self.in_broken_rhythm = false;
        }
        match bytes.get(*pos).copied() {
            Some(b'>') => {
                note.dotted = true;
                self.in_broken_rhythm = true;
                *pos += 1;
            }
            Some(b) if b.is_ascii_digit() => {
                let start = *pos;
                let multiplier = read_number(bytes, pos);
                note.apply_multiplier(multiplier)
                    .map_err(|cause| self.syntax_error(start, cause))?;
            }
            Some(b'/') => {
                *pos += 1;
                match bytes.get(*pos).copied() {
                    Some(b) if b.is_ascii_digit() => {
                        let start = *pos;
                        let divisor = read_number(bytes, pos);
                        note.apply_divisor(divisor)
                            .map_err(|cause| self.syntax_error(start, cause))?;
                    }
                    _ => {
                        note.duration *= 2;
                    }
                }
            }
            _ => {}
        }

        // Tie marker
        if bytes.get(*pos) == Some(&b'-') {
            note.tied = true;
            *pos += 1;
        }

        self.dump_note(note);
        Ok(())
    }
}

/// Read an unsigned decimal number at the cursor
fn read_number(bytes: &[u8], pos: &mut usize) -> u32 {
    let mut value: u32 = 0;
    while let Some(&b) = bytes.get(*pos) {
        if !b.is_ascii_digit() {
            break;
        }
        value = value.saturating_mul(10).saturating_add((b - b'0') as u32);
        *pos += 1;
    }
    value
}
