//! Note model and duration calculation

use crate::error::SyntaxCause;
use num_rational::Rational64;
use std::fmt::Write;

/// Explicit accidental on a note
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Accidental {
    Sharp,
    Flat,
    Natural,
    DoubleSharp,
    DoubleFlat,
}

impl Accidental {
    /// LilyPond spelling of a natural letter under this accidental
    pub fn spell(self, letter: char) -> String {
        match self {
            Accidental::Sharp => format!("{}is", letter),
            Accidental::Flat => format!("{}es", letter),
            Accidental::Natural => letter.to_string(),
            Accidental::DoubleSharp => format!("{}isis", letter),
            Accidental::DoubleFlat => format!("{}eses", letter),
        }
    }
}

/// One musical event being assembled by the transcriber
///
/// Built up field by field as the state machine walks the token, then
/// serialized by the dump step and retired into `prev_note`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Note {
    /// Resolved pitch spelling ("c", "fis", ...), or "r" for a rest
    pub pitch: String,
    /// Octave marks relative to LilyPond c: positive = `'`, negative = `,`
    pub octave: i32,
    /// Duration denominator (4 = quarter, 8 = eighth, ...)
    pub duration: u32,
    pub dotted: bool,
    pub tied: bool,
    /// Guitar chord annotation attached to this note
    pub chord: Option<String>,
    pub is_rest: bool,
}

impl Note {
    pub fn new(duration: u32) -> Self {
        Self {
            pitch: String::new(),
            octave: 0,
            duration,
            dotted: false,
            tied: false,
            chord: None,
            is_rest: false,
        }
    }

    pub fn set_rest(&mut self) {
        self.pitch = "r".to_string();
        self.octave = 0;
        self.is_rest = true;
    }

    /// Apply an integer duration multiplier (the "3" of `C3`)
    ///
    /// Multiples of 1.5 make a dotted note; multiples of 2 lengthen
    /// plainly. The implied division must be exact.
    pub fn apply_multiplier(&mut self, multiplier: u32) -> Result<(), SyntaxCause> {
        let divisor = if multiplier > 0 && multiplier % 3 == 0 {
            self.dotted = true;
            multiplier * 2 / 3
        } else if multiplier > 0 && multiplier % 2 == 0 {
            multiplier
        } else {
            return Err(SyntaxCause::UnhandledDurationMultiplier);
        };
        if self.duration % divisor != 0 {
            return Err(SyntaxCause::UnhandledDurationMultiplier);
        }
        self.duration /= divisor;
        Ok(())
    }

    /// Apply a fractional divisor (the "2" of `C/2`); must be a power of two
    pub fn apply_divisor(&mut self, divisor: u32) -> Result<(), SyntaxCause> {
        if !divisor.is_power_of_two() {
            return Err(SyntaxCause::InvalidDurationDivisor);
        }
        self.duration = self.duration.saturating_mul(divisor);
        Ok(())
    }

    /// Written duration as a fraction of a whole note
    pub fn written_duration(&self) -> Rational64 {
        let duration = Rational64::new(1, self.duration as i64);
        if self.dotted {
            duration * Rational64::new(3, 2)
        } else {
            duration
        }
    }

    /// Serialize to LilyPond note text (tie marker excluded)
    pub fn render(&self) -> String {
        let mut text = self.pitch.clone();
        for _ in 0..self.octave {
            text.push('\'');
        }
        for _ in 0..-self.octave {
            text.push(',');
        }
        let _ = write!(text, "{}", self.duration);
        if self.dotted {
            text.push('.');
        }
        if let Some(chord) = &self.chord {
            let _ = write!(text, "^\"{}\"", chord);
        }
        text
    }
}
