//! Time signature parsing and the default note length heuristic

use num_rational::Rational64;

/// Time signature from an `M:` line
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TimeSignature {
    pub numerator: i64,
    pub denominator: i64,
}

impl Default for TimeSignature {
    fn default() -> Self {
        Self {
            numerator: 4,
            denominator: 4,
        }
    }
}

impl TimeSignature {
    /// Parse a meter field: `n/d`, or the symbols `C` (4/4) and `C|` (2/2)
    pub fn parse(text: &str) -> Option<Self> {
        let text = text.trim();
        match text {
            "C" => return Some(Self::default()),
            "C|" => {
                return Some(Self {
                    numerator: 2,
                    denominator: 2,
                })
            }
            _ => {}
        }
        let (numerator, denominator) = text.split_once('/')?;
        let numerator: i64 = numerator.trim().parse().ok()?;
        let denominator: i64 = denominator.trim().parse().ok()?;
        if numerator <= 0 || denominator <= 0 {
            return None;
        }
        Some(Self {
            numerator,
            denominator,
        })
    }

    /// Default note length denominator implied by the meter: sixteenths
    /// below 3/4, eighths from 3/4 up
    pub fn default_note_duration(&self) -> u32 {
        if self.numerator * 4 < self.denominator * 3 {
            16
        } else {
            8
        }
    }

    /// One full measure as a fraction of a whole note
    pub fn measure_duration(&self) -> Rational64 {
        Rational64::new(self.numerator, self.denominator)
    }
}
