//! Key signature resolution and diatonic pitch spelling

use crate::error::SyntaxCause;

/// 12-step chromatic scale in sharp spelling
const SHARP_SCALE: [&str; 12] = [
    "c", "c#", "d", "d#", "e", "f", "f#", "g", "g#", "a", "a#", "b",
];

/// 12-step chromatic scale in flat spelling
const FLAT_SCALE: [&str; 12] = [
    "c", "db", "d", "eb", "e", "f", "gb", "g", "ab", "a", "bb", "b",
];

/// Major tonics carrying sharps, in increasing sharp count (1 to 7)
const SHARP_KEYS: [&str; 7] = ["g", "d", "a", "e", "b", "f#", "c#"];

/// Major tonics carrying flats, in increasing flat count (1 to 7)
const FLAT_KEYS: [&str; 7] = ["f", "bb", "eb", "ab", "db", "gb", "cb"];

/// Order in which sharps are added to a key signature
const SHARP_ORDER: [char; 7] = ['f', 'c', 'g', 'd', 'a', 'e', 'b'];

/// Order in which flats are added to a key signature
const FLAT_ORDER: [char; 7] = ['b', 'e', 'a', 'd', 'g', 'c', 'f'];

/// Tonic alteration in a key signature
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Alteration {
    Sharp,
    Flat,
}

/// Church modes plus the major/minor aliases
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Mode {
    #[default]
    Major,
    Ionian,
    Dorian,
    Phrygian,
    Lydian,
    Mixolydian,
    Aeolian,
    Minor,
    Locrian,
}

impl Mode {
    /// Match the first three letters of a mode name
    pub fn from_prefix(prefix: &str) -> Option<Mode> {
        match prefix {
            "maj" => Some(Mode::Major),
            "ion" => Some(Mode::Ionian),
            "dor" => Some(Mode::Dorian),
            "phr" => Some(Mode::Phrygian),
            "lyd" => Some(Mode::Lydian),
            "mix" => Some(Mode::Mixolydian),
            "aeo" => Some(Mode::Aeolian),
            "min" => Some(Mode::Minor),
            "loc" => Some(Mode::Locrian),
            _ => None,
        }
    }

    /// Semitone offset of the mode's tonic above its relative major
    pub fn semitone_offset(self) -> usize {
        match self {
            Mode::Major | Mode::Ionian => 0,
            Mode::Dorian => 2,
            Mode::Phrygian => 4,
            Mode::Lydian => 5,
            Mode::Mixolydian => 7,
            Mode::Aeolian | Mode::Minor => 9,
            Mode::Locrian => 11,
        }
    }

    /// Mode name as used after `\key` in LilyPond
    pub fn lilypond(self) -> &'static str {
        match self {
            Mode::Major => "major",
            Mode::Ionian => "ionian",
            Mode::Dorian => "dorian",
            Mode::Phrygian => "phrygian",
            Mode::Lydian => "lydian",
            Mode::Mixolydian => "mixolydian",
            Mode::Aeolian => "aeolian",
            Mode::Minor => "minor",
            Mode::Locrian => "locrian",
        }
    }
}

/// Parse failure inside a key signature, with the byte offset of the
/// offending token relative to the signature text
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct KeyParseError {
    pub offset: usize,
    pub cause: SyntaxCause,
}

/// Resolved key signature: tonic pitch plus mode
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct KeySignature {
    pub letter: char,
    pub alteration: Option<Alteration>,
    pub mode: Mode,
}

impl Default for KeySignature {
    fn default() -> Self {
        Self {
            letter: 'c',
            alteration: None,
            mode: Mode::Major,
        }
    }
}

impl KeySignature {
    /// Parse a key signature of the form `<letter>[#|b][ ]<mode>`
    pub fn parse(text: &str) -> Result<Self, KeyParseError> {
        let bytes = text.as_bytes();
        let mut pos = 0;

        while pos < bytes.len() && bytes[pos].is_ascii_whitespace() {
            pos += 1;
        }
        if pos >= bytes.len() {
            return Err(KeyParseError {
                offset: pos,
                cause: SyntaxCause::EmptyKeySignature,
            });
        }

        let letter = bytes[pos].to_ascii_lowercase() as char;
        if !('a'..='g').contains(&letter) {
            return Err(KeyParseError {
                offset: pos,
                cause: SyntaxCause::InvalidPitch,
            });
        }
        let letter_offset = pos;
        pos += 1;

        let alteration = match bytes.get(pos).copied() {
            Some(b'#') => {
                pos += 1;
                Some(Alteration::Sharp)
            }
            Some(b'b') => {
                pos += 1;
                Some(Alteration::Flat)
            }
            _ => None,
        };

        let rest = &text[pos..];
        let mode_offset = pos
            + rest
                .find(|c: char| !c.is_whitespace())
                .unwrap_or(rest.len());
        let token: String = rest
            .chars()
            .filter(|c| !c.is_whitespace())
            .map(|c| c.to_ascii_lowercase())
            .collect();

        let prefix: String = token.chars().take(3).collect();
        let mode = if token.is_empty() {
            Mode::Major
        } else if token == "m" {
            Mode::Minor
        } else if token.chars().count() < 3 {
            return Err(KeyParseError {
                offset: mode_offset,
                cause: SyntaxCause::InvalidMode,
            });
        } else {
            Mode::from_prefix(&prefix).ok_or(KeyParseError {
                offset: mode_offset,
                cause: SyntaxCause::InvalidMode,
            })?
        };

        let signature = Self {
            letter,
            alteration,
            mode,
        };

        // A tonic spelling outside both chromatic scales (e.g. e#) cannot
        // be resolved to a pitch-spelling map
        if signature.relative_major().is_none() {
            return Err(KeyParseError {
                offset: letter_offset,
                cause: SyntaxCause::InvalidPitch,
            });
        }

        Ok(signature)
    }

    /// Tonic in chromatic-scale spelling ("f#", "bb", ...)
    fn tonic(&self) -> String {
        let mut text = self.letter.to_string();
        match self.alteration {
            Some(Alteration::Sharp) => text.push('#'),
            Some(Alteration::Flat) => text.push('b'),
            None => {}
        }
        text
    }

    /// Tonic as a LilyPond pitch name ("fis", "bes", ...)
    pub fn lilypond_pitch(&self) -> String {
        let mut text = self.letter.to_string();
        match self.alteration {
            Some(Alteration::Sharp) => text.push_str("is"),
            Some(Alteration::Flat) => text.push_str("es"),
            None => {}
        }
        text
    }

    /// The major key sharing this signature's pitch-spelling set
    ///
    /// Walks the chromatic scale from the tonic by the mode's offset,
    /// preferring sharp spelling unless the result is not a sharp-key
    /// tonic.
    pub fn relative_major(&self) -> Option<&'static str> {
        let tonic = self.tonic();
        let index = SHARP_SCALE
            .iter()
            .position(|p| *p == tonic)
            .or_else(|| FLAT_SCALE.iter().position(|p| *p == tonic))?;
        let major = (index + 12 - self.mode.semitone_offset()) % 12;
        let sharp = SHARP_SCALE[major];
        if SHARP_KEYS.contains(&sharp) {
            Some(sharp)
        } else {
            Some(FLAT_SCALE[major])
        }
    }

    /// Diatonic spelling map implied by this signature
    pub fn pitch_map(&self) -> PitchMap {
        let mut map = PitchMap::identity();
        let major = match self.relative_major() {
            Some(major) => major,
            None => return map,
        };
        if let Some(n) = SHARP_KEYS.iter().position(|k| *k == major) {
            for &letter in &SHARP_ORDER[..n + 1] {
                map.sharpen(letter);
            }
        } else if let Some(n) = FLAT_KEYS.iter().position(|k| *k == major) {
            for &letter in &FLAT_ORDER[..n + 1] {
                map.flatten(letter);
            }
        }
        map
    }
}

/// Spelling of the 7 natural letters under a key signature
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PitchMap {
    spellings: [String; 7],
}

impl PitchMap {
    /// Every letter spelled as itself (C major)
    pub fn identity() -> Self {
        Self {
            spellings: std::array::from_fn(|i| {
                ((b'a' + i as u8) as char).to_string()
            }),
        }
    }

    /// Spelled form of a natural letter ('a'..='g')
    pub fn get(&self, letter: char) -> &str {
        &self.spellings[(letter as u8 - b'a') as usize]
    }

    fn sharpen(&mut self, letter: char) {
        self.spellings[(letter as u8 - b'a') as usize] = format!("{}is", letter);
    }

    fn flatten(&mut self, letter: char) {
        self.spellings[(letter as u8 - b'a') as usize] = format!("{}es", letter);
    }
}

impl Default for PitchMap {
    fn default() -> Self {
        Self::identity()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_simple_key() {
        let key = KeySignature::parse("G").unwrap();
        assert_eq!(key.letter, 'g');
        assert_eq!(key.alteration, None);
        assert_eq!(key.mode, Mode::Major);
    }

    #[test]
    fn test_parse_minor_key() {
        let key = KeySignature::parse("Am").unwrap();
        assert_eq!(key.letter, 'a');
        assert_eq!(key.mode, Mode::Minor);
    }

    #[test]
    fn test_parse_sharp_minor_key() {
        let key = KeySignature::parse("F#m").unwrap();
        assert_eq!(key.letter, 'f');
        assert_eq!(key.alteration, Some(Alteration::Sharp));
        assert_eq!(key.mode, Mode::Minor);
    }

    #[test]
    fn test_parse_flat_key() {
        let key = KeySignature::parse("Bb").unwrap();
        assert_eq!(key.alteration, Some(Alteration::Flat));
        assert_eq!(key.mode, Mode::Major);
    }

    #[test]
    fn test_parse_modal_key() {
        let key = KeySignature::parse("D dorian").unwrap();
        assert_eq!(key.letter, 'd');
        assert_eq!(key.mode, Mode::Dorian);
        assert_eq!(key.relative_major(), Some("c"));
    }

    #[test]
    fn test_parse_mode_prefix() {
        let key = KeySignature::parse("E Mix").unwrap();
        assert_eq!(key.mode, Mode::Mixolydian);
        assert_eq!(key.relative_major(), Some("a"));
    }

    #[test]
    fn test_parse_empty_signature() {
        let err = KeySignature::parse("  ").unwrap_err();
        assert_eq!(err.cause, SyntaxCause::EmptyKeySignature);
    }

    #[test]
    fn test_parse_invalid_pitch() {
        let err = KeySignature::parse("H").unwrap_err();
        assert_eq!(err.cause, SyntaxCause::InvalidPitch);
        assert_eq!(err.offset, 0);
    }

    #[test]
    fn test_parse_invalid_mode() {
        let err = KeySignature::parse("D foo").unwrap_err();
        assert_eq!(err.cause, SyntaxCause::InvalidMode);
        assert_eq!(err.offset, 2);
    }

    #[test]
    fn test_parse_short_mode_garbage() {
        let err = KeySignature::parse("D xy").unwrap_err();
        assert_eq!(err.cause, SyntaxCause::InvalidMode);
    }

    #[test]
    fn test_unresolvable_tonic() {
        let err = KeySignature::parse("E#").unwrap_err();
        assert_eq!(err.cause, SyntaxCause::InvalidPitch);
    }

    #[test]
    fn test_c_major_identity() {
        let key = KeySignature::parse("C").unwrap();
        let map = key.pitch_map();
        for letter in 'a'..='g' {
            assert_eq!(map.get(letter), letter.to_string());
        }
    }

    #[test]
    fn test_d_major_sharps() {
        let map = KeySignature::parse("D").unwrap().pitch_map();
        assert_eq!(map.get('f'), "fis");
        assert_eq!(map.get('c'), "cis");
        assert_eq!(map.get('g'), "g");
    }

    #[test]
    fn test_f_major_flat() {
        let map = KeySignature::parse("F").unwrap().pitch_map();
        assert_eq!(map.get('b'), "bes");
        assert_eq!(map.get('e'), "e");
    }

    #[test]
    fn test_e_flat_major() {
        let map = KeySignature::parse("Eb").unwrap().pitch_map();
        assert_eq!(map.get('b'), "bes");
        assert_eq!(map.get('e'), "ees");
        assert_eq!(map.get('a'), "aes");
        assert_eq!(map.get('d'), "d");
    }

    #[test]
    fn test_relative_major_consistency() {
        // A mode spells like its relative major
        let minor = KeySignature::parse("Am").unwrap();
        let major = KeySignature::parse("C").unwrap();
        assert_eq!(minor.pitch_map(), major.pitch_map());

        let minor = KeySignature::parse("Em").unwrap();
        let major = KeySignature::parse("G").unwrap();
        assert_eq!(minor.pitch_map(), major.pitch_map());

        let dorian = KeySignature::parse("A dorian").unwrap();
        assert_eq!(dorian.pitch_map(), KeySignature::parse("G").unwrap().pitch_map());
    }

    #[test]
    fn test_flat_spelling_fallback() {
        // G minor sits in the flat system: relative major is Bb
        let key = KeySignature::parse("Gm").unwrap();
        assert_eq!(key.relative_major(), Some("bb"));
        let map = key.pitch_map();
        assert_eq!(map.get('b'), "bes");
        assert_eq!(map.get('e'), "ees");
        assert_eq!(map.get('a'), "a");
    }

    #[test]
    fn test_lilypond_pitch() {
        assert_eq!(KeySignature::parse("F#m").unwrap().lilypond_pitch(), "fis");
        assert_eq!(KeySignature::parse("Bb").unwrap().lilypond_pitch(), "bes");
        assert_eq!(KeySignature::parse("C").unwrap().lilypond_pitch(), "c");
    }
}
