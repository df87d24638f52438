//! Bar line recognition and repeat/alternative bookkeeping

use super::context::TuneContext;

/// Which alternative-ending phase is open
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Alternative {
    #[default]
    None,
    First,
    Second,
}

/// Rendering of an ordinary bar boundary
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BarGlyph {
    Single,
    Double,
    Final,
}

impl BarGlyph {
    pub fn lilypond(self) -> &'static str {
        match self {
            BarGlyph::Single => "|",
            BarGlyph::Double => "\\bar \"||\"",
            BarGlyph::Final => "\\bar \"|.\"",
        }
    }
}

/// One bar-boundary token, matched longest first
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BarToken {
    /// `|:`
    OpenRepeat,
    /// `:|`
    CloseRepeat,
    /// `::`
    CloseAndReopen,
    /// `|1`
    BeginFirstEnding,
    /// `:|2` — close the first ending and start the second
    BeginSecondEnding,
    /// `[2` — start the second ending after a plain bar closed the first
    OpenSecondEnding,
    Bar(BarGlyph),
}

/// Token table in match priority order
const BAR_TOKENS: [(&str, BarToken); 9] = [
    (":|2", BarToken::BeginSecondEnding),
    ("|1", BarToken::BeginFirstEnding),
    ("|:", BarToken::OpenRepeat),
    (":|", BarToken::CloseRepeat),
    ("||", BarToken::Bar(BarGlyph::Double)),
    ("|]", BarToken::Bar(BarGlyph::Final)),
    ("::", BarToken::CloseAndReopen),
    ("[2", BarToken::OpenSecondEnding),
    ("|", BarToken::Bar(BarGlyph::Single)),
];

impl BarToken {
    /// Match a bar token at the head of the input, returning it with its
    /// byte length
    pub fn scan(input: &[u8]) -> Option<(BarToken, usize)> {
        for (text, token) in BAR_TOKENS {
            if input.starts_with(text.as_bytes()) {
                return Some((token, text.len()));
            }
        }
        None
    }
}

impl TuneContext {
    /// Apply a bar boundary to the repeat/alternative state, flushing the
    /// pending bar into the output
    pub(crate) fn handle_bar(&mut self, token: BarToken) {
        match token {
            BarToken::Bar(glyph) => self.plain_bar(glyph),

            BarToken::OpenRepeat => {
                if self.alternative == Alternative::Second {
                    // The boundary opening the new section also closes the
                    // pending alternative
                    self.plain_bar(BarGlyph::Single);
                } else {
                    self.flush_counted_bar(BarGlyph::Single);
                }
                self.push_line("\\repeat volta 2 {");
                self.indent_level += 1;
            }

            BarToken::CloseRepeat => {
                if self.alternative == Alternative::First && !self.first_ending_closed {
                    // Ends the first alternative; `[2` will start the second
                    self.flush_counted_bar(BarGlyph::Single);
                    self.indent_level = self.indent_level.saturating_sub(1);
                    self.push_line("}");
                    self.first_ending_closed = true;
                } else {
                    self.flush_bar(BarGlyph::Single.lilypond());
                    self.indent_level = self.indent_level.saturating_sub(1);
                    self.push_line("}");
                }
            }

            BarToken::CloseAndReopen => {
                self.flush_bar(BarGlyph::Single.lilypond());
                self.indent_level = self.indent_level.saturating_sub(1);
                self.push_line("}");
                self.push_line("\\repeat volta 2 {");
                self.indent_level += 1;
            }

            BarToken::BeginFirstEnding => {
                self.flush_bar(BarGlyph::Single.lilypond());
                self.indent_level = self.indent_level.saturating_sub(1);
                self.push_line("}");
                self.push_line("\\alternative {");
                self.indent_level += 1;
                self.push_line("{");
                self.indent_level += 1;
                self.alternative = Alternative::First;
                self.alternative_bar_count = 0;
                self.first_ending_closed = false;
            }

            BarToken::BeginSecondEnding => {
                self.flush_counted_bar(BarGlyph::Single);
                if !self.first_ending_closed {
                    self.indent_level = self.indent_level.saturating_sub(1);
                    self.push_line("}");
                }
                self.open_second_ending();
            }

            BarToken::OpenSecondEnding => {
                if self.alternative == Alternative::First && !self.first_ending_closed {
                    self.flush_counted_bar(BarGlyph::Single);
                    self.indent_level = self.indent_level.saturating_sub(1);
                    self.push_line("}");
                }
                self.open_second_ending();
            }
        }
    }

    /// Ordinary bar boundary: flush, and run ending bookkeeping
    fn plain_bar(&mut self, glyph: BarGlyph) {
        match self.alternative {
            Alternative::Second => {
                self.flush_bar(glyph.lilypond());
                self.alternative_count_down = self.alternative_count_down.saturating_sub(1);
                if self.alternative_count_down == 0 {
                    self.close_alternative_group();
                }
            }
            Alternative::First => {
                self.flush_counted_bar(glyph);
            }
            Alternative::None => {
                self.flush_bar(glyph.lilypond());
            }
        }
    }

    /// Flush a bar, counting it when the first ending is open
    fn flush_counted_bar(&mut self, glyph: BarGlyph) {
        if self.flush_bar(glyph.lilypond())
            && self.alternative == Alternative::First
            && !self.first_ending_closed
        {
            self.alternative_bar_count += 1;
        }
    }

    fn open_second_ending(&mut self) {
        self.push_line("{");
        self.indent_level += 1;
        self.alternative = Alternative::Second;
        self.alternative_count_down = self.alternative_bar_count;
        self.first_ending_closed = false;
    }

    /// Close the second ending's bracket and the surrounding alternative
    /// group
    fn close_alternative_group(&mut self) {
        self.indent_level = self.indent_level.saturating_sub(1);
        self.push_line("}");
        self.indent_level = self.indent_level.saturating_sub(1);
        self.push_line("}");
        self.alternative = Alternative::None;
        self.alternative_bar_count = 0;
        self.alternative_count_down = 0;
    }
}
