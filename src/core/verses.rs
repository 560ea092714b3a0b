//! # Verse Parser
//!
//! Turns provider chapter text into display units. The provider is asked to
//! put one verse per line as `N. text`; anything else on a line is kept as an
//! unnumbered paragraph so malformed output still renders.
//!
//! ```text
//! "1. No princípio\nCapítulo 1\n2. E a terra"
//!        │
//!        ▼
//! Verse{1, "No princípio"}, Text("Capítulo 1"), Verse{2, "E a terra"}
//! ```

use std::str::Split;
use std::sync::LazyLock;

use regex::Regex;

/// `<digits>. <rest>`, anchored at line start. `\r` is left out of the
/// content so CRLF text parses the same as LF text.
static VERSE_LINE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^([0-9]+)\.\s([^\r]*)").expect("verse line pattern is valid")
});

/// A numbered verse parsed out of chapter text.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct VerseRecord<'a> {
    pub number: u32,
    pub content: &'a str,
}

/// One paragraph of rendered chapter text.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DisplayUnit<'a> {
    Verse(VerseRecord<'a>),
    /// A line without a verse prefix. Not highlightable.
    Text(&'a str),
}

impl<'a> DisplayUnit<'a> {
    pub fn verse_number(&self) -> Option<u32> {
        match self {
            DisplayUnit::Verse(v) => Some(v.number),
            DisplayUnit::Text(_) => None,
        }
    }
}

/// Lazy iterator over the display units of a chapter.
///
/// Cloning copies only the cursor, so a clone taken before iteration walks
/// the chapter again from the start.
#[derive(Debug, Clone)]
pub struct DisplayUnits<'a> {
    lines: Split<'a, char>,
}

impl<'a> Iterator for DisplayUnits<'a> {
    type Item = DisplayUnit<'a>;

    fn next(&mut self) -> Option<Self::Item> {
        self.lines.next().map(parse_line)
    }
}

/// Parse raw chapter text. Never fails; the worst case is all plain text.
pub fn parse_chapter(text: &str) -> DisplayUnits<'_> {
    DisplayUnits {
        lines: text.split('\n'),
    }
}

fn parse_line(line: &str) -> DisplayUnit<'_> {
    let Some(caps) = VERSE_LINE.captures(line) else {
        return DisplayUnit::Text(line);
    };
    let (Some(number), Some(content)) = (caps.get(1), caps.get(2)) else {
        return DisplayUnit::Text(line);
    };
    // A digit run that overflows is not a verse number anyone asked for.
    match number.as_str().parse::<u32>() {
        Ok(number) => DisplayUnit::Verse(VerseRecord {
            number,
            content: content.as_str(),
        }),
        Err(_) => DisplayUnit::Text(line),
    }
}
