//! # Jump-to-Verse
//!
//! A jump is a one-shot command: the reader asks for verse N, the display
//! layer consumes the request, scrolls to the verse and pulses it for
//! [`PULSE_DURATION`]. The request is cleared whether or not the verse was
//! on screen, so asking for the same verse again fires again.

use std::time::{Duration, Instant};

use log::debug;

use crate::core::verses::DisplayUnit;

/// How long a jumped-to verse stays emphasized.
pub const PULSE_DURATION: Duration = Duration::from_millis(2500);

/// Transient emphasis on a verse, independent of highlights.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct VersePulse {
    pub verse: u32,
    pub started_at: Instant,
}

impl VersePulse {
    pub fn start(verse: u32, now: Instant) -> Self {
        Self {
            verse,
            started_at: now,
        }
    }

    pub fn is_active(&self, now: Instant) -> bool {
        now.saturating_duration_since(self.started_at) < PULSE_DURATION
    }

    /// Whether `verse` should be drawn pulsing at `now`.
    pub fn applies_to(&self, verse: u32, now: Instant) -> bool {
        self.verse == verse && self.is_active(now)
    }
}

/// Where a consumed jump landed.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct JumpTarget {
    /// Index of the display unit carrying the verse.
    pub unit_index: usize,
    pub pulse: VersePulse,
}

/// Queue of at most one pending jump.
#[derive(Debug, Default, Clone, PartialEq, Eq)]
pub struct JumpController {
    pending: Option<u32>,
}

impl JumpController {
    pub fn new() -> Self {
        Self::default()
    }

    /// Queues a jump, replacing any earlier one. Verse 0 is rejected.
    pub fn request(&mut self, verse: u32) -> bool {
        if verse == 0 {
            return false;
        }
        self.pending = Some(verse);
        true
    }

    pub fn pending(&self) -> Option<u32> {
        self.pending
    }

    /// Removes and returns the pending jump.
    pub fn take(&mut self) -> Option<u32> {
        self.pending.take()
    }

    /// Consumes the pending jump against the rendered units.
    ///
    /// Returns `None` when nothing was pending or when no unit carries the
    /// requested verse; the request is cleared either way.
    pub fn consume<'a, I>(&mut self, units: I, now: Instant) -> Option<JumpTarget>
    where
        I: IntoIterator<Item = DisplayUnit<'a>>,
    {
        let verse = self.take()?;
        let found = units
            .into_iter()
            .position(|unit| unit.verse_number() == Some(verse));
        match found {
            Some(unit_index) => {
                debug!("Jump to verse {} -> unit {}", verse, unit_index);
                Some(JumpTarget {
                    unit_index,
                    pulse: VersePulse::start(verse, now),
                })
            }
            None => {
                debug!("Jump to verse {} found nothing to focus", verse);
                None
            }
        }
    }
}

/// Reads a verse number the way a lenient number field would: leading
/// whitespace, optional sign, then a digit prefix (`"12abc"` is 12).
/// Non-positive or unparseable input yields `None`.
pub fn parse_verse_input(input: &str) -> Option<u32> {
    let s = input.trim_start();
    let (negative, digits) = match s.as_bytes().first() {
        Some(b'-') => (true, &s[1..]),
        Some(b'+') => (false, &s[1..]),
        _ => (false, s),
    };
    let end = digits
        .bytes()
        .position(|b| !b.is_ascii_digit())
        .unwrap_or(digits.len());
    let digits = &digits[..end];
    if digits.is_empty() || negative {
        return None;
    }
    match digits.parse::<u32>() {
        Ok(0) | Err(_) => None,
        Ok(n) => Some(n),
    }
}
