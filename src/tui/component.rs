use ratatui::Frame;
use ratatui::layout::Rect;

use crate::tui::event::TuiEvent;

/// A reusable UI component.
///
/// Components receive data via props (struct fields), may borrow persistent
/// state (via `&mut State` fields) and render to a `Frame` within a given
/// `Rect`.
///
/// `render` takes `&mut self` so a component can update caches (wrapped
/// line heights) and presentation state (scroll offsets) while drawing,
/// as with Ratatui's `StatefulWidget`.
pub trait Component {
    /// Render the component into the given area.
    fn render(&mut self, frame: &mut Frame, area: Rect);
}

/// A component that turns terminal events into its own events.
///
/// Implemented on the persistent state (e.g. `ChapterViewState`), not on the
/// per-frame wrapper, so the event loop can route input without drawing.
pub trait EventHandler {
    /// The type of high-level event this component emits.
    type Event;

    /// `None` means the event was consumed (or ignored) without anything
    /// for the caller to act on.
    fn handle_event(&mut self, event: &TuiEvent) -> Option<Self::Event>;
}
