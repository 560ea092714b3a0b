//! # TUI Components
//!
//! This module contains all UI components for the terminal interface.
//!
//! ## Component Architecture
//!
//! Components in this directory follow two patterns:
//!
//! ### Stateless Components (Props-Based Rendering)
//!
//! Display components that receive all data as props, built fresh each frame:
//! - `TitleBar`: tabs and model name
//! - `StatusBar`: status message and key hints
//! - `NavigationBar`: book and chapter of the Bíblia panel
//! - `HomePanel`, `DoctrinePanel`
//!
//! ### Stateful Components (Event-Driven)
//!
//! Components whose state persists in `TuiState` and that emit events:
//! - `TextField`: single-line input (search query, chapter, verse)
//! - `ChapterView`: scrollable chapter with verse cursor and layout caching
//! - `SearchPanel`: query field plus scrollable results
//! - `BookPicker`: overlay listing the canon
//!
//! Each file holds the component's state, events, rendering, event handling
//! and tests.
//!
//! ```text
//! components/
//! ├── mod.rs            (this file)
//! ├── title_bar.rs      (tabs)
//! ├── status_bar.rs     (status + key hints)
//! ├── navigation_bar.rs (◀ book · chapter ▶)
//! ├── chapter_view.rs   (chapter reader)
//! ├── book_picker.rs    (book overlay)
//! ├── text_field.rs     (single-line input)
//! ├── home.rs           (Início)
//! ├── search.rs         (Pesquisa)
//! └── doctrine.rs       (Pontos de Doutrina)
//! ```

pub mod book_picker;
pub mod chapter_view;
pub mod doctrine;
pub mod home;
pub mod navigation_bar;
pub mod search;
pub mod status_bar;
pub mod text_field;
mod title_bar;

pub use book_picker::{BookPicker, BookPickerEvent, BookPickerState};
pub use chapter_view::{ChapterView, ChapterViewEvent, ChapterViewState};
pub use doctrine::DoctrinePanel;
pub use home::HomePanel;
pub use navigation_bar::NavigationBar;
pub use search::{SearchEvent, SearchPanel, SearchPanelState};
pub use status_bar::StatusBar;
pub use text_field::{FieldEvent, FieldKind, TextField};
pub use title_bar::TitleBar;
