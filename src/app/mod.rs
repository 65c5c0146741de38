//! Application layer coordinating state, events, and actions.
//!
//! This module defines the core application logic layer, sitting between the
//! terminal runtime (main.rs) and the data, map and loader layers. It
//! implements the event-driven architecture that powers the dashboard.
//!
//! # Architecture
//!
//! The application layer follows a unidirectional data flow pattern:
//!
//! ```text
//! Key Input → Events → Event Handler → State Mutations → Actions → Side Effects
//!                          ↑                                  ↓
//!                          └──────── Load Responses ──────────┘
//! ```
//!
//! # Modules
//!
//! - [`actions`]: Side effect commands emitted by the event handler
//! - [`handler`]: Event processing logic and state transition coordinator
//! - [`modes`]: Input, table and map state machine types
//! - [`state`]: Central application state container and view model computation
//!
//! # Example
//!
//! ```rust
//! use ejiview::app::{handle_event, AppState, Event};
//! use ejiview::ui::theme::Theme;
//!
//! let mut state = AppState::new(Theme::default());
//! let (should_render, _actions) = handle_event(&mut state, &Event::KeyDown)?;
//! assert!(should_render);
//! # Ok::<(), ejiview::DashboardError>(())
//! ```

pub mod actions;
pub mod handler;
pub mod modes;
pub mod state;

pub use actions::Action;
pub use handler::{handle_event, Event};
pub use modes::{InputMode, MapStatus, SearchFocus, TableView};
pub use state::{AppState, MapRender};
