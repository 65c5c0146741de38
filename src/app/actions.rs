//! Actions representing side effects to be executed by the runtime.
//!
//! The event handler returns a `Vec<Action>` after processing each event. The
//! binary's event loop executes them in order: load requests go to the
//! [`Loader`](crate::api::Loader), exports are written to disk, and the result
//! of each comes back as another event.

use crate::api::LoadRequest;
use crate::map::{Figure, MapMode};

/// Commands produced by the event handler.
#[derive(Debug, Clone)]
pub enum Action {
    /// Leave the dashboard.
    Quit,

    /// Start a background load.
    Load(LoadRequest),

    /// Write the current map figure to the export directory.
    ExportFigure { figure: Box<Figure>, mode: MapMode },
}
