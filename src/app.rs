//! Application module: exposes the app model used by the TUI and runtime.
//!
//! The `App` model lives in `app::model` and holds the list cursor, the
//! add-path prompt and the latest playback status.

mod model;

pub use model::*;
