//! The playlist: ordered tracks and their identity.

mod store;

pub use store::{PlaylistError, PlaylistStore};
