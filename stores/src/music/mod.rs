//! Music: the track library, catalog search and import, uploads, streaming,
//! play counts, favorites and the now-playing cursor.

pub mod actions;
pub mod fixtures;
pub mod reducer;
pub mod state;
pub mod store;

pub use actions::MusicAction;
pub use reducer::MusicReducer;
pub use state::MusicState;
pub use store::MusicStore;
