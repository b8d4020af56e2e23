//! Playlists: CRUD, track sub-resources, duplication, play counts and
//! duration refresh.

pub mod actions;
pub mod reducer;
pub mod state;
pub mod store;

pub use actions::PlaylistAction;
pub use reducer::PlaylistReducer;
pub use state::PlaylistState;
pub use store::PlaylistStore;
