//! Tasks: CRUD, completion toggling, priorities, dashboard and bulk
//! operations.

pub mod actions;
pub mod reducer;
pub mod state;
pub mod store;

pub use actions::TaskAction;
pub use reducer::TaskReducer;
pub use state::TaskState;
pub use store::TaskStore;
