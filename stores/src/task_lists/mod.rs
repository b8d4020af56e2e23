//! Task lists: CRUD, archiving and statistics.

pub mod actions;
pub mod reducer;
pub mod state;
pub mod store;

pub use actions::TaskListAction;
pub use reducer::TaskListReducer;
pub use state::TaskListState;
pub use store::TaskListStore;
