//! Catalog browsing: pagination & search state, debounced fetches,
//! location history, and the player dialog.

/// Pagination & search state machine.
pub mod controller;
mod debounce;
/// Player dialog state.
pub mod player;
/// Location strings and history.
pub mod route;
/// Event-loop wiring.
pub mod runtime;

pub use controller::CatalogView;
pub use route::Route;
pub use runtime::{BrowseRuntime, Message, RuntimeSettings};
