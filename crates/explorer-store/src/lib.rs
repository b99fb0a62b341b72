//! Derived-state core of the RAMP / RDAS explorer.
//!
//! Fetch completions, router events and user selections are dispatched as
//! [`Action`]s onto a [`State`]; the reducer updates the [`Store`] and queues
//! [`Effect`]s (server queries, snapshot IO) that run afterwards. Per-tab page
//! models and enrichment rows are memoized over the store's versioned inputs.

pub mod actions;
pub mod cache;
pub mod effects;
pub mod entity;
pub mod error;
pub mod fetch_cache;
pub mod filters;
pub mod logging;
pub mod navigation;
pub mod read_model;
pub mod serialization;
pub mod settings;
pub mod state;
pub mod stats;
pub mod store;
pub mod transport;
pub mod versioned;

pub use actions::Action;
pub use effects::Effect;
pub use error::{ExplorerError, TransportError};
pub use settings::ExplorerSettings;
pub use state::State;
pub use store::Store;
