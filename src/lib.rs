// Product Registry - Core Library
// Exposes the store for use in the TUI, the API server, and tests

pub mod product;
pub mod store;
pub mod config;
pub mod logging;

// Re-export commonly used types
pub use product::{
    Product, ProductId, ProductInput, PriceInput, ValidationError,
    parse_price,
};
pub use store::{
    ProductStore, SharedStore, Snapshot,
};
pub use config::Config;
