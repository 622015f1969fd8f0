//! Echaloasuerte draw store
//!
//! Domain model for randomized draws (raffles, coins, dice, numbers, items)
//! and the driver that persists them in a schemaless document store.

pub mod config;
pub mod database;
pub mod driver;
pub mod error;
pub mod models;
pub mod registry;
pub mod telemetry;

// Re-export commonly used types
pub use config::{AppConfig, StoreConfig};
pub use database::{DocumentStore, MemoryDocumentStore, PgDocumentStore};
pub use driver::PersistenceDriver;
pub use error::{AppError, AppResult, DrawError, DriverError};
pub use registry::{BuildError, DrawRegistry};
