pub mod async_util;
pub mod error;
pub mod settings;
pub mod snapshot;
pub mod util;
pub mod worker_pool;

pub use error::{SettingsError, SnapshotError};
pub use settings::Settings;
pub use worker_pool::WorkerPool;

// Re-export core types so frontends only need one dependency.
pub use reelgrab_core::*;
