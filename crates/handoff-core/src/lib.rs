pub mod config;
pub mod error;
pub mod store;
pub mod types;

pub use config::HandoffConfig;
pub use error::{HandoffError, Result};
pub use store::SharedActionStore;
pub use types::*;
