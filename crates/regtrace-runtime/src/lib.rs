pub mod config;
pub mod error;
pub mod session;
pub mod store;
pub mod suite;

pub use config::Config;
pub use error::{Error, Result};
pub use session::{SessionOutcome, build_proxy_env, run_traced, run_untraced};
pub use store::TraceStore;
pub use suite::load_suite;
