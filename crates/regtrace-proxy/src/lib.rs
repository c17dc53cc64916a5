pub mod error;
mod forward;
mod proxy;

pub use error::{Error, Result};
pub use proxy::{Proxy, UPSTREAM_TIMEOUT};
