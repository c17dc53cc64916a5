pub mod eval;
pub mod headers;
pub mod trace;

pub use eval::*;
pub use headers::*;
pub use trace::*;
