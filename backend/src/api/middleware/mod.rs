pub mod errors;
pub mod trace;

pub use errors::*;
pub use trace::*;
