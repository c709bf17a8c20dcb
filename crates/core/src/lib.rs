//! Session logic for a karuta reading aid. Keep this crate free of IO
//! and platform concerns.

pub mod catalog;
pub mod cursor;
pub mod rng;
pub mod selection;
pub mod sequence;
pub mod session;
pub mod snapshot;

pub use catalog::*;
pub use cursor::*;
pub use rng::*;
pub use selection::*;
pub use sequence::*;
pub use session::*;
pub use snapshot::*;
