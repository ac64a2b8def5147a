//! Shared contracts for the lodestone discovery layer.
//!
//! Finders, the items they discover and the error taxonomy live here so that
//! consumers can depend on the contract without pulling in the scanning
//! machinery from `lodestone-core`.

pub mod error;
pub mod finder;
pub mod models;

pub use error::{FinderError, FinderResult};
pub use finder::{Finder, ModuleFinder, TypeFinder};
pub use models::*;
