pub mod module;
pub mod types;

pub use module::*;
pub use types::*;
