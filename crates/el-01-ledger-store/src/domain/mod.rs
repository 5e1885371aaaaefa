pub mod entities;
pub mod keys;

pub use entities::*;
pub use keys::*;
