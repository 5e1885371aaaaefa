pub mod entities;
pub mod state_machine;

pub use entities::*;
pub use state_machine::TransitionRefusal;
