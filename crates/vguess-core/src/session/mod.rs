//! Game session: target selection and the guess/win state machine.

pub mod selector;
pub mod state;

pub use selector::select_target;
pub use state::{Phase, SessionState, WinCheck};
