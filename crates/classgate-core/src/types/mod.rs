//! Shared value types.

pub mod clock;
pub mod session;

pub use clock::{Clock, ManualClock, SystemClock};
pub use session::{SessionInfo, SessionToken};
