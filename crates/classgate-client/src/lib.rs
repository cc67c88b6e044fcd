//! # classgate-client
//!
//! Client-side half of ClassGate's session handling. One signed-in client
//! context runs a single [`SessionSupervisor`] task that owns the expiry
//! countdown; activity from any tab lands in the shared durable store and is
//! picked up on the next tick.
//!
//! ## Modules
//!
//! - `store`: session token and the durable `lastActivityAt` timestamp
//! - `activity`: user-activity signals and their recorder
//! - `watchdog`: the Active / Warning / Expired state machine
//! - `refresher`: explicit "stay signed in" extension
//! - `signout`: the shared forced sign-out path
//! - `supervisor`: the task driving all of the above
//! - `clock`, `navigator`: runtime-backed clock and a recording navigator

pub mod activity;
pub mod clock;
pub mod navigator;
pub mod refresher;
pub mod signout;
pub mod store;
pub mod supervisor;
pub mod watchdog;

pub use activity::{ActivityMonitor, ActivitySignal};
pub use clock::RuntimeClock;
pub use navigator::HistoryNavigator;
pub use refresher::{Extended, RefreshFailed, SessionRefresher};
pub use signout::{ForcedSignOut, SignOutReason};
pub use store::SessionStore;
pub use supervisor::{SessionSupervisor, SupervisorHandle};
pub use watchdog::{ExpiryWatchdog, TickOutcome, WatchdogState};
