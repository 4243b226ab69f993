/// Access gate for the embedded dashboard
///
/// The dashboard is shown only during a fixed daily window (15:00-17:00 at
/// UTC+05:30). This module provides:
/// - The window predicate and the countdown to the next opening
/// - A per-session override ("developer mode") that keeps the gate open
/// - A two-state machine tracking Waiting/Open
/// - A cancellable poller that re-evaluates the gate every second

pub mod poller;
pub mod session;
pub mod state;
pub mod window;

pub use poller::{DEFAULT_POLL_INTERVAL, GateEvent, GatePoller, PollerHandle};
pub use session::SessionContext;
pub use window::{AccessWindow, Evaluation, evaluate};
