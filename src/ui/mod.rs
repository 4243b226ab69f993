// Page controller and the UI boundary around the access gate.
//
// Nothing here decides whether the dashboard is open; that is the gate's job.
// This layer turns gate events and user input into view changes.

pub mod controller;
pub mod format;
pub mod frame;
pub mod keys;
pub mod notification;
pub mod shell;

pub use controller::{Controller, ControllerSettings};
pub use frame::EmbeddedFrame;
pub use keys::{Action, parse_input};
pub use shell::TerminalShell;
