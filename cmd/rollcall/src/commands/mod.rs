//! CLI commands module.

mod checkin;
mod enroll;
mod events;
mod identify;
mod import;
mod list;
mod rebind;
mod remove;
mod util;

pub use checkin::CheckinCommand;
pub use enroll::EnrollCommand;
pub use events::EventsCommand;
pub use identify::IdentifyCommand;
pub use import::ImportCommand;
pub use list::ListCommand;
pub use rebind::RebindCommand;
pub use remove::RemoveCommand;

// Re-export utils for use in commands
pub(crate) use util::*;
