pub mod actions;
pub mod display;
pub mod interactive;
pub mod list;

pub use actions::{ActionDispatcher, ActionError, SolutionAction, SystemDispatcher};
pub use display::{format_duration, print_empty_state, print_list, ScanSummary};
pub use interactive::{parse_command, run_interactive, Command, InteractiveContext};
pub use list::{EmptyState, ScanStatus, SolutionList};
