pub mod solution;
pub mod file_walker;

pub use solution::{compare_names, Solution, SolutionExtension};
pub use file_walker::{scan_solutions, DirectoryFilter, ScanError, ScanReport, SkipReason, SkippedDirectory};
