// 三层架构模块
pub mod domain;
pub mod application;
pub mod infrastructure;
pub mod presentation;

// 重新导出主要类型
pub use domain::{scan_solutions, DirectoryFilter, ScanError, ScanReport, Solution, SolutionExtension};
pub use application::Config;
pub use infrastructure::{Logger, LoggerTrait, ErrorLogger, ErrorType};
pub use presentation::{SolutionList, SystemDispatcher, ScanSummary};
