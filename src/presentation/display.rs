use std::io::{self, Write};
use std::path::Path;
use std::time::Instant;

use anyhow::Result;

use crate::domain::Solution;
use crate::presentation::list::{EmptyState, SolutionList};

/// 格式化持续时间
pub fn format_duration(duration: std::time::Duration) -> String {
    let total_secs = duration.as_secs();
    let hours = total_secs / 3600;
    let mins = (total_secs % 3600) / 60;
    let secs = total_secs % 60;

    if hours > 0 {
        format!("{}h {}m {}s", hours, mins, secs)
    } else if mins > 0 {
        format!("{}m {}s", mins, secs)
    } else {
        format!("{}.{:03}s", secs, duration.subsec_millis())
    }
}

/// 格式化一行: 序号、名称、扩展名标记、所在目录
pub fn format_row(index: usize, solution: &Solution, color: bool) -> String {
    if color {
        format!(
            "\x1b[2;37m{:>4}.\x1b[0m \x1b[1;32m{}\x1b[0m \x1b[1;34m[{}]\x1b[0m  \x1b[2;37m{}\x1b[0m",
            index,
            solution.name,
            solution.extension,
            solution.directory.display()
        )
    } else {
        format!(
            "{:>4}. {} [{}]  {}",
            index,
            solution.name,
            solution.extension,
            solution.directory.display()
        )
    }
}

/// 输出空状态
pub fn print_empty_state<W: Write>(out: &mut W, state: &EmptyState, color: bool) -> Result<()> {
    if color {
        writeln!(out, "\x1b[1;33m{}\x1b[0m", state.title())?;
    } else {
        writeln!(out, "{}", state.title())?;
    }

    let description = state.description();
    if !description.is_empty() {
        writeln!(out, "  {}", description)?;
    }

    Ok(())
}

/// 输出当前过滤视图，序号从 1 开始
pub fn print_list<W: Write>(out: &mut W, list: &SolutionList, search_path: &Path, color: bool) -> Result<()> {
    if let Some(state) = list.empty_state(search_path) {
        return print_empty_state(out, &state, color);
    }

    for (i, solution) in list.filtered().into_iter().enumerate() {
        writeln!(out, "{}", format_row(i + 1, solution, color))?;
    }

    Ok(())
}

/// 扫描摘要
pub struct ScanSummary {
    pub start_time: Instant,
    pub directories_visited: u64,
    pub solutions_found: u64,
    pub skipped_directories: u64,
}

impl Default for ScanSummary {
    fn default() -> Self {
        Self::new()
    }
}

impl ScanSummary {
    pub fn new() -> Self {
        Self {
            start_time: Instant::now(),
            directories_visited: 0,
            solutions_found: 0,
            skipped_directories: 0,
        }
    }

    pub fn print(&self) -> Result<()> {
        let duration = self.start_time.elapsed();
        let mut stdout = io::stdout().lock();

        writeln!(stdout, "\n扫描摘要:")?;
        writeln!(stdout, "----------------------------")?;
        writeln!(stdout, "总用时: {}", format_duration(duration))?;
        writeln!(stdout, "扫描目录: {}", self.directories_visited)?;
        writeln!(stdout, "解决方案: {}", self.solutions_found)?;
        writeln!(stdout, "跳过目录: {}", self.skipped_directories)?;

        Ok(())
    }
}
