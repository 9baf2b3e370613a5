use std::fs::{File, OpenOptions};
use std::io::Write;
use std::path::{Path, PathBuf};
use std::sync::{Arc, Mutex};
use std::time::Duration;

use anyhow::Result;
use chrono::Local;

/// 日志记录器trait
pub trait LoggerTrait: Send + Sync {
    fn is_enabled(&self) -> bool;
    fn log_message(&self, message: &str) -> Result<()>;
    fn log_directory(&self, path: &Path, status: &str) -> Result<()>;
    fn finalize(&self, directories_visited: u64, solutions_found: u64, skipped_directories: u64, duration: Duration) -> Result<()>;
}

/// 调试日志记录器（记录扫描过程和配置信息）
pub struct Logger {
    log_file: Arc<Mutex<Option<File>>>,
    log_path: PathBuf,
    enabled: bool,
}

impl Logger {
    /// 创建新的日志记录器，日志文件写入当前目录
    pub fn new(enabled: bool) -> Result<Self> {
        Self::in_dir(enabled, Path::new("."))
    }

    /// 在指定目录下创建日志记录器
    pub fn in_dir(enabled: bool, dir: &Path) -> Result<Self> {
        if !enabled {
            return Ok(Self::disabled());
        }

        let now = Local::now();
        let timestamp = now.format("%Y%m%d_%H%M%S");
        let log_path = dir.join(format!("debug_{}.log", timestamp));

        let file = OpenOptions::new()
            .create(true)
            .append(true)
            .open(&log_path)?;

        // 写入UTF-8 BOM以确保文件被正确识别为UTF-8
        let mut file_clone = file.try_clone()?;
        file_clone.write_all(&[0xEF, 0xBB, 0xBF])?;

        writeln!(file_clone, "# FindSolutions 调试日志")?;
        writeln!(file_clone, "# 开始时间: {}", now.format("%Y-%m-%d %H:%M:%S"))?;
        writeln!(file_clone, "# --------------------------------------------")?;
        writeln!(file_clone, "# 目录, 状态")?;

        Ok(Self {
            log_file: Arc::new(Mutex::new(Some(file))),
            log_path,
            enabled: true,
        })
    }

    /// 不写任何内容的日志记录器
    pub fn disabled() -> Self {
        Self {
            log_file: Arc::new(Mutex::new(None)),
            log_path: PathBuf::new(),
            enabled: false,
        }
    }

    pub fn log_path(&self) -> &Path {
        &self.log_path
    }

    fn write_line(&self, line: &str) -> Result<()> {
        if let Ok(mut file_guard) = self.log_file.lock() {
            if let Some(ref mut file) = *file_guard {
                writeln!(file, "{}", line)?;
                file.flush()?;
            }
        }

        Ok(())
    }
}

impl LoggerTrait for Logger {
    fn is_enabled(&self) -> bool {
        self.enabled
    }

    fn log_message(&self, message: &str) -> Result<()> {
        if !self.enabled {
            return Ok(());
        }

        let timestamp = Local::now().format("%Y-%m-%d %H:%M:%S%.3f");
        self.write_line(&format!("[{}] {}", timestamp, message))
    }

    fn log_directory(&self, path: &Path, status: &str) -> Result<()> {
        if !self.enabled {
            return Ok(());
        }

        let timestamp = Local::now().format("%Y-%m-%d %H:%M:%S%.3f");
        self.write_line(&format!("[{}] 目录: {} | 状态: {}", timestamp, path.display(), status))
    }

    fn finalize(&self, directories_visited: u64, solutions_found: u64, skipped_directories: u64, duration: Duration) -> Result<()> {
        if !self.enabled {
            return Ok(());
        }

        let now = Local::now();
        self.write_line("# --------------------------------------------")?;
        self.write_line(&format!("# 搜索完成时间: {}", now.format("%Y-%m-%d %H:%M:%S")))?;
        self.write_line(&format!("# 总用时: {:.3}秒", duration.as_secs_f64()))?;
        self.write_line(&format!("# 扫描目录数: {}", directories_visited))?;
        self.write_line(&format!("# 解决方案数: {}", solutions_found))?;
        self.write_line(&format!("# 跳过目录数: {}", skipped_directories))?;
        self.write_line("# ============================================")
    }
}
