use std::collections::HashMap;
use std::fs::{File, OpenOptions};
use std::io::Write;
use std::path::{Path, PathBuf};
use std::sync::{Arc, Mutex};

use anyhow::Result;
use chrono::Local;

/// 错误类型分类
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ErrorType {
    /// 无法读取的子目录（已跳过）
    DirectoryUnreadable,
    /// 搜索根目录不可用
    RootUnavailable,
    /// 打开、定位或复制操作失败
    ActionFailed,
}

impl ErrorType {
    pub fn as_str(&self) -> &'static str {
        match self {
            ErrorType::DirectoryUnreadable => "目录读取",
            ErrorType::RootUnavailable => "根目录不可用",
            ErrorType::ActionFailed => "操作失败",
        }
    }
}

/// 错误日志记录器
pub struct ErrorLogger {
    error_file: Arc<Mutex<Option<File>>>,
    error_path: PathBuf,
    enabled: bool,
    error_counts: Arc<Mutex<HashMap<ErrorType, usize>>>,
}

impl ErrorLogger {
    /// 创建新的错误日志记录器，日志文件写入当前目录
    pub fn new(enabled: bool) -> Result<Self> {
        Self::in_dir(enabled, Path::new("."))
    }

    /// 在指定目录下创建错误日志记录器
    ///
    /// 未启用时仍然统计错误次数，只是不写文件。
    pub fn in_dir(enabled: bool, dir: &Path) -> Result<Self> {
        if !enabled {
            return Ok(Self {
                error_file: Arc::new(Mutex::new(None)),
                error_path: PathBuf::new(),
                enabled: false,
                error_counts: Arc::new(Mutex::new(HashMap::new())),
            });
        }

        let now = Local::now();
        let timestamp = now.format("%Y%m%d_%H%M%S");
        let error_path = dir.join(format!("error_{}.log", timestamp));

        let file = OpenOptions::new()
            .create(true)
            .append(true)
            .open(&error_path)?;

        let mut file_clone = file.try_clone()?;
        file_clone.write_all(&[0xEF, 0xBB, 0xBF])?; // UTF-8 BOM

        writeln!(file_clone, "# FindSolutions 错误日志")?;
        writeln!(file_clone, "# 开始时间: {}", now.format("%Y-%m-%d %H:%M:%S"))?;
        writeln!(file_clone, "# ============================================")?;
        writeln!(file_clone)?;

        Ok(Self {
            error_file: Arc::new(Mutex::new(Some(file))),
            error_path,
            enabled: true,
            error_counts: Arc::new(Mutex::new(HashMap::new())),
        })
    }

    /// 记录错误
    pub fn log_error(
        &self,
        error_type: ErrorType,
        path: Option<&Path>,
        message: &str,
        details: Option<&str>,
    ) -> Result<()> {
        if let Ok(mut counts) = self.error_counts.lock() {
            *counts.entry(error_type).or_insert(0) += 1;
        }

        if !self.enabled {
            return Ok(());
        }

        let timestamp = Local::now().format("%Y-%m-%d %H:%M:%S%.3f");

        if let Ok(mut file_guard) = self.error_file.lock() {
            if let Some(ref mut file) = *file_guard {
                writeln!(file, "[{}] {} - {}", timestamp, error_type.as_str(), message)?;

                if let Some(path) = path {
                    writeln!(file, "  路径: {}", path.display())?;
                }

                if let Some(detail) = details {
                    writeln!(file, "  详细信息: {}", detail)?;
                }

                writeln!(file)?;
                file.flush()?;
            }
        }

        Ok(())
    }

    /// 获取错误统计信息
    pub fn get_error_summary(&self) -> HashMap<ErrorType, usize> {
        if let Ok(counts) = self.error_counts.lock() {
            counts.clone()
        } else {
            HashMap::new()
        }
    }

    /// 获取总错误数
    pub fn get_total_errors(&self) -> usize {
        if let Ok(counts) = self.error_counts.lock() {
            counts.values().sum()
        } else {
            0
        }
    }

    pub fn has_errors(&self) -> bool {
        self.get_total_errors() > 0
    }

    pub fn error_path(&self) -> &Path {
        &self.error_path
    }

    /// 完成错误日志记录
    pub fn finalize(&self) -> Result<()> {
        if !self.enabled {
            return Ok(());
        }

        let summary = self.get_error_summary();
        let total = self.get_total_errors();

        if let Ok(mut file_guard) = self.error_file.lock() {
            if let Some(ref mut file) = *file_guard {
                writeln!(file, "# ============================================")?;
                writeln!(file, "# 结束时间: {}", Local::now().format("%Y-%m-%d %H:%M:%S"))?;

                if !summary.is_empty() {
                    writeln!(file, "# 错误统计:")?;
                    for (error_type, count) in &summary {
                        writeln!(file, "#   {}: {} 次", error_type.as_str(), count)?;
                    }
                    writeln!(file, "#   总计: {} 个错误", total)?;
                } else {
                    writeln!(file, "# 无错误记录")?;
                }

                file.flush()?;
            }
        }

        Ok(())
    }

    /// 打印错误摘要到控制台
    pub fn print_error_summary(&self) {
        if !self.has_errors() {
            return;
        }

        println!("\n⚠️  运行过程中发现错误:");
        println!("----------------------------");

        for (error_type, count) in &self.get_error_summary() {
            println!("  {}: {} 次", error_type.as_str(), count);
        }

        println!("  总计: {} 个错误", self.get_total_errors());
        if self.enabled {
            println!("  详细错误信息请查看: {}", self.error_path.display());
        }
    }
}
