use std::collections::HashSet;
use std::ffi::OsString;
use std::fs;
use std::io;
use std::path::{Path, PathBuf};

use thiserror::Error;

use crate::domain::solution::{sort_solutions, Solution};
use crate::infrastructure::LoggerTrait;

/// 默认排除的目录（构建产物和工具元数据）
pub const DEFAULT_EXCLUDED_DIRS: &[&str] = &[
    "bin",
    "obj",
    "node_modules",
    "packages",
    ".vs",
    ".vscode",
    ".idea",
    ".git",
    "Debug",
    "Release",
    "TestResults",
    "dist",
    "build",
];

/// 扫描失败
#[derive(Debug, Error)]
pub enum ScanError {
    #[error("无法读取搜索目录 {}: {source}", .path.display())]
    RootUnavailable {
        path: PathBuf,
        #[source]
        source: io::Error,
    },
}

/// 目录被跳过的原因
#[derive(Debug, Error)]
pub enum SkipReason {
    #[error("无法读取目录: {0}")]
    DirectoryUnreadable(#[source] io::Error),
}

/// 扫描过程中被跳过的目录
#[derive(Debug)]
pub struct SkippedDirectory {
    pub path: PathBuf,
    pub reason: SkipReason,
}

/// 一次扫描的结果
#[derive(Debug, Default)]
pub struct ScanReport {
    /// 按名称排序的解决方案
    pub solutions: Vec<Solution>,
    pub skipped: Vec<SkippedDirectory>,
    pub directories_visited: u64,
}

/// 目录过滤条件
#[derive(Debug, Clone)]
pub struct DirectoryFilter {
    /// 小写的排除目录名
    excluded_dirs: HashSet<String>,
}

impl Default for DirectoryFilter {
    fn default() -> Self {
        Self::new(Vec::<String>::new())
    }
}

impl DirectoryFilter {
    /// 以默认排除集合加上额外目录创建过滤器
    pub fn new<I, S>(extra_excluded_dirs: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let excluded_dirs = DEFAULT_EXCLUDED_DIRS
            .iter()
            .map(|name| name.to_lowercase())
            .chain(
                extra_excluded_dirs
                    .into_iter()
                    .map(|name| name.as_ref().trim().to_lowercase()),
            )
            .filter(|name| !name.is_empty())
            .collect();

        Self { excluded_dirs }
    }

    /// 检查子目录是否应该跳过（隐藏目录或排除目录，不区分大小写）
    pub fn is_excluded(&self, dir_name: &str) -> bool {
        dir_name.starts_with('.') || self.excluded_dirs.contains(&dir_name.to_lowercase())
    }
}

/// 从根目录开始查找解决方案文件
///
/// 深度优先遍历，使用显式栈。包含解决方案文件的目录不再向下搜索；
/// 无法读取的子目录记录到报告中并跳过。不跟随符号链接。
pub fn scan_solutions(
    root: &Path,
    filter: &DirectoryFilter,
    logger: &dyn LoggerTrait,
) -> Result<ScanReport, ScanError> {
    let mut report = ScanReport::default();
    let mut pending = vec![root.to_path_buf()];

    if logger.is_enabled() {
        let _ = logger.log_message(&format!("开始扫描目录: {}", root.display()));
    }

    while let Some(current) = pending.pop() {
        let entries = match read_entries(&current) {
            Ok(entries) => entries,
            Err(err) if current == root => {
                if logger.is_enabled() {
                    let _ = logger.log_directory(&current, &format!("根目录不可用: {}", err));
                }
                return Err(ScanError::RootUnavailable { path: current, source: err });
            }
            Err(err) => {
                if logger.is_enabled() {
                    let _ = logger.log_directory(&current, &format!("已跳过(无法读取: {})", err));
                }
                report.skipped.push(SkippedDirectory {
                    path: current,
                    reason: SkipReason::DirectoryUnreadable(err),
                });
                continue;
            }
        };
        report.directories_visited += 1;

        // 第一遍: 查找解决方案文件
        let found_before = report.solutions.len();
        for entry in entries.iter().filter(|e| e.kind == EntryKind::File) {
            let Some(file_name) = entry.name.to_str() else {
                continue;
            };
            if let Some(solution) = Solution::from_entry(&current, file_name) {
                report.solutions.push(solution);
            }
        }

        if report.solutions.len() > found_before {
            if logger.is_enabled() {
                let _ = logger.log_directory(
                    &current,
                    &format!("已匹配 {} 个解决方案", report.solutions.len() - found_before),
                );
            }
            continue;
        }

        // 第二遍: 子目录入栈，逆序压入以保持枚举顺序
        for entry in entries.iter().rev().filter(|e| e.kind == EntryKind::Directory) {
            if filter.is_excluded(&entry.name.to_string_lossy()) {
                if logger.is_enabled() {
                    let _ = logger.log_directory(&current.join(&entry.name), "已跳过(排除规则)");
                }
                continue;
            }
            pending.push(current.join(&entry.name));
        }
    }

    sort_solutions(&mut report.solutions);

    if logger.is_enabled() {
        let _ = logger.log_message(&format!(
            "扫描结束: {} 个目录, {} 个解决方案, {} 个目录被跳过",
            report.directories_visited,
            report.solutions.len(),
            report.skipped.len()
        ));
    }

    Ok(report)
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum EntryKind {
    File,
    Directory,
    Other,
}

#[derive(Debug)]
struct Entry {
    name: OsString,
    kind: EntryKind,
}

/// 读取一个目录的全部条目，任何条目读取失败都视为整个目录不可读
fn read_entries(dir: &Path) -> io::Result<Vec<Entry>> {
    let mut entries = Vec::new();

    for entry in fs::read_dir(dir)? {
        let entry = entry?;
        // file_type 不跟随符号链接
        let kind = match entry.file_type() {
            Ok(ft) if ft.is_file() => EntryKind::File,
            Ok(ft) if ft.is_dir() => EntryKind::Directory,
            _ => EntryKind::Other,
        };
        entries.push(Entry {
            name: entry.file_name(),
            kind,
        });
    }

    Ok(entries)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::solution::SolutionExtension;
    use crate::infrastructure::Logger;
    use tempfile::{tempdir, TempDir};

    fn touch(root: &Path, relative: &str) {
        let path = root.join(relative);
        fs::create_dir_all(path.parent().unwrap()).unwrap();
        fs::write(path, "").unwrap();
    }

    fn scan(root: &TempDir) -> ScanReport {
        scan_solutions(root.path(), &DirectoryFilter::default(), &Logger::disabled()).unwrap()
    }

    fn names(report: &ScanReport) -> Vec<&str> {
        report.solutions.iter().map(|s| s.name.as_str()).collect()
    }

    #[test]
    fn test_filter_default_exclusions() {
        let filter = DirectoryFilter::default();

        for name in ["bin", "obj", "node_modules", "packages", "Debug", "Release", "TestResults", "dist", "build"] {
            assert!(filter.is_excluded(name), "{} 应该被排除", name);
        }
        assert!(filter.is_excluded("BIN"));
        assert!(filter.is_excluded("debug"));
        assert!(filter.is_excluded("DEBUG"));
        assert!(filter.is_excluded("testresults"));
        assert!(!filter.is_excluded("src"));
        assert!(!filter.is_excluded("binary"));
    }

    #[test]
    fn test_filter_hidden_dirs() {
        let filter = DirectoryFilter::default();
        assert!(filter.is_excluded(".git"));
        assert!(filter.is_excluded(".cache"));
        assert!(filter.is_excluded("."));
        assert!(!filter.is_excluded("a.b"));
    }

    #[test]
    fn test_filter_extra_exclusions() {
        let filter = DirectoryFilter::new(["Artifacts", "  ", "vendor"]);
        assert!(filter.is_excluded("artifacts"));
        assert!(filter.is_excluded("VENDOR"));
        assert!(filter.is_excluded("bin"));
        assert!(!filter.is_excluded(""));
    }

    #[test]
    fn test_nested_obj_not_visited() {
        let root = tempdir().unwrap();
        touch(root.path(), "foo/bar.sln");
        touch(root.path(), "foo/obj/x.sln");
        touch(root.path(), "foo/nested/deeper.sln");

        let report = scan(&root);

        assert_eq!(report.solutions.len(), 1);
        let solution = &report.solutions[0];
        assert_eq!(solution.name, "bar");
        assert_eq!(solution.directory, root.path().join("foo"));
        assert_eq!(solution.extension, SolutionExtension::Sln);
        // 根目录和 foo
        assert_eq!(report.directories_visited, 2);
    }

    #[test]
    fn test_sln_and_slnx_in_same_directory() {
        let root = tempdir().unwrap();
        touch(root.path(), "a/c.slnx");
        touch(root.path(), "a/b.sln");
        touch(root.path(), "a/sub/d.sln");

        let report = scan(&root);

        assert_eq!(names(&report), vec!["b", "c"]);
        assert_eq!(report.solutions[0].extension, SolutionExtension::Sln);
        assert_eq!(report.solutions[1].extension, SolutionExtension::Slnx);
        assert!(report.solutions.iter().all(|s| s.directory == root.path().join("a")));
    }

    #[test]
    fn test_path_invariant_and_uniqueness() {
        let root = tempdir().unwrap();
        touch(root.path(), "one/App.sln");
        touch(root.path(), "two/App.sln");
        touch(root.path(), "two/App.slnx");
        touch(root.path(), "three/four/Deep.sln");
        touch(root.path(), "three/notes.txt");

        let report = scan(&root);

        assert_eq!(report.solutions.len(), 4);
        for solution in &report.solutions {
            assert_eq!(
                solution.path,
                solution.directory.join(format!("{}{}", solution.name, solution.extension))
            );
        }
        let unique: HashSet<_> = report.solutions.iter().map(|s| &s.path).collect();
        assert_eq!(unique.len(), report.solutions.len());
    }

    #[test]
    fn test_excluded_and_hidden_dirs_are_skipped() {
        let root = tempdir().unwrap();
        touch(root.path(), "bin/a.sln");
        touch(root.path(), "Bin/b.sln");
        touch(root.path(), "RELEASE/c.sln");
        touch(root.path(), "node_modules/pkg/d.sln");
        touch(root.path(), ".hidden/e.sln");
        touch(root.path(), ".git/f.sln");
        touch(root.path(), "src/keep.sln");

        let report = scan(&root);

        assert_eq!(names(&report), vec!["keep"]);
    }

    #[test]
    fn test_case_sensitive_suffix() {
        let root = tempdir().unwrap();
        touch(root.path(), "App.SLN");
        touch(root.path(), "App.Slnx");
        touch(root.path(), "sub/Real.sln");

        let report = scan(&root);

        assert_eq!(names(&report), vec!["Real"]);
    }

    #[test]
    fn test_root_with_solution_stops_immediately() {
        let root = tempdir().unwrap();
        touch(root.path(), "Root.sln");
        touch(root.path(), "child/Child.sln");

        let report = scan(&root);

        assert_eq!(names(&report), vec!["Root"]);
        assert_eq!(report.solutions[0].directory, root.path());
        assert_eq!(report.directories_visited, 1);
    }

    #[test]
    fn test_directory_named_like_solution_is_not_matched() {
        let root = tempdir().unwrap();
        fs::create_dir_all(root.path().join("Weird.sln")).unwrap();
        touch(root.path(), "Weird.sln/Inner.sln");

        let report = scan(&root);

        assert_eq!(names(&report), vec!["Inner"]);
    }

    #[test]
    fn test_results_sorted_by_name() {
        let root = tempdir().unwrap();
        touch(root.path(), "z/zeta.sln");
        touch(root.path(), "y/Alpha.sln");
        touch(root.path(), "x/beta.slnx");
        touch(root.path(), "w/Gamma.sln");

        let report = scan(&root);

        assert_eq!(names(&report), vec!["Alpha", "beta", "Gamma", "zeta"]);
    }

    #[test]
    fn test_empty_root() {
        let root = tempdir().unwrap();

        let report = scan(&root);

        assert!(report.solutions.is_empty());
        assert!(report.skipped.is_empty());
        assert_eq!(report.directories_visited, 1);
    }

    #[test]
    fn test_missing_root_is_an_error() {
        let root = tempdir().unwrap();
        let missing = root.path().join("does-not-exist");

        let result = scan_solutions(&missing, &DirectoryFilter::default(), &Logger::disabled());

        match result {
            Err(ScanError::RootUnavailable { path, .. }) => assert_eq!(path, missing),
            other => panic!("期望 RootUnavailable, 实际: {:?}", other),
        }
    }

    #[test]
    fn test_root_that_is_a_file_is_an_error() {
        let root = tempdir().unwrap();
        touch(root.path(), "file.txt");

        let result = scan_solutions(&root.path().join("file.txt"), &DirectoryFilter::default(), &Logger::disabled());

        assert!(matches!(result, Err(ScanError::RootUnavailable { .. })));
    }

    #[cfg(unix)]
    #[test]
    fn test_unreadable_directory_is_skipped() {
        use std::os::unix::fs::PermissionsExt;

        let root = tempdir().unwrap();
        touch(root.path(), "x/hidden_from_us.sln");
        touch(root.path(), "y/sol.sln");
        let locked = root.path().join("x");
        fs::set_permissions(&locked, fs::Permissions::from_mode(0o000)).unwrap();

        // root 用户不受权限限制
        let enforced = fs::read_dir(&locked).is_err();
        let report = scan(&root);
        fs::set_permissions(&locked, fs::Permissions::from_mode(0o755)).unwrap();

        if enforced {
            assert_eq!(names(&report), vec!["sol"]);
            assert_eq!(report.skipped.len(), 1);
            assert_eq!(report.skipped[0].path, locked);
            assert!(matches!(report.skipped[0].reason, SkipReason::DirectoryUnreadable(_)));
        } else {
            assert!(names(&report).contains(&"sol"));
        }
    }

    #[cfg(unix)]
    #[test]
    fn test_symlinked_directories_are_not_followed() {
        let root = tempdir().unwrap();
        touch(root.path(), "real/inner/Linked.sln");
        fs::create_dir_all(root.path().join("loop")).unwrap();
        std::os::unix::fs::symlink(root.path(), root.path().join("loop/back")).unwrap();
        std::os::unix::fs::symlink(root.path().join("real/inner/Linked.sln"), root.path().join("alias.sln")).unwrap();

        let report = scan(&root);

        assert_eq!(names(&report), vec!["Linked"]);
        assert_eq!(report.solutions[0].directory, root.path().join("real/inner"));
    }

    #[test]
    fn test_scan_writes_debug_log() {
        let root = tempdir().unwrap();
        let logs = tempdir().unwrap();
        touch(root.path(), "app/App.sln");
        touch(root.path(), "obj/Skip.sln");
        let logger = Logger::in_dir(true, logs.path()).unwrap();

        scan_solutions(root.path(), &DirectoryFilter::default(), &logger).unwrap();

        let content = fs::read_to_string(logger.log_path()).unwrap();
        assert!(content.contains("开始扫描目录"));
        assert!(content.contains("已匹配 1 个解决方案"));
        assert!(content.contains("已跳过(排除规则)"));
    }
}
