use std::cmp::Ordering;
use std::fmt;
use std::path::{Path, PathBuf};

use unicode_normalization::char::is_combining_mark;
use unicode_normalization::UnicodeNormalization;

/// 解决方案文件扩展名
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum SolutionExtension {
    Sln,
    Slnx,
}

impl SolutionExtension {
    pub fn as_str(&self) -> &'static str {
        match self {
            SolutionExtension::Sln => ".sln",
            SolutionExtension::Slnx => ".slnx",
        }
    }

    /// 根据文件名识别扩展名（区分大小写，先检查 .slnx）
    pub fn from_file_name(file_name: &str) -> Option<Self> {
        if file_name.ends_with(".slnx") {
            Some(SolutionExtension::Slnx)
        } else if file_name.ends_with(".sln") {
            Some(SolutionExtension::Sln)
        } else {
            None
        }
    }
}

impl fmt::Display for SolutionExtension {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// 一个被发现的解决方案文件
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Solution {
    /// 去掉扩展名的文件名
    pub name: String,
    /// 完整路径，唯一键
    pub path: PathBuf,
    /// 所在目录
    pub directory: PathBuf,
    pub extension: SolutionExtension,
}

impl Solution {
    /// 从目录和文件名构造，文件名不是解决方案文件时返回 None
    pub fn from_entry(directory: &Path, file_name: &str) -> Option<Self> {
        let extension = SolutionExtension::from_file_name(file_name)?;
        let name = &file_name[..file_name.len() - extension.as_str().len()];

        Some(Self {
            name: name.to_string(),
            path: directory.join(file_name),
            directory: directory.to_path_buf(),
            extension,
        })
    }

    pub fn file_name(&self) -> String {
        format!("{}{}", self.name, self.extension)
    }
}

/// 按名称排序解决方案，名称相同时按路径排序
pub fn sort_solutions(solutions: &mut [Solution]) {
    solutions.sort_by(|a, b| compare_names(&a.name, &b.name).then_with(|| a.path.cmp(&b.path)));
}

/// 近似区域感知的名称比较
///
/// 依次比较: 基本字符（忽略重音和大小写），重音，大小写（小写在前），最后按码点比较。
pub fn compare_names(a: &str, b: &str) -> Ordering {
    let (a_keys, b_keys) = (collation_keys(a), collation_keys(b));

    let primary = a_keys
        .iter()
        .map(|k| k.primary)
        .cmp(b_keys.iter().map(|k| k.primary));
    let secondary = || {
        a_keys
            .iter()
            .map(|k| k.accented)
            .cmp(b_keys.iter().map(|k| k.accented))
    };
    let tertiary = || {
        a_keys
            .iter()
            .map(|k| k.uppercase)
            .cmp(b_keys.iter().map(|k| k.uppercase))
    };

    primary
        .then_with(secondary)
        .then_with(tertiary)
        .then_with(|| a.cmp(b))
}

#[derive(Debug, Clone, Copy)]
struct CollationKey {
    primary: (u8, char),
    accented: bool,
    uppercase: bool,
}

fn collation_keys(s: &str) -> Vec<CollationKey> {
    let mut keys: Vec<CollationKey> = Vec::with_capacity(s.len());

    for c in s.nfkd() {
        if is_combining_mark(c) {
            if let Some(last) = keys.last_mut() {
                last.accented = true;
            }
            continue;
        }

        let folded = c.to_lowercase().next().unwrap_or(c);
        // 标点和空白 < 数字 < 字母
        let class = if c.is_alphabetic() {
            2
        } else if c.is_numeric() {
            1
        } else {
            0
        };

        keys.push(CollationKey {
            primary: (class, folded),
            accented: false,
            uppercase: c.is_uppercase(),
        });
    }

    keys
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_extension_detection() {
        assert_eq!(SolutionExtension::from_file_name("App.sln"), Some(SolutionExtension::Sln));
        assert_eq!(SolutionExtension::from_file_name("App.slnx"), Some(SolutionExtension::Slnx));
        assert_eq!(SolutionExtension::from_file_name("App.SLN"), None);
        assert_eq!(SolutionExtension::from_file_name("App.sln.bak"), None);
        assert_eq!(SolutionExtension::from_file_name("App.csproj"), None);
    }

    #[test]
    fn test_solution_from_entry() {
        let dir = PathBuf::from("/work/foo");
        let solution = Solution::from_entry(&dir, "Bar.slnx").unwrap();

        assert_eq!(solution.name, "Bar");
        assert_eq!(solution.extension, SolutionExtension::Slnx);
        assert_eq!(solution.directory, dir);
        assert_eq!(solution.path, dir.join("Bar.slnx"));
        assert_eq!(solution.file_name(), "Bar.slnx");

        assert!(Solution::from_entry(&dir, "readme.md").is_none());
    }

    #[test]
    fn test_only_last_suffix_is_stripped() {
        let solution = Solution::from_entry(Path::new("/w"), "a.sln.sln").unwrap();
        assert_eq!(solution.name, "a.sln");
    }

    #[test]
    fn test_compare_names_ignores_case_first() {
        assert_eq!(compare_names("alpha", "Beta"), Ordering::Less);
        assert_eq!(compare_names("Alpha", "beta"), Ordering::Less);
        assert_eq!(compare_names("a", "A"), Ordering::Less);
        assert_eq!(compare_names("same", "same"), Ordering::Equal);
    }

    #[test]
    fn test_compare_names_accents() {
        assert_eq!(compare_names("resume", "résumé"), Ordering::Less);
        assert_eq!(compare_names("résumé", "rf"), Ordering::Less);
    }

    #[test]
    fn test_compare_names_character_classes() {
        assert_eq!(compare_names("_tools", "1app"), Ordering::Less);
        assert_eq!(compare_names("9lives", "apple"), Ordering::Less);
        assert_eq!(compare_names("app", "app-core"), Ordering::Less);
    }

    #[test]
    fn test_sort_solutions_is_deterministic() {
        let mut solutions = vec![
            Solution::from_entry(Path::new("/w/b"), "Core.sln").unwrap(),
            Solution::from_entry(Path::new("/w/a"), "core.sln").unwrap(),
            Solution::from_entry(Path::new("/w/c"), "Api.slnx").unwrap(),
            Solution::from_entry(Path::new("/w/a"), "Core.sln").unwrap(),
        ];
        sort_solutions(&mut solutions);

        let order: Vec<_> = solutions.iter().map(|s| s.path.clone()).collect();
        assert_eq!(
            order,
            vec![
                PathBuf::from("/w/c/Api.slnx"),
                PathBuf::from("/w/a/core.sln"),
                PathBuf::from("/w/a/Core.sln"),
                PathBuf::from("/w/b/Core.sln"),
            ]
        );
    }
}
