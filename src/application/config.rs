use std::collections::HashSet;
use std::fs;
use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};

/// 交互模式中保留的操作键
pub const RESERVED_KEYS: &[char] = &['o', 'f', 'c', 'h', 'q'];

/// 应用程序配置
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Config {
    /// 搜索相关配置
    pub search: SearchConfig,
    /// 外部操作配置
    pub actions: ActionsConfig,
    /// 显示相关配置
    pub display: DisplayConfig,
}

/// 搜索配置
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SearchConfig {
    /// 搜索根目录（绝对路径），命令行参数优先
    pub search_path: String,
    /// 在默认排除集合之外额外排除的目录名
    #[serde(default)]
    pub extra_excluded_dirs: Vec<String>,
}

/// 外部操作配置
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ActionsConfig {
    /// 可用的编辑器，按顺序显示
    pub editors: Vec<EditorConfig>,
}

/// 编辑器
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct EditorConfig {
    /// 显示名称，在 macOS 上同时作为应用程序名称
    pub name: String,
    /// 启动命令
    pub command: String,
    /// 交互模式中的操作键
    pub key: String,
}

/// 显示配置
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DisplayConfig {
    /// 扫描结束后是否打印摘要
    pub show_summary: bool,
    /// 是否使用终端颜色
    pub color: bool,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            search: SearchConfig {
                search_path: String::new(),
                extra_excluded_dirs: vec![],
            },
            actions: ActionsConfig {
                editors: vec![
                    EditorConfig {
                        name: "Rider".to_string(),
                        command: "rider".to_string(),
                        key: "r".to_string(),
                    },
                    EditorConfig {
                        name: "Visual Studio Code".to_string(),
                        command: "code".to_string(),
                        key: "v".to_string(),
                    },
                ],
            },
            display: DisplayConfig {
                show_summary: true,
                color: true,
            },
        }
    }
}

impl EditorConfig {
    /// 操作键字符，配置验证后保证存在
    pub fn key_char(&self) -> Option<char> {
        let mut chars = self.key.chars();
        match (chars.next(), chars.next()) {
            (Some(c), None) => Some(c),
            _ => None,
        }
    }
}

impl Config {
    /// 从配置文件加载配置，如果文件不存在则创建默认配置文件
    pub fn load_or_create(config_path: &Path) -> Result<Self> {
        if config_path.exists() {
            Self::load_from_file(config_path)
        } else {
            let config = Self::default();
            config.save_to_file(config_path)?;
            println!("已创建默认配置文件: {}", config_path.display());
            Ok(config)
        }
    }

    /// 从文件加载配置
    pub fn load_from_file(config_path: &Path) -> Result<Self> {
        let content = fs::read_to_string(config_path)
            .with_context(|| format!("无法读取配置文件: {}", config_path.display()))?;

        let config: Config = toml::from_str(&content)
            .with_context(|| format!("无法解析配置文件: {}", config_path.display()))?;

        Ok(config)
    }

    /// 保存配置到文件
    pub fn save_to_file(&self, config_path: &Path) -> Result<()> {
        if let Some(parent) = config_path.parent() {
            fs::create_dir_all(parent)
                .with_context(|| format!("无法创建配置目录: {}", parent.display()))?;
        }

        let content = toml::to_string_pretty(self)
            .context("无法序列化配置")?;

        fs::write(config_path, content)
            .with_context(|| format!("无法写入配置文件: {}", config_path.display()))?;

        Ok(())
    }

    /// 获取配置文件的默认路径（程序所在目录下的 config.toml）
    pub fn default_config_path() -> Result<PathBuf> {
        let exe_path = std::env::current_exe()
            .context("无法获取程序路径")?;

        let exe_dir = exe_path.parent()
            .context("无法获取程序目录")?;

        Ok(exe_dir.join("config.toml"))
    }

    /// 验证配置的有效性
    pub fn validate(&self) -> Result<()> {
        let search_path = self.search.search_path.trim();
        if !search_path.is_empty() && !Path::new(search_path).is_absolute() {
            anyhow::bail!("search_path 必须是绝对路径: {}", search_path);
        }

        if self.search.extra_excluded_dirs.iter().any(|dir| dir.trim().is_empty()) {
            anyhow::bail!("extra_excluded_dirs 不能包含空目录名");
        }

        let mut seen_keys = HashSet::new();
        for editor in &self.actions.editors {
            if editor.name.trim().is_empty() {
                anyhow::bail!("编辑器名称不能为空");
            }

            if editor.command.trim().is_empty() {
                anyhow::bail!("编辑器 {} 的 command 不能为空", editor.name);
            }

            let key = editor.key_char()
                .with_context(|| format!("编辑器 {} 的 key 必须是单个字符", editor.name))?;

            if RESERVED_KEYS.contains(&key) {
                anyhow::bail!("编辑器 {} 的 key '{}' 与内置操作冲突", editor.name, key);
            }

            if !seen_keys.insert(key) {
                anyhow::bail!("编辑器 key '{}' 重复", key);
            }
        }

        Ok(())
    }

    /// 解析实际使用的搜索路径，命令行参数优先于配置文件
    pub fn resolve_search_path(&self, cli_path: Option<&Path>) -> Option<PathBuf> {
        match cli_path {
            Some(path) => Some(path.to_path_buf()),
            None => {
                let configured = self.search.search_path.trim();
                (!configured.is_empty()).then(|| PathBuf::from(configured))
            }
        }
    }
}
