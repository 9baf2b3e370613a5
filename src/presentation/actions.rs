use std::cell::RefCell;
use std::error::Error as StdError;
use std::path::{Path, PathBuf};
use std::process::Command;

use thiserror::Error;

use crate::application::EditorConfig;
use crate::domain::Solution;

/// 对单个解决方案可执行的操作
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SolutionAction {
    /// 用指定编辑器打开
    OpenInEditor(EditorConfig),
    /// 用系统默认程序打开
    OpenDefault,
    /// 在文件管理器中显示
    Reveal,
    /// 复制路径到剪贴板
    CopyPath,
}

impl SolutionAction {
    pub fn label(&self) -> String {
        match self {
            SolutionAction::OpenInEditor(editor) => format!("在 {} 中打开", editor.name),
            SolutionAction::OpenDefault => "使用默认程序打开".to_string(),
            SolutionAction::Reveal => "在文件管理器中显示".to_string(),
            SolutionAction::CopyPath => "复制路径".to_string(),
        }
    }
}

/// 操作失败
#[derive(Debug, Error)]
pub enum ActionError {
    #[error("未找到应用程序: {name}")]
    ApplicationNotFound { name: String },
    #[error("无法打开 {}: {source}", .target.display())]
    Launch {
        target: PathBuf,
        #[source]
        source: Box<dyn StdError + Send + Sync>,
    },
    #[error("无法访问剪贴板: {0}")]
    Clipboard(#[from] arboard::Error),
    #[error("没有第 {0} 项")]
    NoSuchItem(usize),
}

/// 由宿主环境提供的外部操作能力
pub trait ActionDispatcher {
    fn dispatch(&self, action: &SolutionAction, solution: &Solution) -> Result<(), ActionError>;
}

/// 调用操作系统完成外部操作
#[derive(Default)]
pub struct SystemDispatcher {
    // X11/Wayland 上剪贴板内容随 Clipboard 实例释放而消失
    clipboard: RefCell<Option<arboard::Clipboard>>,
}

impl SystemDispatcher {
    pub fn new() -> Self {
        Self::default()
    }

    fn open_in_editor(&self, editor: &EditorConfig, path: &Path) -> Result<(), ActionError> {
        if cfg!(target_os = "macos") {
            let status = Command::new("open")
                .arg("-a")
                .arg(&editor.name)
                .arg(path)
                .status()
                .map_err(|err| launch_error(path, err))?;

            if !status.success() {
                return Err(ActionError::ApplicationNotFound { name: editor.name.clone() });
            }
            return Ok(());
        }

        let program = which::which(&editor.command)
            .map_err(|_| ActionError::ApplicationNotFound { name: editor.name.clone() })?;

        Command::new(program)
            .arg(path)
            .spawn()
            .map_err(|err| launch_error(path, err))?;

        Ok(())
    }

    fn reveal(&self, solution: &Solution) -> Result<(), ActionError> {
        let path = &solution.path;

        if cfg!(target_os = "macos") {
            Command::new("open")
                .arg("-R")
                .arg(path)
                .spawn()
                .map_err(|err| launch_error(path, err))?;
        } else if cfg!(target_os = "windows") {
            let mut select = std::ffi::OsString::from("/select,");
            select.push(path.as_os_str());
            Command::new("explorer")
                .arg(select)
                .spawn()
                .map_err(|err| launch_error(path, err))?;
        } else {
            opener::open(&solution.directory).map_err(|err| launch_error(&solution.directory, err))?;
        }

        Ok(())
    }

    fn copy_path(&self, path: &Path) -> Result<(), ActionError> {
        let mut slot = self.clipboard.borrow_mut();
        if slot.is_none() {
            *slot = Some(arboard::Clipboard::new()?);
        }

        if let Some(clipboard) = slot.as_mut() {
            clipboard.set_text(path.display().to_string())?;
        }

        Ok(())
    }
}

impl ActionDispatcher for SystemDispatcher {
    fn dispatch(&self, action: &SolutionAction, solution: &Solution) -> Result<(), ActionError> {
        match action {
            SolutionAction::OpenInEditor(editor) => self.open_in_editor(editor, &solution.path),
            SolutionAction::OpenDefault => {
                opener::open(&solution.path).map_err(|err| launch_error(&solution.path, err))
            }
            SolutionAction::Reveal => self.reveal(solution),
            SolutionAction::CopyPath => self.copy_path(&solution.path),
        }
    }
}

fn launch_error<E>(target: &Path, err: E) -> ActionError
where
    E: StdError + Send + Sync + 'static,
{
    ActionError::Launch {
        target: target.to_path_buf(),
        source: Box::new(err),
    }
}
