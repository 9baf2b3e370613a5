use std::io::{BufRead, Write};
use std::path::Path;

use anyhow::Result;

use crate::application::EditorConfig;
use crate::infrastructure::{ErrorLogger, ErrorType};
use crate::presentation::actions::{ActionDispatcher, ActionError, SolutionAction};
use crate::presentation::display::print_list;
use crate::presentation::list::SolutionList;

/// 交互模式中的一行输入
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Command {
    /// 设置过滤文本
    Filter(String),
    /// 对过滤视图第 index 项（从 1 开始）执行 key 对应的操作
    Action { key: char, index: usize },
    Help,
    Quit,
}

/// 解析一行输入，`:` 开头的是操作命令，其余都是过滤文本
pub fn parse_command(line: &str) -> Result<Command, String> {
    let line = line.trim();

    let Some(rest) = line.strip_prefix(':') else {
        return Ok(Command::Filter(line.to_string()));
    };

    let mut chars = rest.chars();
    let key = chars.next().ok_or_else(|| "缺少操作键，输入 :h 查看帮助".to_string())?;
    let arg = chars.as_str().trim();

    match key {
        'q' if arg.is_empty() => return Ok(Command::Quit),
        'h' | '?' if arg.is_empty() => return Ok(Command::Help),
        _ => {}
    }

    let index = if arg.is_empty() {
        1
    } else {
        arg.parse::<usize>()
            .ok()
            .filter(|&n| n > 0)
            .ok_or_else(|| format!("无效的序号: {}", arg))?
    };

    Ok(Command::Action { key, index })
}

/// 交互模式所需的上下文
pub struct InteractiveContext<'a> {
    pub search_path: &'a Path,
    pub editors: &'a [EditorConfig],
    pub dispatcher: &'a dyn ActionDispatcher,
    pub error_logger: &'a ErrorLogger,
    pub color: bool,
}

impl InteractiveContext<'_> {
    /// 操作键对应的操作
    pub fn action_for_key(&self, key: char) -> Option<SolutionAction> {
        if let Some(editor) = self.editors.iter().find(|e| e.key_char() == Some(key)) {
            return Some(SolutionAction::OpenInEditor(editor.clone()));
        }

        match key {
            'o' => Some(SolutionAction::OpenDefault),
            'f' => Some(SolutionAction::Reveal),
            'c' => Some(SolutionAction::CopyPath),
            _ => None,
        }
    }

    fn print_help<W: Write>(&self, out: &mut W) -> Result<()> {
        writeln!(out, "输入文字过滤列表，空行显示全部。操作命令 (N 为序号，默认 1):")?;
        for editor in self.editors {
            writeln!(out, "  :{} N  在 {} 中打开", editor.key, editor.name)?;
        }
        writeln!(out, "  :o N  使用默认程序打开")?;
        writeln!(out, "  :f N  在文件管理器中显示")?;
        writeln!(out, "  :c N  复制路径")?;
        writeln!(out, "  :h    显示帮助")?;
        writeln!(out, "  :q    退出")?;
        Ok(())
    }
}

/// 运行交互模式，直到输入 :q 或输入结束
pub fn run_interactive<R: BufRead, W: Write>(
    mut input: R,
    out: &mut W,
    list: &mut SolutionList,
    ctx: &InteractiveContext<'_>,
) -> Result<()> {
    print_list(out, list, ctx.search_path, ctx.color)?;
    ctx.print_help(out)?;

    let mut line = String::new();
    loop {
        write!(out, "> ")?;
        out.flush()?;

        line.clear();
        if input.read_line(&mut line)? == 0 {
            break;
        }

        match parse_command(&line) {
            Ok(Command::Quit) => break,
            Ok(Command::Help) => ctx.print_help(out)?,
            Ok(Command::Filter(query)) => {
                list.set_query(&query);
                print_list(out, list, ctx.search_path, ctx.color)?;
            }
            Ok(Command::Action { key, index }) => run_action(out, list, ctx, key, index)?,
            Err(message) => writeln!(out, "{}", message)?,
        }
    }

    Ok(())
}

fn run_action<W: Write>(
    out: &mut W,
    list: &SolutionList,
    ctx: &InteractiveContext<'_>,
    key: char,
    index: usize,
) -> Result<()> {
    let Some(action) = ctx.action_for_key(key) else {
        writeln!(out, "未知操作 :{}，输入 :h 查看帮助", key)?;
        return Ok(());
    };

    let result = match list.get(index - 1) {
        Some(solution) => ctx
            .dispatcher
            .dispatch(&action, solution)
            .map(|_| solution.name.clone()),
        None => Err(ActionError::NoSuchItem(index)),
    };

    match result {
        Ok(name) => writeln!(out, "✔ {}: {}", action.label(), name)?,
        Err(err) => {
            writeln!(out, "✖ {}失败: {}", action.label(), err)?;
            let path = list.get(index - 1).map(|s| s.path.as_path());
            ctx.error_logger.log_error(
                ErrorType::ActionFailed,
                path,
                &action.label(),
                Some(&err.to_string()),
            )?;
        }
    }

    Ok(())
}
