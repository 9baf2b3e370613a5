use std::io::{self, IsTerminal};
use std::path::PathBuf;
use std::sync::Arc;
use std::time::Duration;

use anyhow::{Context, Result};
use clap::Parser;
use crossbeam_channel::bounded;
use indicatif::{ProgressBar, ProgressStyle};

use find_solutions::domain::{scan_solutions, DirectoryFilter};
use find_solutions::infrastructure::{ErrorLogger, ErrorType, Logger, LoggerTrait};
use find_solutions::presentation::{
    print_list, run_interactive, InteractiveContext, ScanSummary, SolutionList, SystemDispatcher,
};
use find_solutions::Config;

/// 查找 .sln / .slnx 解决方案文件并快速打开
#[derive(Parser, Debug)]
#[clap(author, version, about, long_about = None)]
struct Args {
    /// 搜索根目录，默认使用配置文件中的 search_path
    path: Option<PathBuf>,

    /// 初始过滤文本（按名称，不区分大小写）
    #[clap(short, long)]
    query: Option<String>,

    /// 只输出列表，不进入交互模式
    #[clap(short, long)]
    list: bool,

    /// 配置文件路径，默认为程序同级目录下的 config.toml
    #[clap(long)]
    config: Option<PathBuf>,

    /// 启用详细日志记录，日志文件将保存到当前目录
    #[clap(long)]
    log: bool,
}

fn main() -> Result<()> {
    let args = Args::parse();

    let config_path = match &args.config {
        Some(path) => path.clone(),
        None => Config::default_config_path()?,
    };
    let config = Config::load_or_create(&config_path)?;
    config.validate()
        .with_context(|| format!("配置无效: {}", config_path.display()))?;

    let search_path = config
        .resolve_search_path(args.path.as_deref())
        .context("未指定搜索目录: 请传入 PATH 参数或在配置文件中设置 search.search_path")?;
    let search_path = std::path::absolute(&search_path)
        .with_context(|| format!("无效的搜索目录: {}", search_path.display()))?;

    let logger = Arc::new(Logger::new(args.log)?);
    let error_logger = ErrorLogger::new(args.log)?;

    if logger.is_enabled() {
        logger.log_message(&format!("配置文件: {}", config_path.display()))?;
        logger.log_message(&format!("搜索目录: {}", search_path.display()))?;
        logger.log_message(&format!("额外排除目录: {:?}", config.search.extra_excluded_dirs))?;
        if let Some(query) = &args.query {
            logger.log_message(&format!("初始过滤: {}", query))?;
        }
    }

    let mut list = SolutionList::new();
    if let Some(query) = &args.query {
        list.set_query(query);
    }

    // 扫描期间显示进度
    let progress = ProgressBar::new_spinner();
    progress.set_style(
        ProgressStyle::default_spinner()
            .tick_chars("⠁⠂⠄⡀⢀⠠⠐⠈ ")
            .template("{spinner:.green} [{elapsed_precise}] {msg}")?,
    );
    if let Some(state) = list.empty_state(&search_path) {
        progress.set_message(format!("{} {}", state.title(), search_path.display()));
    }
    progress.enable_steady_tick(Duration::from_millis(100));

    let mut summary = ScanSummary::new();
    let filter = DirectoryFilter::new(&config.search.extra_excluded_dirs);
    let (tx, rx) = bounded(1);

    let worker_root = search_path.clone();
    let worker_logger = Arc::clone(&logger);
    let handle = std::thread::spawn(move || {
        let result = scan_solutions(&worker_root, &filter, worker_logger.as_ref());
        let _ = tx.send(result);
    });

    let result = rx.recv().context("扫描线程异常退出");
    let _ = handle.join();
    progress.finish_and_clear();

    let report = match result? {
        Ok(report) => report,
        Err(err) => {
            error_logger.log_error(
                ErrorType::RootUnavailable,
                Some(&search_path),
                "搜索解决方案失败",
                Some(&err.to_string()),
            )?;
            error_logger.finalize()?;
            return Err(anyhow::Error::new(err).context("搜索解决方案失败"));
        }
    };

    for skipped in &report.skipped {
        error_logger.log_error(
            ErrorType::DirectoryUnreadable,
            Some(&skipped.path),
            "已跳过无法读取的目录",
            Some(&skipped.reason.to_string()),
        )?;
    }

    summary.directories_visited = report.directories_visited;
    summary.solutions_found = report.solutions.len() as u64;
    summary.skipped_directories = report.skipped.len() as u64;

    if logger.is_enabled() {
        logger.finalize(
            summary.directories_visited,
            summary.solutions_found,
            summary.skipped_directories,
            summary.start_time.elapsed(),
        )?;
    }

    list.set_results(report.solutions);

    if config.display.show_summary {
        summary.print()?;
        println!();
    }

    let color = config.display.color && io::stdout().is_terminal();
    let mut stdout = io::stdout();

    if args.list {
        print_list(&mut stdout, &list, &search_path, color)?;
    } else {
        let dispatcher = SystemDispatcher::new();
        let ctx = InteractiveContext {
            search_path: &search_path,
            editors: &config.actions.editors,
            dispatcher: &dispatcher,
            error_logger: &error_logger,
            color,
        };
        run_interactive(io::stdin().lock(), &mut stdout, &mut list, &ctx)?;
    }

    error_logger.print_error_summary();
    error_logger.finalize()?;

    if logger.is_enabled() {
        println!("完整日志已保存到: {}", logger.log_path().display());
    }

    Ok(())
}
