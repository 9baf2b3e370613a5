use std::path::Path;

use crate::domain::Solution;

/// 扫描状态
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ScanStatus {
    Scanning,
    Complete,
}

/// 列表为空时显示的内容
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum EmptyState {
    /// 仍在扫描
    Scanning,
    /// 扫描完成但没有任何匹配
    NoSolutions { search_path: String },
}

impl EmptyState {
    pub fn title(&self) -> &'static str {
        match self {
            EmptyState::Scanning => "正在搜索解决方案...",
            EmptyState::NoSolutions { .. } => "未找到 .NET 解决方案",
        }
    }

    pub fn description(&self) -> String {
        match self {
            EmptyState::Scanning => String::new(),
            EmptyState::NoSolutions { search_path } => {
                format!("在 {} 中没有找到 .sln 或 .slnx 文件", search_path)
            }
        }
    }
}

/// 可过滤的解决方案列表
#[derive(Debug, Clone)]
pub struct SolutionList {
    status: ScanStatus,
    solutions: Vec<Solution>,
    query: String,
    /// 当前查询对应的下标，每次查询变化时重新计算
    visible: Vec<usize>,
}

impl Default for SolutionList {
    fn default() -> Self {
        Self::new()
    }
}

impl SolutionList {
    /// 创建处于扫描中状态的空列表
    pub fn new() -> Self {
        Self {
            status: ScanStatus::Scanning,
            solutions: Vec::new(),
            query: String::new(),
            visible: Vec::new(),
        }
    }

    /// 填入扫描结果，状态变为完成
    pub fn set_results(&mut self, solutions: Vec<Solution>) {
        self.solutions = solutions;
        self.status = ScanStatus::Complete;
        self.refresh();
    }

    pub fn set_query(&mut self, query: &str) {
        self.query = query.to_string();
        self.refresh();
    }

    pub fn query(&self) -> &str {
        &self.query
    }

    pub fn status(&self) -> ScanStatus {
        self.status
    }

    pub fn total(&self) -> usize {
        self.solutions.len()
    }

    /// 名称包含查询文本（不区分大小写）的解决方案
    pub fn filtered(&self) -> Vec<&Solution> {
        self.visible.iter().map(|&i| &self.solutions[i]).collect()
    }

    /// 过滤视图中的第 index 项（从 0 开始）
    pub fn get(&self, index: usize) -> Option<&Solution> {
        self.visible.get(index).map(|&i| &self.solutions[i])
    }

    /// 过滤视图为空时返回空状态
    pub fn empty_state(&self, search_path: &Path) -> Option<EmptyState> {
        if !self.visible.is_empty() {
            return None;
        }

        Some(match self.status {
            ScanStatus::Scanning => EmptyState::Scanning,
            ScanStatus::Complete => EmptyState::NoSolutions {
                search_path: search_path.display().to_string(),
            },
        })
    }

    fn refresh(&mut self) {
        let needle = self.query.to_lowercase();
        self.visible = self
            .solutions
            .iter()
            .enumerate()
            .filter(|(_, s)| s.name.to_lowercase().contains(&needle))
            .map(|(i, _)| i)
            .collect();
    }
}
