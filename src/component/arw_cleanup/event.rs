//! 清理事件
//!
//! 清理流程的每個步驟與結果都以 [`CleanupEvent`] 發佈給 [`CleanupReporter`]，
//! 流程本身不直接輸出任何文字

use crate::config::CleanupConfig;
use std::path::PathBuf;

/// 事件的嚴重程度
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub enum EventLevel {
    Info,
    Warn,
    Error,
}

/// 單次執行的統計
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CleanupStats {
    pub total_arw: usize,
    pub total_jpg: usize,
    pub total_unmatched: usize,
    pub deleted: usize,
    pub quarantined: usize,
    /// 移動或刪除失敗的檔案數
    pub failed: usize,
}

/// 最終摘要需要的資訊
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SummaryContext {
    pub directory_count: usize,
    pub stats: CleanupStats,
    pub config: CleanupConfig,
    pub quarantine_dir: PathBuf,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CleanupEvent {
    RunStarted {
        config: CleanupConfig,
        quarantine_dir: PathBuf,
    },
    QuarantineCreationFailed {
        quarantine_dir: PathBuf,
        reason: String,
    },
    ScanFailed {
        directory: PathBuf,
        reason: String,
    },
    ScanCompleted {
        regular_file_count: usize,
        recursive: bool,
    },
    DirectoryStats {
        directory: PathBuf,
        arw_count: usize,
        jpg_count: usize,
        unmatched_count: usize,
    },
    DryRunMove {
        source: PathBuf,
        target: PathBuf,
    },
    DryRunDelete {
        path: PathBuf,
    },
    MoveSucceeded {
        source: PathBuf,
        target: PathBuf,
    },
    MoveFailed {
        source: PathBuf,
        reason: String,
    },
    DeleteSucceeded {
        path: PathBuf,
    },
    DeleteSkippedMissing {
        path: PathBuf,
    },
    DeleteFailed {
        path: PathBuf,
        reason: String,
    },
    Summary(SummaryContext),
}

impl CleanupEvent {
    #[must_use]
    pub const fn level(&self) -> EventLevel {
        match self {
            Self::QuarantineCreationFailed { .. }
            | Self::ScanFailed { .. }
            | Self::MoveFailed { .. }
            | Self::DeleteFailed { .. } => EventLevel::Error,
            Self::DeleteSkippedMissing { .. } => EventLevel::Warn,
            _ => EventLevel::Info,
        }
    }
}

/// 事件接收端，發佈是同步的
pub trait CleanupReporter {
    fn publish(&mut self, event: CleanupEvent);
}

/// 收集事件，用於測試或事後檢查
impl CleanupReporter for Vec<CleanupEvent> {
    fn publish(&mut self, event: CleanupEvent) {
        self.push(event);
    }
}

impl<F> CleanupReporter for F
where
    F: FnMut(CleanupEvent),
{
    fn publish(&mut self, event: CleanupEvent) {
        self(event);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_event_levels() {
        let path = PathBuf::from("/photos/a.ARW");
        assert_eq!(
            CleanupEvent::DeleteSkippedMissing { path: path.clone() }.level(),
            EventLevel::Warn
        );
        assert_eq!(
            CleanupEvent::MoveFailed {
                source: path.clone(),
                reason: "disk full".to_string()
            }
            .level(),
            EventLevel::Error
        );
        assert_eq!(
            CleanupEvent::DeleteSucceeded { path }.level(),
            EventLevel::Info
        );
    }

    #[test]
    fn test_closure_reporter() {
        let mut count = 0;
        let mut reporter = |_event: CleanupEvent| count += 1;
        reporter.publish(CleanupEvent::ScanCompleted {
            regular_file_count: 3,
            recursive: false,
        });
        assert_eq!(count, 1);
    }
}
