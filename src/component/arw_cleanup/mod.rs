//! ARW 清理元件
//!
//! 找出同資料夾內沒有同名 JPG 的 ARW 檔案，
//! 並將其移動到 `_arw_quarantine` 隔離資料夾或永久刪除

mod console_reporter;
mod event;
mod file_matcher;
mod main;
mod quarantine_path;

pub use console_reporter::ConsoleCleanupReporter;
pub use event::{CleanupEvent, CleanupReporter, CleanupStats, EventLevel, SummaryContext};
pub use file_matcher::{DirectoryGroup, FileEntry, ImageKind, group_by_directory};
pub use main::{CleanupRunner, RunOutcome};
pub use quarantine_path::quarantine_target;
