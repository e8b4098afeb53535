use super::event::{CleanupEvent, CleanupReporter, EventLevel, SummaryContext};
use crate::cli::Console;
use crate::config::{CleanupConfig, HandlingMode};
use crate::tools::absolute_display;
use std::path::Path;

fn abs(path: &Path) -> String {
    absolute_display(path).display().to_string()
}

/// 將清理事件轉成終端機文字，每個事件依嚴重程度輸出
pub struct ConsoleCleanupReporter<'a> {
    console: &'a dyn Console,
}

impl<'a> ConsoleCleanupReporter<'a> {
    pub const fn new(console: &'a dyn Console) -> Self {
        Self { console }
    }

    fn emit(&self, level: EventLevel, message: &str) {
        match level {
            EventLevel::Info => self.console.info(message),
            EventLevel::Warn => self.console.warn(message),
            EventLevel::Error => self.console.error(message),
        }
    }

    fn announce_run(&self, config: &CleanupConfig, quarantine_dir: &Path) {
        self.console.info(&format!(
            "Using image directory: {}",
            config.image_dir.display()
        ));
        if config.dry_run {
            self.console
                .info("Dry run enabled: no files will be deleted or moved.");
        }
        if config.recursive {
            self.console
                .info("Recursive mode enabled: processing subdirectories.");
        }
        match config.mode {
            HandlingMode::Quarantine => self.console.info(&format!(
                "Quarantine mode (default): unmatched ARW files move to {}.",
                abs(quarantine_dir)
            )),
            HandlingMode::Delete => self
                .console
                .info("Delete mode: unmatched ARW files will be permanently removed."),
        }
    }

    fn summarize(&self, context: &SummaryContext) {
        let stats = &context.stats;
        let config = &context.config;

        self.console.info(&format!(
            "Found {} ARW file(s) (case-insensitive) across {} directory(ies).",
            stats.total_arw, context.directory_count
        ));
        self.console.info(&format!(
            "Found {} JPG file(s) (case-insensitive) across {} directory(ies).",
            stats.total_jpg, context.directory_count
        ));

        let verb = config.mode.verb();
        let action = if config.dry_run {
            format!("potentially {verb}")
        } else {
            verb.to_string()
        };
        self.console.info(&format!(
            "Found {} ARW file(s) to {action} (no matching JPG in same directory).",
            stats.total_unmatched
        ));

        if config.dry_run {
            return;
        }

        match config.mode {
            HandlingMode::Quarantine => self.console.info(&format!(
                "Moved {} file(s) into {}.",
                stats.quarantined,
                abs(&context.quarantine_dir)
            )),
            HandlingMode::Delete => self
                .console
                .info(&format!("Deleted {} file(s).", stats.deleted)),
        }

        if stats.failed > 0 {
            self.console.warn(&format!(
                "{} file(s) could not be handled, see errors above.",
                stats.failed
            ));
        }
    }
}

impl CleanupReporter for ConsoleCleanupReporter<'_> {
    fn publish(&mut self, event: CleanupEvent) {
        let level = event.level();

        let message = match event {
            CleanupEvent::RunStarted {
                config,
                quarantine_dir,
            } => {
                self.announce_run(&config, &quarantine_dir);
                return;
            }
            CleanupEvent::Summary(context) => {
                self.summarize(&context);
                return;
            }
            CleanupEvent::QuarantineCreationFailed {
                quarantine_dir,
                reason,
            } => format!(
                "Unable to create quarantine directory ({}): {reason}",
                abs(&quarantine_dir)
            ),
            CleanupEvent::ScanFailed { directory, reason } => {
                format!("Unable to scan directory ({}): {reason}", abs(&directory))
            }
            CleanupEvent::ScanCompleted {
                regular_file_count,
                recursive,
            } => format!(
                "Scanned {regular_file_count} regular file(s){}.",
                if recursive { " (recursive)" } else { "" }
            ),
            CleanupEvent::DirectoryStats {
                directory,
                arw_count,
                jpg_count,
                unmatched_count,
            } => format!(
                "Directory: {} => ARW: {arw_count}, JPG: {jpg_count}, to handle: {unmatched_count}",
                abs(&directory)
            ),
            CleanupEvent::DryRunMove { source, target } => format!(
                "Would move to quarantine: {} -> {}",
                abs(&source),
                abs(&target)
            ),
            CleanupEvent::DryRunDelete { path } => format!("Would delete: {}", abs(&path)),
            CleanupEvent::MoveSucceeded { source, target } => format!(
                "Moved to quarantine: {} -> {}",
                abs(&source),
                abs(&target)
            ),
            CleanupEvent::MoveFailed { source, reason } => format!(
                "Failed to move to quarantine: {}, reason: {reason}",
                abs(&source)
            ),
            CleanupEvent::DeleteSucceeded { path } => format!("Deleted: {}", abs(&path)),
            CleanupEvent::DeleteSkippedMissing { path } => {
                format!("Failed to delete: {} (file not found)", abs(&path))
            }
            CleanupEvent::DeleteFailed { path, reason } => {
                format!("Failed to delete: {}, reason: {reason}", abs(&path))
            }
        };

        self.emit(level, &message);
    }
}
