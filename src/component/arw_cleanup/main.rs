use super::event::{CleanupEvent, CleanupReporter, CleanupStats, SummaryContext};
use super::file_matcher::{DirectoryGroup, FileEntry, group_by_directory};
use super::quarantine_path::quarantine_target;
use crate::config::{CleanupConfig, HandlingMode};
use crate::tools::{FileSystem, is_within, normalize_path};
use log::{debug, error, info, warn};
use std::path::{Path, PathBuf};

/// 單次執行的結果
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RunOutcome {
    Completed(SummaryContext),
    /// 隔離資料夾無法建立或影像資料夾無法讀取，沒有處理任何檔案
    Aborted,
}

impl RunOutcome {
    #[must_use]
    pub const fn summary(&self) -> Option<&SummaryContext> {
        match self {
            Self::Completed(summary) => Some(summary),
            Self::Aborted => None,
        }
    }
}

/// ARW 清理流程
///
/// 掃描影像資料夾，找出同資料夾內沒有同名 JPG 的 ARW 檔案，並依設定移到隔離資料夾或刪除。
/// 單一檔案的失敗只會發佈事件，不會中斷整個流程。
pub struct CleanupRunner<'a> {
    file_system: &'a dyn FileSystem,
}

/// 單次執行期間共用的狀態
struct RunContext<'r> {
    config: &'r CleanupConfig,
    quarantine_dir: PathBuf,
    stats: CleanupStats,
    reporter: &'r mut dyn CleanupReporter,
}

impl RunContext<'_> {
    fn publish(&mut self, event: CleanupEvent) {
        self.reporter.publish(event);
    }
}

impl<'a> CleanupRunner<'a> {
    pub const fn new(file_system: &'a dyn FileSystem) -> Self {
        Self { file_system }
    }

    pub fn run(&self, config: &CleanupConfig, reporter: &mut dyn CleanupReporter) -> RunOutcome {
        let quarantine_dir = config.quarantine_dir();

        if config.needs_quarantine_dir() {
            if let Err(e) = self.file_system.create_directories(&quarantine_dir) {
                error!("無法建立隔離資料夾 {}: {e}", quarantine_dir.display());
                reporter.publish(CleanupEvent::QuarantineCreationFailed {
                    quarantine_dir,
                    reason: e.to_string(),
                });
                return RunOutcome::Aborted;
            }
        }

        info!(
            "開始清理: {} (模式: {}, 遞迴: {}, 試執行: {})",
            config.image_dir.display(),
            config.mode,
            config.recursive,
            config.dry_run
        );

        let mut ctx = RunContext {
            config,
            quarantine_dir,
            stats: CleanupStats::default(),
            reporter,
        };

        ctx.publish(CleanupEvent::RunStarted {
            config: config.clone(),
            quarantine_dir: ctx.quarantine_dir.clone(),
        });

        let files = match self.collect_files(config, &ctx.quarantine_dir) {
            Ok(files) => files,
            Err(reason) => {
                error!("無法掃描目錄 {}: {reason}", config.image_dir.display());
                ctx.publish(CleanupEvent::ScanFailed {
                    directory: config.image_dir.clone(),
                    reason,
                });
                return RunOutcome::Aborted;
            }
        };

        ctx.publish(CleanupEvent::ScanCompleted {
            regular_file_count: files.len(),
            recursive: config.recursive,
        });

        let groups = group_by_directory(files, &config.image_dir);
        let directory_count = groups.len();

        for group in &groups {
            self.process_directory(group, &mut ctx);
        }

        let summary = SummaryContext {
            directory_count,
            stats: ctx.stats,
            config: config.clone(),
            quarantine_dir: ctx.quarantine_dir,
        };

        info!(
            "清理完成 - ARW: {}, JPG: {}, 未配對: {}, 隔離: {}, 刪除: {}, 失敗: {}",
            summary.stats.total_arw,
            summary.stats.total_jpg,
            summary.stats.total_unmatched,
            summary.stats.quarantined,
            summary.stats.deleted,
            summary.stats.failed
        );

        ctx.reporter.publish(CleanupEvent::Summary(summary.clone()));
        RunOutcome::Completed(summary)
    }

    /// 列出要處理的檔案，排除已在隔離資料夾內的檔案
    fn collect_files(
        &self,
        config: &CleanupConfig,
        quarantine_dir: &Path,
    ) -> Result<Vec<PathBuf>, String> {
        let listed = if config.recursive {
            self.file_system.walk_regular_files(&config.image_dir)
        } else {
            self.file_system.list_regular_files(&config.image_dir)
        }
        .map_err(|e| e.to_string())?;

        let mut files: Vec<PathBuf> = listed
            .into_iter()
            .filter(|file| !is_within(file, quarantine_dir))
            .collect();
        files.sort();

        debug!("掃描到 {} 個檔案", files.len());
        Ok(files)
    }

    fn process_directory(&self, group: &DirectoryGroup, ctx: &mut RunContext<'_>) {
        if !group.is_image_directory() {
            debug!("略過非影像資料夾: {}", group.directory.display());
            return;
        }

        let unmatched = group.unmatched_raw_files();
        debug!(
            "資料夾 {}: {} 個檔案, 其中 {} 個不是 ARW/JPG",
            group.directory.display(),
            group.file_count(),
            group.other_count
        );

        ctx.stats.total_arw += group.raw_files.len();
        ctx.stats.total_jpg += group.jpeg_files.len();
        ctx.stats.total_unmatched += unmatched.len();

        ctx.publish(CleanupEvent::DirectoryStats {
            directory: group.directory.clone(),
            arw_count: group.raw_files.len(),
            jpg_count: group.jpeg_files.len(),
            unmatched_count: unmatched.len(),
        });

        for entry in unmatched {
            self.handle_file(entry, ctx);
        }
    }

    fn handle_file(&self, entry: &FileEntry, ctx: &mut RunContext<'_>) {
        let file = &entry.path;

        match (ctx.config.dry_run, ctx.config.mode) {
            (true, HandlingMode::Quarantine) => {
                let target = self.target_for(file, ctx);
                ctx.publish(CleanupEvent::DryRunMove {
                    source: file.clone(),
                    target,
                });
            }
            (true, HandlingMode::Delete) => {
                ctx.publish(CleanupEvent::DryRunDelete { path: file.clone() });
            }
            (false, HandlingMode::Quarantine) => self.move_to_quarantine(file, ctx),
            (false, HandlingMode::Delete) => self.delete_file(file, ctx),
        }
    }

    fn target_for(&self, file: &Path, ctx: &RunContext<'_>) -> PathBuf {
        normalize_path(&quarantine_target(
            &ctx.quarantine_dir,
            &ctx.config.image_dir,
            file,
        ))
    }

    fn move_to_quarantine(&self, file: &Path, ctx: &mut RunContext<'_>) {
        let target = self.target_for(file, ctx);

        let result = match target.parent() {
            Some(parent) if !parent.as_os_str().is_empty() => {
                self.file_system.create_directories(parent)
            }
            _ => Ok(()),
        }
        .and_then(|()| self.file_system.move_file(file, &target, true));

        match result {
            Ok(()) => {
                debug!("已移動 {} -> {}", file.display(), target.display());
                ctx.stats.quarantined += 1;
                ctx.publish(CleanupEvent::MoveSucceeded {
                    source: file.to_path_buf(),
                    target,
                });
            }
            Err(e) => {
                warn!("移動檔案失敗 {}: {e}", file.display());
                ctx.stats.failed += 1;
                ctx.publish(CleanupEvent::MoveFailed {
                    source: file.to_path_buf(),
                    reason: e.to_string(),
                });
            }
        }
    }

    fn delete_file(&self, file: &Path, ctx: &mut RunContext<'_>) {
        match self.file_system.delete_if_exists(file) {
            Ok(true) => {
                debug!("已刪除 {}", file.display());
                ctx.stats.deleted += 1;
                ctx.publish(CleanupEvent::DeleteSucceeded {
                    path: file.to_path_buf(),
                });
            }
            Ok(false) => {
                warn!("檔案已不存在: {}", file.display());
                ctx.publish(CleanupEvent::DeleteSkippedMissing {
                    path: file.to_path_buf(),
                });
            }
            Err(e) => {
                warn!("刪除檔案失敗 {}: {e}", file.display());
                ctx.stats.failed += 1;
                ctx.publish(CleanupEvent::DeleteFailed {
                    path: file.to_path_buf(),
                    reason: e.to_string(),
                });
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::tools::MemoryFileSystem;

    const IMAGE_DIR: &str = "/images/session";

    fn image_path(relative: &str) -> PathBuf {
        Path::new(IMAGE_DIR).join(relative)
    }

    fn run(fs: &MemoryFileSystem, config: &CleanupConfig) -> (RunOutcome, Vec<CleanupEvent>) {
        let mut events: Vec<CleanupEvent> = Vec::new();
        let outcome = CleanupRunner::new(fs).run(config, &mut events);
        (outcome, events)
    }

    #[test]
    fn test_quarantine_run_moves_unmatched_file() {
        let lonely = image_path("lonely.ARW");
        let fs = MemoryFileSystem::new().with_files([
            image_path("paired.ARW"),
            image_path("paired.JPG"),
            lonely.clone(),
        ]);

        let (outcome, events) = run(&fs, &CleanupConfig::new(IMAGE_DIR));

        let quarantine = image_path("_arw_quarantine");
        assert_eq!(fs.created_dirs()[0], quarantine);
        assert_eq!(fs.moved(), vec![(lonely.clone(), quarantine.join("lonely.ARW"))]);
        assert!(fs.contains_file(image_path("paired.ARW")));
        assert!(events.iter().any(
            |e| matches!(e, CleanupEvent::MoveSucceeded { source, .. } if *source == lonely)
        ));

        let summary = outcome.summary().unwrap();
        assert_eq!(summary.directory_count, 1);
        assert_eq!(summary.quarantine_dir, quarantine);
        assert_eq!(
            summary.stats,
            CleanupStats {
                total_arw: 2,
                total_jpg: 1,
                total_unmatched: 1,
                quarantined: 1,
                ..CleanupStats::default()
            }
        );
    }

    #[test]
    fn test_event_order() {
        let fs = MemoryFileSystem::new().with_file(image_path("lonely.ARW"));

        let (_, events) = run(&fs, &CleanupConfig::new(IMAGE_DIR));

        let kinds: Vec<&str> = events
            .iter()
            .map(|e| match e {
                CleanupEvent::RunStarted { .. } => "run",
                CleanupEvent::ScanCompleted { .. } => "scan",
                CleanupEvent::DirectoryStats { .. } => "dir",
                CleanupEvent::MoveSucceeded { .. } => "moved",
                CleanupEvent::Summary(_) => "summary",
                _ => "other",
            })
            .collect();
        assert_eq!(kinds, vec!["run", "scan", "dir", "moved", "summary"]);
    }

    #[test]
    fn test_dry_run_reports_without_writes() {
        let lonely = image_path("lonely.ARW");
        let fs = MemoryFileSystem::new().with_file(lonely.clone());

        let (outcome, events) = run(&fs, &CleanupConfig::new(IMAGE_DIR).dry_run(true));

        assert!(events.contains(&CleanupEvent::DryRunMove {
            source: lonely.clone(),
            target: image_path("_arw_quarantine/lonely.ARW"),
        }));
        assert!(fs.is_untouched());
        assert!(fs.contains_file(&lonely));
        assert_eq!(outcome.summary().unwrap().stats.quarantined, 0);
    }

    #[test]
    fn test_dry_run_delete_reports_without_writes() {
        let lonely = image_path("lonely.ARW");
        let fs = MemoryFileSystem::new().with_file(lonely.clone());
        let config = CleanupConfig::new(IMAGE_DIR)
            .dry_run(true)
            .mode(HandlingMode::Delete);

        let (_, events) = run(&fs, &config);

        assert!(events.contains(&CleanupEvent::DryRunDelete { path: lonely }));
        assert!(fs.is_untouched());
    }

    #[test]
    fn test_move_failure_does_not_stop_other_files() {
        let first = image_path("first.ARW");
        let second = image_path("second.ARW");
        let nested = image_path("nested/third.ARW");
        let fs = MemoryFileSystem::new()
            .with_files([first.clone(), second.clone(), nested.clone()])
            .fail_move_for(&first, "disk full");

        let (outcome, events) = run(&fs, &CleanupConfig::new(IMAGE_DIR).recursive(true));

        assert!(events.contains(&CleanupEvent::MoveFailed {
            source: first.clone(),
            reason: "disk full".to_string(),
        }));
        let moved: Vec<PathBuf> = fs.moved().into_iter().map(|(source, _)| source).collect();
        assert_eq!(moved, vec![second, nested]);

        let stats = &outcome.summary().unwrap().stats;
        assert_eq!(stats.quarantined, 2);
        assert_eq!(stats.failed, 1);
        assert_eq!(stats.total_unmatched, 3);
    }

    #[test]
    fn test_recursive_delete_does_not_create_quarantine() {
        let nested = image_path("nested/lonely.ARW");
        let fs = MemoryFileSystem::new()
            .with_directory(IMAGE_DIR)
            .with_files([nested.clone(), image_path("nested/paired.JPG")]);
        let config = CleanupConfig::new(IMAGE_DIR)
            .recursive(true)
            .mode(HandlingMode::Delete);

        let (outcome, events) = run(&fs, &config);

        assert_eq!(fs.deleted(), vec![nested.clone()]);
        assert!(fs.created_dirs().is_empty());
        assert!(events.contains(&CleanupEvent::DeleteSucceeded { path: nested }));
        assert_eq!(outcome.summary().unwrap().stats.deleted, 1);
    }

    #[test]
    fn test_delete_reports_missing_and_failures() {
        let fine = image_path("fine.ARW");
        let gone = image_path("gone.ARW");
        let locked = image_path("locked.ARW");
        let fs = MemoryFileSystem::new()
            .with_files([fine.clone(), gone.clone(), locked.clone()])
            .fail_delete_for(&locked, "file is locked");
        let config = CleanupConfig::new(IMAGE_DIR).mode(HandlingMode::Delete);
        let mut events: Vec<CleanupEvent> = Vec::new();

        // 掃描完成後才被移除的檔案
        let mut reporter = |event: CleanupEvent| {
            if matches!(event, CleanupEvent::DirectoryStats { .. }) {
                fs.remove_externally(&gone);
            }
            events.push(event);
        };
        let outcome = CleanupRunner::new(&fs).run(&config, &mut reporter);

        let stats = &outcome.summary().unwrap().stats;
        assert_eq!(stats.total_unmatched, 3);
        assert_eq!(stats.deleted, 1);
        assert_eq!(stats.failed, 1);
        assert_eq!(fs.deleted(), vec![fine.clone()]);

        let actions: Vec<&CleanupEvent> = events
            .iter()
            .filter(|e| {
                matches!(
                    e,
                    CleanupEvent::DeleteSucceeded { .. }
                        | CleanupEvent::DeleteSkippedMissing { .. }
                        | CleanupEvent::DeleteFailed { .. }
                )
            })
            .collect();
        assert_eq!(
            actions,
            vec![
                &CleanupEvent::DeleteSucceeded { path: fine },
                &CleanupEvent::DeleteSkippedMissing { path: gone },
                &CleanupEvent::DeleteFailed {
                    path: locked,
                    reason: "file is locked".to_string(),
                },
            ]
        );
    }

    #[test]
    fn test_quarantine_creation_failure_aborts_before_scan() {
        let fs = MemoryFileSystem::new()
            .with_file(image_path("lonely.ARW"))
            .fail_create_for(image_path("_arw_quarantine"), "permission denied");

        let (outcome, events) = run(&fs, &CleanupConfig::new(IMAGE_DIR));

        assert_eq!(outcome, RunOutcome::Aborted);
        assert_eq!(
            events,
            vec![CleanupEvent::QuarantineCreationFailed {
                quarantine_dir: image_path("_arw_quarantine"),
                reason: "permission denied".to_string(),
            }]
        );
        assert!(fs.contains_file(image_path("lonely.ARW")));
    }

    #[test]
    fn test_unreadable_image_dir_aborts() {
        let fs = MemoryFileSystem::new();
        let config = CleanupConfig::new(IMAGE_DIR).mode(HandlingMode::Delete);

        let (outcome, events) = run(&fs, &config);

        assert_eq!(outcome, RunOutcome::Aborted);
        assert!(matches!(events.last(), Some(CleanupEvent::ScanFailed { .. })));
        assert!(!events.iter().any(|e| matches!(e, CleanupEvent::Summary(_))));
    }

    #[test]
    fn test_quarantine_contents_are_excluded() {
        let already = image_path("_arw_quarantine/already.ARW");
        let fresh = image_path("fresh.ARW");
        let fs = MemoryFileSystem::new().with_files([already.clone(), fresh.clone()]);

        let (outcome, events) = run(&fs, &CleanupConfig::new(IMAGE_DIR).recursive(true));

        assert!(events.contains(&CleanupEvent::ScanCompleted {
            regular_file_count: 1,
            recursive: true,
        }));
        assert_eq!(fs.moved(), vec![(fresh, image_path("_arw_quarantine/fresh.ARW"))]);
        assert!(fs.contains_file(&already));
        assert_eq!(outcome.summary().unwrap().stats.total_arw, 1);
    }

    #[test]
    fn test_repeated_runs_do_not_reprocess_quarantine() {
        let fs = MemoryFileSystem::new().with_file(image_path("nested/lonely.ARW"));
        let config = CleanupConfig::new(IMAGE_DIR).recursive(true);

        run(&fs, &config);
        let (outcome, _) = run(&fs, &config);

        assert_eq!(fs.moved().len(), 1);
        assert!(fs.contains_file(image_path("_arw_quarantine/nested/lonely.ARW")));
        let summary = outcome.summary().unwrap();
        assert_eq!(summary.stats.total_arw, 0);
        assert_eq!(summary.directory_count, 0);
    }

    #[test]
    fn test_non_image_directories_count_but_do_not_report() {
        let fs = MemoryFileSystem::new().with_files([
            image_path("lonely.ARW"),
            image_path("docs/readme.txt"),
        ]);
        let config = CleanupConfig::new(IMAGE_DIR).recursive(true).dry_run(true);

        let (outcome, events) = run(&fs, &config);

        let stats_events = events
            .iter()
            .filter(|e| matches!(e, CleanupEvent::DirectoryStats { .. }))
            .count();
        assert_eq!(stats_events, 1);
        assert_eq!(outcome.summary().unwrap().directory_count, 2);
    }

    #[test]
    fn test_jpg_in_parent_does_not_protect_nested_raw() {
        let child_raw = image_path("child/shared.ARW");
        let fs = MemoryFileSystem::new().with_files([image_path("shared.JPG"), child_raw.clone()]);

        run(&fs, &CleanupConfig::new(IMAGE_DIR).recursive(true));

        assert_eq!(
            fs.moved(),
            vec![(child_raw, image_path("_arw_quarantine/child/shared.ARW"))]
        );
    }
}
