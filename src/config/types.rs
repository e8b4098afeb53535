use crate::tools::normalize_path;
use std::fmt;
use std::path::PathBuf;

/// 隔離資料夾名稱，固定建立在影像資料夾底下
pub const DEFAULT_QUARANTINE_FOLDER: &str = "_arw_quarantine";

/// 未配對 ARW 檔案的處理方式
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum HandlingMode {
    /// 移動到隔離資料夾（預設）
    #[default]
    Quarantine,
    /// 永久刪除
    Delete,
}

impl HandlingMode {
    #[must_use]
    pub const fn verb(self) -> &'static str {
        match self {
            Self::Quarantine => "quarantine",
            Self::Delete => "delete",
        }
    }
}

impl fmt::Display for HandlingMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.verb())
    }
}

/// 單次清理執行的設定，執行期間不會變動
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CleanupConfig {
    pub image_dir: PathBuf,
    pub recursive: bool,
    pub dry_run: bool,
    pub mode: HandlingMode,
}

impl CleanupConfig {
    #[must_use]
    pub fn new(image_dir: impl Into<PathBuf>) -> Self {
        Self {
            image_dir: image_dir.into(),
            recursive: false,
            dry_run: false,
            mode: HandlingMode::default(),
        }
    }

    #[must_use]
    pub const fn recursive(mut self, recursive: bool) -> Self {
        self.recursive = recursive;
        self
    }

    #[must_use]
    pub const fn dry_run(mut self, dry_run: bool) -> Self {
        self.dry_run = dry_run;
        self
    }

    #[must_use]
    pub const fn mode(mut self, mode: HandlingMode) -> Self {
        self.mode = mode;
        self
    }

    /// 隔離資料夾路徑：`image_dir/_arw_quarantine`（已正規化）
    #[must_use]
    pub fn quarantine_dir(&self) -> PathBuf {
        normalize_path(&self.image_dir.join(DEFAULT_QUARANTINE_FOLDER))
    }

    /// 此設定是否需要在掃描前建立隔離資料夾
    #[must_use]
    pub fn needs_quarantine_dir(&self) -> bool {
        self.mode == HandlingMode::Quarantine && !self.dry_run
    }
}
