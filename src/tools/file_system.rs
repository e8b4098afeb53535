//! 檔案系統抽象層
//!
//! 清理流程只透過 [`FileSystem`] 存取磁碟，測試時可換成 [`super::MemoryFileSystem`]

use log::warn;
use std::fs;
use std::io;
use std::path::{Path, PathBuf};
use thiserror::Error;
use walkdir::WalkDir;

/// 檔案系統操作失敗
#[derive(Debug, Error)]
pub enum FileSystemError {
    #[error("{source}")]
    Io {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    #[error("target already exists: {}", path.display())]
    AlreadyExists { path: PathBuf },

    /// 沒有底層 `io::Error` 的失敗（例如記憶體內的檔案系統）
    #[error("{0}")]
    Failure(String),
}

impl FileSystemError {
    pub fn io(path: impl Into<PathBuf>, source: io::Error) -> Self {
        Self::Io {
            path: path.into(),
            source,
        }
    }
}

pub type FsResult<T> = std::result::Result<T, FileSystemError>;

/// 清理流程需要的檔案系統能力
///
/// 所有失敗都以 [`FileSystemError`] 回傳，不做任何重試
pub trait FileSystem {
    /// 建立資料夾及所有缺少的上層資料夾；已存在時不做任何事
    fn create_directories(&self, path: &Path) -> FsResult<()>;

    /// 列出資料夾內的一般檔案（不含子資料夾），順序不保證
    fn list_regular_files(&self, dir: &Path) -> FsResult<Vec<PathBuf>>;

    /// 遞迴列出資料夾下所有一般檔案，順序不保證
    fn walk_regular_files(&self, dir: &Path) -> FsResult<Vec<PathBuf>>;

    /// 刪除檔案；檔案不存在時回傳 `Ok(false)`
    fn delete_if_exists(&self, path: &Path) -> FsResult<bool>;

    /// 移動檔案，目標的上層資料夾必須已存在
    fn move_file(&self, source: &Path, target: &Path, overwrite: bool) -> FsResult<()>;

    fn exists(&self, path: &Path) -> bool;

    fn is_directory(&self, path: &Path) -> bool;
}

/// 實際磁碟
#[derive(Debug, Default, Clone, Copy)]
pub struct LocalFileSystem;

impl LocalFileSystem {
    /// 複製檔案後刪除原檔案（跨檔案系統時 rename 會失敗）
    fn copy_and_delete(source: &Path, target: &Path) -> FsResult<()> {
        fs::copy(source, target).map_err(|e| FileSystemError::io(source, e))?;
        fs::remove_file(source).map_err(|e| FileSystemError::io(source, e))?;
        Ok(())
    }
}

impl FileSystem for LocalFileSystem {
    fn create_directories(&self, path: &Path) -> FsResult<()> {
        fs::create_dir_all(path).map_err(|e| FileSystemError::io(path, e))
    }

    fn list_regular_files(&self, dir: &Path) -> FsResult<Vec<PathBuf>> {
        let entries = fs::read_dir(dir).map_err(|e| FileSystemError::io(dir, e))?;

        let mut files = Vec::new();
        for entry in entries {
            let entry = match entry {
                Ok(e) => e,
                Err(e) => {
                    warn!("讀取目錄項目失敗 {}: {e}", dir.display());
                    continue;
                }
            };

            if entry.file_type().is_ok_and(|t| t.is_file()) {
                files.push(entry.path());
            }
        }

        Ok(files)
    }

    fn walk_regular_files(&self, dir: &Path) -> FsResult<Vec<PathBuf>> {
        let mut files = Vec::new();

        for entry in WalkDir::new(dir).follow_links(false) {
            let entry = match entry {
                Ok(e) => e,
                Err(e) if e.depth() == 0 => {
                    let source = e
                        .into_io_error()
                        .unwrap_or_else(|| io::Error::other("directory walk failed"));
                    return Err(FileSystemError::io(dir, source));
                }
                Err(e) => {
                    warn!("略過無法讀取的項目: {e}");
                    continue;
                }
            };

            if entry.file_type().is_file() {
                files.push(entry.into_path());
            }
        }

        Ok(files)
    }

    fn delete_if_exists(&self, path: &Path) -> FsResult<bool> {
        match fs::remove_file(path) {
            Ok(()) => Ok(true),
            Err(e) if e.kind() == io::ErrorKind::NotFound => Ok(false),
            Err(e) => Err(FileSystemError::io(path, e)),
        }
    }

    fn move_file(&self, source: &Path, target: &Path, overwrite: bool) -> FsResult<()> {
        if !overwrite && target.exists() {
            return Err(FileSystemError::AlreadyExists {
                path: target.to_path_buf(),
            });
        }

        match fs::rename(source, target) {
            Ok(()) => Ok(()),
            Err(rename_err) => {
                if !source.exists() {
                    return Err(FileSystemError::io(source, rename_err));
                }
                warn!(
                    "rename 失敗，改用複製後刪除 {} -> {}: {rename_err}",
                    source.display(),
                    target.display()
                );
                Self::copy_and_delete(source, target)
            }
        }
    }

    fn exists(&self, path: &Path) -> bool {
        path.exists()
    }

    fn is_directory(&self, path: &Path) -> bool {
        path.is_dir()
    }
}
