//! 記憶體內的檔案系統
//!
//! 行為與 [`super::LocalFileSystem`] 一致，另外記錄每次寫入操作並可針對路徑注入失敗

use super::file_system::{FileSystem, FileSystemError, FsResult};
use std::cell::RefCell;
use std::collections::{BTreeMap, BTreeSet};
use std::path::{Path, PathBuf};

#[derive(Debug, Default)]
struct State {
    directories: BTreeSet<PathBuf>,
    files: BTreeSet<PathBuf>,
    created_dirs: Vec<PathBuf>,
    moved: Vec<(PathBuf, PathBuf)>,
    deleted: Vec<PathBuf>,
    move_failures: BTreeMap<PathBuf, String>,
    delete_failures: BTreeMap<PathBuf, String>,
    create_failures: BTreeMap<PathBuf, String>,
}

impl State {
    fn add_directory_chain(&mut self, dir: &Path) {
        for ancestor in dir.ancestors() {
            if ancestor.as_os_str().is_empty() {
                break;
            }
            self.directories.insert(ancestor.to_path_buf());
        }
    }
}

/// 決定性的記憶體內檔案系統（單執行緒）
#[derive(Debug, Default)]
pub struct MemoryFileSystem {
    state: RefCell<State>,
}

impl MemoryFileSystem {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// 建立資料夾（含上層）
    #[must_use]
    pub fn with_directory(self, dir: impl AsRef<Path>) -> Self {
        self.state.borrow_mut().add_directory_chain(dir.as_ref());
        self
    }

    /// 建立檔案，並自動建立其上層資料夾
    #[must_use]
    pub fn with_file(self, file: impl AsRef<Path>) -> Self {
        let file = file.as_ref();
        {
            let mut state = self.state.borrow_mut();
            if let Some(parent) = file.parent() {
                state.add_directory_chain(parent);
            }
            state.files.insert(file.to_path_buf());
        }
        self
    }

    #[must_use]
    pub fn with_files<I, P>(self, files: I) -> Self
    where
        I: IntoIterator<Item = P>,
        P: AsRef<Path>,
    {
        files.into_iter().fold(self, |fs, file| fs.with_file(file))
    }

    /// 讓移動 `source` 時失敗
    #[must_use]
    pub fn fail_move_for(self, source: impl AsRef<Path>, reason: impl Into<String>) -> Self {
        self.state
            .borrow_mut()
            .move_failures
            .insert(source.as_ref().to_path_buf(), reason.into());
        self
    }

    /// 讓刪除 `path` 時失敗
    #[must_use]
    pub fn fail_delete_for(self, path: impl AsRef<Path>, reason: impl Into<String>) -> Self {
        self.state
            .borrow_mut()
            .delete_failures
            .insert(path.as_ref().to_path_buf(), reason.into());
        self
    }

    /// 讓建立 `dir` 時失敗
    #[must_use]
    pub fn fail_create_for(self, dir: impl AsRef<Path>, reason: impl Into<String>) -> Self {
        self.state
            .borrow_mut()
            .create_failures
            .insert(dir.as_ref().to_path_buf(), reason.into());
        self
    }

    /// 在檔案系統外部移除檔案（模擬掃描後檔案消失）
    pub fn remove_externally(&self, file: impl AsRef<Path>) {
        self.state.borrow_mut().files.remove(file.as_ref());
    }

    #[must_use]
    pub fn contains_file(&self, file: impl AsRef<Path>) -> bool {
        self.state.borrow().files.contains(file.as_ref())
    }

    /// 呼叫 `create_directories` 成功的路徑（依呼叫順序）
    #[must_use]
    pub fn created_dirs(&self) -> Vec<PathBuf> {
        self.state.borrow().created_dirs.clone()
    }

    /// 成功的移動操作 `(來源, 目標)`
    #[must_use]
    pub fn moved(&self) -> Vec<(PathBuf, PathBuf)> {
        self.state.borrow().moved.clone()
    }

    /// 實際刪除的檔案
    #[must_use]
    pub fn deleted(&self) -> Vec<PathBuf> {
        self.state.borrow().deleted.clone()
    }

    /// 是否有任何寫入操作
    #[must_use]
    pub fn is_untouched(&self) -> bool {
        let state = self.state.borrow();
        state.created_dirs.is_empty() && state.moved.is_empty() && state.deleted.is_empty()
    }

    fn not_found(path: &Path) -> FileSystemError {
        FileSystemError::Failure(format!("no such file or directory: {}", path.display()))
    }
}

impl FileSystem for MemoryFileSystem {
    fn create_directories(&self, path: &Path) -> FsResult<()> {
        let mut state = self.state.borrow_mut();
        if let Some(reason) = state.create_failures.get(path) {
            return Err(FileSystemError::Failure(reason.clone()));
        }
        if state.files.contains(path) {
            return Err(FileSystemError::Failure(format!(
                "not a directory: {}",
                path.display()
            )));
        }

        state.add_directory_chain(path);
        state.created_dirs.push(path.to_path_buf());
        Ok(())
    }

    fn list_regular_files(&self, dir: &Path) -> FsResult<Vec<PathBuf>> {
        let state = self.state.borrow();
        if !state.directories.contains(dir) {
            return Err(Self::not_found(dir));
        }

        Ok(state
            .files
            .iter()
            .filter(|file| file.parent() == Some(dir))
            .cloned()
            .collect())
    }

    fn walk_regular_files(&self, dir: &Path) -> FsResult<Vec<PathBuf>> {
        let state = self.state.borrow();
        if !state.directories.contains(dir) {
            return Err(Self::not_found(dir));
        }

        Ok(state
            .files
            .iter()
            .filter(|file| file.starts_with(dir))
            .cloned()
            .collect())
    }

    fn delete_if_exists(&self, path: &Path) -> FsResult<bool> {
        let mut state = self.state.borrow_mut();
        if let Some(reason) = state.delete_failures.get(path) {
            return Err(FileSystemError::Failure(reason.clone()));
        }
        if !state.files.remove(path) {
            return Ok(false);
        }

        state.deleted.push(path.to_path_buf());
        Ok(true)
    }

    fn move_file(&self, source: &Path, target: &Path, overwrite: bool) -> FsResult<()> {
        let mut state = self.state.borrow_mut();
        if let Some(reason) = state.move_failures.get(source) {
            return Err(FileSystemError::Failure(reason.clone()));
        }
        if !state.files.contains(source) {
            return Err(Self::not_found(source));
        }
        if let Some(parent) = target.parent() {
            if !parent.as_os_str().is_empty() && !state.directories.contains(parent) {
                return Err(Self::not_found(parent));
            }
        }
        if state.files.contains(target) && !overwrite {
            return Err(FileSystemError::AlreadyExists {
                path: target.to_path_buf(),
            });
        }

        state.files.remove(source);
        state.files.insert(target.to_path_buf());
        state.moved.push((source.to_path_buf(), target.to_path_buf()));
        Ok(())
    }

    fn exists(&self, path: &Path) -> bool {
        let state = self.state.borrow();
        state.files.contains(path) || state.directories.contains(path)
    }

    fn is_directory(&self, path: &Path) -> bool {
        self.state.borrow().directories.contains(path)
    }
}
