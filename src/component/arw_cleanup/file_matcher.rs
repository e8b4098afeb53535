//! 檔案配對器
//!
//! 依所在資料夾分組，找出同資料夾內沒有同名 JPG 的 ARW 檔案

use std::collections::{BTreeMap, HashSet};
use std::path::{Path, PathBuf};

const RAW_EXTENSION: &str = "arw";
const JPEG_EXTENSION: &str = "jpg";

/// 配對時關心的檔案種類
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ImageKind {
    Raw,
    Jpeg,
}

/// 掃描到的檔案與其衍生屬性
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FileEntry {
    pub path: PathBuf,
    /// 檔名最後一個 `.` 之前的部分
    pub base_name: String,
    /// 檔名最後一個 `.` 之後的部分；沒有 `.` 時為 `None`
    pub extension: Option<String>,
}

impl FileEntry {
    #[must_use]
    pub fn from_path(path: impl Into<PathBuf>) -> Self {
        let path = path.into();
        let name = path
            .file_name()
            .map(|n| n.to_string_lossy().into_owned())
            .unwrap_or_default();

        let (base_name, extension) = match name.rsplit_once('.') {
            Some((base, ext)) => (base.to_string(), Some(ext.to_string())),
            None => (name, None),
        };

        Self {
            path,
            base_name,
            extension,
        }
    }

    #[must_use]
    pub fn kind(&self) -> Option<ImageKind> {
        let ext = self.extension.as_deref()?;
        if ext.eq_ignore_ascii_case(RAW_EXTENSION) {
            Some(ImageKind::Raw)
        } else if ext.eq_ignore_ascii_case(JPEG_EXTENSION) {
            Some(ImageKind::Jpeg)
        } else {
            None
        }
    }

    /// 配對用的鍵：小寫的主檔名
    #[must_use]
    pub fn match_key(&self) -> String {
        self.base_name.to_lowercase()
    }
}

/// 同一資料夾內的檔案，已分成 ARW 與 JPG
#[derive(Debug, Clone, Default)]
pub struct DirectoryGroup {
    pub directory: PathBuf,
    pub raw_files: Vec<FileEntry>,
    pub jpeg_files: Vec<FileEntry>,
    /// 既不是 ARW 也不是 JPG 的檔案數
    pub other_count: usize,
}

impl DirectoryGroup {
    #[must_use]
    pub fn new(directory: impl Into<PathBuf>) -> Self {
        Self {
            directory: directory.into(),
            ..Self::default()
        }
    }

    pub fn push(&mut self, entry: FileEntry) {
        match entry.kind() {
            Some(ImageKind::Raw) => self.raw_files.push(entry),
            Some(ImageKind::Jpeg) => self.jpeg_files.push(entry),
            None => self.other_count += 1,
        }
    }

    /// 沒有任何 ARW 或 JPG 的資料夾不算影像資料夾
    #[must_use]
    pub fn is_image_directory(&self) -> bool {
        !self.raw_files.is_empty() || !self.jpeg_files.is_empty()
    }

    #[must_use]
    pub fn file_count(&self) -> usize {
        self.raw_files.len() + self.jpeg_files.len() + self.other_count
    }

    /// 主檔名（不分大小寫）不在同資料夾 JPG 集合中的 ARW 檔案
    ///
    /// 多個 ARW 共用同一個主檔名時，只要有一個同名 JPG 就全部保留
    #[must_use]
    pub fn unmatched_raw_files(&self) -> Vec<&FileEntry> {
        let keep: HashSet<String> = self.jpeg_files.iter().map(FileEntry::match_key).collect();

        self.raw_files
            .iter()
            .filter(|raw| !keep.contains(&raw.match_key()))
            .collect()
    }
}

/// 依所在資料夾分組，結果依資料夾路徑排序
///
/// 沒有上層資料夾的相對路徑歸到 `fallback_dir`
#[must_use]
pub fn group_by_directory<I>(files: I, fallback_dir: &Path) -> Vec<DirectoryGroup>
where
    I: IntoIterator<Item = PathBuf>,
{
    let mut groups: BTreeMap<PathBuf, DirectoryGroup> = BTreeMap::new();

    for path in files {
        let directory = match path.parent() {
            Some(parent) if !parent.as_os_str().is_empty() => parent.to_path_buf(),
            _ => fallback_dir.to_path_buf(),
        };

        groups
            .entry(directory.clone())
            .or_insert_with(|| DirectoryGroup::new(directory))
            .push(FileEntry::from_path(path));
    }

    groups.into_values().collect()
}
