use std::path::{Component, Path, PathBuf};

/// 以字面方式正規化路徑（移除 `.` 與可解析的 `..`），不存取檔案系統
///
/// 正規化後為空路徑時回傳 `.`
#[must_use]
pub fn normalize_path(path: &Path) -> PathBuf {
    let mut normalized = PathBuf::new();

    for component in path.components() {
        match component {
            Component::CurDir => {}
            Component::ParentDir => match normalized.components().next_back() {
                Some(Component::Normal(_)) => {
                    normalized.pop();
                }
                // 根目錄之上沒有父目錄
                Some(Component::RootDir | Component::Prefix(_)) => {}
                _ => normalized.push(".."),
            },
            other => normalized.push(other.as_os_str()),
        }
    }

    if normalized.as_os_str().is_empty() {
        PathBuf::from(".")
    } else {
        normalized
    }
}

/// 顯示用的絕對路徑；無法取得時退回原路徑
#[must_use]
pub fn absolute_display(path: &Path) -> PathBuf {
    std::path::absolute(path).unwrap_or_else(|_| path.to_path_buf())
}

/// `path` 正規化後是否位於 `ancestor` 之下（含相等）
#[must_use]
pub fn is_within(path: &Path, ancestor: &Path) -> bool {
    normalize_path(path).starts_with(ancestor)
}
