use std::path::{Path, PathBuf};

/// 計算檔案在隔離資料夾中的目標路徑，保留相對於影像資料夾的結構
///
/// 檔案不在 `image_root` 之下（或相對路徑為空）時，直接放到隔離資料夾根目錄。
/// 這種情況下不同來源的同名檔案會互相覆蓋。
#[must_use]
pub fn quarantine_target(quarantine_root: &Path, image_root: &Path, file: &Path) -> PathBuf {
    match file.strip_prefix(image_root) {
        Ok(relative) if relative.components().next().is_some() => quarantine_root.join(relative),
        _ => match file.file_name() {
            Some(name) => quarantine_root.join(name),
            None => quarantine_root.to_path_buf(),
        },
    }
}
