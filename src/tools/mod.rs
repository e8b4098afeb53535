mod file_system;
mod file_tools;
mod memory_file_system;
mod path_validator;

pub use file_system::{FileSystem, FileSystemError, FsResult, LocalFileSystem};
pub use file_tools::{absolute_display, is_within, normalize_path};
pub use memory_file_system::MemoryFileSystem;
pub use path_validator::validate_directory_exists;
