use console::style;
use std::cell::RefCell;

/// 終端機輸出，依嚴重程度分成三種
pub trait Console {
    fn info(&self, message: &str);
    fn warn(&self, message: &str);
    fn error(&self, message: &str);
}

/// 標準輸出：info 與 warn 寫到 stdout，error 寫到 stderr
#[derive(Debug, Default, Clone, Copy)]
pub struct StdConsole;

impl Console for StdConsole {
    fn info(&self, message: &str) {
        println!("{message}");
    }

    fn warn(&self, message: &str) {
        println!("{} {message}", style("WARN:").yellow().bold());
    }

    fn error(&self, message: &str) {
        eprintln!("{} {message}", style("ERROR:").red().bold().for_stderr());
    }
}

/// 將輸出保留在記憶體中
#[derive(Debug, Default)]
pub struct MemoryConsole {
    info: RefCell<Vec<String>>,
    warn: RefCell<Vec<String>>,
    error: RefCell<Vec<String>>,
}

impl MemoryConsole {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    #[must_use]
    pub fn info_messages(&self) -> Vec<String> {
        self.info.borrow().clone()
    }

    #[must_use]
    pub fn warn_messages(&self) -> Vec<String> {
        self.warn.borrow().clone()
    }

    #[must_use]
    pub fn error_messages(&self) -> Vec<String> {
        self.error.borrow().clone()
    }

    /// 所有訊息合併成一段文字（依嚴重程度分組，不保留交錯順序）
    #[must_use]
    pub fn output(&self) -> String {
        let mut lines = self.info_messages();
        lines.extend(self.warn_messages());
        lines.extend(self.error_messages());
        lines.join("\n")
    }
}

impl Console for MemoryConsole {
    fn info(&self, message: &str) {
        self.info.borrow_mut().push(message.to_string());
    }

    fn warn(&self, message: &str) {
        self.warn.borrow_mut().push(message.to_string());
    }

    fn error(&self, message: &str) {
        self.error.borrow_mut().push(message.to_string());
    }
}
