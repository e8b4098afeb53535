//! 命令列介面：參數解析與終端機輸出

mod args_parser;
mod terminal;

pub use args_parser::{ArgsParser, ParsedArgs};
pub use terminal::{Console, MemoryConsole, StdConsole};
