pub mod cli;
pub mod component;
pub mod config;
pub mod init;
pub mod tools;

use cli::{ArgsParser, Console, ParsedArgs};
use component::arw_cleanup::{
    CleanupRunner, ConsoleCleanupReporter, RunOutcome, SummaryContext,
};
use std::ffi::OsString;
use std::process::ExitCode;
use tools::FileSystem;

/// 整個程式的執行結果
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum AppOutcome {
    HelpShown,
    Rejected,
    Aborted,
    Completed(SummaryContext),
}

impl AppOutcome {
    #[must_use]
    pub fn exit_code(&self) -> ExitCode {
        match self {
            Self::HelpShown | Self::Completed(_) => ExitCode::SUCCESS,
            Self::Aborted => ExitCode::from(1),
            Self::Rejected => ExitCode::from(2),
        }
    }
}

/// 解析參數並執行清理，所有輸出都經過 `console`
pub fn run_app<I, T>(args: I, console: &dyn Console, file_system: &dyn FileSystem) -> AppOutcome
where
    I: IntoIterator<Item = T>,
    T: Into<OsString>,
{
    let config = match ArgsParser::new(console, file_system).parse(args) {
        ParsedArgs::Run(config) => config,
        ParsedArgs::HelpShown => return AppOutcome::HelpShown,
        ParsedArgs::Rejected => return AppOutcome::Rejected,
    };

    let mut reporter = ConsoleCleanupReporter::new(console);
    match CleanupRunner::new(file_system).run(&config, &mut reporter) {
        RunOutcome::Completed(summary) => AppOutcome::Completed(summary),
        RunOutcome::Aborted => AppOutcome::Aborted,
    }
}
