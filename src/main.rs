use arw_cleanup::cli::StdConsole;
use arw_cleanup::init;
use arw_cleanup::run_app;
use arw_cleanup::tools::LocalFileSystem;
use log::info;
use std::process::ExitCode;

fn main() -> ExitCode {
    init::init();

    let outcome = run_app(std::env::args_os().skip(1), &StdConsole, &LocalFileSystem);
    info!("程式結束: {outcome:?}");

    outcome.exit_code()
}
