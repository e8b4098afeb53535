use super::terminal::Console;
use crate::config::{CleanupConfig, HandlingMode};
use crate::tools::{FileSystem, normalize_path, validate_directory_exists};
use clap::error::{ContextKind, ContextValue, ErrorKind};
use clap::{CommandFactory, Parser};
use std::ffi::OsString;
use std::path::PathBuf;

const BIN_NAME: &str = "arw_cleanup";

const BEFORE_HELP: &str = "___________________________________________
ARW Cleanup Tool
___________________________________________";

const AFTER_HELP: &str = r#"Examples:
  arw_cleanup "C:\Users\User\Pictures\My Images"
  arw_cleanup --dry-run --recursive "D:\Photos\2025"
  arw_cleanup --delete "D:\Photos\2025"
___________________________________________"#;

/// 唯一接受的選項寫法，比對時不分大小寫
static KNOWN_FLAGS: [&str; 8] = [
    "--dry-run",
    "--recursive",
    "--delete",
    "--help",
    "-n",
    "-r",
    "-d",
    "-h",
];

#[derive(Debug, Parser)]
#[command(
    name = BIN_NAME,
    about = "Quarantine unmatched ARW files by default, or delete them when opting in with --delete.\nMatching is case-insensitive. Quote the path if it contains spaces.",
    override_usage = "arw_cleanup [options] <image_directory_path>",
    before_help = BEFORE_HELP,
    after_help = AFTER_HELP,
    disable_version_flag = true,
    args_override_self = true
)]
struct CliArgs {
    /// Show which files would be deleted/moved without touching them
    #[arg(short = 'n', long = "dry-run")]
    dry_run: bool,

    /// Process subdirectories recursively
    #[arg(short, long)]
    recursive: bool,

    /// Delete unmatched ARW files instead of quarantining them
    #[arg(short, long)]
    delete: bool,

    /// Directory containing the ARW and JPG files
    #[arg(value_name = "image_directory_path")]
    paths: Vec<PathBuf>,
}

/// 參數解析的結果
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ParsedArgs {
    Run(CleanupConfig),
    /// 已顯示說明，不需要執行
    HelpShown,
    /// 參數錯誤，已輸出錯誤訊息
    Rejected,
}

/// 解析命令列參數並驗證影像資料夾
pub struct ArgsParser<'a> {
    console: &'a dyn Console,
    file_system: &'a dyn FileSystem,
}

impl<'a> ArgsParser<'a> {
    pub const fn new(console: &'a dyn Console, file_system: &'a dyn FileSystem) -> Self {
        Self {
            console,
            file_system,
        }
    }

    /// `args` 不含程式名稱
    pub fn parse<I, T>(&self, args: I) -> ParsedArgs
    where
        I: IntoIterator<Item = T>,
        T: Into<OsString>,
    {
        let args: Vec<OsString> = args
            .into_iter()
            .map(Into::into)
            .map(normalize_flag)
            .collect();

        // 合併短選項、`-`、`--` 與 `--flag=value` 都不交給 clap 解讀
        if let Some(unknown) = args.iter().find(|arg| is_unknown_option(arg)) {
            self.console
                .error(&format!("Unknown option: {}", unknown.to_string_lossy()));
            self.print_usage();
            return ParsedArgs::Rejected;
        }

        let argv = std::iter::once(OsString::from(BIN_NAME)).chain(args);
        let cli = match CliArgs::try_parse_from(argv) {
            Ok(cli) => cli,
            Err(err) if err.kind() == ErrorKind::DisplayHelp => {
                self.print_usage();
                return ParsedArgs::HelpShown;
            }
            Err(err) => {
                self.console.error(&describe_error(&err));
                self.print_usage();
                return ParsedArgs::Rejected;
            }
        };

        let image_dir = match cli.paths.as_slice() {
            [single] => normalize_path(single),
            [] => {
                self.console
                    .error("Exactly one image directory path is required.");
                self.print_usage();
                return ParsedArgs::Rejected;
            }
            many => {
                let received: Vec<String> =
                    many.iter().map(|p| p.display().to_string()).collect();
                self.console.error(&format!(
                    "Only one image directory path is supported. Received: {}",
                    received.join(", ")
                ));
                self.print_usage();
                return ParsedArgs::Rejected;
            }
        };

        if let Err(e) = validate_directory_exists(self.file_system, &image_dir) {
            self.console.error(&e.to_string());
            return ParsedArgs::Rejected;
        }

        let mode = if cli.delete {
            HandlingMode::Delete
        } else {
            HandlingMode::Quarantine
        };

        ParsedArgs::Run(
            CleanupConfig::new(image_dir)
                .recursive(cli.recursive)
                .dry_run(cli.dry_run)
                .mode(mode),
        )
    }

    pub fn print_usage(&self) {
        let help = CliArgs::command().render_help().to_string();
        for line in help.trim_end().lines() {
            self.console.info(line);
        }
    }
}

/// 已知的選項一律轉成小寫
fn normalize_flag(arg: OsString) -> OsString {
    let known = arg.to_str().and_then(|s| {
        KNOWN_FLAGS
            .iter()
            .copied()
            .find(|flag| flag.eq_ignore_ascii_case(s))
    });

    match known {
        Some(flag) => OsString::from(flag),
        None => arg,
    }
}

/// `-` 開頭但不是已知寫法的參數
fn is_unknown_option(arg: &OsString) -> bool {
    arg.as_encoded_bytes().starts_with(b"-")
        && !arg.to_str().is_some_and(|s| KNOWN_FLAGS.contains(&s))
}

fn describe_error(err: &clap::Error) -> String {
    let kind = err.kind().as_str().unwrap_or("Invalid arguments");
    match (err.kind(), err.get(ContextKind::InvalidArg)) {
        (ErrorKind::UnknownArgument, Some(ContextValue::String(arg))) => {
            format!("Unknown option: {arg}")
        }
        (_, Some(ContextValue::String(arg))) => format!("{kind}: {arg}"),
        _ => kind.to_string(),
    }
}
