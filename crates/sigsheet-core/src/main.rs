//! `sigsheet` command-line host

use anyhow::Context;
use clap::{value_parser, Arg, ArgAction, ArgMatches, Command};
use sigsheet_core::{HtmlExporter, Notice, NoticeLevel, Sheet, SheetConfig, SheetError, TerminalPresenter};
use sigsheet_identity::Identity;
use sigsheet_roster::FileStorage;
use sigsheet_upload::SelectedFile;
use std::path::{Path, PathBuf};
use std::sync::Arc;
use tracing_subscriber::EnvFilter;

#[tokio::main]
async fn main() {
    let matches = cli().get_matches();
    init_tracing(matches.get_flag("log-json"));

    match run(&matches).await {
        Ok(code) => std::process::exit(code),
        Err(e) => {
            eprintln!("error: {e:#}");
            std::process::exit(2);
        }
    }
}

fn init_tracing(json: bool) {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    let builder = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr);
    if json {
        builder.json().init();
    } else {
        builder.init();
    }
}

fn cli() -> Command {
    Command::new("sigsheet")
        .version(sigsheet_core::VERSION)
        .about("Collect one signature image per participant on a fixed sheet")
        .subcommand_required(true)
        .arg(
            Arg::new("config")
                .long("config")
                .global(true)
                .value_parser(value_parser!(PathBuf))
                .help("TOML configuration file"),
        )
        .arg(
            Arg::new("log-json")
                .long("log-json")
                .global(true)
                .action(ArgAction::SetTrue)
                .help("Write logs to stderr as JSON lines"),
        )
        .arg(
            Arg::new("store")
                .long("store")
                .global(true)
                .default_value("sigsheet.json")
                .value_parser(value_parser!(PathBuf))
                .help("JSON file holding the persisted sheet"),
        )
        .subcommand(Command::new("show").about("Print the sheet"))
        .subcommand(
            Command::new("status")
                .about("Print completion status")
                .arg(
                    Arg::new("json")
                        .long("json")
                        .action(ArgAction::SetTrue)
                        .help("Output as JSON"),
                ),
        )
        .subcommand(
            Command::new("sign")
                .about("Upload a signature image for the signed-in user")
                .arg(
                    Arg::new("name")
                        .long("name")
                        .required(true)
                        .help("Display name of the signed-in user"),
                )
                .arg(Arg::new("email").long("email").help("Email of the signed-in user"))
                .arg(
                    Arg::new("file")
                        .long("file")
                        .required(true)
                        .value_parser(value_parser!(PathBuf))
                        .help("Signature image"),
                )
                .arg(
                    Arg::new("content-type")
                        .long("content-type")
                        .help("Override the content type guessed from the extension"),
                ),
        )
        .subcommand(Command::new("clear").about("Remove every signature"))
        .subcommand(
            Command::new("export")
                .about("Export the sheet as an HTML page")
                .arg(
                    Arg::new("out-dir")
                        .long("out-dir")
                        .default_value(".")
                        .value_parser(value_parser!(PathBuf))
                        .help("Directory to write into"),
                ),
        )
}

async fn run(matches: &ArgMatches) -> anyhow::Result<i32> {
    let config = match matches.get_one::<PathBuf>("config") {
        Some(path) => SheetConfig::from_path(path)
            .with_context(|| format!("loading config from {}", path.display()))?,
        None => SheetConfig::new(),
    };
    let store_path = matches
        .get_one::<PathBuf>("store")
        .cloned()
        .unwrap_or_else(|| PathBuf::from("sigsheet.json"));

    let mut sheet = Sheet::new(config, Arc::new(FileStorage::new(store_path)))?;
    if matches!(matches.subcommand_name(), Some("show")) {
        sheet = sheet.with_presenter(Arc::new(TerminalPresenter));
    }

    if let Err(e) = sheet.load() {
        if !e.is_recovered() {
            return Ok(report_error(&e));
        }
        report(&e.notice());
    }

    let code = match matches.subcommand() {
        Some(("show", _)) => 0,
        Some(("status", args)) => {
            let status = sheet.status();
            if args.get_flag("json") {
                println!("{}", serde_json::to_string_pretty(&status)?);
            } else {
                println!("{}/{} signed", status.signed, status.total);
                if let Some(banner) = sheet.render_model().banner() {
                    println!("{banner}");
                }
            }
            0
        }
        Some(("sign", args)) => {
            let name = args.get_one::<String>("name").context("--name is required")?;
            let file = args.get_one::<PathBuf>("file").context("--file is required")?;
            let mut identity = Identity::new(name.clone());
            if let Some(email) = args.get_one::<String>("email") {
                identity = identity.with_email(email.clone());
            }
            let content_type = args.get_one::<String>("content-type").cloned();

            match sign(&sheet, identity, file, content_type).await {
                Ok(notice) => {
                    report(&notice);
                    if let Some(banner) = sheet.render_model().banner() {
                        println!("{banner}");
                    }
                    0
                }
                Err(e) => report_error(&e),
            }
        }
        Some(("clear", _)) => match sheet.clear() {
            Ok(notice) => {
                report(&notice);
                0
            }
            Err(e) => report_error(&e),
        },
        Some(("export", args)) => {
            let out_dir = args
                .get_one::<PathBuf>("out-dir")
                .cloned()
                .unwrap_or_else(|| PathBuf::from("."));
            match sheet.export(&HtmlExporter::new(out_dir)) {
                Ok(artifact) => {
                    let shown = artifact
                        .location
                        .as_ref()
                        .map_or_else(|| artifact.file_name.clone(), |p| p.display().to_string());
                    println!("Exported {shown}");
                    0
                }
                Err(e) => report_error(&e),
            }
        }
        _ => 2,
    };

    Ok(code)
}

async fn sign(
    sheet: &Sheet,
    identity: Identity,
    file: &Path,
    content_type: Option<String>,
) -> Result<Notice, SheetError> {
    let ticket = sheet.sign_in(identity)?;
    let selected = SelectedFile::from_path(file, content_type).await?;
    sheet.submit(ticket, selected).await
}

fn report(notice: &Notice) {
    match notice.level {
        NoticeLevel::Info => println!("{notice}"),
        NoticeLevel::Warning | NoticeLevel::Error => eprintln!("{notice}"),
    }
}

fn report_error(err: &SheetError) -> i32 {
    if err.is_fault() {
        tracing::error!(error = %err, "operation failed");
    } else {
        tracing::debug!(error = %err, "request rejected");
    }
    report(&err.notice());
    1
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn cli_is_well_formed() {
        cli().debug_assert();
    }

    #[test]
    fn sign_requires_name_and_file() {
        assert!(cli().try_get_matches_from(["sigsheet", "sign", "--name", "Ahsan"]).is_err());
        let matches = cli()
            .try_get_matches_from(["sigsheet", "--store", "s.json", "sign", "--name", "Ahsan", "--file", "a.png"])
            .unwrap();
        assert_eq!(
            matches.get_one::<PathBuf>("store"),
            Some(&PathBuf::from("s.json"))
        );
    }
}
