use crate::config::{ResolvedConfig, ResolvedConfigFile};
use crate::constants::CREDENTIALS_HELP_TEXT;
use crate::credentials::read_credentials;
use crate::errors::{AppError, AppResult};
use crate::pipeline::{fetch_window, select_window_keys};
use crate::store::{s3_client, ObjectLister, S3Lister};
use chrono::{Local, NaiveDate};
use clap::{Arg, ArgAction, ArgMatches, Command};
use std::io::{self, Write};
use std::path::{Path, PathBuf};
use tracing::info;

// CLI metadata constants
const APP_NAME: &str = env!("CARGO_PKG_NAME");
const APP_VERSION: &str = env!("CARGO_PKG_VERSION");
const APP_ABOUT: &str = env!("CARGO_PKG_DESCRIPTION");

/// Options shared by every subcommand that lists the bucket.
fn listing_args() -> Vec<Arg<'static>> {
    vec![
        Arg::new("credentials")
            .help(CREDENTIALS_HELP_TEXT)
            .required(true)
            .value_parser(clap::value_parser!(PathBuf)),
        Arg::new("bucket")
            .short('b')
            .long("bucket")
            .help("Bucket holding the monthly archives [default: divvy-tripdata]")
            .action(ArgAction::Set),
        Arg::new("region")
            .short('r')
            .long("region")
            .help("Region used to sign listing requests [default: us-east-1]")
            .action(ArgAction::Set),
        Arg::new("months")
            .short('m')
            .long("months")
            .help("Calendar months before the current one to fetch [default: 12]")
            .value_parser(clap::value_parser!(u32))
            .action(ArgAction::Set),
        Arg::new("prefix")
            .short('p')
            .long("prefix")
            .help("Only list keys starting with this prefix")
            .action(ArgAction::Set),
        Arg::new("endpoint_url")
            .long("endpoint-url")
            .help("S3-compatible endpoint used for listing")
            .action(ArgAction::Set),
        Arg::new("public_url")
            .long("public-url")
            .help("Base URL archives are downloaded from")
            .action(ArgAction::Set),
    ]
}

/// Builds the command-line definition.
///
/// Three subcommands are available:
/// - `fetch`: list the bucket, select the month window, download and extract
/// - `list`: list the bucket and print the keys in the month window
/// - `toml`: run `fetch` using a TOML configuration file
pub fn build_command() -> Command<'static> {
    Command::new(APP_NAME)
        .version(APP_VERSION)
        .about(APP_ABOUT)
        .subcommand(
            Command::new("fetch")
                .about("Download and extract the archives of the preceding months")
                .after_help("Example:\n  divvy-tripdata fetch credentials.csv --months 6 --out-dir data")
                .args(listing_args())
                .arg(
                    Arg::new("out_dir")
                        .short('o')
                        .long("out-dir")
                        .help("Directory the archives are extracted into [default: data]")
                        .value_parser(clap::value_parser!(PathBuf))
                        .action(ArgAction::Set),
                ),
        )
        .subcommand(
            Command::new("list")
                .about("Print the keys of the preceding months without downloading")
                .args(listing_args()),
        )
        .subcommand(
            Command::new("toml")
                .about("Run fetch using a TOML configuration file")
                .arg(
                    Arg::new("config")
                        .help("Path to the TOML config file")
                        .required(true)
                        .value_parser(clap::value_parser!(PathBuf)),
                ),
        )
}

/// Applies the listing options given on the command line over the defaults.
pub fn resolved_config_from(sub: &ArgMatches) -> AppResult<ResolvedConfig> {
    let mut config = ResolvedConfig::default();
    if let Some(bucket) = sub.get_one::<String>("bucket") {
        config.bucket = bucket.clone();
    }
    if let Some(region) = sub.get_one::<String>("region") {
        config.region = region.clone();
    }
    if let Some(&months) = sub.get_one::<u32>("months") {
        config.window_months = months;
    }
    if let Some(prefix) = sub.get_one::<String>("prefix") {
        config.prefix = prefix.clone();
    }
    if let Some(endpoint) = sub.get_one::<String>("endpoint_url") {
        config.endpoint_url = Some(endpoint.clone());
    }
    if let Some(public_url) = sub.get_one::<String>("public_url") {
        config.public_url = Some(public_url.clone());
    }
    config.validate()?;
    Ok(config)
}

/// Parses command-line arguments and executes the selected subcommand.
///
/// The wall clock is read once here; everything downstream receives the
/// reference date explicitly.
///
/// # Errors
///
/// Returns the first error raised by the credential loader, the listing, the
/// downloads or the extraction. Nothing is retried.
pub async fn cli() -> AppResult<()> {
    let cmd = build_command();
    let mut cmd_for_help = cmd.clone();
    let matches = cmd.get_matches();
    let today = Local::now().date_naive();

    match matches.subcommand() {
        Some(("fetch", sub)) => {
            let credentials = sub
                .get_one::<PathBuf>("credentials")
                .ok_or_else(|| AppError::InvalidInput("credentials path is required".into()))?;
            let mut config = resolved_config_from(sub)?;
            if let Some(out_dir) = sub.get_one::<PathBuf>("out_dir") {
                config.output_dir = out_dir.clone();
            }
            run_fetch(credentials, &config, today).await?;
        }
        Some(("list", sub)) => {
            let credentials = sub
                .get_one::<PathBuf>("credentials")
                .ok_or_else(|| AppError::InvalidInput("credentials path is required".into()))?;
            let config = resolved_config_from(sub)?;
            run_list(credentials, &config, today).await?;
        }
        Some(("toml", sub)) => {
            let config_path = sub
                .get_one::<PathBuf>("config")
                .ok_or_else(|| AppError::InvalidInput("config path is required".into()))?;
            let file_config = ResolvedConfigFile::from_toml_file(config_path)?;
            run_fetch(&file_config.credentials, &file_config.resolved, today).await?;
        }
        _ => {
            cmd_for_help
                .print_help()
                .map_err(|e| AppError::IoError(format!("Failed to print help: {e}")))?;
        }
    }

    Ok(())
}

async fn connect(credentials_path: &Path, config: &ResolvedConfig) -> AppResult<S3Lister> {
    let credentials = read_credentials(credentials_path)?;
    let client = s3_client(&credentials, &config.region, config.endpoint_url.as_deref()).await;
    Ok(S3Lister::new(client))
}

async fn run_fetch(
    credentials_path: &Path,
    config: &ResolvedConfig,
    today: NaiveDate,
) -> AppResult<()> {
    let lister = connect(credentials_path, config).await?;
    let client = reqwest::Client::new();

    let summary = fetch_window(&lister, &client, config, today).await?;

    info!(
        bucket = config.bucket.as_str(),
        archives = summary.archives,
        files = summary.files,
        output_dir = %config.output_dir.display(),
        "All operations completed successfully"
    );
    Ok(())
}

async fn run_list(
    credentials_path: &Path,
    config: &ResolvedConfig,
    today: NaiveDate,
) -> AppResult<()> {
    let lister = connect(credentials_path, config).await?;
    write_window_keys(&lister, config, today, &mut io::stdout().lock()).await
}

/// Writes the keys in the month window to `out`, one per line, in listing order.
async fn write_window_keys<L, W>(
    lister: &L,
    config: &ResolvedConfig,
    today: NaiveDate,
    out: &mut W,
) -> AppResult<()>
where
    L: ObjectLister + ?Sized,
    W: Write,
{
    for key in select_window_keys(lister, config, today).await? {
        writeln!(out, "{key}")
            .map_err(|e| AppError::IoError(format!("Failed to write key {key}: {e}")))?;
    }
    out.flush()
        .map_err(|e| AppError::IoError(format!("Failed to flush key list: {e}")))
}
