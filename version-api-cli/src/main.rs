use crate::api::ApiClient;
use ansi_term::Color;
use anyhow::{Context, bail};
use clap::{Args, Parser, Subcommand};
use std::process::exit;
use version_api_models::{
    health::HEALTH_OK,
    version::{UNKNOWN, VersionInfo},
};

mod api;

const VERSION_PATH: &str = "/api/v1/version";
const HEALTH_PATH: &str = "/api/v1/health";

#[derive(Parser)]
#[clap(version)]
struct Cli {
    /// The base URL of the version API.
    #[clap(long, env = "VERSION_API_URL", default_value = "http://localhost:8080")]
    url: String,

    #[clap(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Get the version information.
    Version(VersionArgs),

    /// Check the service health.
    Health,

    /// Check that the service is healthy and reports the expected version information.
    Check(CheckArgs),
}

#[derive(Args)]
struct VersionArgs {
    /// Print the raw JSON response.
    #[clap(long)]
    json: bool,
}

#[derive(Args)]
struct CheckArgs {
    /// The environment the service is expected to be running in.
    #[clap(long)]
    expect_environment: Option<String>,
}

fn version(client: ApiClient, args: VersionArgs) -> anyhow::Result<()> {
    let version_info: VersionInfo = client.get(VERSION_PATH).context("Failed to fetch version")?;
    if args.json {
        println!("{}", serde_json::to_string_pretty(&version_info)?);
    } else {
        display_version(&version_info);
    }
    Ok(())
}

fn health(client: ApiClient) -> anyhow::Result<()> {
    let body = fetch_health(&client)?;
    println!("{}", Color::Green.paint(body));
    Ok(())
}

fn check(client: ApiClient, args: CheckArgs) -> anyhow::Result<()> {
    fetch_health(&client)?;
    println!("health:      {}", Color::Green.paint("ok"));

    let version_info: VersionInfo = client.get(VERSION_PATH).context("Failed to fetch version")?;
    check_environment(&version_info, args.expect_environment.as_deref())?;
    println!("environment: {}", Color::Green.paint(&version_info.environment));
    Ok(())
}

fn fetch_health(client: &ApiClient) -> anyhow::Result<String> {
    let body = client.get_text(HEALTH_PATH).context("Failed to fetch health")?;
    if body != HEALTH_OK {
        bail!("unexpected health response: '{body}'");
    }
    Ok(body)
}

fn check_environment(version_info: &VersionInfo, expected: Option<&str>) -> anyhow::Result<()> {
    match expected {
        Some(expected) if version_info.environment != expected => {
            bail!("expected environment '{expected}' but service reports '{}'", version_info.environment)
        }
        _ => Ok(()),
    }
}

fn display_version(version_info: &VersionInfo) {
    let VersionInfo { version, environment, commit_hash, commit_time, branch, build_time, application_name } =
        version_info;
    println!("Application: {application_name}");
    println!("Version:     {version}");
    println!("Environment: {}", Color::Cyan.paint(environment));
    println!("Commit:      {}", metadata_color(commit_hash).paint(commit_hash));
    println!("Commit time: {}", metadata_color(commit_time).paint(commit_time));
    println!("Branch:      {}", metadata_color(branch).paint(branch));
    println!("Build time:  {build_time}");
}

fn metadata_color(value: &str) -> Color {
    match value {
        UNKNOWN => Color::Yellow,
        _ => Color::Green,
    }
}

fn main() {
    let cli = Cli::parse();
    let client = ApiClient::new(cli.url);
    let result = match cli.command {
        Command::Version(args) => version(client, args),
        Command::Health => health(client),
        Command::Check(args) => check(client, args),
    };
    if let Err(e) = result {
        eprintln!("Failed to run command: {e:#}");
        exit(1);
    }
}
