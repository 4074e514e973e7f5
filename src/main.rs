use anyhow::Context;
use apolo_e2e::cli::table::{parse_box_table, parse_fixed_width, parse_key_value};
use apolo_e2e::error::ensure_eq;
use apolo_e2e::{E2eConfig, TestSession};
use clap::{Parser, Subcommand, ValueEnum};
use std::io::Read;
use std::path::PathBuf;

#[derive(Parser, Debug)]
#[command(author, version, about, long_about = None)]
struct Args {
    /// YAML configuration file; APOLO_E2E_* variables override it
    #[arg(short, long, env = "APOLO_E2E_CONFIG", global = true)]
    config: Option<PathBuf>,

    /// Console URL, overrides the configuration
    #[arg(long, global = true)]
    base_url: Option<String>,

    /// Show the browser window
    #[arg(long, global = true)]
    headed: bool,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Log in with the configured account and check the console loads
    Smoke {
        /// Also check that `config show` reports the same user
        #[arg(long)]
        with_cli: bool,
    },
    /// Parse CLI output from stdin and print the rows as JSON
    ParseTable {
        #[arg(short, long, value_enum, default_value_t = TableFormat::Box)]
        format: TableFormat,

        /// Column (or key) names to extract, comma separated
        #[arg(long, value_delimiter = ',', required = true)]
        columns: Vec<String>,
    },
    /// Print the effective configuration (password redacted)
    ShowConfig,
}

#[derive(Clone, Copy, Debug, ValueEnum)]
enum TableFormat {
    Box,
    Fixed,
    Kv,
}

fn load_config(args: &Args) -> anyhow::Result<E2eConfig> {
    let mut config = match &args.config {
        Some(path) => E2eConfig::from_yaml_file(path)?
            .with_env_overrides(|key| std::env::var(key).ok())?,
        None => E2eConfig::default().with_env_overrides(|key| std::env::var(key).ok())?,
    };
    if let Some(url) = &args.base_url {
        config.base_url = url.clone();
    }
    if args.headed {
        config.headless = false;
    }
    config.validate()?;
    Ok(config)
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    env_logger::init();
    let args = Args::parse();

    match &args.command {
        Command::Smoke { with_cli } => {
            let config = load_config(&args)?;
            smoke(config, *with_cli).await
        }
        Command::ParseTable { format, columns } => {
            let mut input = String::new();
            std::io::stdin()
                .read_to_string(&mut input)
                .context("Failed to read stdin")?;
            let columns: Vec<&str> = columns.iter().map(String::as_str).collect();
            let json = match format {
                TableFormat::Box => {
                    serde_json::to_string_pretty(&parse_box_table(&input, &columns)?)?
                }
                TableFormat::Fixed => {
                    serde_json::to_string_pretty(&parse_fixed_width(&input, &columns)?)?
                }
                TableFormat::Kv => {
                    serde_json::to_string_pretty(&parse_key_value(&input, &columns))?
                }
            };
            println!("{}", json);
            Ok(())
        }
        Command::ShowConfig => {
            let config = load_config(&args)?;
            print!("{}", serde_yaml::to_string(&config)?);
            Ok(())
        }
    }
}

async fn smoke(config: E2eConfig, with_cli: bool) -> anyhow::Result<()> {
    log::info!("Running smoke scenario against {}", config.base_url);
    let session = TestSession::start(config).await?;
    let user = session.configured_user()?;
    let org = session.config.organization.clone();

    let result = session
        .run_scenario("login smoke", |s| async move {
            s.steps.auth.ui_open_console().await?;
            s.steps.auth.ui_log_in(&user).await?;
            s.steps.auth.ui_verify_logged_in().await?;
            if let Some(org) = &org {
                s.steps.organization.ui_verify_current_organization(org).await?;
            }
            if with_cli {
                let shown = s.cli.config.show().await?;
                ensure_eq("CLI user", user.username.as_str(), shown.user.as_str())?;
            }
            Ok(())
        })
        .await;

    session.close().await?;
    result?;
    println!("smoke: ok");
    Ok(())
}
