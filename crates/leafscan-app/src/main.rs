//! LeafScan command-line client.

use std::path::{Path, PathBuf};
use std::process::ExitCode;
use std::time::Duration;

use anyhow::Context;
use clap::{Parser, Subcommand, ValueEnum};
use serde::Serialize;
use tracing::{error, info};

use leafscan_app::acquisition::{capture, CaptureSource, DesktopPermissions, FsPicker};
use leafscan_app::presenter::render_text;
use leafscan_app::telemetry::init_tracing;
use leafscan_app::{accept_file_from_path, AppConfig, Effect, ResultView, Session};
use leafscan_client::{BaseUrlProfile, PredictionClient};
use leafscan_models::DiseaseClass;

#[derive(Parser)]
#[command(name = "leafscan")]
#[command(about = "Potato leaf disease classification client", version)]
struct Cli {
    #[command(flatten)]
    global: GlobalArgs,

    #[command(subcommand)]
    command: Commands,
}

#[derive(clap::Args, Debug, Clone)]
struct GlobalArgs {
    /// Base URL of the classification service (overrides LEAFSCAN_API_URL)
    #[arg(long, global = true)]
    base_url: Option<String>,

    /// Deployment profile: local, android-emulator, ios-simulator or lan:<host>
    #[arg(long, global = true, conflicts_with = "base_url")]
    profile: Option<BaseUrlProfile>,

    /// Prediction timeout in seconds
    #[arg(long, global = true)]
    timeout: Option<u64>,

    /// Print machine-readable JSON
    #[arg(long, global = true)]
    json: bool,
}

#[derive(Subcommand)]
enum Commands {
    /// Check whether the classification service is running
    Ping,

    /// Classify one or more leaf images
    Predict {
        #[arg(value_name = "IMAGES", required = true)]
        files: Vec<PathBuf>,

        /// How the image is handed to the client
        #[arg(long, value_enum, default_value = "file")]
        source: SourceArg,
    },

    /// List the disease classes the client knows how to describe
    Classes,
}

#[derive(Debug, Clone, Copy, ValueEnum)]
enum SourceArg {
    /// Upload path, checked like a browser file input
    File,
    /// Gallery pick, gated on permissions like the mobile app
    Library,
}

/// One line of `predict` output.
#[derive(Debug, Serialize)]
struct PredictReport {
    file: String,
    status: &'static str,
    #[serde(skip_serializing_if = "Option::is_none")]
    result: Option<ResultView>,
    #[serde(skip_serializing_if = "Option::is_none")]
    error: Option<String>,
}

#[tokio::main]
async fn main() -> ExitCode {
    // Load environment variables
    dotenvy::dotenv().ok();

    let cli = Cli::parse();
    let config = AppConfig::from_env();
    init_tracing(config.log_format);

    match run(cli, config).await {
        Ok(code) => code,
        Err(e) => {
            error!("{:#}", e);
            ExitCode::FAILURE
        }
    }
}

async fn run(cli: Cli, mut config: AppConfig) -> anyhow::Result<ExitCode> {
    if let Some(base_url) = &cli.global.base_url {
        config.client = config.client.with_base_url(base_url.clone());
    } else if let Some(profile) = &cli.global.profile {
        config.client = config.client.with_base_url(profile.base_url());
    }
    if let Some(secs) = cli.global.timeout {
        config.client = config
            .client
            .with_predict_timeout(Duration::from_secs(secs));
    }

    match cli.command {
        Commands::Classes => {
            print_classes(cli.global.json)?;
            Ok(ExitCode::SUCCESS)
        }
        Commands::Ping => {
            let client = PredictionClient::new(config.client)
                .context("Invalid client configuration")?;
            let base_url = client.config().base_url.clone();
            let up = client.ping().await;
            if cli.global.json {
                println!("{}", serde_json::json!({ "base_url": base_url, "up": up }));
            } else if up {
                println!("API is running at {}", base_url);
            } else {
                println!("API is not reachable at {}", base_url);
            }
            Ok(if up { ExitCode::SUCCESS } else { ExitCode::FAILURE })
        }
        Commands::Predict { files, source } => {
            let client = PredictionClient::new(config.client)
                .context("Invalid client configuration")?;
            info!("Using classification service at {}", client.config().base_url);

            let mut failures = 0usize;
            for file in files {
                let report = predict_one(&client, &file, source).await;
                if report.status != "ok" {
                    failures += 1;
                }
                print_report(&report, cli.global.json)?;
            }

            Ok(if failures == 0 {
                ExitCode::SUCCESS
            } else {
                ExitCode::FAILURE
            })
        }
    }
}

async fn predict_one(client: &PredictionClient, path: &Path, source: SourceArg) -> PredictReport {
    let file = path.display().to_string();
    let mut session = Session::new(client.clone());

    let acquisition = match source {
        SourceArg::File => accept_file_from_path(path).await,
        SourceArg::Library => {
            capture(&DesktopPermissions, &FsPicker::new(path), CaptureSource::Library).await
        }
    };

    if let Effect::ShowAlert(alert) = session.select(acquisition) {
        return PredictReport {
            file,
            status: "rejected",
            result: None,
            error: Some(alert.message),
        };
    }

    match session.submit().await {
        Effect::ShowAlert(alert) => PredictReport {
            file,
            status: "error",
            result: None,
            error: Some(alert.message),
        },
        _ => match session.result_view() {
            Some(view) => PredictReport {
                file,
                status: "ok",
                result: Some(view),
                error: None,
            },
            None => PredictReport {
                file,
                status: "error",
                result: None,
                error: Some("No prediction was made".to_string()),
            },
        },
    }
}

fn print_report(report: &PredictReport, json: bool) -> anyhow::Result<()> {
    if json {
        println!("{}", serde_json::to_string(report)?);
        return Ok(());
    }

    println!("{}", report.file);
    match (&report.result, &report.error) {
        (Some(view), _) => println!("{}", render_text(view)),
        (None, Some(message)) => println!("  {}: {}", report.status, message),
        (None, None) => println!("  {}", report.status),
    }
    Ok(())
}

fn print_classes(json: bool) -> anyhow::Result<()> {
    if json {
        let table: Vec<_> = DiseaseClass::KNOWN
            .iter()
            .map(|class| serde_json::json!({ "label": class.as_label(), "info": class.info() }))
            .collect();
        println!("{}", serde_json::to_string_pretty(&table)?);
        return Ok(());
    }

    for class in DiseaseClass::KNOWN {
        let info = class.info();
        println!("{:<24} {:<12} {}", class.as_label(), info.name, info.color);
        println!("    {}", info.description);
        println!("    {}", info.recommendation);
    }
    Ok(())
}
