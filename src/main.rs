use std::process::ExitCode;

use chrono::Local;
use clap::Parser;
use hdfs_retention_lib::cli::{render_report, Cli};
use hdfs_retention_lib::{HdfsClient, RetentionEngine};

#[tokio::main(flavor = "current_thread")]
async fn main() -> ExitCode {
    let cli = Cli::parse();
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or(cli.log_filter()))
        .init();

    let json = cli.json;
    let config = cli.into_config(Local::now().date_naive());
    let engine = RetentionEngine::new(HdfsClient::from_env());

    let report = match engine.run(&config).await {
        Ok(report) => report,
        Err(err) => {
            log::error!("{}", err);
            eprintln!("Error: {err}");
            return ExitCode::FAILURE;
        }
    };

    if json {
        match serde_json::to_string_pretty(&report) {
            Ok(text) => println!("{text}"),
            Err(err) => {
                eprintln!("Error: failed to serialize report: {err}");
                return ExitCode::FAILURE;
            }
        }
    } else {
        for line in render_report(&report, &config.mode) {
            println!("{line}");
        }
    }

    // per-item failures are itemized above and don't change the exit status
    ExitCode::SUCCESS
}
