mod availability;
mod config;
mod data;
mod error;
mod export;
mod loader;
mod pairs;
mod pipeline;
mod rotation;
mod server;
mod solver;
mod validator;

use log::error;
use std::process::ExitCode;

use crate::config::AppConfig;

#[tokio::main]
async fn main() -> ExitCode {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    let config = match AppConfig::from_env() {
        Ok(config) => config,
        Err(e) => {
            error!("{e}");
            return ExitCode::FAILURE;
        }
    };

    match std::env::args().nth(1).as_deref() {
        None | Some("serve") => match server::run_server(&config.bind_addr).await {
            Ok(()) => ExitCode::SUCCESS,
            Err(e) => {
                error!("{e}");
                ExitCode::FAILURE
            }
        },
        Some("generate") => match pipeline::run_batch(&config) {
            Ok(Some(path)) => {
                println!("{}", path.display());
                ExitCode::SUCCESS
            }
            Ok(None) => ExitCode::FAILURE,
            Err(e) => {
                error!("{e}");
                ExitCode::FAILURE
            }
        },
        Some(other) => {
            eprintln!("unknown command '{other}', expected 'serve' or 'generate'");
            ExitCode::FAILURE
        }
    }
}
