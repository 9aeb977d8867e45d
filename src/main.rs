//! docbridge - Entry Point
//!
//! Serves the configured working directory over the document protocol.
//!
//! `docbridge set-working-dir <path>` records the directory to serve and exits.

use log::{error, info};
use std::path::Path;
use std::process::ExitCode;

use docbridge::config::{AppConfig, write_working_dir};
use docbridge::error::DocbridgeError;
use docbridge::error::handlers::handle_error;
use docbridge::{DocumentProvider, Server};

#[tokio::main]
async fn main() -> ExitCode {
    // Initialize the logger (env_logger picks up RUST_LOG environment variable)
    env_logger::init();

    match run().await {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            handle_error(&e);
            ExitCode::FAILURE
        }
    }
}

async fn run() -> Result<(), DocbridgeError> {
    let config = AppConfig::load()?;

    let args: Vec<String> = std::env::args().skip(1).collect();
    match args.as_slice() {
        [] => {}
        [cmd, dir] if cmd == "set-working-dir" => {
            write_working_dir(Path::new(&config.provider.working_dir_file), Path::new(dir))?;
            return Ok(());
        }
        _ => {
            error!("usage: docbridge [set-working-dir <path>]");
            return Err(DocbridgeError::IoError(std::io::Error::new(
                std::io::ErrorKind::InvalidInput,
                "unrecognized arguments",
            )));
        }
    }

    info!("Launching document server...");

    let provider = DocumentProvider::from_config(&config.provider);
    let server = Server::bind(config.server, provider).await?;
    server.start().await;
    Ok(())
}
