#![allow(dead_code)]

use std::path::{Path, PathBuf};
use std::time::Duration;

use clap::Args;
use diatheke::types::{Action, CommandAction, CommandResult, SessionOutput};
use diatheke::{Client, Config};
use diatheke_utils::Recorder;
use tokio::io::AsyncRead;
use tracing_subscriber::fmt::time::ChronoLocal;
use tracing_subscriber::EnvFilter;

/// Connection flags shared by the demos. `DIATHEKE_SERVER_ADDRESS` from the
/// environment (or `.env`) is used when `--server` is not given.
#[derive(Debug, Args)]
pub struct ServerArgs {
    #[arg(long)]
    pub server: Option<String>,
    /// Connect without TLS.
    #[arg(long)]
    pub insecure: bool,
    /// PEM root certificate for a self-signed server.
    #[arg(long)]
    pub server_cert: Option<PathBuf>,
    #[arg(long, requires = "client_key")]
    pub client_cert: Option<PathBuf>,
    #[arg(long, requires = "client_cert")]
    pub client_key: Option<PathBuf>,
    #[arg(long, default_value_t = 30)]
    pub timeout_secs: u64,
    /// Diatheke model id.
    #[arg(long, default_value = "1")]
    pub model: String,
}

impl ServerArgs {
    pub async fn connect(&self) -> anyhow::Result<Client> {
        let mut builder = Config::builder()
            .with_insecure(self.insecure)
            .with_request_timeout(Duration::from_secs(self.timeout_secs));
        if let Some(server) = &self.server {
            builder = builder.with_server_address(server);
        }
        if let Some(path) = &self.server_cert {
            builder = builder.with_server_certificate(&std::fs::read(path)?);
        }
        if let (Some(cert), Some(key)) = (&self.client_cert, &self.client_key) {
            builder = builder
                .with_client_certificate(&std::fs::read(cert)?)
                .with_client_key(&std::fs::read(key)?);
        }
        let config = builder.build()?;
        let address = config.server_address().to_string();
        let client = Client::connect(config).await?;

        let version = client.version().await?;
        println!(
            "connected to {address} (diatheke {}, chosun {}, cubic {}, luna {})",
            version.diatheke, version.chosun, version.cubic, version.luna
        );
        Ok(client)
    }
}

pub fn init_logging() {
    dotenvy::dotenv_override().ok();
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .with_timer(ChronoLocal::rfc_3339())
        .init();
}

/// Pretends to run a command and reports success with no output parameters.
pub fn run_command(command: &CommandAction) -> CommandResult {
    println!("  command {} with {:?}", command.id, command.input_parameters);
    CommandResult::new(&command.id)
}

pub fn print_actions(output: &SessionOutput) {
    for action in output.actions() {
        match action {
            Action::Input(wait) => tracing::debug!("waiting for input: {:?}", wait),
            Action::Reply(reply) => println!("  reply: {}", reply.text),
            Action::Command(command) => tracing::debug!("command: {}", command.id),
            Action::Transcribe(transcribe) => tracing::debug!("transcribe: {}", transcribe.id),
        }
    }
}

/// Opens the audio source: a raw audio file if given, else the recorder.
pub async fn open_audio<'a>(
    file: Option<&Path>,
    recorder: &'a mut Recorder,
) -> anyhow::Result<Box<dyn AsyncRead + Unpin + Send + 'a>> {
    if let Some(path) = file {
        return Ok(Box::new(tokio::fs::File::open(path).await?));
    }
    recorder.start()?;
    let output = recorder
        .output()
        .ok_or_else(|| anyhow::anyhow!("recorder has no output"))?;
    Ok(Box::new(output))
}
