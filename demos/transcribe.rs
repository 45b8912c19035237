//! Streams audio to a transcribe action and prints results as they arrive.

mod common;

use std::path::PathBuf;

use clap::Parser;
use diatheke::read_transcribe_audio;
use diatheke::types::TranscribeAction;
use diatheke_utils::{AudioConfig, Recorder};

#[derive(Debug, Parser)]
#[command(version, about = "Transcribe audio through Diatheke")]
struct Cli {
    #[command(flatten)]
    server: common::ServerArgs,
    /// Cubic model used for the transcription.
    #[arg(long)]
    cubic_model: String,
    #[arg(long)]
    audio: Option<PathBuf>,
    #[arg(long, default_value = "sox -q -d -c 1 -b 16 -e signed -r 16000 -t raw -")]
    recorder: String,
    #[arg(long, default_value_t = 8192)]
    buffer_size: usize,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    common::init_logging();
    let cli = Cli::parse();

    let client = cli.server.connect().await?;
    let action = TranscribeAction {
        id: "demo".to_string(),
        cubic_model_id: cli.cubic_model.clone(),
        diatheke_model_id: cli.server.model.clone(),
    };
    let stream = client.new_transcribe_stream(action);

    let mut recorder = Recorder::new(AudioConfig::from_command_line(&cli.recorder)?);
    {
        let audio = common::open_audio(cli.audio.as_deref(), &mut recorder).await?;
        read_transcribe_audio(&stream, audio, cli.buffer_size, |result| {
            if result.is_partial {
                tracing::debug!("partial: {}", result.text);
            } else {
                println!("{} ({:.2})", result.text, result.confidence);
            }
        })
        .await?;
    }
    recorder.stop().await?;
    Ok(())
}
