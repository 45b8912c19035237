//! Speech in, actions out: records (or reads) one utterance, sends it to the
//! session and prints what the model does with it.

mod common;

use std::path::PathBuf;

use clap::Parser;
use diatheke::read_asr_audio;
use diatheke_utils::{AudioConfig, Recorder};

#[derive(Debug, Parser)]
#[command(version, about = "Recognize one utterance in a Diatheke session")]
struct Cli {
    #[command(flatten)]
    server: common::ServerArgs,
    /// Raw audio file in the model's format; records from `--recorder` when absent.
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
    let output = client.create_session(&cli.server.model).await?;
    let token = output
        .token
        .ok_or_else(|| anyhow::anyhow!("server returned no session token"))?;
    let mut session = client.session(token);

    let mut recorder = Recorder::new(AudioConfig::from_command_line(&cli.recorder)?);
    let stream = session.new_asr_stream();
    println!("listening...");
    let result = {
        let audio = common::open_audio(cli.audio.as_deref(), &mut recorder).await?;
        read_asr_audio(&stream, audio, cli.buffer_size).await?
    };
    recorder.stop().await?;

    println!(
        "heard {:?} (confidence {:.2}{})",
        result.text,
        result.confidence,
        if result.timed_out { ", timed out" } else { "" }
    );
    let output = session.process_asr_result(result).await?;
    common::print_actions(&output);

    session.delete().await?;
    Ok(())
}
