mod common;

use std::path::PathBuf;

use clap::Parser;
use diatheke::types::Action;
use diatheke::write_tts_audio;
use diatheke_utils::{AudioConfig, Player};

#[derive(Debug, Parser)]
#[command(version, about = "Play the model's spoken replies to a line of text")]
struct Cli {
    #[command(flatten)]
    server: common::ServerArgs,
    #[arg(long)]
    text: String,
    /// Write the raw audio here instead of playing it.
    #[arg(long)]
    output: Option<PathBuf>,
    #[arg(long, default_value = "sox -q -c 1 -b 16 -e signed -r 22050 -t raw - -d")]
    player: String,
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

    let output = session.process_text(&cli.text).await?;
    for action in output.actions() {
        let Action::Reply(reply) = action else {
            continue;
        };
        println!("  {}", reply.text);
        let mut audio = session.new_tts_stream(reply.clone()).await?;
        match &cli.output {
            Some(path) => {
                let file = tokio::fs::OpenOptions::new()
                    .create(true)
                    .append(true)
                    .open(path)
                    .await?;
                write_tts_audio(&mut audio, file).await?;
            }
            None => {
                let mut player = Player::new(AudioConfig::from_command_line(&cli.player)?);
                player.start()?;
                while let Some(chunk) = audio.receive_audio().await? {
                    player.push_audio(&chunk).await?;
                }
                player.stop().await?;
            }
        }
    }

    session.delete().await?;
    Ok(())
}
