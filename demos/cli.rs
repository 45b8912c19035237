//! Text-only conversation: type what you would say, read the replies.

mod common;

use std::collections::VecDeque;
use std::io::Write;

use clap::Parser;
use diatheke::types::Action;
use tokio::io::{AsyncBufReadExt, BufReader};

#[derive(Debug, Parser)]
#[command(version, about = "Talk to a Diatheke model by typing")]
struct Cli {
    #[command(flatten)]
    server: common::ServerArgs,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    common::init_logging();
    let cli = Cli::parse();

    let client = cli.server.connect().await?;
    for model in client.list_models().await? {
        println!("model {} ({}, {})", model.id, model.name, model.language);
    }

    let output = client.create_session(&cli.server.model).await?;
    let token = output
        .token
        .clone()
        .ok_or_else(|| anyhow::anyhow!("server returned no session token"))?;
    let mut session = client.session(token);
    let mut lines = BufReader::new(tokio::io::stdin()).lines();
    println!("type 'quit' to exit");

    let mut pending: VecDeque<Action> = output.actions().cloned().collect();
    while let Some(action) = pending.pop_front() {
        match action {
            Action::Reply(reply) => println!("  {}", reply.text),
            Action::Command(command) => {
                let result = common::run_command(&command);
                let update = session.process_command_result(result).await?;
                pending.extend(update.actions().cloned());
            }
            Action::Transcribe(transcribe) => {
                println!("  (transcription {} is not available in text mode)", transcribe.id);
            }
            Action::Input(_) => {
                print!("> ");
                std::io::stdout().flush()?;
                let Some(line) = lines.next_line().await? else {
                    break;
                };
                if line.trim() == "quit" {
                    break;
                }
                let update = session.process_text(&line).await?;
                pending.extend(update.actions().cloned());
            }
        }
    }

    session.delete().await?;
    Ok(())
}
