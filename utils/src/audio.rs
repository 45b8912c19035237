use std::process::Stdio;

use anyhow::{anyhow, bail};
use tokio::io::{AsyncReadExt, AsyncWriteExt};
use tokio::process::{Child, ChildStdin, ChildStdout, Command};

/// External application plus its arguments, given as one whitespace
/// separated string.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct AudioConfig {
    pub application: String,
    pub args: String,
}

impl AudioConfig {
    pub fn new(application: &str, args: &str) -> Self {
        Self {
            application: application.to_string(),
            args: args.to_string(),
        }
    }

    /// Splits a full command line such as `sox -q -d -c 1 -t raw -`.
    pub fn from_command_line(line: &str) -> anyhow::Result<Self> {
        let mut parts = line.split_whitespace();
        let application = parts
            .next()
            .ok_or_else(|| anyhow!("audio command line is empty"))?;
        Ok(Self {
            application: application.to_string(),
            args: parts.collect::<Vec<_>>().join(" "),
        })
    }

    pub fn arg_list(&self) -> Vec<String> {
        self.args.split_whitespace().map(str::to_string).collect()
    }

    fn command(&self) -> anyhow::Result<Command> {
        if self.application.trim().is_empty() {
            bail!("no audio application configured");
        }
        let mut command = Command::new(&self.application);
        command.args(self.arg_list()).kill_on_drop(true);
        Ok(command)
    }
}

/// Runs a recording application and reads raw audio from its stdout.
pub struct Recorder {
    config: AudioConfig,
    child: Option<Child>,
    stdout: Option<ChildStdout>,
}

impl Recorder {
    pub fn new(config: AudioConfig) -> Self {
        Self {
            config,
            child: None,
            stdout: None,
        }
    }

    /// Starts the application. Does nothing if it is already running.
    pub fn start(&mut self) -> anyhow::Result<()> {
        if self.child.is_some() {
            return Ok(());
        }
        let mut child = self
            .config
            .command()?
            .stdin(Stdio::null())
            .stdout(Stdio::piped())
            .spawn()?;
        self.stdout = child.stdout.take();
        self.child = Some(child);
        tracing::debug!("recorder started: {}", self.config.application);
        Ok(())
    }

    /// Reads the next chunk of audio. `Ok(0)` means the recorder exited.
    pub async fn read(&mut self, buf: &mut [u8]) -> anyhow::Result<usize> {
        let stdout = self
            .stdout
            .as_mut()
            .ok_or_else(|| anyhow!("recorder is not running"))?;
        Ok(stdout.read(buf).await?)
    }

    /// The raw audio output, for use with an async reader loop.
    pub fn output(&mut self) -> Option<&mut ChildStdout> {
        self.stdout.as_mut()
    }

    pub fn is_running(&self) -> bool {
        self.child.is_some()
    }

    /// Kills the application. Does nothing if it is not running.
    pub async fn stop(&mut self) -> anyhow::Result<()> {
        self.stdout = None;
        let Some(mut child) = self.child.take() else {
            return Ok(());
        };
        if child.try_wait()?.is_none() {
            child.kill().await?;
        }
        tracing::debug!("recorder stopped");
        Ok(())
    }
}

/// Runs a playback application and writes raw audio to its stdin.
pub struct Player {
    config: AudioConfig,
    child: Option<Child>,
    stdin: Option<ChildStdin>,
}

impl Player {
    pub fn new(config: AudioConfig) -> Self {
        Self {
            config,
            child: None,
            stdin: None,
        }
    }

    /// Starts the application. Does nothing if it is already running.
    pub fn start(&mut self) -> anyhow::Result<()> {
        if self.child.is_some() {
            return Ok(());
        }
        let mut child = self
            .config
            .command()?
            .stdin(Stdio::piped())
            .stdout(Stdio::null())
            .spawn()?;
        self.stdin = child.stdin.take();
        self.child = Some(child);
        tracing::debug!("player started: {}", self.config.application);
        Ok(())
    }

    pub async fn push_audio(&mut self, audio: &[u8]) -> anyhow::Result<()> {
        let stdin = self
            .stdin
            .as_mut()
            .ok_or_else(|| anyhow!("player is not running"))?;
        stdin.write_all(audio).await?;
        Ok(())
    }

    /// The raw audio input, for use with an async writer loop.
    pub fn input(&mut self) -> Option<&mut ChildStdin> {
        self.stdin.as_mut()
    }

    pub fn is_running(&self) -> bool {
        self.child.is_some()
    }

    /// Closes the audio input and waits for the application to finish
    /// playing what it was given. Does nothing if it is not running.
    pub async fn stop(&mut self) -> anyhow::Result<()> {
        if let Some(mut stdin) = self.stdin.take() {
            stdin.flush().await?;
        }
        let Some(mut child) = self.child.take() else {
            return Ok(());
        };
        let status = child.wait().await?;
        if !status.success() {
            tracing::warn!("player exited with {}", status);
        }
        Ok(())
    }
}
