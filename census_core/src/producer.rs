use std::io;
use std::path::{Path, PathBuf};
use std::process::{Child, Command, ExitStatus, Stdio};
use std::time::{Duration, Instant};
use thiserror::Error;

#[derive(Error, Debug)]
pub enum ProducerError {
    #[error("Generator command is empty")]
    EmptyCommand,

    #[error("Failed to spawn generator command {command:?}: {source}")]
    Spawn {
        command: Vec<String>,
        #[source]
        source: io::Error,
    },

    /// The generator ran but signalled failure. The corpus file is not
    /// trusted and the analysis stage is not entered.
    #[error("Generator failed: {description}")]
    Failed { description: String },

    #[error("Generator timed out after {timeout:?} and was killed")]
    Timeout { timeout: Duration },

    #[error("Error waiting for generator: {0}")]
    Wait(#[source] io::Error),
}

/// A step that populates a corpus file before analysis begins.
///
/// The analyzer treats production as opaque: it blocks until the producer
/// reports success, and refuses to read the corpus on any failure.
pub trait CorpusProducer {
    fn produce(&mut self, corpus_path: &Path) -> Result<(), ProducerError>;
}

pub struct CommandProducerConfig {
    /// Program and arguments. Every `{}` occurrence is replaced with the
    /// corpus output path; without a placeholder the path is appended as a
    /// final argument.
    pub command: Vec<String>,
    pub timeout: Duration,
    pub working_dir: Option<PathBuf>,
}

/// Runs an external generator process to completion.
pub struct CommandProducer {
    config: CommandProducerConfig,
}

impl CommandProducer {
    pub fn new(config: CommandProducerConfig) -> Self {
        Self { config }
    }

    fn wait_with_timeout(&self, mut child: Child) -> Result<ExitStatus, ProducerError> {
        let start_time = Instant::now();
        loop {
            match child.try_wait() {
                Ok(Some(status)) => return Ok(status),
                Ok(None) => {
                    if start_time.elapsed() > self.config.timeout {
                        eprintln!("Generator timed out, killing...");
                        let _ = child.kill();
                        let _ = child.wait();
                        return Err(ProducerError::Timeout {
                            timeout: self.config.timeout,
                        });
                    }
                    std::thread::sleep(Duration::from_millis(50));
                }
                Err(e) => return Err(ProducerError::Wait(e)),
            }
        }
    }
}

impl CorpusProducer for CommandProducer {
    fn produce(&mut self, corpus_path: &Path) -> Result<(), ProducerError> {
        if self.config.command.is_empty() {
            return Err(ProducerError::EmptyCommand);
        }

        let path_str = corpus_path.to_string_lossy();
        let mut argv: Vec<String> = self
            .config
            .command
            .iter()
            .map(|arg| arg.replace("{}", &path_str))
            .collect();
        if !self.config.command.iter().any(|arg| arg.contains("{}")) {
            argv.push(path_str.into_owned());
        }

        let mut cmd = Command::new(&argv[0]);
        cmd.args(&argv[1..]);
        if let Some(cwd) = &self.config.working_dir {
            cmd.current_dir(cwd);
        }
        cmd.stdin(Stdio::null());

        let child = cmd.spawn().map_err(|source| ProducerError::Spawn {
            command: argv.clone(),
            source,
        })?;
        let status = self.wait_with_timeout(child)?;

        if status.success() {
            Ok(())
        } else {
            Err(ProducerError::Failed {
                description: describe_exit(&status),
            })
        }
    }
}

fn describe_exit(status: &ExitStatus) -> String {
    if let Some(code) = status.code() {
        return format!("Exited with code {code}");
    }
    #[cfg(unix)]
    {
        use std::os::unix::process::ExitStatusExt;
        if let Some(signal) = status.signal() {
            return format!("Terminated by signal {signal}");
        }
    }
    "Exited abnormally".to_string()
}
