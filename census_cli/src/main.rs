use census_core::analysis;
use census_core::config::{CensusConfig, ProducerSettings, ReportFormat, default_timeout_ms};

use clap::Parser;
use std::io::Write;
use std::path::PathBuf;

#[derive(Parser, Debug)]
#[clap(author, version, about, long_about = None)]
struct Cli {
    #[clap(short, long, value_parser)]
    config_file: Option<PathBuf>,
    /// Analyze an existing corpus file instead of running the generator
    #[clap(long)]
    corpus: Option<PathBuf>,
    /// Generator executable to run (overrides the configured command)
    #[clap(long)]
    generator: Option<String>,
    /// Reference list of known adversarial strings
    #[clap(long)]
    reference: Option<PathBuf>,
    /// Character bound for each rendered word
    #[clap(long)]
    max_render_len: Option<usize>,
    /// Emit the report as JSON instead of text
    #[clap(long)]
    json: bool,
}

fn main() -> Result<(), anyhow::Error> {
    let cli = Cli::parse();

    // Status lines go to stderr so stdout carries nothing but the report.
    let mut config = match cli.config_file {
        Some(config_path) => {
            eprintln!("Loading configuration from specified path: {config_path:?}");
            CensusConfig::load_from_file(&config_path)?
        }
        None => {
            // No config file specified via CLI, load default
            let default_config_path = PathBuf::from("config.toml");
            if default_config_path.exists() {
                eprintln!(
                    "No config file specified via CLI, loading default: {default_config_path:?}",
                );
                CensusConfig::load_from_file(&default_config_path)?
            } else {
                CensusConfig::default()
            }
        }
    };

    if let Some(generator_cmd) = cli.generator {
        match config.producer.as_mut() {
            Some(settings) if !settings.command.is_empty() => {
                settings.command[0] = generator_cmd;
            }
            _ => {
                config.producer = Some(ProducerSettings {
                    command: vec![generator_cmd],
                    timeout_ms: default_timeout_ms(),
                    working_dir: None,
                });
            }
        }
    }
    if let Some(corpus) = cli.corpus {
        if config.producer.is_some() {
            eprintln!(
                "Warning: --corpus given, skipping the configured generator and reading the file as-is."
            );
            config.producer = None;
        }
        config.corpus_path = Some(corpus);
    }
    if let Some(reference) = cli.reference {
        config.reference_path = Some(reference);
    }
    if let Some(max_render_len) = cli.max_render_len {
        config.report.max_render_len = max_render_len;
    }
    if cli.json {
        config.report.format = ReportFormat::Json;
    }

    let stdout = std::io::stdout();
    let mut out = stdout.lock();
    analysis::run(&config, &mut out)?;
    out.flush()?;

    Ok(())
}
