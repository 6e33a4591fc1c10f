use crate::config::{CensusConfig, ReportFormat};
use crate::frame::{self, CorpusTally};
use crate::producer::{CommandProducer, CommandProducerConfig, CorpusProducer};
use crate::reference::ReferenceCorpus;
use crate::report::DistributionReport;
use anyhow::Context;
use std::io::Write;

/// Name of the scratch corpus file inside the per-run temporary directory.
const SCRATCH_CORPUS_FILENAME: &str = "words.bin";

/// Runs the produce-then-tally stage.
///
/// With a producer configured, the corpus is generated into a scratch
/// directory that is removed when this function returns, whether generation
/// and tallying succeeded or not. With `corpus_path` set instead, the
/// existing file is tallied and left in place.
pub fn collect_tally(config: &CensusConfig) -> anyhow::Result<CorpusTally> {
    match (&config.producer, &config.corpus_path) {
        (Some(settings), _) => {
            let scratch_dir = tempfile::tempdir()
                .context("Failed to create scratch directory for corpus generation")?;
            let corpus_path = scratch_dir.path().join(SCRATCH_CORPUS_FILENAME);

            let mut producer = CommandProducer::new(CommandProducerConfig {
                command: settings.command.clone(),
                timeout: settings.timeout(),
                working_dir: settings.working_dir.clone(),
            });
            producer
                .produce(&corpus_path)
                .context("Corpus generation failed")?;

            let tally = frame::tally_corpus(&corpus_path)?;
            Ok(tally)
        }
        (None, Some(corpus_path)) => Ok(frame::tally_corpus(corpus_path)?),
        (None, None) => {
            anyhow::bail!("No corpus source configured: set a producer command or a corpus path")
        }
    }
}

/// Loads the configured reference list, or the bundled one when none is set.
pub fn resolve_reference(config: &CensusConfig) -> anyhow::Result<ReferenceCorpus> {
    match &config.reference_path {
        Some(path) => Ok(ReferenceCorpus::load(path)?),
        None => Ok(ReferenceCorpus::builtin()),
    }
}

/// Runs the full linear pipeline and writes the report to `out`:
/// produce (optional) → tally → classify → render.
///
/// Truncation of the corpus tail is not fatal; it is reported on stderr and
/// the words counted before it still make it into the report.
pub fn run<W: Write>(config: &CensusConfig, out: &mut W) -> anyhow::Result<()> {
    let reference = resolve_reference(config)?;
    let tally = collect_tally(config)?;

    if let Some(truncation) = tally.truncation {
        eprintln!(
            "Corpus truncated: {} complete words read before the torn frame",
            truncation.words_read
        );
    }

    let report = DistributionReport::build(&tally.table, &reference, config.report.max_render_len);
    match config.report.format {
        ReportFormat::Text => report.write_text(out)?,
        ReportFormat::Json => {
            report.write_json(out)?;
            writeln!(out)?;
        }
    }
    Ok(())
}
