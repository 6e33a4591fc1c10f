use crate::pretty::render_word;
use crate::reference::ReferenceCorpus;
use crate::table::FrequencyTable;
use serde::Serialize;
use std::io::{self, Write};

/// Header printed above the entries found in the reference corpus.
pub const REFERENCE_SECTION_HEADER: &str = "Naughty strings";
/// Header printed above the entries the generator came up with on its own.
pub const NOVEL_SECTION_HEADER: &str = "Our generated strings";

/// One rendered report line, shared by the text and JSON outputs.
/// `word` holds the pretty-printed form, never the raw bytes.
#[derive(Debug, Clone, Serialize, PartialEq, Eq)]
pub struct ReportEntry {
    pub count: u64,
    pub word: String,
}

/// The two-partition distribution report.
///
/// Every distinct word of the tally lands in exactly one partition: `naughty`
/// if the reference corpus contains it, `generated` otherwise. Each partition
/// is ordered by ascending count; equal counts keep the table's first-seen
/// order.
#[derive(Debug, Serialize)]
pub struct DistributionReport {
    pub naughty: Vec<ReportEntry>,
    pub generated: Vec<ReportEntry>,
}

impl DistributionReport {
    /// Partitions `table` against `reference` and sorts both sections.
    pub fn build(
        table: &FrequencyTable,
        reference: &ReferenceCorpus,
        max_render_len: usize,
    ) -> Self {
        let mut naughty = Vec::new();
        let mut generated = Vec::new();
        for (word, count) in table.iter() {
            let entry = ReportEntry {
                count,
                word: render_word(word, max_render_len),
            };
            if reference.contains(word) {
                naughty.push(entry);
            } else {
                generated.push(entry);
            }
        }
        // sort_by_key is stable, so ties keep insertion order.
        naughty.sort_by_key(|entry| entry.count);
        generated.sort_by_key(|entry| entry.count);
        Self { naughty, generated }
    }

    /// Writes the line-oriented text report.
    /// Section order is fixed and empty sections still print their header.
    pub fn write_text<W: Write>(&self, out: &mut W) -> io::Result<()> {
        writeln!(out, "{REFERENCE_SECTION_HEADER}")?;
        for entry in &self.naughty {
            writeln!(out, "{}:{}", entry.count, entry.word)?;
        }
        writeln!(out, "{NOVEL_SECTION_HEADER}")?;
        for entry in &self.generated {
            writeln!(out, "{}:{}", entry.count, entry.word)?;
        }
        Ok(())
    }

    /// Writes the same report as pretty-printed JSON.
    pub fn write_json<W: Write>(&self, out: &mut W) -> serde_json::Result<()> {
        serde_json::to_writer_pretty(out, self)
    }
}
