pub mod analysis;
pub mod config;
pub mod frame;
pub mod pretty;
pub mod producer;
pub mod reference;
pub mod report;
pub mod table;

pub use config::{CensusConfig, ProducerSettings, ReportFormat, ReportSettings};
pub use frame::{CorpusTally, FrameError, Truncation, tally_corpus, tally_frames, write_frame};
pub use pretty::{DEFAULT_MAX_RENDER_LEN, render_word};
pub use producer::{CommandProducer, CommandProducerConfig, CorpusProducer, ProducerError};
pub use reference::{ReferenceCorpus, ReferenceError};
pub use report::{DistributionReport, ReportEntry};
pub use table::FrequencyTable;
