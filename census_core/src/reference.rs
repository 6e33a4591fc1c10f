use std::collections::HashSet;
use std::io;
use std::path::{Path, PathBuf};
use thiserror::Error;

/// Adversarial-strings list bundled with the crate, in the same
/// newline-delimited format as an external reference file.
const BUILTIN_NAUGHTY_STRINGS: &str = include_str!("../resources/naughty_strings.txt");

#[derive(Error, Debug)]
pub enum ReferenceError {
    /// The reference file could not be read. Fatal: classification cannot
    /// proceed without the set.
    #[error("Failed to read reference corpus {path:?}: {source}")]
    Read {
        path: PathBuf,
        #[source]
        source: io::Error,
    },
}

/// An immutable set of known adversarial strings.
///
/// Used only for membership checks when partitioning a tally; never mutated
/// after loading and never counted against.
#[derive(Debug, Clone, Default)]
pub struct ReferenceCorpus {
    entries: HashSet<Vec<u8>>,
}

impl ReferenceCorpus {
    /// Loads a newline-delimited reference file in full.
    pub fn load(path: &Path) -> Result<Self, ReferenceError> {
        let raw = std::fs::read(path).map_err(|source| ReferenceError::Read {
            path: path.to_path_buf(),
            source,
        })?;
        Ok(Self::from_bytes(&raw))
    }

    /// Builds the set from raw newline-delimited bytes.
    /// Empty lines and `#` comment lines are skipped.
    pub fn from_bytes(raw: &[u8]) -> Self {
        let entries = raw
            .split(|&byte| byte == b'\n')
            .filter(|line| !line.is_empty() && !line.starts_with(b"#"))
            .map(<[u8]>::to_vec)
            .collect();
        Self { entries }
    }

    /// The list bundled with the crate, for runs with no external file.
    pub fn builtin() -> Self {
        Self::from_bytes(BUILTIN_NAUGHTY_STRINGS.as_bytes())
    }

    pub fn contains(&self, word: &[u8]) -> bool {
        self.entries.contains(word)
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

impl FromIterator<Vec<u8>> for ReferenceCorpus {
    fn from_iter<T: IntoIterator<Item = Vec<u8>>>(iter: T) -> Self {
        Self {
            entries: iter.into_iter().collect(),
        }
    }
}
