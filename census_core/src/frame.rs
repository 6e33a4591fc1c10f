use crate::table::FrequencyTable;
use std::fs::File;
use std::io::{self, BufReader, Read, Write};
use std::path::{Path, PathBuf};
use thiserror::Error;

/// Width of the unsigned little-endian length prefix in front of every frame.
///
/// A corpus file is a plain sequence of `[prefix][payload]` frames with no
/// separators, header, footer, or frame count. This layout is the wire
/// contract with the native word generator and must stay bit-exact.
pub const LENGTH_PREFIX_BYTES: usize = 8;

/// Errors that make a corpus unreadable as a whole.
///
/// A torn trailing frame is not an error: it is absorbed into the tally as a
/// [`Truncation`] diagnostic and the words counted before it remain valid.
#[derive(Error, Debug)]
pub enum FrameError {
    /// The corpus file could not be opened at all. Nothing was counted and
    /// no report can be produced for this run.
    #[error("Failed to open corpus file {path:?}: {source}")]
    Open {
        path: PathBuf,
        #[source]
        source: io::Error,
    },
}

/// Diagnostic attached to a tally whose corpus ended mid-frame.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Truncation {
    /// Complete words counted before the torn frame.
    pub words_read: u64,
}

/// Result of one sequential pass over a corpus.
///
/// The table reflects every frame that was fully present. A torn tail frame
/// only sets `truncation`; it never disturbs counts aggregated before it.
#[derive(Debug, Default)]
pub struct CorpusTally {
    pub table: FrequencyTable,
    /// Total frames counted, duplicates included.
    pub words_read: u64,
    pub truncation: Option<Truncation>,
}

impl CorpusTally {
    /// Returns `true` if the corpus ended cleanly at a frame boundary.
    pub fn is_complete(&self) -> bool {
        self.truncation.is_none()
    }
}

/// Writes `word` as one length-prefixed frame.
pub fn write_frame<W: Write>(writer: &mut W, word: &[u8]) -> io::Result<()> {
    let len = word.len() as u64;
    writer.write_all(&len.to_le_bytes())?;
    writer.write_all(word)
}

enum Prefix {
    /// Zero bytes available at a frame boundary: the clean terminal state.
    Eof,
    Len(u64),
    /// 1..=7 prefix bytes, or a read error mid-prefix.
    Torn,
}

fn read_length_prefix<R: Read>(reader: &mut R) -> Prefix {
    let mut buf = [0u8; LENGTH_PREFIX_BYTES];
    let mut filled = 0;
    while filled < buf.len() {
        match reader.read(&mut buf[filled..]) {
            Ok(0) if filled == 0 => return Prefix::Eof,
            Ok(0) => return Prefix::Torn,
            Ok(n) => filled += n,
            Err(e) if e.kind() == io::ErrorKind::Interrupted => continue,
            Err(_) => return Prefix::Torn,
        }
    }
    Prefix::Len(u64::from_le_bytes(buf))
}

/// Reads a word payload of exactly `len` bytes, or `None` if the stream ends
/// or fails first. Reads through `take` so a garbage length prefix cannot
/// drive a matching up-front allocation.
fn read_payload<R: Read>(reader: &mut R, len: u64) -> Option<Vec<u8>> {
    let mut word = Vec::new();
    match reader.by_ref().take(len).read_to_end(&mut word) {
        Ok(read) if read as u64 == len => Some(word),
        _ => None,
    }
}

/// Tallies every complete frame in the corpus file at `path`.
///
/// Only failure to open the file is fatal. Any read problem after that point
/// is treated as a truncated tail: reading stops, the partial frame is
/// discarded, and the tally carries a [`Truncation`] noting how many complete
/// words were counted first.
pub fn tally_corpus(path: &Path) -> Result<CorpusTally, FrameError> {
    let file = File::open(path).map_err(|source| FrameError::Open {
        path: path.to_path_buf(),
        source,
    })?;
    Ok(tally_frames(BufReader::new(file)))
}

/// Tallies every complete frame `reader` yields. Total over any byte stream.
pub fn tally_frames<R: Read>(mut reader: R) -> CorpusTally {
    let mut tally = CorpusTally::default();
    loop {
        let len = match read_length_prefix(&mut reader) {
            Prefix::Eof => return tally,
            Prefix::Torn => break,
            Prefix::Len(len) => len,
        };
        let Some(word) = read_payload(&mut reader, len) else {
            break;
        };
        tally.table.increment(&word);
        tally.words_read += 1;
    }
    tally.truncation = Some(Truncation {
        words_read: tally.words_read,
    });
    tally
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Cursor;
    use tempfile::tempdir;

    fn frames(words: &[&[u8]]) -> Vec<u8> {
        let mut buf = Vec::new();
        for word in words {
            write_frame(&mut buf, word).unwrap();
        }
        buf
    }

    #[test]
    fn round_trip_counts_every_occurrence() {
        let corpus = frames(&[b"cat", b"cat", b"dog", b"", b"cat"]);
        let tally = tally_frames(Cursor::new(corpus));

        assert!(tally.is_complete());
        assert_eq!(tally.words_read, 5);
        assert_eq!(tally.table.count(b"cat"), 3);
        assert_eq!(tally.table.count(b"dog"), 1);
        assert_eq!(tally.table.count(b""), 1);
        assert_eq!(tally.table.len(), 3);
    }

    #[test]
    fn empty_corpus_is_a_clean_end() {
        let tally = tally_frames(Cursor::new(Vec::new()));
        assert!(tally.is_complete());
        assert!(tally.table.is_empty());
        assert_eq!(tally.words_read, 0);
    }

    #[test]
    fn arbitrary_binary_words_survive_the_round_trip() {
        let word: Vec<u8> = (0..=255).collect();
        let corpus = frames(&[&word, &word]);
        let tally = tally_frames(Cursor::new(corpus));
        assert!(tally.is_complete());
        assert_eq!(tally.table.count(&word), 2);
    }

    #[test]
    fn stray_trailing_bytes_do_not_disturb_prior_counts() {
        // 1..=7 stray bytes can never form a full length prefix.
        for stray_len in 1..LENGTH_PREFIX_BYTES {
            let mut corpus = frames(&[b"cat", b"dog"]);
            corpus.extend(std::iter::repeat_n(0xAB, stray_len));

            let tally = tally_frames(Cursor::new(corpus));
            assert_eq!(tally.truncation, Some(Truncation { words_read: 2 }));
            assert_eq!(tally.words_read, 2);
            assert_eq!(tally.table.count(b"cat"), 1);
            assert_eq!(tally.table.count(b"dog"), 1);
            assert_eq!(tally.table.len(), 2);
        }
    }

    #[test]
    fn dangling_length_prefix_is_a_truncation() {
        let mut corpus = frames(&[b"x"]);
        corpus.extend(7u64.to_le_bytes());

        let tally = tally_frames(Cursor::new(corpus));
        assert_eq!(tally.truncation, Some(Truncation { words_read: 1 }));
        assert_eq!(tally.table.count(b"x"), 1);
    }

    #[test]
    fn short_payload_is_a_truncation() {
        let mut corpus = frames(&[b"cat"]);
        corpus.extend(10u64.to_le_bytes());
        corpus.extend(b"abc");

        let tally = tally_frames(Cursor::new(corpus));
        assert_eq!(tally.truncation, Some(Truncation { words_read: 1 }));
        assert_eq!(tally.table.count(b"cat"), 1);
        assert_eq!(tally.table.count(b"abc"), 0);
    }

    #[test]
    fn truncation_before_the_first_frame_yields_an_empty_table() {
        let tally = tally_frames(Cursor::new(vec![0x01, 0x02, 0x03]));
        assert_eq!(tally.truncation, Some(Truncation { words_read: 0 }));
        assert!(tally.table.is_empty());
    }

    #[test]
    fn oversized_length_prefix_does_not_allocate_or_panic() {
        let mut corpus = frames(&[b"ok"]);
        corpus.extend(u64::MAX.to_le_bytes());
        corpus.extend(b"tail");

        let tally = tally_frames(Cursor::new(corpus));
        assert_eq!(tally.truncation, Some(Truncation { words_read: 1 }));
        assert_eq!(tally.table.count(b"ok"), 1);
    }

    #[test]
    fn tally_corpus_reads_from_disk() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("words.bin");
        std::fs::write(&path, frames(&[b"cat", b"cat", b"dog"])).unwrap();

        let tally = tally_corpus(&path).unwrap();
        assert!(tally.is_complete());
        assert_eq!(tally.table.count(b"cat"), 2);
        assert_eq!(tally.table.count(b"dog"), 1);
        dir.close().unwrap();
    }

    #[test]
    fn missing_corpus_file_is_fatal() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("no_such_corpus.bin");

        let result = tally_corpus(&path);
        match result {
            Err(FrameError::Open { path: ref p, .. }) => assert_eq!(*p, path),
            other => panic!("Expected FrameError::Open, got {other:?}"),
        }
        dir.close().unwrap();
    }
}
