//! Binary persistence for the inverted index
//!
//! Layout (all integers little-endian):
//!
//! ```text
//! magic      4 bytes  "LIDX"
//! version    u32      currently 1
//! phase      u8       0 = Ingesting, 1 = Finalized
//! doc_count  u64
//! doc_lengths: count u64, then (doc_id u64, length u64) entries
//! df:          count u64, then (term_len u32, term bytes, count u64) entries
//! postings:    count u64, then per term:
//!              term_len u32, term bytes, entry_count u64,
//!              (doc_id u64, score f64 bits) entries
//! trailer    32 bytes  SHA-256 over all preceding bytes
//! ```
//!
//! Maps are written in sorted order, so saving the same index twice
//! produces identical bytes. Load verifies the magic, version, and
//! checksum before constructing anything; a corrupt file never touches
//! existing in-memory state.

use crate::index::inverted::{DocId, IndexError, InvertedIndex, Phase};
use sha2::{Digest, Sha256};
use std::collections::BTreeMap;
use std::path::Path;

const MAGIC: &[u8; 4] = b"LIDX";
const VERSION: u32 = 1;
const CHECKSUM_LEN: usize = 32;

impl InvertedIndex {
    /// Serializes the complete index state to a file
    pub fn save(&self, path: &Path) -> Result<(), IndexError> {
        let mut buf = Vec::new();

        buf.extend_from_slice(MAGIC);
        buf.extend_from_slice(&VERSION.to_le_bytes());
        buf.push(match self.phase() {
            Phase::Ingesting => 0,
            Phase::Finalized => 1,
        });
        buf.extend_from_slice(&self.doc_count().to_le_bytes());

        buf.extend_from_slice(&(self.doc_lengths().len() as u64).to_le_bytes());
        for (doc_id, length) in self.doc_lengths() {
            buf.extend_from_slice(&doc_id.to_le_bytes());
            buf.extend_from_slice(&length.to_le_bytes());
        }

        buf.extend_from_slice(&(self.df().len() as u64).to_le_bytes());
        for (term, count) in self.df() {
            write_term(&mut buf, term);
            buf.extend_from_slice(&count.to_le_bytes());
        }

        buf.extend_from_slice(&(self.postings().len() as u64).to_le_bytes());
        for (term, docs) in self.postings() {
            write_term(&mut buf, term);
            buf.extend_from_slice(&(docs.len() as u64).to_le_bytes());
            for (doc_id, score) in docs {
                buf.extend_from_slice(&doc_id.to_le_bytes());
                buf.extend_from_slice(&score.to_le_bytes());
            }
        }

        let digest = Sha256::digest(&buf);
        buf.extend_from_slice(&digest);

        std::fs::write(path, buf)?;
        tracing::info!("Index saved to {}", path.display());
        Ok(())
    }

    /// Loads an index from a file
    ///
    /// Returns a fresh index; the caller decides what to replace with it.
    /// Corrupt or truncated files are rejected with `IndexError::Corrupt`.
    pub fn load(path: &Path) -> Result<Self, IndexError> {
        let data = std::fs::read(path)?;

        if data.len() < MAGIC.len() + CHECKSUM_LEN {
            return Err(IndexError::Corrupt("file too short".to_string()));
        }

        let (body, trailer) = data.split_at(data.len() - CHECKSUM_LEN);
        let digest = Sha256::digest(body);
        if digest.as_slice() != trailer {
            return Err(IndexError::Corrupt("checksum mismatch".to_string()));
        }

        let mut reader = Reader { buf: body, pos: 0 };

        let magic = reader.take(4)?;
        if magic != MAGIC.as_slice() {
            return Err(IndexError::Corrupt("bad magic bytes".to_string()));
        }
        let version = reader.read_u32()?;
        if version != VERSION {
            return Err(IndexError::Corrupt(format!(
                "unsupported version {}",
                version
            )));
        }
        let phase = match reader.read_u8()? {
            0 => Phase::Ingesting,
            1 => Phase::Finalized,
            other => {
                return Err(IndexError::Corrupt(format!("invalid phase byte {}", other)));
            }
        };
        let doc_count = reader.read_u64()?;

        let length_entries = reader.read_u64()?;
        let mut doc_lengths: BTreeMap<DocId, u64> = BTreeMap::new();
        for _ in 0..length_entries {
            let doc_id = reader.read_u64()?;
            let length = reader.read_u64()?;
            doc_lengths.insert(doc_id, length);
        }

        let df_entries = reader.read_u64()?;
        let mut df: BTreeMap<String, u64> = BTreeMap::new();
        for _ in 0..df_entries {
            let term = reader.read_term()?;
            let count = reader.read_u64()?;
            df.insert(term, count);
        }

        let term_count = reader.read_u64()?;
        let mut postings: BTreeMap<String, BTreeMap<DocId, f64>> = BTreeMap::new();
        for _ in 0..term_count {
            let term = reader.read_term()?;
            let entry_count = reader.read_u64()?;
            let mut docs: BTreeMap<DocId, f64> = BTreeMap::new();
            for _ in 0..entry_count {
                let doc_id = reader.read_u64()?;
                let score = reader.read_f64()?;
                docs.insert(doc_id, score);
            }
            postings.insert(term, docs);
        }

        if reader.pos != body.len() {
            return Err(IndexError::Corrupt("trailing bytes after postings".to_string()));
        }

        tracing::info!("Index loaded from {}", path.display());
        Ok(InvertedIndex::from_parts(
            postings,
            df,
            doc_lengths,
            doc_count,
            phase,
        ))
    }
}

fn write_term(buf: &mut Vec<u8>, term: &str) {
    buf.extend_from_slice(&(term.len() as u32).to_le_bytes());
    buf.extend_from_slice(term.as_bytes());
}

struct Reader<'a> {
    buf: &'a [u8],
    pos: usize,
}

impl<'a> Reader<'a> {
    fn take(&mut self, n: usize) -> Result<&'a [u8], IndexError> {
        if self.pos + n > self.buf.len() {
            return Err(IndexError::Corrupt("unexpected end of file".to_string()));
        }
        let slice = &self.buf[self.pos..self.pos + n];
        self.pos += n;
        Ok(slice)
    }

    fn read_u8(&mut self) -> Result<u8, IndexError> {
        Ok(self.take(1)?[0])
    }

    fn read_u32(&mut self) -> Result<u32, IndexError> {
        let bytes = self.take(4)?;
        Ok(u32::from_le_bytes(bytes.try_into().expect("4-byte slice")))
    }

    fn read_u64(&mut self) -> Result<u64, IndexError> {
        let bytes = self.take(8)?;
        Ok(u64::from_le_bytes(bytes.try_into().expect("8-byte slice")))
    }

    fn read_f64(&mut self) -> Result<f64, IndexError> {
        let bytes = self.take(8)?;
        Ok(f64::from_le_bytes(bytes.try_into().expect("8-byte slice")))
    }

    fn read_term(&mut self) -> Result<String, IndexError> {
        let len = self.read_u32()? as usize;
        let bytes = self.take(len)?;
        String::from_utf8(bytes.to_vec())
            .map_err(|_| IndexError::Corrupt("term is not valid UTF-8".to_string()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::tempdir;

    fn tokens(words: &[&str]) -> Vec<String> {
        words.iter().map(|w| w.to_string()).collect()
    }

    fn sample_index() -> InvertedIndex {
        let mut index = InvertedIndex::new();
        index.add_document(1, &tokens(&["cat", "dog", "cat"])).unwrap();
        index.add_document(2, &tokens(&["cat", "fish"])).unwrap();
        index.add_document(3, &tokens(&["bird"])).unwrap();
        index.finalize();
        index
    }

    #[test]
    fn test_round_trip_preserves_state() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("index.idx");

        let index = sample_index();
        index.save(&path).unwrap();
        let loaded = InvertedIndex::load(&path).unwrap();

        assert_eq!(loaded.doc_count(), index.doc_count());
        assert_eq!(loaded.phase(), Phase::Finalized);
        assert_eq!(loaded.postings(), index.postings());
        assert_eq!(loaded.df(), index.df());
        assert_eq!(loaded.doc_lengths(), index.doc_lengths());
    }

    #[test]
    fn test_round_trip_answers_searches_identically() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("index.idx");

        let index = sample_index();
        index.save(&path).unwrap();
        let loaded = InvertedIndex::load(&path).unwrap();

        for query in [&["cat"][..], &["cat", "fish"][..], &["bird"][..], &["zebra"][..]] {
            let terms = tokens(query);
            assert_eq!(
                index.search(&terms, 10).unwrap(),
                loaded.search(&terms, 10).unwrap()
            );
        }
    }

    #[test]
    fn test_save_is_deterministic() {
        let dir = tempdir().unwrap();
        let path_a = dir.path().join("a.idx");
        let path_b = dir.path().join("b.idx");

        let index = sample_index();
        index.save(&path_a).unwrap();
        index.save(&path_b).unwrap();

        assert_eq!(
            std::fs::read(&path_a).unwrap(),
            std::fs::read(&path_b).unwrap()
        );
    }

    #[test]
    fn test_corrupt_byte_rejected() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("index.idx");
        sample_index().save(&path).unwrap();

        let mut data = std::fs::read(&path).unwrap();
        let mid = data.len() / 2;
        data[mid] ^= 0xff;
        std::fs::write(&path, data).unwrap();

        assert!(matches!(
            InvertedIndex::load(&path),
            Err(IndexError::Corrupt(_))
        ));
    }

    #[test]
    fn test_truncated_file_rejected() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("index.idx");
        sample_index().save(&path).unwrap();

        let data = std::fs::read(&path).unwrap();
        std::fs::write(&path, &data[..data.len() / 2]).unwrap();

        assert!(matches!(
            InvertedIndex::load(&path),
            Err(IndexError::Corrupt(_))
        ));
    }

    #[test]
    fn test_bad_magic_rejected() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("index.idx");
        sample_index().save(&path).unwrap();

        let mut data = std::fs::read(&path).unwrap();
        data[0] = b'X';
        // Re-stamp the checksum so only the magic is wrong
        let body_len = data.len() - CHECKSUM_LEN;
        let digest = Sha256::digest(&data[..body_len]);
        data[body_len..].copy_from_slice(&digest);
        std::fs::write(&path, data).unwrap();

        let err = InvertedIndex::load(&path).unwrap_err();
        assert!(matches!(err, IndexError::Corrupt(ref msg) if msg.contains("magic")));
    }

    #[test]
    fn test_missing_file_is_io_error() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("absent.idx");
        assert!(matches!(
            InvertedIndex::load(&path),
            Err(IndexError::Io(_))
        ));
    }

    #[test]
    fn test_empty_index_round_trip() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("empty.idx");

        let mut index = InvertedIndex::new();
        index.finalize();
        index.save(&path).unwrap();

        let loaded = InvertedIndex::load(&path).unwrap();
        assert_eq!(loaded.doc_count(), 0);
        assert!(loaded.search(&tokens(&["any"]), 10).unwrap().is_empty());
    }
}
