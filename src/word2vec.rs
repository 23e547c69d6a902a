//! Reader for the word2vec binary format.
//!
//! The file is a text header line `<count> <dim>\n` followed by `count`
//! records. Each record is the word as raw bytes terminated by a single space,
//! then `dim` native-endian `f32` values with no separator before the next
//! word. Files written by the reference tool also put a `\n` after every
//! vector; that byte ends up in front of the next word and is dropped.

use crate::embeddings::WordVectors;
use crate::error::{DataError, Result};
use crate::vocab::Vocabulary;

use std::fs::File;
use std::io::{self, BufRead, BufReader, Read};
use std::mem::size_of;
use std::path::{Path, PathBuf};
use std::time::Instant;

use ndarray::Array1;
use tracing::{debug, info};

/// Exact-count reads over a buffered stream, keeping track of the byte
/// offset so errors can say where the framing broke.
struct ByteCursor<R> {
    reader: R,
    offset: u64,
    path: PathBuf,
}

impl<R: BufRead> ByteCursor<R> {

    fn new(reader: R, path: &Path) -> Self {
        Self { reader, offset: 0, path: path.to_path_buf() }
    }

    fn format_error(&self, reason: impl Into<String>) -> DataError {
        DataError::format(&self.path, self.offset, reason)
    }

    fn read_byte(&mut self) -> Result<Option<u8>> {
        let byte = loop {
            match self.reader.fill_buf() {
                Ok([]) => return Ok(None),
                Ok(buf) => break buf[0],
                Err(e) if e.kind() == io::ErrorKind::Interrupted => continue,
                Err(e) => return Err(DataError::io(&self.path, e)),
            }
        };
        self.reader.consume(1);
        self.offset += 1;
        Ok(Some(byte))
    }

    fn read_header(&mut self) -> Result<(usize, usize)> {
        let mut line = Vec::new();
        let n = self.reader.read_until(b'\n', &mut line).map_err(|e| DataError::io(&self.path, e))?;
        let header = String::from_utf8_lossy(&line);
        let fields: Vec<&str> = header.split_whitespace().collect();
        let parsed = match fields.as_slice() {
            [count, dim] => count.parse::<usize>().ok().zip(dim.parse::<usize>().ok()),
            _ => None,
        };
        match parsed {
            Some(header) => {
                self.offset += n as u64;
                Ok(header)
            },
            None => Err(self.format_error(format!("expected `<count> <dim>` header, found {:?}", header.trim_end())))
        }
    }

    // scans up to the first space; newline bytes never become part of the word
    fn read_word(&mut self) -> Result<Vec<u8>> {
        let mut word = Vec::new();
        loop {
            match self.read_byte()? {
                Some(b' ') => return Ok(word),
                Some(b'\n') => continue,
                Some(byte) => word.push(byte),
                None => return Err(self.format_error("end of file inside a word token")),
            }
        }
    }

    fn read_block(&mut self, len: usize) -> Result<Vec<u8>> {
        let mut block = vec![0u8; len];
        match self.reader.read_exact(&mut block) {
            Ok(()) => {
                self.offset += len as u64;
                Ok(block)
            },
            Err(e) if e.kind() == io::ErrorKind::UnexpectedEof => {
                Err(self.format_error(format!("vector block of {} bytes is cut short", len)))
            },
            Err(e) => Err(DataError::io(&self.path, e)),
        }
    }

    // consumes a block without materializing it
    fn skip_block(&mut self, len: usize) -> Result<()> {
        let skipped = io::copy(&mut self.reader.by_ref().take(len as u64), &mut io::sink())
            .map_err(|e| DataError::io(&self.path, e))?;
        self.offset += skipped;
        if skipped < len as u64 {
            return Err(self.format_error(format!("vector block of {} bytes is cut short", len)));
        }
        Ok(())
    }
}

/// Reinterprets a raw block as `dim` native-endian `f32` values.
pub fn decode_vector(block: &[u8], dim: usize) -> Result<Array1<f32>> {
    if block.len() != dim * size_of::<f32>() {
        return Err(DataError::encoding(format!(
            "block of {} bytes does not hold {} f32 values", block.len(), dim
        )));
    }
    let values: Vec<f32> = block
        .chunks_exact(size_of::<f32>())
        .map(|c| f32::from_ne_bytes([c[0], c[1], c[2], c[3]]))
        .collect();
    Ok(Array1::from(values))
}

/// Loads the vectors of the words in `vocab` from a word2vec binary reader.
/// `path` is only used to label errors.
pub fn load_bin_vec_from<R: BufRead>(reader: R, path: &Path, vocab: &Vocabulary) -> Result<WordVectors> {

    let mut cursor = ByteCursor::new(reader, path);
    let (vocab_size, layer1_size) = cursor.read_header()?;
    let binary_len = match layer1_size.checked_mul(size_of::<f32>()) {
        Some(len) => len,
        None => return Err(cursor.format_error(format!("vector dimension {} is too large", layer1_size))),
    };
    debug!("vector file {:?} announces {} vectors of dim {}", path, vocab_size, layer1_size);

    let mut word_vecs = WordVectors::new(layer1_size);
    let mut skipped = 0usize;
    for _ in 0..vocab_size {
        let word = cursor.read_word()?;
        let word = String::from_utf8_lossy(&word);
        if vocab.contains(&word) {
            let block = cursor.read_block(binary_len)?;
            // a repeated word keeps its last vector
            word_vecs.set(&word, decode_vector(&block, layer1_size)?)?;
        } else {
            cursor.skip_block(binary_len)?;
            skipped += 1;
        }
    }

    debug!("kept {} vectors, skipped {}", word_vecs.len(), skipped);
    Ok(word_vecs)
}

/// Loads the vectors of the words in `vocab` from the word2vec binary file at `fname`.
pub fn load_bin_vec(fname: &Path, vocab: &Vocabulary) -> Result<WordVectors> {
    let timer = Instant::now();
    let f = File::open(fname).map_err(|e| DataError::io(fname, e))?;
    let word_vecs = load_bin_vec_from(BufReader::new(f), fname, vocab)?;
    info!("loaded {} vectors from {:?} in {} ms", word_vecs.len(), fname, timer.elapsed().as_millis());
    Ok(word_vecs)
}
