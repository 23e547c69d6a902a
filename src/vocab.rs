// imports
use crate::error::{DataError, Result};
use crate::tokenize::{Cleaner, Tokenizer};

use std::collections::{HashMap, HashSet};
use std::fmt;
use std::fs::File;
use std::io::{self, BufRead, BufReader};
use std::path::Path;

use serde::de::{MapAccess, Visitor};
use serde::ser::SerializeMap;
use serde::{Deserialize, Deserializer, Serialize, Serializer};
use tracing::debug;

/// Word to document frequency: a word is counted at most once per line.
///
/// Words keep the order in which they were first seen, so anything derived
/// from iterating the vocabulary (random fills, matrix rows) is reproducible.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct Vocabulary {
    entries: Vec<(String, usize)>,
    index: HashMap<String, usize>,
}

impl Vocabulary {
    pub fn new() -> Self {
        Self::default()
    }

    /// Increments the count of `word` by one, inserting it if needed.
    pub fn add(&mut self, word: &str) {
        self.add_count(word, 1);
    }

    fn add_count(&mut self, word: &str, count: usize) {
        match self.index.get(word) {
            Some(&i) => self.entries[i].1 += count,
            None => {
                self.index.insert(word.to_owned(), self.entries.len());
                self.entries.push((word.to_owned(), count));
            }
        }
    }

    pub fn get(&self, word: &str) -> Option<usize> {
        self.index.get(word).map(|&i| self.entries[i].1)
    }

    pub fn contains(&self, word: &str) -> bool {
        self.index.contains_key(word)
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, usize)> {
        self.entries.iter().map(|(w, c)| (w.as_str(), *c))
    }
}

impl<'a> FromIterator<(&'a str, usize)> for Vocabulary {
    fn from_iter<I: IntoIterator<Item = (&'a str, usize)>>(iter: I) -> Self {
        let mut vocab = Vocabulary::new();
        for (word, count) in iter {
            vocab.add_count(word, count);
        }
        vocab
    }
}

// serialized as a plain map in insertion order
impl Serialize for Vocabulary {
    fn serialize<S>(&self, serializer: S) -> std::result::Result<S::Ok, S::Error>
    where
        S: Serializer {

            let mut map = serializer.serialize_map(Some(self.entries.len()))?;
            for (word, count) in &self.entries {
                map.serialize_entry(word, count)?;
            }
            map.end()
    }
}

struct VocabularyVisitor;
impl<'de> Visitor<'de> for VocabularyVisitor {

    type Value = Vocabulary;

    fn expecting(&self, formatter: &mut fmt::Formatter) -> fmt::Result {
        formatter.write_str("a map of word to count")
    }

    fn visit_map<A>(self, mut map: A) -> std::result::Result<Self::Value, A::Error>
        where
            A: MapAccess<'de>, {

                let mut vocab = Vocabulary::new();
                while let Some((word, count)) = map.next_entry::<String, usize>()? {
                    vocab.add_count(&word, count);
                }
                Ok(vocab)
    }
}

impl<'de> Deserialize<'de> for Vocabulary {
    fn deserialize<D>(deserializer: D) -> std::result::Result<Self, D::Error>
    where
        D: Deserializer<'de> {
            deserializer.deserialize_map(VocabularyVisitor)
    }
}


/// Reads train/test record files and accumulates the shared vocabulary.
pub struct Corpus {
    tokenizer: Cleaner,
    // leading tokens of every record that hold labels and metadata, not text
    begin: usize,
}

impl Corpus {

    pub fn new(tokenizer: Cleaner, begin: usize) -> Self {
        Self { tokenizer, begin }
    }

    fn read_file(file_path: &Path) -> Result<BufReader<File>> {
        match File::open(file_path) {
            Ok(f) => Ok(BufReader::new(f)),
            Err(e) => Err(DataError::io(file_path, e))
        }
    }

    // the words of one record that go into the vocabulary, first occurrence order, no repeats
    fn line_words(&self, line: &str) -> Vec<String> {
        let mut seen: HashSet<String> = HashSet::new();
        self.tokenizer
            .tokenize(&line.trim().to_lowercase())
            .into_iter()
            .skip(self.begin)
            .filter(|word| seen.insert(word.clone()))
            .collect()
    }

    fn accumulate(&self, line: &str, vocab: &mut Vocabulary) {
        for word in self.line_words(line) {
            vocab.add(&word);
        }
    }

    /// Reads records until EOF or the first empty line. Each raw line loses
    /// exactly one trailing byte (its terminator) before being decoded.
    pub fn read_records<R: BufRead>(&self, mut reader: R, vocab: &mut Vocabulary) -> io::Result<Vec<String>> {

        let mut revs = Vec::new();
        let mut buf: Vec<u8> = Vec::new();
        loop {
            buf.clear();
            reader.read_until(b'\n', &mut buf)?;
            buf.pop();
            if buf.is_empty() {
                break;
            }
            let line = String::from_utf8_lossy(&buf).into_owned();
            self.accumulate(&line, vocab);
            revs.push(line);
        }
        Ok(revs)
    }

    pub fn read_train_test(&self, file_path: &Path, vocab: &mut Vocabulary) -> Result<Vec<String>> {
        let reader = Corpus::read_file(file_path)?;
        let revs = self
            .read_records(reader, vocab)
            .map_err(|e| DataError::io(file_path, e))?;
        debug!("read {} records from {:?}, vocabulary now {} words", revs.len(), file_path, vocab.len());
        Ok(revs)
    }

    /// Loads train then test records into one vocabulary.
    pub fn build_data(&self, train_file: &Path, test_file: &Path) -> Result<(Vec<String>, Vec<String>, Vocabulary)> {
        let mut vocab = Vocabulary::new();
        let revs_train = self.read_train_test(train_file, &mut vocab)?;
        let revs_test = self.read_train_test(test_file, &mut vocab)?;
        Ok((revs_train, revs_test, vocab))
    }
}


#[cfg(test)]
mod tests {

    use super::*;
    use std::io::{Cursor, Write};

    const FILLER: &str = "l0 l1 l2 l3 l4 l5 l6";

    fn corpus() -> Corpus {
        Corpus::new(Cleaner::CleanStr, 7)
    }

    #[test]
    fn document_frequency_test() {

        let text = format!("{} a b c\n{} b c d c\n", FILLER, FILLER);
        let mut vocab = Vocabulary::new();
        let revs = corpus().read_records(Cursor::new(text), &mut vocab).unwrap();

        assert_eq!(revs.len(), 2);
        assert_eq!(vocab.len(), 4);
        assert_eq!(vocab.get("a"), Some(1));
        assert_eq!(vocab.get("b"), Some(2));
        assert_eq!(vocab.get("c"), Some(2));
        assert_eq!(vocab.get("d"), Some(1));
        // filler tokens are never counted
        assert!(!vocab.contains("l0"));
        let order: Vec<&str> = vocab.iter().map(|(w, _)| w).collect();
        assert_eq!(order, vec!["a", "b", "c", "d"]);
    }

    #[test]
    fn records_are_kept_raw_test() {

        let text = format!("{} Hello, World\r\n{} x\n", FILLER, FILLER);
        let mut vocab = Vocabulary::new();
        let revs = corpus().read_records(Cursor::new(text), &mut vocab).unwrap();

        // only the last character is removed
        assert_eq!(revs[0], format!("{} Hello, World\r", FILLER));
        assert_eq!(revs[1], format!("{} x", FILLER));
        assert_eq!(vocab.get("hello"), Some(1));
        assert_eq!(vocab.get(","), Some(1));
    }

    #[test]
    fn stops_at_empty_line_test() {

        let text = format!("{} a\n\n{} b\n", FILLER, FILLER);
        let mut vocab = Vocabulary::new();
        let revs = corpus().read_records(Cursor::new(text), &mut vocab).unwrap();
        assert_eq!(revs.len(), 1);
        assert!(!vocab.contains("b"));
    }

    #[test]
    fn last_line_without_terminator_test() {

        let text = format!("{} abc", FILLER);
        let mut vocab = Vocabulary::new();
        let revs = corpus().read_records(Cursor::new(text), &mut vocab).unwrap();
        assert_eq!(revs, vec![format!("{} ab", FILLER)]);
        assert_eq!(vocab.get("ab"), Some(1));
    }

    #[test]
    fn strips_one_byte_of_multibyte_tail_test() {

        // an unterminated line ending in a two byte character loses only its last byte
        let text = format!("{} caf\u{e9}", FILLER);
        let mut vocab = Vocabulary::new();
        let revs = Corpus::new(Cleaner::Plain, 7).read_records(Cursor::new(text.clone()), &mut vocab).unwrap();
        assert_eq!(revs, vec![format!("{} caf\u{fffd}", FILLER)]);
        assert_eq!(vocab.get("caf\u{fffd}"), Some(1));

        // the cleaner then drops the replacement character
        let mut vocab = Vocabulary::new();
        corpus().read_records(Cursor::new(text), &mut vocab).unwrap();
        assert_eq!(vocab.get("caf"), Some(1));
    }

    #[test]
    fn build_data_shares_vocabulary_test() {

        let dir = tempfile::tempdir().unwrap();
        let train = dir.path().join("train.txt");
        let test = dir.path().join("test.txt");
        writeln!(File::create(&train).unwrap(), "{} a b c\n{} b c d", FILLER, FILLER).unwrap();
        writeln!(File::create(&test).unwrap(), "{} d e", FILLER).unwrap();

        let (revs_train, revs_test, vocab) = corpus().build_data(&train, &test).unwrap();
        assert_eq!(revs_train.len(), 2);
        assert_eq!(revs_test.len(), 1);
        assert_eq!(vocab.get("d"), Some(2));
        assert_eq!(vocab.get("e"), Some(1));

        let missing = dir.path().join("missing.txt");
        match corpus().build_data(&missing, &test) {
            Err(DataError::Io { path, .. }) => assert_eq!(path, missing),
            other => panic!("expected io error, got {:?}", other.map(|_| ())),
        }
    }

    #[test]
    fn vocabulary_json_keeps_order_test() {

        let vocab: Vocabulary = vec![("zeta", 3), ("alpha", 1)].into_iter().collect();
        let json = serde_json::to_string(&vocab).unwrap();
        assert_eq!(json, r#"{"zeta":3,"alpha":1}"#);
        let back: Vocabulary = serde_json::from_str(&json).unwrap();
        assert_eq!(back, vocab);
    }
}
