use crate::error::{DataError, Result};
use crate::vocab::Vocabulary;

use std::collections::HashMap;

use ndarray::{Array1, Array2};
use ndarray_rand::rand_distr::Uniform;
use ndarray_rand::RandomExt;
use rand::Rng;
use tracing::debug;

// unknown vectors get roughly the variance of pre-trained ones
const UNKNOWN_RANGE: f32 = 0.25;

/// Word to vector table with a fixed dimensionality.
///
/// Iteration follows insertion order, which is also the row order produced
/// by [`get_w`].
#[derive(Clone, Debug, Default)]
pub struct WordVectors {
    dim: usize,
    words: Vec<String>,
    vectors: Vec<Array1<f32>>,
    index: HashMap<String, usize>,
}

impl WordVectors {

    pub fn new(dim: usize) -> Self {
        Self { dim, ..Default::default() }
    }

    pub fn dim(&self) -> usize {
        self.dim
    }

    pub fn len(&self) -> usize {
        self.words.len()
    }

    pub fn is_empty(&self) -> bool {
        self.words.is_empty()
    }

    pub fn contains(&self, word: &str) -> bool {
        self.index.contains_key(word)
    }

    pub fn get(&self, word: &str) -> Option<&Array1<f32>> {
        self.index.get(word).map(|&i| &self.vectors[i])
    }

    /// Adds a vector for a new word. Existing entries are never replaced, a
    /// second insert of the same word is a no-op returning `false`.
    pub fn insert(&mut self, word: &str, vector: Array1<f32>) -> Result<bool> {
        self.check_dim(word, &vector)?;
        if self.contains(word) {
            return Ok(false);
        }
        self.index.insert(word.to_owned(), self.words.len());
        self.words.push(word.to_owned());
        self.vectors.push(vector);
        Ok(true)
    }

    /// Stores `vector` for `word`, replacing a previous one in place so the
    /// word keeps its position.
    pub fn set(&mut self, word: &str, vector: Array1<f32>) -> Result<()> {
        match self.index.get(word) {
            Some(&i) => {
                self.check_dim(word, &vector)?;
                self.vectors[i] = vector;
            },
            None => {
                self.insert(word, vector)?;
            },
        }
        Ok(())
    }

    fn check_dim(&self, word: &str, vector: &Array1<f32>) -> Result<()> {
        if vector.len() != self.dim {
            return Err(DataError::encoding(format!(
                "vector for {:?} has {} components, table holds {}", word, vector.len(), self.dim
            )));
        }
        Ok(())
    }

    pub fn words(&self) -> impl Iterator<Item = &str> {
        self.words.iter().map(|w| w.as_str())
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &Array1<f32>)> {
        self.words.iter().map(|w| w.as_str()).zip(self.vectors.iter())
    }
}

/// For words that occur in at least `min_df` documents and have no vector
/// yet, samples one uniformly from [-0.25, 0.25). Returns how many were added.
pub fn add_unknown_words<R: Rng + ?Sized>(
    word_vecs: &mut WordVectors,
    vocab: &Vocabulary,
    min_df: usize,
    k: usize,
    rng: &mut R,
) -> Result<usize> {

    if word_vecs.dim() != k {
        return Err(DataError::encoding(format!(
            "cannot add {}-dim vectors to a table of dim {}", k, word_vecs.dim()
        )));
    }

    let dist = Uniform::new(-UNKNOWN_RANGE, UNKNOWN_RANGE);
    let mut added = 0;
    for (word, count) in vocab.iter() {
        if !word_vecs.contains(word) && count >= min_df {
            word_vecs.insert(word, Array1::random_using(k, &dist, &mut *rng))?;
            added += 1;
        }
    }
    Ok(added)
}

/// Gets the word matrix: `W[i]` is the vector of the word indexed by `i`, row 0
/// stays zero for padding. Indices start at 1 in the table's order.
pub fn get_w(word_vecs: &WordVectors, k: usize) -> Result<(Array2<f32>, HashMap<String, usize>)> {

    let vocab_size = word_vecs.len();
    let mut word_idx_map: HashMap<String, usize> = HashMap::with_capacity(vocab_size);
    let mut w: Array2<f32> = Array2::zeros((vocab_size + 1, k));

    for (i, (word, vec)) in word_vecs.iter().enumerate() {
        if vec.len() != k {
            return Err(DataError::encoding(format!(
                "vector for {:?} has {} components, matrix expects {}", word, vec.len(), k
            )));
        }
        w.row_mut(i + 1).assign(vec);
        word_idx_map.insert(word.to_owned(), i + 1);
    }

    Ok((w, word_idx_map))
}

/// Output of one [`EmbeddingPass`].
#[derive(Clone, Debug)]
pub struct Embeddings {
    pub w: Array2<f32>,
    pub word_idx_map: HashMap<String, usize>,
    // vectors that were in the table before the pass
    pub n_given: usize,
    pub n_random: usize,
}

/// Fills a table with random vectors for unknown words and turns it into a
/// matrix. Run once on the pre-trained table and once on an empty one.
#[derive(Clone, Copy, Debug)]
pub struct EmbeddingPass {
    pub min_df: usize,
    pub k: usize,
}

impl EmbeddingPass {

    pub fn new(min_df: usize, k: usize) -> Self {
        Self { min_df, k }
    }

    pub fn run<R: Rng + ?Sized>(&self, mut word_vecs: WordVectors, vocab: &Vocabulary, rng: &mut R) -> Result<Embeddings> {
        let n_given = word_vecs.len();
        let n_random = add_unknown_words(&mut word_vecs, vocab, self.min_df, self.k, rng)?;
        let (w, word_idx_map) = get_w(&word_vecs, self.k)?;
        debug!("embedding pass: {} given, {} random, matrix {:?}", n_given, n_random, w.dim());
        Ok(Embeddings { w, word_idx_map, n_given, n_random })
    }
}
