use crate::dataset::Dataset;
use crate::error::{DataError, Result};

use std::collections::HashMap;
use std::fmt::Display;

use ndarray::prelude::*;
use ndarray_stats::QuantileExt;

/// Read-only view over a persisted dataset, for sanity checks on the
/// pre-trained matrix.
pub struct Inspector {
    dataset: Dataset,
    // unit-length rows of `w`, row 0 stays zero
    normalized: Array2<f32>,
    i2t: HashMap<usize, String>,
}

pub struct Summary {
    pub n_train: usize,
    pub n_test: usize,
    pub vocab_size: usize,
    pub w_dim: (usize, usize),
    pub w2_dim: (usize, usize),
    pub w_range: (f32, f32),
}

impl Display for Summary {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "dataset:
        train records: {}
        test records: {}
        vocab size: {}
        W: {:?}, values in [{}, {}]
        W2: {:?}",
        self.n_train, self.n_test, self.vocab_size, self.w_dim, self.w_range.0, self.w_range.1, self.w2_dim)
    }
}

impl Inspector {

    pub fn new(dataset: Dataset) -> Inspector {

        // need to normalize w so each entry norm l2 is 1
        let mut normalized = dataset.w.clone();
        for mut row in normalized.axis_iter_mut(Axis(0)) {
            let norm = row.mapv(|a| a.powi(2)).sum().sqrt();
            if norm > 0.0 {
                row.mapv_inplace(|a| a / norm);
            }
        }

        let mut i2t: HashMap<usize, String> = HashMap::new();
        for (t, i) in &dataset.word_idx_map {
            i2t.entry(*i).or_insert(t.to_owned());
        }

        Self { dataset, normalized, i2t }
    }

    pub fn summary(&self) -> Summary {
        let w = &self.dataset.w;
        // an empty vocabulary still leaves the zero row
        let w_range = match (w.min(), w.max()) {
            (Ok(min), Ok(max)) => (*min, *max),
            _ => (0.0, 0.0)
        };
        Summary {
            n_train: self.dataset.revs_train.len(),
            n_test: self.dataset.revs_test.len(),
            vocab_size: self.dataset.vocab.len(),
            w_dim: w.dim(),
            w2_dim: self.dataset.w2.dim(),
            w_range,
        }
    }

    pub fn vector(&self, token: &str) -> Result<ArrayView1<f32>> {
        match self.dataset.word_idx_map.get(token) {
            Some(i) => Ok(self.dataset.w.row(*i)),
            None => Err(DataError::UnknownWord(token.to_string()))
        }
    }

    /// The `k` words whose `W` rows have the highest cosine similarity with
    /// the row of `token`, the token itself excluded.
    pub fn most_similar(&self, token: &str, k: usize) -> Result<Vec<(String, f32)>> {

        let index = match self.dataset.word_idx_map.get(token) {
            Some(i) => *i,
            None => return Err(DataError::UnknownWord(token.to_string()))
        };

        let scores = self.normalized.dot(&self.normalized.row(index));
        let mut indexed_scores: Vec<(usize, f32)> = scores
            .iter()
            .copied()
            .enumerate()
            .filter(|(i, _)| *i != 0 && *i != index)
            .collect();

        // sort by most similar in descending order
        indexed_scores.sort_by(|(_i, s), (_j, t)| t.total_cmp(s));

        Ok(indexed_scores
            .into_iter()
            .take(k)
            .filter_map(|(i, score)| self.i2t.get(&i).map(|t| (t.to_owned(), score)))
            .collect())
    }
}
