use crate::vocab::Vocabulary;

use std::collections::HashMap;

use ndarray::Array2;
use serde::{Deserialize, Serialize};

/// Everything a training run needs, persisted as one artifact.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct Dataset {
    pub revs_train: Vec<String>,
    pub revs_test: Vec<String>,
    // pre-trained vectors, random vectors for unknown words
    pub w: Array2<f32>,
    // fully random baseline, same shape as `w`
    pub w2: Array2<f32>,
    // rows of `w`
    pub word_idx_map: HashMap<String, usize>,
    pub vocab: Vocabulary,
}
