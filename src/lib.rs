pub mod config;
pub mod dataset;
pub mod embeddings;
pub mod error;
pub mod inspect;
pub mod pipeline;
pub mod tokenize;
pub mod vocab;
pub mod word2vec;

pub use dataset::Dataset;
pub use embeddings::{add_unknown_words, get_w, EmbeddingPass, Embeddings, WordVectors};
pub use error::DataError;
pub use inspect::Inspector;
pub use pipeline::Pipeline;
pub use vocab::{Corpus, Vocabulary};
pub use word2vec::{load_bin_vec, load_bin_vec_from};
