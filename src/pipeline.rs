// imports
use crate::config::files_handling::{save_output, DatasetFile};
use crate::config::{Config, JsonTypes};
use crate::dataset::Dataset;
use crate::embeddings::{EmbeddingPass, WordVectors};
use crate::error::{DataError, Result};
use crate::vocab::Corpus;
use crate::word2vec::load_bin_vec;

use std::path::PathBuf;
use std::time::Instant;
use rand::rngs::StdRng;
use rand::SeedableRng;
use tracing::info;

pub struct Pipeline {
    params: JsonTypes
}

impl Pipeline {

    // runs the main procedure of 4 steps -
    // -> reading train and test records into one vocabulary
    // -> loading the pre-trained vectors of the vocabulary
    // -> the pre-trained and the random embedding passes
    // -> saving the dataset

    pub fn new(params: JsonTypes) -> Pipeline {
        Self { params }
    }

    pub fn from_args(args: &[String]) -> Result<Pipeline> {
        let params = Config::new(args)?.get_params();
        Ok(Pipeline::new(params))
    }

    pub fn params(&self) -> &JsonTypes {
        &self.params
    }

    fn rng(&self) -> StdRng {
        match self.params.seed {
            Some(seed) => StdRng::seed_from_u64(seed),
            None => StdRng::from_entropy()
        }
    }

    /// Builds the dataset in memory, nothing is written.
    pub fn build(&self) -> Result<Dataset> {

        let params = &self.params;
        let k = params.embedding_dim;

        println!("loading data...");
        let corpus = Corpus::new(params.tokenizer, params.begin);
        let (revs_train, revs_test, vocab) = corpus.build_data(&params.train_file, &params.test_file)?;

        println!("data loaded!");
        println!("number of sentences: {}", revs_train.len() + revs_test.len());
        println!("vocab size: {}", vocab.len());
        println!("max sentence length: {}", params.max_l);

        println!("loading word2vec vectors...");
        let w2v = load_bin_vec(&params.w2v_file, &vocab)?;
        if w2v.dim() != k {
            return Err(DataError::encoding(format!(
                "{:?} holds {}-dim vectors, embedding_dim is {}", params.w2v_file, w2v.dim(), k
            )));
        }
        println!("word2vec loaded!");
        println!("num words already in word2vec: {}", w2v.len());

        // same logic for both matrices, the second starts from an empty table
        let mut rng = self.rng();
        let pass = EmbeddingPass::new(params.min_df, k);
        let primary = pass.run(w2v, &vocab, &mut rng)?;
        let baseline = pass.run(WordVectors::new(k), &vocab, &mut rng)?;
        info!("{} unknown words got random vectors", primary.n_random);

        Ok(Dataset {
            revs_train,
            revs_test,
            w: primary.w,
            w2: baseline.w,
            word_idx_map: primary.word_idx_map,
            vocab,
        })
    }

    /// Writes the optional exports, then the dataset itself as the last step.
    pub fn persist(&self, dataset: &Dataset) -> Result<PathBuf> {

        let out_dir = &self.params.output_dir;
        if self.params.export_arrays {
            save_output(out_dir, "W", &dataset.w)?;
            save_output(out_dir, "W2", &dataset.w2)?;
            save_output(out_dir, "word_idx_map", &dataset.word_idx_map)?;
            save_output(out_dir, "vocab", &dataset.vocab)?;
        }

        let item = DatasetFile { dataset, compress: self.params.compress };
        save_output(out_dir, &self.params.output_name, &item)
    }

    pub fn run(&self) -> Result<PathBuf> {

        let timer = Instant::now();
        let dataset = self.build()?;
        let out = self.persist(&dataset)?;
        println!("dataset created!");
        info!("saved {:?}, took {} seconds", out, timer.elapsed().as_secs());
        Ok(out)
    }

}
