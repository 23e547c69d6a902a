pub mod files_handling;

use crate::error::{DataError, Result};
use crate::tokenize::Cleaner;

use serde_json::Value;
use std::{env, fs, fmt::Display, path::PathBuf};

// where the key-value configuration is looked up
pub const CONFIG_ENV: &str = "EMBEDDING_PREP_CONFIG";
pub const DEFAULT_CONFIG_FILE: &str = "configure.json";

#[derive(Clone, Debug)]
pub struct JsonTypes {
    pub w2v_file: PathBuf,
    pub train_file: PathBuf,
    pub test_file: PathBuf,
    pub output_dir: PathBuf,
    pub output_name: String,
    pub embedding_dim: usize,
    pub min_df: usize,
    pub begin: usize,
    pub max_l: usize,
    // folds are not built, kept so existing configuration files stay valid
    pub cv: usize,
    pub seed: Option<u64>,
    pub tokenizer: Cleaner,
    pub compress: bool,
    pub export_arrays: bool,
}

impl Display for JsonTypes {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "using parameters:
        w2v_file: {:?}
        train_file: {:?}
        test_file: {:?}
        output_dir: {:?}
        output_name: {}
        embedding_dim: {}
        min_df: {}
        begin: {}
        max_l: {}
        cv: {}
        seed: {:?}
        tokenizer: {:?}
        compress: {}
        export_arrays: {}",
        self.w2v_file, self.train_file, self.test_file, self.output_dir, self.output_name,
        self.embedding_dim, self.min_df, self.begin, self.max_l, self.cv, self.seed,
        self.tokenizer, self.compress, self.export_arrays
        )
    }
}

pub struct Config {
    params: JsonTypes
}

impl Config {

    pub fn get_params(&self) -> JsonTypes {
        return self.params.clone()
    }

    /// `args` are the process arguments, the only positional one is the
    /// word2vec binary file. Everything else comes from the json file named by
    /// `EMBEDDING_PREP_CONFIG` (default `configure.json`).
    pub fn new(args: &[String]) -> Result<Config> {

        if args.len() != 2 {
            return Err(DataError::Config("input should be a path to the word2vec binary file only".into()));
        }

        let config_file = env::var(CONFIG_ENV).unwrap_or_else(|_| DEFAULT_CONFIG_FILE.to_string());
        let f = fs::File::open(&config_file).map_err(|e| DataError::io(&config_file, e))?;
        let json: Value = serde_json::from_reader(f)?;

        Config::from_json(&args[1], &json)
    }

    pub fn from_json(w2v_file: &str, json: &Value) -> Result<Config> {

        // input files are required
        let train_file = required_str(json, "train_file")?;
        let test_file = required_str(json, "test_file")?;

        // handle default vs input parameters
        let output_dir = optional_str(json, "output_dir")?.unwrap_or(".");
        let output_name = optional_str(json, "output_name")?.unwrap_or("mr");
        let embedding_dim = optional_usize(json, "embedding_dim")?.unwrap_or(300);
        let min_df = optional_usize(json, "min_df")?.unwrap_or(1);
        let begin = optional_usize(json, "begin")?.unwrap_or(7);
        let max_l = optional_usize(json, "max_l")?.unwrap_or(8);
        let cv = optional_usize(json, "cv")?.unwrap_or(10);
        let seed = optional_usize(json, "seed")?.map(|s| s as u64);
        let compress = optional_bool(json, "compress")?.unwrap_or(false);
        let export_arrays = optional_bool(json, "export_arrays")?.unwrap_or(false);
        let tokenizer = match optional_str(json, "tokenizer")? {
            Some(name) => Cleaner::from_name(name)
                .ok_or_else(|| DataError::Config(format!("unknown tokenizer {:?}", name)))?,
            None => Cleaner::CleanStr
        };

        if embedding_dim == 0 {
            return Err(DataError::Config("embedding_dim must be positive".into()));
        }

        let params = JsonTypes {
            w2v_file: PathBuf::from(w2v_file),
            train_file: PathBuf::from(train_file),
            test_file: PathBuf::from(test_file),
            output_dir: PathBuf::from(output_dir),
            output_name: output_name.to_owned(),
            embedding_dim,
            min_df,
            begin,
            max_l,
            cv,
            seed,
            tokenizer,
            compress,
            export_arrays,
        };

        Ok (
            Self {
                params: params
            }
        )
    }

}

fn required_str<'a>(json: &'a Value, key: &str) -> Result<&'a str> {
    optional_str(json, key)?.ok_or_else(|| DataError::Config(format!("{} was not supplied through json", key)))
}

fn optional_str<'a>(json: &'a Value, key: &str) -> Result<Option<&'a str>> {
    match json.get(key) {
        Some(value) => value.as_str().map(Some).ok_or_else(|| DataError::Config(format!("given {} is not a string", key))),
        None => Ok(None)
    }
}

fn optional_usize(json: &Value, key: &str) -> Result<Option<usize>> {
    match json.get(key) {
        Some(value) => value.as_u64().map(|v| Some(v as usize)).ok_or_else(|| DataError::Config(format!("given {} is not a non-negative integer", key))),
        None => Ok(None)
    }
}

fn optional_bool(json: &Value, key: &str) -> Result<Option<bool>> {
    match json.get(key) {
        Some(value) => value.as_bool().map(Some).ok_or_else(|| DataError::Config(format!("given {} is not boolean", key))),
        None => Ok(None)
    }
}


#[cfg(test)]
mod tests {

    use super::*;
    use serde_json::json;

    #[test]
    fn defaults_test() {

        let json = json!({"train_file": "train.tok", "test_file": "test.tok"});
        let params = Config::from_json("vectors.bin", &json).unwrap().get_params();

        assert_eq!(params.w2v_file, PathBuf::from("vectors.bin"));
        assert_eq!(params.train_file, PathBuf::from("train.tok"));
        assert_eq!(params.output_dir, PathBuf::from("."));
        assert_eq!(params.output_name, "mr");
        assert_eq!(params.embedding_dim, 300);
        assert_eq!(params.min_df, 1);
        assert_eq!(params.begin, 7);
        assert_eq!(params.max_l, 8);
        assert_eq!(params.seed, None);
        assert_eq!(params.tokenizer, Cleaner::CleanStr);
        assert!(!params.compress);
        assert!(!params.export_arrays);
    }

    #[test]
    fn overrides_test() {

        let json = json!({
            "train_file": "a", "test_file": "b", "embedding_dim": 50, "min_df": 2,
            "seed": 42, "tokenizer": "clean_str_sst", "compress": true, "output_name": "sst"
        });
        let params = Config::from_json("v.bin", &json).unwrap().get_params();
        assert_eq!(params.embedding_dim, 50);
        assert_eq!(params.min_df, 2);
        assert_eq!(params.seed, Some(42));
        assert_eq!(params.tokenizer, Cleaner::CleanStrSst);
        assert!(params.compress);
        assert_eq!(params.output_name, "sst");
    }

    #[test]
    fn invalid_values_test() {

        let cases = [
            json!({"test_file": "b"}),
            json!({"train_file": 1, "test_file": "b"}),
            json!({"train_file": "a", "test_file": "b", "min_df": -1}),
            json!({"train_file": "a", "test_file": "b", "compress": "yes"}),
            json!({"train_file": "a", "test_file": "b", "tokenizer": "bpe"}),
            json!({"train_file": "a", "test_file": "b", "embedding_dim": 0}),
        ];
        for json in cases {
            assert!(matches!(Config::from_json("v.bin", &json), Err(DataError::Config(_))), "{}", json);
        }
    }

    #[test]
    fn argument_count_test() {

        let args = vec!["embedding_prep".to_string()];
        assert!(matches!(Config::new(&args), Err(DataError::Config(_))));
        let args = vec!["embedding_prep".to_string(), "a".to_string(), "b".to_string()];
        assert!(matches!(Config::new(&args), Err(DataError::Config(_))));
    }
}
