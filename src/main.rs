use std::{env, process};
use embedding_prep::Pipeline;
use tracing::error;
use tracing_subscriber::EnvFilter;

// usage: embedding_prep <word2vec.bin>
// train/test files and the rest of the parameters come from the json file
// named by EMBEDDING_PREP_CONFIG (default configure.json)

fn main() {

    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn")))
        .init();

    let args: Vec<String> = env::args().collect();
    let result = Pipeline::from_args(&args).and_then(|pipeline| {
        println!("{}", pipeline.params());
        pipeline.run()
    });

    if let Err(e) = result {
        error!("{}", e);
        eprintln!("{}", e);
        process::exit(1);
    }
}
