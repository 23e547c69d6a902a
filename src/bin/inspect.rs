use std::{env, path::Path, process};
extern crate embedding_prep;
use embedding_prep::config::files_handling::read_input;
use embedding_prep::{Dataset, Inspector};
use tracing::error;
use tracing_subscriber::EnvFilter;


// sanity checks on a saved dataset, treated as a separate executable so it can
// be ran independently from the main program.
// arguments: path to the dataset followed by any number of words, for each word
// its 10 most similar words in W are printed.
// example: ... Output/mr.bin good bad movie

fn main() {

    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn")))
        .init();

    let args: Vec<String> = env::args().collect();
    if args.len() < 2 {
        eprintln!("usage: {} <dataset> [word ...]", args[0]);
        process::exit(2);
    }

    let dataset = match read_input::<Dataset>(Path::new(&args[1])) {
        Ok(dataset) => dataset,
        Err(e) => {
            error!("{}", e);
            eprintln!("{}", e);
            process::exit(1);
        }
    };

    let inspector = Inspector::new(dataset);
    println!("{}", inspector.summary());

    for token in &args[2..] {
        println!("searching 10 most similar words to {}", token);
        match inspector.most_similar(token, 10) {
            Ok(similarities) => {
                for (i, (similar_token, score)) in similarities.iter().enumerate() {
                    println!("{} : {} ? {} = {}", i, token, similar_token, score);
                }
            },
            Err(e) => println!("{}", e)
        }
        println!("\n");
    }

}
