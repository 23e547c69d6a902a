use lazy_static::lazy_static;
use regex::Regex;

lazy_static! {
    static ref NOT_ALLOWED: Regex = Regex::new(r"[^A-Za-z0-9(),!?'`]").unwrap();
    static ref MULTI_SPACE: Regex = Regex::new(r"\s{2,}").unwrap();
    // (pattern, replacement) applied in order; only the bracket and question
    // mark replacements keep a literal backslash
    static ref SPACING: Vec<(Regex, &'static str)> = vec![
        (Regex::new(r"'s").unwrap(), " 's"),
        (Regex::new(r"'ve").unwrap(), " 've"),
        (Regex::new(r"n't").unwrap(), " n't"),
        (Regex::new(r"'re").unwrap(), " 're"),
        (Regex::new(r"'d").unwrap(), " 'd"),
        (Regex::new(r"'ll").unwrap(), " 'll"),
        (Regex::new(r",").unwrap(), " , "),
        (Regex::new(r"!").unwrap(), " ! "),
        (Regex::new(r"\(").unwrap(), r" \( "),
        (Regex::new(r"\)").unwrap(), r" \) "),
        (Regex::new(r"\?").unwrap(), r" \? "),
    ];
}

/// Tokenization/string cleaning for all datasets except SST.
/// Everything is lower cased unless `trec` is set.
pub fn clean_str(string: &str, trec: bool) -> String {
    let mut cleaned = NOT_ALLOWED.replace_all(string, " ").into_owned();
    for (pattern, replacement) in SPACING.iter() {
        cleaned = pattern.replace_all(&cleaned, *replacement).into_owned();
    }
    let cleaned = MULTI_SPACE.replace_all(&cleaned, " ");
    if trec {
        cleaned.trim().to_string()
    } else {
        cleaned.trim().to_lowercase()
    }
}

/// Tokenization/string cleaning for the SST dataset.
pub fn clean_str_sst(string: &str) -> String {
    let cleaned = NOT_ALLOWED.replace_all(string, " ");
    let cleaned = MULTI_SPACE.replace_all(&cleaned, " ");
    cleaned.trim().to_lowercase()
}

// defines the behavior needed for turning a raw record into whitespace separated tokens
pub trait Tokenizer {
    fn clean(&self, line: &str) -> String;

    fn tokenize(&self, line: &str) -> Vec<String> {
        self.clean(line).split_whitespace().map(|x| x.to_string()).collect()
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Cleaner {
    CleanStr,
    CleanStrTrec,
    CleanStrSst,
    // `clean_string = False`: the line is only trimmed and lower cased by the reader
    Plain,
}

impl Cleaner {
    pub fn from_name(name: &str) -> Option<Cleaner> {
        match name {
            "clean_str" => Some(Cleaner::CleanStr),
            "clean_str_trec" => Some(Cleaner::CleanStrTrec),
            "clean_str_sst" => Some(Cleaner::CleanStrSst),
            "none" => Some(Cleaner::Plain),
            _ => None,
        }
    }
}

impl Tokenizer for Cleaner {
    fn clean(&self, line: &str) -> String {
        match self {
            Cleaner::CleanStr => clean_str(line, false),
            Cleaner::CleanStrTrec => clean_str(line, true),
            Cleaner::CleanStrSst => clean_str_sst(line),
            Cleaner::Plain => line.to_string(),
        }
    }
}

#[cfg(test)]
mod tests {

    use super::*;

    #[test]
    fn clean_str_spacing_test() {
        assert_eq!(clean_str("Hello, World!", false), "hello , world !");
        assert_eq!(clean_str("it's   great", false), "it 's great");
        assert_eq!(clean_str("it's great, don't", false), "it 's great , do n't");
        assert_eq!(clean_str("I don't know", false), "i do n't know");
        assert_eq!(clean_str("we'll (maybe)?", false), r"we 'll \( maybe \) \?");
        assert_eq!(clean_str("you're, we've, she'd", false), "you 're , we 've , she 'd");
        assert_eq!(clean_str("a#b$c", false), "a b c");
    }

    #[test]
    fn clean_str_trec_keeps_case_test() {
        assert_eq!(clean_str("What IS this", true), "What IS this");
        assert_eq!(clean_str("What IS this", false), "what is this");
    }

    #[test]
    fn clean_str_sst_test() {
        // no punctuation spacing for SST
        assert_eq!(clean_str_sst("  Good,  movie!! "), "good, movie!!");
        assert_eq!(clean_str_sst("it's"), "it's");
    }

    #[test]
    fn tokenizer_split_test() {
        let tokens = Cleaner::CleanStr.tokenize("a b,c");
        assert_eq!(tokens, vec!["a", "b", ",", "c"]);
        assert_eq!(Cleaner::Plain.tokenize(" x  y "), vec!["x", "y"]);
        assert_eq!(Cleaner::from_name("clean_str_sst"), Some(Cleaner::CleanStrSst));
        assert_eq!(Cleaner::from_name("other"), None);
    }
}
