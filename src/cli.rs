use std::path::PathBuf;

use clap::Parser;

#[derive(Parser)]
#[command(version, about = "Check words against a grammar in Chomsky Normal Form")]
pub struct Cli {
    /// File containing the grammar
    pub file: PathBuf,

    /// Words to check for membership
    pub words: Vec<String>,

    /// Start symbol (default: head of the first rule)
    #[arg(short, long, value_name = "SYMBOL")]
    pub start: Option<char>,

    /// Print the full chart of every word
    #[arg(short, long)]
    pub trace: bool,

    /// Treat the words as strings of nonterminals and print their chart
    #[arg(long)]
    pub sentential: bool,

    /// Print the loaded grammar
    #[arg(short, long)]
    pub grammar: bool,

    /// Amount of random words to generate
    #[arg(short = 'n', long, value_name = "AMOUNT")]
    pub generate: Option<u32>,

    /// Depth after which generation takes the shortest derivations
    #[arg(long, value_name = "DEPTH", default_value_t = 8)]
    pub max_depth: usize,

    /// Seed for word generation
    #[arg(long)]
    pub seed: Option<u64>,

    /// Log level (trace, debug, info, warn, error)
    #[arg(long, default_value = "warn")]
    pub log_level: String,
}
