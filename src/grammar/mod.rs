/*
    This module is for storing and manipulating grammars in Chomsky Normal Form
*/

use std::collections::{BTreeSet, HashMap, HashSet};
use std::fmt::Display;

use itertools::Itertools;
use tracing::debug;

use crate::error_handling::ErrorType;

// The base unit in a grammar rule. The letter case decides which one it is
#[derive(Debug, PartialEq, Eq, Clone, Copy, Hash)]
pub enum Symbol {
    Terminal(char),
    Nonterminal(char),
}

impl Symbol {
    pub fn classify(c: char) -> Option<Symbol> {
        if c.is_uppercase() {
            Some(Symbol::Nonterminal(c))
        } else if c.is_lowercase() {
            Some(Symbol::Terminal(c))
        } else {
            None
        }
    }
}

// A single right hand side of a production, either `A -> BC` or `A -> a`
#[derive(Debug, PartialEq, Eq, Clone, Copy, Hash, PartialOrd, Ord)]
pub enum Alternative {
    Binary(char, char),
    Unary(char),
}

impl Display for Alternative {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Alternative::Binary(left, right) => write!(f, "{}{}", left, right),
            Alternative::Unary(terminal) => write!(f, "{}", terminal),
        }
    }
}

#[derive(Debug, PartialEq, Clone)]
pub enum GrammarErrorType {
    // A terminal that is not lowercase or a nonterminal that is not uppercase
    InvalidSymbol(char),
    // The symbol was already registered
    DuplicateSymbol(char),
    // The symbol was never registered as a nonterminal
    UnknownSymbol(char),
    // The right hand side is neither two nonterminals nor one terminal
    InvalidProduction(char, String),
    // The head already has this exact right hand side
    DuplicateProduction(char, String),
}

impl ErrorType for GrammarErrorType {}

impl Display for GrammarErrorType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            GrammarErrorType::InvalidSymbol(c) => write!(f, "`{}` has the wrong letter case for this kind of symbol", c),
            GrammarErrorType::DuplicateSymbol(c) => write!(f, "Symbol `{}` is already defined", c),
            GrammarErrorType::UnknownSymbol(c) => write!(f, "Nonterminal `{}` is not defined", c),
            GrammarErrorType::InvalidProduction(head, rhs) => write!(f, "`{}::={}` is not in Chomsky Normal Form", head, rhs),
            GrammarErrorType::DuplicateProduction(head, rhs) => write!(f, "Production `{}::={}` already exists", head, rhs),
        }
    }
}

pub type Result<T> = std::result::Result<T, GrammarErrorType>;

#[derive(Debug, Default, Clone, PartialEq)]
pub struct Grammar {
    // Kept in insertion order so listings are deterministic
    nonterminals: Vec<char>,
    terminals: HashSet<char>,
    start_symbol: Option<char>,
    rules: HashMap<char, BTreeSet<Alternative>>,
}

impl Grammar {
    pub fn new() -> Self {
        Grammar::default()
    }

    pub fn add_nonterminal(&mut self, symbol: char) -> Result<()> {
        if !symbol.is_uppercase() {
            return Err(GrammarErrorType::InvalidSymbol(symbol));
        }
        if self.is_nonterminal(symbol) {
            return Err(GrammarErrorType::DuplicateSymbol(symbol));
        }
        self.nonterminals.push(symbol);
        return Ok(());
    }

    pub fn add_terminal(&mut self, symbol: char) -> Result<()> {
        if !symbol.is_lowercase() {
            return Err(GrammarErrorType::InvalidSymbol(symbol));
        }
        if !self.terminals.insert(symbol) {
            return Err(GrammarErrorType::DuplicateSymbol(symbol));
        }
        return Ok(());
    }

    pub fn set_start_symbol(&mut self, symbol: char) -> Result<()> {
        if !self.is_nonterminal(symbol) {
            return Err(GrammarErrorType::UnknownSymbol(symbol));
        }
        self.start_symbol = Some(symbol);
        return Ok(());
    }

    // Adds a production written as text, e.g. `add_production('S', "AB")`
    pub fn add_production(&mut self, head: char, rhs: &str) -> Result<()> {
        if !self.is_nonterminal(head) {
            return Err(GrammarErrorType::UnknownSymbol(head));
        }
        let alternative = self
            .parse_alternative(rhs)
            .ok_or_else(|| GrammarErrorType::InvalidProduction(head, rhs.to_string()))?;
        return self.insert_alternative(head, alternative);
    }

    // Adds an already shaped production. Only symbol registration is checked
    pub fn add_alternative(&mut self, head: char, alternative: Alternative) -> Result<()> {
        if !self.is_nonterminal(head) {
            return Err(GrammarErrorType::UnknownSymbol(head));
        }
        match alternative {
            Alternative::Binary(left, right) => {
                if let Some(&unknown) = [left, right].iter().find(|&&c| !self.is_nonterminal(c)) {
                    return Err(GrammarErrorType::UnknownSymbol(unknown));
                }
            }
            Alternative::Unary(terminal) => {
                if !self.is_terminal(terminal) {
                    return Err(GrammarErrorType::UnknownSymbol(terminal));
                }
            }
        }
        return self.insert_alternative(head, alternative);
    }

    pub fn remove_grammar(&mut self) {
        debug!(nonterminals = self.nonterminals.len(), "clearing grammar");
        self.nonterminals.clear();
        self.terminals.clear();
        self.rules.clear();
        self.start_symbol = None;
    }

    // Renders `S::=AB|a`, or nothing when the head has no productions
    pub fn get_productions(&self, head: char) -> String {
        match self.rules.get(&head) {
            Some(alternatives) if !alternatives.is_empty() => format!(
                "{}::={}",
                head,
                alternatives.iter().map(Alternative::to_string).sorted().join("|")
            ),
            _ => String::new(),
        }
    }

    pub fn get_grammar(&self) -> String {
        self.nonterminals
            .iter()
            .filter(|&&head| self.rules.contains_key(&head))
            .map(|&head| format!("{} -> {}\n", head, self.get_productions(head)))
            .collect()
    }

    pub fn nonterminals(&self) -> &[char] {
        &self.nonterminals
    }

    pub fn terminals(&self) -> impl Iterator<Item = char> + '_ {
        self.terminals.iter().copied()
    }

    pub fn start_symbol(&self) -> Option<char> {
        self.start_symbol
    }

    pub fn is_nonterminal(&self, symbol: char) -> bool {
        self.nonterminals.contains(&symbol)
    }

    pub fn is_terminal(&self, symbol: char) -> bool {
        self.terminals.contains(&symbol)
    }

    // Position of the nonterminal in registration order
    pub fn nonterminal_index(&self, symbol: char) -> Option<usize> {
        self.nonterminals.iter().position(|&c| c == symbol)
    }

    pub fn alternatives(&self, head: char) -> impl Iterator<Item = &Alternative> {
        self.rules.get(&head).into_iter().flatten()
    }

    // Every production as (head, alternative), heads in registration order
    pub fn productions(&self) -> impl Iterator<Item = (char, &Alternative)> {
        self.nonterminals
            .iter()
            .flat_map(move |&head| self.alternatives(head).map(move |alternative| (head, alternative)))
    }

    fn parse_alternative(&self, rhs: &str) -> Option<Alternative> {
        match rhs.chars().collect_vec()[..] {
            [terminal] if self.is_terminal(terminal) => Some(Alternative::Unary(terminal)),
            [left, right] if self.is_nonterminal(left) && self.is_nonterminal(right) => {
                Some(Alternative::Binary(left, right))
            }
            _ => None,
        }
    }

    fn insert_alternative(&mut self, head: char, alternative: Alternative) -> Result<()> {
        let alternatives = self.rules.entry(head).or_default();
        if alternatives.contains(&alternative) {
            return Err(GrammarErrorType::DuplicateProduction(head, alternative.to_string()));
        }
        debug!(%head, %alternative, "adding production");
        alternatives.insert(alternative);
        return Ok(());
    }
}

impl Display for Grammar {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.get_grammar())
    }
}
