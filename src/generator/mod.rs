/*
    This module generates random words in the language of a grammar
*/

use rand::prelude::*;
use std::{collections::HashMap, fmt::Display};

use crate::error_handling::ErrorType;
use crate::grammar::{Alternative, Grammar};

#[derive(Debug, PartialEq)]
pub enum GenerateErrorType {
    // There is no symbol to start generating from
    NoStartSymbol,
    // A nonterminal without productions was reached
    UndefinedNonterminal(char),
    // Every derivation from the nonterminal goes on forever
    Unproductive(char),
}

impl ErrorType for GenerateErrorType {}

impl Display for GenerateErrorType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            GenerateErrorType::NoStartSymbol => write!(f, "The grammar has no start symbol"),
            GenerateErrorType::UndefinedNonterminal(nonterminal) => write!(f, "No definition for nonterminal `{}`", nonterminal),
            GenerateErrorType::Unproductive(nonterminal) => write!(f, "Nonterminal `{}` never derives a word", nonterminal),
        }
    }
}

pub type GenResult = Result<String, GenerateErrorType>;

// Height of the smallest derivation tree for every productive nonterminal
type Heights = HashMap<char, usize>;

pub fn generate<R: Rng + ?Sized>(grammar: &Grammar, rng: &mut R, max_depth: usize) -> GenResult {
    let start = grammar.start_symbol().ok_or(GenerateErrorType::NoStartSymbol)?;
    generate_from(grammar, start, rng, max_depth)
}

// Generates a word derived from the given nonterminal. Past `max_depth` only
// the shortest derivations are followed, so generation always finishes
pub fn generate_from<R: Rng + ?Sized>(grammar: &Grammar, symbol: char, rng: &mut R, max_depth: usize) -> GenResult {
    let heights = min_heights(grammar);
    let mut word = String::new();
    generate_nonterminal(symbol, grammar, &heights, rng, 0, max_depth, &mut word)?;
    return Ok(word);
}

fn min_heights(grammar: &Grammar) -> Heights {
    let mut heights = Heights::new();
    loop {
        let mut changed = false;
        for (head, alternative) in grammar.productions() {
            let Some(height) = alternative_height(alternative, &heights) else {
                continue;
            };
            if heights.get(&head).map_or(true, |&current| height < current) {
                heights.insert(head, height);
                changed = true;
            }
        }
        if !changed {
            return heights;
        }
    }
}

fn alternative_height(alternative: &Alternative, heights: &Heights) -> Option<usize> {
    match *alternative {
        Alternative::Unary(_) => Some(1),
        Alternative::Binary(left, right) => Some(1 + *heights.get(&left)?.max(heights.get(&right)?)),
    }
}

fn generate_nonterminal<R: Rng + ?Sized>(
    nonterminal: char,
    grammar: &Grammar,
    heights: &Heights,
    rng: &mut R,
    depth: usize,
    max_depth: usize,
    word: &mut String,
) -> Result<(), GenerateErrorType> {
    if grammar.alternatives(nonterminal).next().is_none() {
        return Err(GenerateErrorType::UndefinedNonterminal(nonterminal));
    }
    let shortest = *heights
        .get(&nonterminal)
        .ok_or(GenerateErrorType::Unproductive(nonterminal))?;

    let candidates: Vec<&Alternative> = grammar
        .alternatives(nonterminal)
        .filter(|alternative| match alternative_height(alternative, heights) {
            Some(height) => depth < max_depth || height == shortest,
            None => false,
        })
        .collect();

    match candidates.choose(rng) {
        Some(Alternative::Unary(terminal)) => word.push(*terminal),
        Some(Alternative::Binary(left, right)) => {
            generate_nonterminal(*left, grammar, heights, rng, depth + 1, max_depth, word)?;
            generate_nonterminal(*right, grammar, heights, rng, depth + 1, max_depth, word)?;
        }
        None => return Err(GenerateErrorType::Unproductive(nonterminal)),
    }
    return Ok(());
}
