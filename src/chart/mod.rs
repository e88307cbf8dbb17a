/*
    This module runs the CYK algorithm over a grammar and renders its chart
*/

use std::collections::BTreeSet;
use std::fmt::Display;

use tracing::{debug, trace};

use crate::error_handling::ErrorType;
use crate::grammar::{Alternative, Grammar};

#[derive(Debug, PartialEq, Clone)]
pub enum ChartErrorType {
    // There is nothing to check
    EmptyInput,
    // No nonterminals, or no start symbol to accept with
    IncompleteGrammar,
    // A character of the word is not a terminal of the grammar
    UnknownTerminal(char),
    // A character of the sentential form is not a nonterminal of the grammar
    InvalidWord(char),
}

impl ErrorType for ChartErrorType {}

impl Display for ChartErrorType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ChartErrorType::EmptyInput => write!(f, "The word is empty"),
            ChartErrorType::IncompleteGrammar => write!(f, "The grammar has no nonterminals or no start symbol"),
            ChartErrorType::UnknownTerminal(c) => write!(f, "`{}` is not a terminal of the grammar", c),
            ChartErrorType::InvalidWord(c) => write!(f, "`{}` is not a nonterminal of the grammar", c),
        }
    }
}

pub type Result<T> = std::result::Result<T, ChartErrorType>;

// Nonterminals that derive a span, stored as positions in registration order
pub type Cell = BTreeSet<usize>;

// A binary production `head -> left right` with every symbol as a position
type BinaryRule = (usize, usize, usize);

// Triangular table over the spans of a word. Cells are kept in one flat
// vector, grouped by span length with the shortest spans first
#[derive(Debug, PartialEq)]
pub struct Chart {
    len: usize,
    symbols: Vec<char>,
    cells: Vec<Cell>,
}

impl Chart {
    // Takes the cells of the length-1 spans and derives all the longer ones
    fn build(grammar: &Grammar, base: Vec<Cell>) -> Self {
        let len = base.len();
        let mut cells = base;
        cells.resize(len * (len + 1) / 2, Cell::new());

        let mut chart = Chart {
            len,
            symbols: grammar.nonterminals().to_vec(),
            cells,
        };
        chart.fill(&binary_rules(grammar));

        debug!(length = len, cells = chart.cells.len(), "built chart");
        return chart;
    }

    fn fill(&mut self, rules: &[BinaryRule]) {
        for length in 2..=self.len {
            for start in 0..=(self.len - length) {
                let end = start + length - 1;
                let mut derived = Cell::new();

                for split in start..end {
                    let left = &self.cells[self.position(start, split)];
                    let right = &self.cells[self.position(split + 1, end)];
                    for &(head, left_symbol, right_symbol) in rules {
                        if left.contains(&left_symbol) && right.contains(&right_symbol) {
                            derived.insert(head);
                        }
                    }
                }

                trace!(start, end, derived = derived.len(), "filled cell");
                let position = self.position(start, end);
                self.cells[position] = derived;
            }
        }
    }

    // Callers must keep start <= end < len
    fn position(&self, start: usize, end: usize) -> usize {
        let span = end - start;
        span * (2 * self.len - span + 1) / 2 + start
    }

    pub fn len(&self) -> usize {
        self.len
    }

    pub fn is_empty(&self) -> bool {
        self.len == 0
    }

    // The cell of the span `start..=end`, None when it lies outside the word
    pub fn cell(&self, start: usize, end: usize) -> Option<&Cell> {
        if start > end || end >= self.len {
            return None;
        }
        self.cells.get(self.position(start, end))
    }

    // The nonterminals of a cell as characters, in registration order
    pub fn symbols(&self, start: usize, end: usize) -> String {
        self.cell(start, end)
            .into_iter()
            .flatten()
            .filter_map(|&index| self.symbols.get(index))
            .collect()
    }

    // Whether `symbol` derives the whole word
    pub fn accepts(&self, symbol: char) -> bool {
        if self.is_empty() {
            return false;
        }
        self.symbols(0, self.len - 1).contains(symbol)
    }
}

// Every cell as `(i,j): SYMBOLS `, one row per start offset
impl Display for Chart {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        for start in 0..self.len {
            for end in start..self.len {
                write!(f, "({},{}): {} ", start, end, self.symbols(start, end))?;
            }
            writeln!(f)?;
        }
        Ok(())
    }
}

fn binary_rules(grammar: &Grammar) -> Vec<BinaryRule> {
    grammar
        .productions()
        .filter_map(|(head, alternative)| match *alternative {
            Alternative::Binary(left, right) => Some((
                grammar.nonterminal_index(head)?,
                grammar.nonterminal_index(left)?,
                grammar.nonterminal_index(right)?,
            )),
            Alternative::Unary(_) => None,
        })
        .collect()
}

// Nonterminals with a production straight to the terminal
fn terminal_cell(grammar: &Grammar, terminal: char) -> Cell {
    grammar
        .productions()
        .filter(|(_, alternative)| **alternative == Alternative::Unary(terminal))
        .filter_map(|(head, _)| grammar.nonterminal_index(head))
        .collect()
}

// Checks the word against the grammar and builds its chart, also giving
// back the start symbol to accept with
pub fn build_chart(grammar: &Grammar, word: &str) -> Result<(Chart, char)> {
    if word.is_empty() {
        return Err(ChartErrorType::EmptyInput);
    }
    let start_symbol = match grammar.start_symbol() {
        Some(symbol) if !grammar.nonterminals().is_empty() => symbol,
        _ => return Err(ChartErrorType::IncompleteGrammar),
    };

    let base = word
        .chars()
        .map(|c| {
            if grammar.is_terminal(c) {
                Ok(terminal_cell(grammar, c))
            } else {
                Err(ChartErrorType::UnknownTerminal(c))
            }
        })
        .collect::<Result<Vec<Cell>>>()?;

    return Ok((Chart::build(grammar, base), start_symbol));
}

pub fn is_derived(grammar: &Grammar, word: &str) -> Result<bool> {
    let (chart, start_symbol) = build_chart(grammar, word)?;
    return Ok(chart.accepts(start_symbol));
}

// The full chart of a terminal word
pub fn chart_to_string(grammar: &Grammar, word: &str) -> Result<String> {
    let (chart, _) = build_chart(grammar, word)?;
    return Ok(chart.to_string());
}

// The chart of a string of nonterminals. Each length-1 span holds the
// nonterminal itself and longer spans follow the binary productions
pub fn algorithm_state_to_string(grammar: &Grammar, word: &str) -> Result<String> {
    let base = word
        .chars()
        .map(|c| {
            grammar
                .nonterminal_index(c)
                .map(|index| Cell::from([index]))
                .ok_or(ChartErrorType::InvalidWord(c))
        })
        .collect::<Result<Vec<Cell>>>()?;

    return Ok(Chart::build(grammar, base).to_string());
}
