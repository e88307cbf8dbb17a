use std::collections::HashSet;

use itertools::Itertools;

use crate::grammar::Symbol::Nonterminal;
use super::CompileErrorType::UndefinedNonterminal;
use super::{CompileError, CompileErrors, FileResult, Rule};

fn get_rule_undefined_symbols(rule: &Rule, defined: &HashSet<char>) -> CompileErrors {
    // Keep only the nonterminals of every alternative, then the ones no rule
    // defines. Each symbol is reported once per line
    rule.alternatives.iter()
        .flatten()
        .filter_map(|symbol| match symbol {
            Nonterminal(c) => Some(*c),
            _ => None
        })
        .filter(|c| !defined.contains(c))
        .unique()
        .map(|c| CompileError {
            location: rule.location.clone(),
            error: UndefinedNonterminal(c)
        })
        .collect()
}

fn get_undefined_symbols(rules: &[Rule]) -> CompileErrors {
    let defined: HashSet<char> = rules.iter().map(|rule| rule.head).collect();
    rules.iter()
        .flat_map(|rule| get_rule_undefined_symbols(rule, &defined))
        .collect()
}

pub fn verify_rules(rules: &[Rule]) -> FileResult<()> {
    let mut errors = Vec::new();

    errors.extend(get_undefined_symbols(rules));

    if errors.len() > 0 {
        Err(errors)
    } else {
        Ok(())
    }
}
