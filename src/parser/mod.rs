/*
    This module loads CNF grammar files

    Every line holds a rule such as `S = AB | a` (or `S ::= AB | a`).
    Uppercase letters are nonterminals, lowercase letters are terminals and
    lines starting with `;` are comments
*/

mod lexer;
mod verifier;

use std::fmt::Display;
use std::fs::File;
use std::io::BufRead;
use std::path::{Path, PathBuf};

use crate::grammar::*;
use crate::error_handling::*;
use itertools::Itertools;
use lexer::*;
use tracing::debug;
use verifier::verify_rules;

#[derive(Debug)]
pub enum CompileErrorType {
    // A line which should contain a rule does not
    MissingEquals,
    // A rule has multiple equals signs
    UnexpectedEquals,
    // The user starts a rule line with something other than a nonterminal
    MissingNonterminal,
    // Something that is neither a letter nor part of the rule syntax
    UnexpectedCharacter(char),
    // A nonterminal is used but no rule defines it
    UndefinedNonterminal(char),
    // The grammar store refused a symbol or production
    Grammar(GrammarErrorType),
    // There was an issue with reading a file
    FileError(std::io::Error),
}

impl ErrorType for CompileErrorType {}

impl PartialEq for CompileErrorType {
    fn eq(&self, other: &Self) -> bool {
        use CompileErrorType::*;
        match (self, other) {
            (FileError(a), FileError(b)) => a.kind() == b.kind(),
            (UnexpectedCharacter(a), UnexpectedCharacter(b)) => a == b,
            (UndefinedNonterminal(a), UndefinedNonterminal(b)) => a == b,
            (Grammar(a), Grammar(b)) => a == b,
            _ => std::mem::discriminant(self) == std::mem::discriminant(other),
        }
    }
}

impl Display for CompileErrorType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            CompileErrorType::MissingEquals => write!(f, "Expected `=` or `::=` after nonterminal"),
            CompileErrorType::UnexpectedEquals => write!(f, "Unexpected `=` encountered"),
            CompileErrorType::MissingNonterminal => write!(f, "Tried to define something other than a nonterminal"),
            CompileErrorType::UnexpectedCharacter(c) => write!(f, "Unexpected character `{}`", c),
            CompileErrorType::UndefinedNonterminal(c) => write!(f, "Could not find definition for `{}`", c),
            CompileErrorType::Grammar(e) => write!(f, "{}", e),
            CompileErrorType::FileError(e) => write!(f, "File error: {}", e),
        }
    }
}

impl From<GrammarErrorType> for CompileErrorType {
    fn from(error: GrammarErrorType) -> Self {
        CompileErrorType::Grammar(error)
    }
}

pub type CompileError = Error<CompileErrorType>;
pub type CompileErrors = Errors<CompileErrorType>;

fn io_error(error: std::io::Error, file: PathBuf) -> CompileError {
    CompileError {
        location: Location::whole_file(file),
        error: CompileErrorType::FileError(error)
    }
}

pub type Result<T> = std::result::Result<T, CompileErrorType>;
pub type LineResult<T> = std::result::Result<T, CompileError>;
pub type FileResult<T> = std::result::Result<T, CompileErrors>;

// One line of the file. The alternatives are not checked against CNF yet
#[derive(PartialEq, Debug)]
pub struct Rule {
    pub head: char,
    pub alternatives: Vec<Vec<Symbol>>,
    pub location: Location
}

fn parse_alternative(tokens: &[Token]) -> Result<Vec<Symbol>> {
    tokens.iter().map(|t| match t {
        Token::Equals => Err(CompileErrorType::UnexpectedEquals),
        Token::Or => Err(CompileErrorType::UnexpectedCharacter('|')),
        Token::Nonterminal(c) => Ok(Symbol::Nonterminal(*c)),
        Token::Terminal(c) => Ok(Symbol::Terminal(*c))
    }).collect()
}

fn parse_line(tokens: &[Token], location: Location) -> Result<Rule> {
    let head = match tokens.first() {
        Some(Token::Nonterminal(c)) => *c,
        _ => return Err(CompileErrorType::MissingNonterminal),
    };

    if tokens.get(1) != Some(&Token::Equals) {
        return Err(CompileErrorType::MissingEquals)
    }

    let alternatives = tokens[2..]
        .split(|t| *t == Token::Or)
        .map(parse_alternative)
        .collect::<Result<Vec<_>>>()?;

    return Ok(Rule {
        head,
        alternatives,
        location
    });
}

fn parse_lex_line(line: &str, location: Location) -> LineResult<Rule> {
    lexer::lex_line(line)
        .and_then(|lexed_line| parse_line(&lexed_line, location.clone()))
        .map_err(|error| CompileError { location, error })
}

fn is_rule_line(line: &str) -> bool {
    let line = line.trim();
    !line.is_empty() && !line.starts_with(';')
}

fn rule_symbols(rule: &Rule) -> impl Iterator<Item = Symbol> + '_ {
    std::iter::once(Symbol::Nonterminal(rule.head))
        .chain(rule.alternatives.iter().flatten().copied())
}

fn alternative_text(alternative: &[Symbol]) -> String {
    alternative.iter().map(|symbol| match symbol {
        Symbol::Nonterminal(c) | Symbol::Terminal(c) => *c
    }).collect()
}

// Symbols are registered in order of first appearance, the first rule gives
// the start symbol
fn grammar_from_rules(rules: Vec<Rule>) -> FileResult<Grammar> {
    verify_rules(&rules)?;

    let mut grammar = Grammar::new();
    let mut errors = CompileErrors::new();

    for rule in &rules {
        for symbol in rule_symbols(rule) {
            let added = match symbol {
                Symbol::Nonterminal(c) if !grammar.is_nonterminal(c) => grammar.add_nonterminal(c),
                Symbol::Terminal(c) if !grammar.is_terminal(c) => grammar.add_terminal(c),
                _ => Ok(()),
            };
            if let Err(error) = added {
                errors.push(CompileError { location: rule.location.clone(), error: error.into() });
            }
        }
    }

    if let Some(first) = rules.first() {
        if let Err(error) = grammar.set_start_symbol(first.head) {
            errors.push(CompileError { location: first.location.clone(), error: error.into() });
        }
    }

    for rule in &rules {
        for alternative in &rule.alternatives {
            if let Err(error) = grammar.add_production(rule.head, &alternative_text(alternative)) {
                errors.push(CompileError { location: rule.location.clone(), error: error.into() });
            }
        }
    }

    if errors.len() > 0 {
        return Err(errors);
    }

    debug!(rules = rules.len(), nonterminals = grammar.nonterminals().len(), "loaded grammar");
    return Ok(grammar);
}

fn parse_lines(lines: impl Iterator<Item = (usize, LineResult<String>)>, path: &Path) -> FileResult<Grammar> {
    let parsed_lines = lines.map(|(num, line_res)| {
        line_res.and_then(|line| parse_lex_line(&line, Location::at_line(path.to_path_buf(), num)))
    });

    let (rules, errors): (Vec<_>, Vec<_>) = parsed_lines.partition_result();
    if errors.len() > 0 {
        return Err(errors);
    }

    return grammar_from_rules(rules);
}

// Returns an iterator over the lines of a file, with the io errors wrapped
// in CompileError and enumerated
fn file_line_nums<'a>(file: File, path: &'a Path) -> impl Iterator<Item = (usize, LineResult<String>)> + 'a {
    std::io::BufReader::new(file)
        .lines()
        .map(move |line| line.map_err(|e| io_error(e, path.to_path_buf())))
        .enumerate()
        .filter(|(_, line)| line.as_ref().map_or(true, |line| is_rule_line(line)))
        .map(|(num, line)| (num + 1, line))
}

pub fn parse_file(path: &Path) -> FileResult<Grammar> {
    let file = File::open(path).map_err(|e| vec![io_error(e, path.to_path_buf())])?;
    return parse_lines(file_line_nums(file, path), path);
}

// Parses grammar text, reporting errors as if it came from `path`
pub fn parse_str(source: &str, path: &Path) -> FileResult<Grammar> {
    let lines = source
        .lines()
        .enumerate()
        .filter(|(_, line)| is_rule_line(line))
        .map(|(num, line)| (num + 1, Ok(line.to_string())));
    return parse_lines(lines, path);
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::chart::is_derived;

    fn location(line: usize) -> Location {
        Location::at_line(PathBuf::from("test.cnf"), line)
    }

    fn parse(source: &str) -> FileResult<Grammar> {
        parse_str(source, Path::new("test.cnf"))
    }

    #[test]
    fn parse_normal_alternative() {
        let tokens = [Token::Nonterminal('A'), Token::Nonterminal('B')];
        assert_eq!(
            parse_alternative(&tokens).unwrap(),
            vec![Symbol::Nonterminal('A'), Symbol::Nonterminal('B')]
        );
        assert_eq!(parse_alternative(&[Token::Terminal('a')]).unwrap(), vec![Symbol::Terminal('a')]);
    }

    #[test]
    fn parse_malformed_alternative() {
        assert_eq!(parse_alternative(&[Token::Equals]), Err(CompileErrorType::UnexpectedEquals));
        assert_eq!(parse_alternative(&[Token::Or]), Err(CompileErrorType::UnexpectedCharacter('|')));
    }

    #[test]
    fn parse_normal_line() {
        let lexed = lexer::lex_line("S = AB | a").unwrap();

        let answer = Rule {
            head: 'S',
            alternatives: vec![
                vec![Symbol::Nonterminal('A'), Symbol::Nonterminal('B')],
                vec![Symbol::Terminal('a')]
            ],
            location: location(1)
        };

        assert_eq!(parse_line(&lexed[..], location(1)), Ok(answer));
    }

    #[test]
    fn parse_malformed_line() {
        assert_eq!(parse_line(&[], location(1)), Err(CompileErrorType::MissingNonterminal));
        assert_eq!(
            parse_line(&lexer::lex_line("S AB").unwrap()[..], location(1)),
            Err(CompileErrorType::MissingEquals)
        );
        assert_eq!(
            parse_line(&lexer::lex_line("a = AB").unwrap()[..], location(1)),
            Err(CompileErrorType::MissingNonterminal)
        );
        assert_eq!(
            parse_line(&lexer::lex_line("= AB").unwrap()[..], location(1)),
            Err(CompileErrorType::MissingNonterminal)
        );
        assert_eq!(
            parse_line(&lexer::lex_line("S = A = B").unwrap()[..], location(1)),
            Err(CompileErrorType::UnexpectedEquals)
        );
    }

    #[test]
    fn parse_normal_file() {
        let grammar = parse_file(Path::new("grammars/textbook.cnf")).unwrap();

        assert_eq!(grammar.nonterminals(), &['S', 'A', 'B', 'C']);
        assert_eq!(grammar.terminals().sorted().collect_vec(), vec!['a', 'b']);
        assert_eq!(grammar.start_symbol(), Some('S'));
        assert_eq!(
            grammar.get_grammar(),
            "S -> S::=AB|BC\nA -> A::=BA|a\nB -> B::=CC|b\nC -> C::=AB|a\n"
        );
        assert_eq!(is_derived(&grammar, "baaba"), Ok(true));
        assert_eq!(is_derived(&grammar, "bbb"), Ok(false));
    }

    #[test]
    fn parse_malformed_file() {
        let example_path = PathBuf::from("grammars/malformed.cnf");
        let example_parsed = parse_file(&example_path).unwrap_err();

        let at = |line| Location::at_line(example_path.clone(), line);
        assert_eq!(example_parsed, vec![
            CompileError { location: at(4), error: CompileErrorType::MissingNonterminal },
            CompileError { location: at(5), error: CompileErrorType::MissingEquals },
            CompileError { location: at(6), error: CompileErrorType::UnexpectedEquals },
            CompileError { location: at(7), error: CompileErrorType::UnexpectedCharacter('1') },
        ]);
    }

    #[test]
    fn parse_non_cnf_file() {
        let example_path = PathBuf::from("grammars/not_cnf.cnf");
        let example_parsed = parse_file(&example_path).unwrap_err();

        let at = |line| Location::at_line(example_path.clone(), line);
        assert_eq!(example_parsed, vec![
            CompileError {
                location: at(2),
                error: CompileErrorType::Grammar(GrammarErrorType::InvalidProduction('S', "aA".to_string()))
            },
            CompileError {
                location: at(3),
                error: CompileErrorType::Grammar(GrammarErrorType::DuplicateProduction('A', "a".to_string()))
            },
            CompileError {
                location: at(4),
                error: CompileErrorType::Grammar(GrammarErrorType::InvalidProduction('B', "".to_string()))
            },
        ]);
    }

    #[test]
    fn parse_missing_file() {
        let missing = PathBuf::from("grammars/does_not_exist.cnf");
        let error = parse_file(&missing).unwrap_err();
        assert_eq!(error, vec![CompileError {
            location: Location::whole_file(missing),
            error: CompileErrorType::FileError(std::io::Error::from(std::io::ErrorKind::NotFound))
        }]);
    }

    #[test]
    fn report_undefined_nonterminals() {
        assert_eq!(parse("S = AB\nA = a\n"), Err(vec![
            CompileError { location: location(1), error: CompileErrorType::UndefinedNonterminal('B') }
        ]));
    }

    #[test]
    fn rules_accumulate_across_lines() {
        let grammar = parse("; two lines for S\nS = AA\n\nA = a\nS ::= a\n").unwrap();
        assert_eq!(grammar.get_productions('S'), "S::=AA|a");
        assert_eq!(is_derived(&grammar, "aa"), Ok(true));
        assert_eq!(is_derived(&grammar, "a"), Ok(true));
    }

    #[test]
    fn production_listing_reads_back() {
        let grammar = parse_file(Path::new("grammars/textbook.cnf")).unwrap();
        let listing = grammar
            .nonterminals()
            .iter()
            .map(|&head| grammar.get_productions(head))
            .join("\n");
        assert_eq!(parse(&listing).unwrap(), grammar);
    }

    #[test]
    fn empty_source_gives_empty_grammar() {
        assert_eq!(parse("; nothing here\n\n"), Ok(Grammar::new()));
    }
}
