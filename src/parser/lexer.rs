use itertools::Itertools;

use super::{CompileErrorType, Result};

#[derive(PartialEq, Debug, Clone, Copy)]
pub enum Token {
    Equals,
    Or,
    Nonterminal(char),
    Terminal(char),
}

// Reads a `::=` definition sign, the first colon not yet consumed
pub fn lex_definition(line: &mut impl Iterator<Item = char>) -> Result<Token> {
    match line.next_tuple() {
        Some((':', ':', '=')) => Ok(Token::Equals),
        _ => Err(CompileErrorType::UnexpectedCharacter(':')),
    }
}

pub fn lex_symbol(c: char) -> Result<Token> {
    if c.is_uppercase() {
        Ok(Token::Nonterminal(c))
    } else if c.is_lowercase() {
        Ok(Token::Terminal(c))
    } else {
        Err(CompileErrorType::UnexpectedCharacter(c))
    }
}

pub fn lex_line(line: &str) -> Result<Vec<Token>> {
    let mut tokens = Vec::new();

    let mut line_chars = line.chars().peekable();

    while let Some(&c) = line_chars.peek() {
        if c == '=' {
            line_chars.next();
            tokens.push(Token::Equals);
        } else if c == ':' {
            tokens.push(lex_definition(&mut line_chars)?);
        } else if c == '|' {
            line_chars.next();
            tokens.push(Token::Or);
        } else if c.is_whitespace() {
            line_chars.next();
        } else {
            line_chars.next();
            tokens.push(lex_symbol(c)?);
        }
    }

    return Ok(tokens);
}

#[cfg(test)]
mod tests {
    use std::iter::zip;

    use super::*;

    #[test]
    fn lex_normal_definition() {
        let mut chars = "::= AB".chars();
        assert_eq!(lex_definition(&mut chars).unwrap(), Token::Equals);
        assert_eq!(chars.collect::<String>(), " AB");
    }

    #[test]
    fn lex_broken_definition() {
        for line in [":=", "::", ":: =", ":"] {
            let mut chars = line.chars();
            assert_eq!(lex_definition(&mut chars).unwrap_err(), CompileErrorType::UnexpectedCharacter(':'));
        }
    }

    #[test]
    fn lex_symbols() {
        assert_eq!(lex_symbol('S'), Ok(Token::Nonterminal('S')));
        assert_eq!(lex_symbol('x'), Ok(Token::Terminal('x')));
        assert_eq!(lex_symbol('7'), Err(CompileErrorType::UnexpectedCharacter('7')));
        assert_eq!(lex_symbol('"'), Err(CompileErrorType::UnexpectedCharacter('"')));
    }

    #[test]
    fn lex_normal_line() {
        let lines = vec![
            "S = AB | a",
            "A::=BA|a",
            "  C   =   b  ",
        ];
        let answers = vec![
            vec![
                Token::Nonterminal('S'),
                Token::Equals,
                Token::Nonterminal('A'),
                Token::Nonterminal('B'),
                Token::Or,
                Token::Terminal('a'),
            ],
            vec![
                Token::Nonterminal('A'),
                Token::Equals,
                Token::Nonterminal('B'),
                Token::Nonterminal('A'),
                Token::Or,
                Token::Terminal('a'),
            ],
            vec![
                Token::Nonterminal('C'),
                Token::Equals,
                Token::Terminal('b'),
            ],
        ];

        for (line, answer) in zip(lines, answers) {
            assert_eq!(lex_line(line).unwrap(), answer)
        }
    }

    #[test]
    fn lex_malformed_line() {
        assert_eq!(lex_line("S = A1"), Err(CompileErrorType::UnexpectedCharacter('1')));
        assert_eq!(lex_line("S := AB"), Err(CompileErrorType::UnexpectedCharacter(':')));
        assert_eq!(lex_line("S = \"a\""), Err(CompileErrorType::UnexpectedCharacter('"')));
    }
}
