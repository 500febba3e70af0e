//! Longest-match scanner for the configuration-file grammar (spec §4.1).
//!
//! Hand-written rather than table-generated: the grammar is small and
//! regular, and a hand-written scanner keeps the longest-match logic for
//! the overlapping identifier / qualified-identifier / unquoted-string
//! classes easy to follow.

use std::sync::OnceLock;

use regex::Regex;

use crate::token::{Token, TokenKind};

fn is_ident_start(c: char) -> bool {
    c.is_ascii_alphabetic() || c == '_' || (c as u32) >= 0x80
}

fn is_ident_cont(c: char) -> bool {
    is_ident_start(c) || c.is_ascii_digit()
}

fn is_unquoted_cont(c: char) -> bool {
    is_ident_cont(c) || matches!(c, '-' | '.' | ':' | '/')
}

fn is_numeric_run_char(c: char) -> bool {
    c.is_ascii_alphanumeric() || matches!(c, '.' | '+' | '-')
}

fn real_re() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| Regex::new(r"^[+-]?[0-9]+\.[0-9]+([eE][+-]?[0-9]+)?$").unwrap())
}

fn integer_re() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| {
        Regex::new(r"^[+-]?(0[xX][0-9a-fA-F]+|[0-9]+)[A-Za-z]*$").unwrap()
    })
}

/// Scans a byte/char stream into [`Token`]s, tracking the current line.
pub struct Lexer {
    chars: Vec<char>,
    pos: usize,
    line: usize,
}

impl Lexer {
    pub fn new(input: &str) -> Self {
        Self {
            chars: input.chars().collect(),
            pos: 0,
            line: 1,
        }
    }

    pub fn line(&self) -> usize {
        self.line
    }

    fn peek(&self) -> Option<char> {
        self.chars.get(self.pos).copied()
    }

    fn peek_at(&self, offset: usize) -> Option<char> {
        self.chars.get(self.pos + offset).copied()
    }

    fn bump(&mut self) -> Option<char> {
        let c = self.peek()?;
        self.pos += 1;
        Some(c)
    }

    fn skip_trivia(&mut self) {
        loop {
            match self.peek() {
                Some(' ') | Some('\t') | Some('\r') => {
                    self.bump();
                }
                Some('#') => {
                    while let Some(c) = self.peek() {
                        if c == '\n' {
                            break;
                        }
                        self.bump();
                    }
                }
                _ => break,
            }
        }
    }

    /// Returns the next token, or `None` at end of input.
    pub fn next_token(&mut self) -> Option<Token> {
        self.skip_trivia();
        let line = self.line;
        let c = self.peek()?;

        if c == '\n' {
            self.bump();
            self.line += 1;
            return Some(Token {
                kind: TokenKind::Eol,
                text: "\n".to_string(),
                line,
            });
        }

        if c == '=' {
            self.bump();
            return Some(Token {
                kind: TokenKind::Equals,
                text: "=".to_string(),
                line,
            });
        }

        if c == '\'' {
            return Some(self.scan_string(line));
        }

        if is_ident_start(c) {
            return Some(self.scan_ident_like(line));
        }

        if c.is_ascii_digit()
            || ((c == '+' || c == '-') && self.peek_at(1).is_some_and(|n| n.is_ascii_digit()))
        {
            return Some(self.scan_numeric(line));
        }

        self.bump();
        Some(Token {
            kind: TokenKind::Error,
            text: c.to_string(),
            line,
        })
    }

    fn scan_string(&mut self, line: usize) -> Token {
        let start = self.pos;
        self.bump(); // opening quote
        loop {
            match self.peek() {
                None => break,
                Some('\n') => break,
                Some('\\') => {
                    self.bump();
                    self.bump(); // escaped char, consumed verbatim here
                }
                Some('\'') => {
                    self.bump();
                    if self.peek() == Some('\'') {
                        self.bump(); // doubled quote, stays inside the literal
                    } else {
                        break;
                    }
                }
                Some(_) => {
                    self.bump();
                }
            }
        }
        let text: String = self.chars[start..self.pos].iter().collect();
        Token {
            kind: TokenKind::String,
            text,
            line,
        }
    }

    fn scan_ident_like(&mut self, line: usize) -> Token {
        let start = self.pos;
        while let Some(c) = self.peek() {
            if is_unquoted_cont(c) {
                self.bump();
            } else {
                break;
            }
        }
        let text: String = self.chars[start..self.pos].iter().collect();

        if text.contains(['-', ':', '/']) {
            return Token {
                kind: TokenKind::UnquotedString,
                text,
                line,
            };
        }

        let dots = text.matches('.').count();
        let kind = match dots {
            0 => TokenKind::Id,
            1 => {
                let mut parts = text.splitn(2, '.');
                let (left, right) = (parts.next().unwrap(), parts.next().unwrap());
                if !left.is_empty() && !right.is_empty() {
                    TokenKind::QualifiedId
                } else {
                    TokenKind::UnquotedString
                }
            }
            _ => TokenKind::UnquotedString,
        };

        Token { kind, text, line }
    }

    fn scan_numeric(&mut self, line: usize) -> Token {
        let start = self.pos;
        while let Some(c) = self.peek() {
            if is_numeric_run_char(c) {
                self.bump();
            } else {
                break;
            }
        }
        let text: String = self.chars[start..self.pos].iter().collect();

        let kind = if real_re().is_match(&text) {
            TokenKind::Real
        } else if integer_re().is_match(&text) {
            TokenKind::Integer
        } else {
            TokenKind::Error
        };

        Token { kind, text, line }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn tokens(src: &str) -> Vec<(TokenKind, String)> {
        let mut lexer = Lexer::new(src);
        let mut out = Vec::new();
        while let Some(tok) = lexer.next_token() {
            out.push((tok.kind, tok.text));
        }
        out
    }

    #[test]
    fn lexes_basic_assignment() {
        let toks = tokens("work_mem = '64MB'\n");
        assert_eq!(
            toks,
            vec![
                (TokenKind::Id, "work_mem".into()),
                (TokenKind::Equals, "=".into()),
                (TokenKind::String, "'64MB'".into()),
                (TokenKind::Eol, "\n".into()),
            ]
        );
    }

    #[test]
    fn lexes_qualified_id() {
        let toks = tokens("myapp.flag='on'\n");
        assert_eq!(toks[0], (TokenKind::QualifiedId, "myapp.flag".into()));
    }

    #[test]
    fn lexes_unquoted_value_without_equals() {
        let toks = tokens("include 'b.conf'\n");
        assert_eq!(toks[0], (TokenKind::Id, "include".into()));
        assert_eq!(toks[1], (TokenKind::String, "'b.conf'".into()));
    }

    #[test]
    fn lexes_integer_with_unit() {
        let toks = tokens("shared_buffers 128MB\n");
        assert_eq!(toks[1], (TokenKind::Integer, "128MB".into()));
    }

    #[test]
    fn lexes_hex_integer() {
        let toks = tokens("mask 0x1F\n");
        assert_eq!(toks[1], (TokenKind::Integer, "0x1F".into()));
    }

    #[test]
    fn lexes_real() {
        let toks = tokens("factor -1.5e3\n");
        assert_eq!(toks[1], (TokenKind::Real, "-1.5e3".into()));
    }

    #[test]
    fn skips_comments_and_blank_lines() {
        let toks = tokens("# a comment\n\nwork_mem='1MB'\n");
        assert_eq!(toks[0].0, TokenKind::Eol);
        assert_eq!(toks[1].0, TokenKind::Eol);
        assert_eq!(toks[2], (TokenKind::Id, "work_mem".into()));
    }

    #[test]
    fn line_numbers_advance_across_includes_boundary_lines() {
        let mut lexer = Lexer::new("a=1\nb=2\n");
        let mut lines = Vec::new();
        while let Some(tok) = lexer.next_token() {
            lines.push(tok.line);
        }
        assert_eq!(lines, vec![1, 1, 1, 1, 2, 2, 2, 2]);
    }

    #[test]
    fn tracks_unquoted_string_with_path_chars() {
        let toks = tokens("log_directory /var/log/pg\n");
        assert_eq!(
            toks[1],
            (TokenKind::UnquotedString, "/var/log/pg".into())
        );
    }

    #[test]
    fn unknown_character_is_an_error_token() {
        let toks = tokens("@\n");
        assert_eq!(toks[0].0, TokenKind::Error);
    }
}
