//! Recursive-descent file parser producing an [`AssignmentList`] (spec §4.3).

use std::path::{Path, PathBuf};

use crate::assignment::{Assignment, AssignmentList};
use crate::decode::decode_string;
use crate::error::{ConfigError, ConfigResult};
use crate::lexer::Lexer;
use crate::token::{Token, TokenKind};

/// Include nesting never goes deeper than this (spec §3, §5).
pub const MAX_INCLUDE_DEPTH: usize = 10;

/// Parses `path` as a root configuration file, following `include`
/// directives recursively. `data_dir`, if given, is where a relative root
/// path (or an include with no enclosing file) is resolved against.
pub fn parse_file(path: &Path, data_dir: Option<&Path>) -> ConfigResult<AssignmentList> {
    let mut list = AssignmentList::new();
    let root = resolve_path(path, None, data_dir);
    open(&root, Some(&root), 1, data_dir, &mut list)?;
    Ok(list)
}

fn resolve_path(path: &Path, calling_file: Option<&Path>, data_dir: Option<&Path>) -> PathBuf {
    if path.is_absolute() {
        return path.to_path_buf();
    }
    if let Some(calling) = calling_file {
        if let Some(parent) = calling.parent().filter(|p| !p.as_os_str().is_empty()) {
            return parent.join(path);
        }
    }
    if let Some(dir) = data_dir {
        return dir.join(path);
    }
    std::env::current_dir()
        .map(|cwd| cwd.join(path))
        .unwrap_or_else(|_| path.to_path_buf())
}

fn syntax_error(file: &Path, line: usize, token: Option<String>) -> ConfigError {
    ConfigError::Syntax {
        file: file.to_path_buf(),
        line,
        token,
    }
}

fn open(
    path: &Path,
    calling_file: Option<&Path>,
    depth: usize,
    data_dir: Option<&Path>,
    list: &mut AssignmentList,
) -> ConfigResult<()> {
    if depth > MAX_INCLUDE_DEPTH {
        return Err(ConfigError::Limit {
            file: path.to_path_buf(),
            line: 0,
            max: MAX_INCLUDE_DEPTH,
        });
    }

    let contents = std::fs::read_to_string(path).map_err(|source| ConfigError::FileAccess {
        file: path.to_path_buf(),
        source,
    })?;

    let mut lexer = Lexer::new(&contents);

    loop {
        let Some(name_tok) = lexer.next_token() else {
            break;
        };
        if name_tok.kind == TokenKind::Eol {
            continue;
        }
        if !matches!(name_tok.kind, TokenKind::Id | TokenKind::QualifiedId) {
            return Err(syntax_error(path, name_tok.line, Some(name_tok.text)));
        }
        let name = name_tok.text.clone();
        let name_line = name_tok.line;

        let mut value_tok: Token = lexer
            .next_token()
            .ok_or_else(|| syntax_error(path, name_line, None))?;

        if value_tok.kind == TokenKind::Equals {
            value_tok = lexer
                .next_token()
                .ok_or_else(|| syntax_error(path, value_tok.line, None))?;
        }

        if !value_tok.is_value() {
            return Err(syntax_error(path, value_tok.line, Some(value_tok.text)));
        }

        let value = if value_tok.kind == TokenKind::String {
            decode_string(&value_tok.text)
        } else {
            value_tok.text.clone()
        };

        match lexer.next_token() {
            None => {}
            Some(t) if t.kind == TokenKind::Eol => {}
            Some(t) => return Err(syntax_error(path, t.line, Some(t.text))),
        }

        if name.eq_ignore_ascii_case("include") {
            let include_path = resolve_path(Path::new(&value), calling_file, data_dir);
            open(&include_path, Some(&include_path), depth + 1, data_dir, list)?;
            continue;
        }

        list.push(Assignment::new(&name, &value, path, name_line));
    }

    Ok(())
}
