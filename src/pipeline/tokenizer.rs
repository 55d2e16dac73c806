// src/pipeline/tokenizer.rs

//! Quote-aware splitting of a rendered command into program + arguments.
//!
//! This is deliberately smaller than a POSIX shell: there is no escaping
//! inside quotes, no variable expansion and no globbing. A closing quote
//! always ends the current token, and `''` produces an empty argument.

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum LexState {
    Default,
    SingleQuote,
    DoubleQuote,
    Escaped,
}

/// A tokenized command line.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct CommandLine {
    /// First token, or empty when the input had no tokens.
    pub program: String,
    pub args: Vec<String>,
}

impl CommandLine {
    pub fn parse(input: &str) -> Self {
        let mut tokens = tokenize(input).into_iter();
        let program = tokens.next().unwrap_or_default();
        Self {
            program,
            args: tokens.collect(),
        }
    }

    pub fn is_empty(&self) -> bool {
        self.program.is_empty()
    }
}

/// Split `input` into tokens.
///
/// Unterminated quotes and a trailing backslash are closed implicitly at end
/// of input. U+FFFD and NUL are dropped wherever they appear.
pub fn tokenize(input: &str) -> Vec<String> {
    let mut tokens = Vec::new();
    let mut acc = String::new();
    let mut state = LexState::Default;

    for c in input.chars() {
        if c == '\u{FFFD}' || c == '\0' {
            continue;
        }

        match state {
            LexState::Default => match c {
                ' ' | '\t' | '\n' | '\r' => {
                    if !acc.is_empty() {
                        tokens.push(std::mem::take(&mut acc));
                    }
                }
                '\'' => state = LexState::SingleQuote,
                '"' => state = LexState::DoubleQuote,
                '\\' => state = LexState::Escaped,
                _ => acc.push(c),
            },
            LexState::SingleQuote => {
                if c == '\'' {
                    tokens.push(std::mem::take(&mut acc));
                    state = LexState::Default;
                } else {
                    acc.push(c);
                }
            }
            LexState::DoubleQuote => {
                if c == '"' {
                    tokens.push(std::mem::take(&mut acc));
                    state = LexState::Default;
                } else {
                    acc.push(c);
                }
            }
            LexState::Escaped => {
                acc.push(c);
                state = LexState::Default;
            }
        }
    }

    if !acc.is_empty() {
        tokens.push(acc);
    }

    tokens
}
