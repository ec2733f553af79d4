//! Shell-like command line tokenization.
//!
//! Only word splitting and quote removal are performed. There is no variable expansion,
//! globbing, redirection or piping.

use crate::{ContainerzError, ContainerzResult};

//--------------------------------------------------------------------------------------------------
// Types
//--------------------------------------------------------------------------------------------------

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum State {
    Unquoted,
    SingleQuoted,
    DoubleQuoted,
}

//--------------------------------------------------------------------------------------------------
// Functions
//--------------------------------------------------------------------------------------------------

/// Splits a command line into an argument vector.
///
/// Unquoted spaces, tabs and newlines separate arguments. Text between matching single or double quotes
/// belongs to one argument and the quotes themselves are dropped. Inside single quotes every
/// character is literal; inside double quotes a backslash escapes `"` and `\`. Outside quotes a
/// backslash escapes any character. A backslash before a newline, quoted or not, is a line
/// continuation and both characters are dropped. Quoted and unquoted text with no separator in
/// between joins into one argument.
///
/// An empty command yields no arguments.
///
/// ## Errors
///
/// Returns [`ContainerzError::InvalidArgument`] if a quote is left open or the command ends
/// in an unescaped backslash.
///
/// ## Example
///
/// ```
/// use containerz_core::utils::tokenize;
///
/// assert_eq!(tokenize(r#"sh -c "echo 2""#).unwrap(), ["sh", "-c", "echo 2"]);
/// assert!(tokenize("").unwrap().is_empty());
/// ```
pub fn tokenize(command: &str) -> ContainerzResult<Vec<String>> {
    let mut args = Vec::new();
    let mut current = String::new();
    // Tracks whether `current` is a started argument, so `""` still yields an empty one.
    let mut in_arg = false;
    let mut state = State::Unquoted;
    let mut chars = command.chars();

    while let Some(c) = chars.next() {
        match state {
            State::Unquoted => match c {
                '\'' => {
                    state = State::SingleQuoted;
                    in_arg = true;
                }
                '"' => {
                    state = State::DoubleQuoted;
                    in_arg = true;
                }
                '\\' => match chars.next() {
                    Some('\n') => {}
                    Some(escaped) => {
                        current.push(escaped);
                        in_arg = true;
                    }
                    None => {
                        return Err(invalid_command(command, "ends with an unescaped backslash"))
                    }
                },
                ' ' | '\t' | '\n' => {
                    if in_arg {
                        args.push(std::mem::take(&mut current));
                        in_arg = false;
                    }
                }
                c => {
                    current.push(c);
                    in_arg = true;
                }
            },
            State::SingleQuoted => match c {
                '\'' => state = State::Unquoted,
                c => current.push(c),
            },
            State::DoubleQuoted => match c {
                '"' => state = State::Unquoted,
                '\\' => match chars.next() {
                    Some('\n') => {}
                    Some(escaped @ ('"' | '\\')) => current.push(escaped),
                    Some(other) => {
                        current.push('\\');
                        current.push(other);
                    }
                    None => {
                        return Err(invalid_command(command, "has an unterminated double quote"))
                    }
                },
                c => current.push(c),
            },
        }
    }

    match state {
        State::SingleQuoted => Err(invalid_command(command, "has an unterminated single quote")),
        State::DoubleQuoted => Err(invalid_command(command, "has an unterminated double quote")),
        State::Unquoted => {
            if in_arg {
                args.push(current);
            }
            Ok(args)
        }
    }
}

fn invalid_command(command: &str, reason: &str) -> ContainerzError {
    ContainerzError::InvalidArgument(format!("command {:?} {}", command, reason))
}

//--------------------------------------------------------------------------------------------------
// Tests
//--------------------------------------------------------------------------------------------------
