//! rlua_scanner: Lexer/tokenizer for a Lua-like scripting language.
//!
//! Converts source text into a stream of typed tokens, with support for:
//! - Keywords, identifiers and the fixed operator/delimiter set
//! - Quoted strings with escapes and `[[ ... ]]` long strings
//! - Decimal, fractional, exponent and hexadecimal number literals
//! - `--` line comments and `--[[ ... ]]` block comments
//!
//! Malformed input never stops the scanner: it becomes an `Illegal` token,
//! and unterminated constructs are reported through diagnostics.

mod char_codes;
mod scanner;
mod token;

pub use scanner::Scanner;
pub use token::{lookup_ident, Token, TokenKind, KEYWORDS};
