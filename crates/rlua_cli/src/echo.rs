//! Token echo formats shared by the REPL and the `tokenize` command.

use rlua_options::EchoFormat;
use rlua_scanner::Token;
use serde::Serialize;
use std::io::Write;

use crate::error::CliError;

#[derive(Serialize)]
struct TokenRecord<'a> {
    #[serde(rename = "type")]
    kind: &'static str,
    literal: &'a str,
    line: u32,
    column: u32,
    start: u32,
    end: u32,
}

impl<'a> From<&'a Token> for TokenRecord<'a> {
    fn from(token: &'a Token) -> Self {
        Self {
            kind: token.kind.as_str(),
            literal: &token.literal,
            line: token.line,
            column: token.column,
            start: token.span.start,
            end: token.span.end(),
        }
    }
}

/// Write one token on its own line.
pub fn write_token<W: Write>(out: &mut W, token: &Token, format: EchoFormat) -> Result<(), CliError> {
    match format {
        EchoFormat::Debug => writeln!(out, "{}", token)?,
        EchoFormat::Json => {
            serde_json::to_writer(&mut *out, &TokenRecord::from(token))?;
            writeln!(out)?;
        }
    }
    Ok(())
}
