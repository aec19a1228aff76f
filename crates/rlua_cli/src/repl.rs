//! Line-oriented read-scan-print loop.

use rlua_core::LineMap;
use rlua_options::ReplOptions;
use rlua_scanner::Scanner;
use std::io::{BufRead, Write};

use crate::echo::write_token;
use crate::error::CliError;

/// The startup greeting printed before the REPL banner.
pub fn greeting(user: Option<&str>) -> String {
    let user = match user {
        Some(name) if !name.is_empty() => name,
        _ => "user",
    };
    format!("Hello {}! This is the Lua programming language!\nFeel free to type in commands\n", user)
}

/// Run the REPL until end of input or the exit line.
///
/// Each line is scanned by a fresh scanner, so positions restart at line 1.
pub fn start<R: BufRead, W: Write>(mut input: R, out: &mut W, options: &ReplOptions) -> Result<(), CliError> {
    writeln!(out, "Lua Interpreter (Lexer Phase)")?;
    writeln!(out, "Type '{}' to quit", options.exit_command)?;
    writeln!(out)?;

    let mut buf = Vec::new();
    loop {
        write!(out, "{}", options.prompt)?;
        out.flush()?;

        buf.clear();
        if input.read_until(b'\n', &mut buf)? == 0 {
            return Ok(());
        }
        let line = String::from_utf8_lossy(strip_line_ending(&buf)).into_owned();
        if line == options.exit_command {
            writeln!(out, "Goodbye!")?;
            return Ok(());
        }

        let mut scanner = Scanner::new(&line);
        for token in scanner.by_ref() {
            write_token(out, &token, options.echo_format)?;
        }
        if options.show_diagnostics && !scanner.diagnostics().is_empty() {
            let line_map = LineMap::new(&line);
            for diagnostic in scanner.diagnostics().diagnostics() {
                writeln!(out, "{}", diagnostic.render(&line_map))?;
            }
        }
    }
}

fn strip_line_ending(line: &[u8]) -> &[u8] {
    let line = line.strip_suffix(b"\n").unwrap_or(line);
    line.strip_suffix(b"\r").unwrap_or(line)
}

#[cfg(test)]
mod tests {
    use super::*;
    use rlua_options::EchoFormat;

    fn run(input: &str, options: &ReplOptions) -> String {
        run_bytes(input.as_bytes(), options)
    }

    fn run_bytes(input: &[u8], options: &ReplOptions) -> String {
        let mut out = Vec::new();
        start(input, &mut out, options).unwrap();
        String::from_utf8(out).unwrap()
    }

    const BANNER: &str = "Lua Interpreter (Lexer Phase)\nType 'exit' to quit\n\n";

    #[test]
    fn test_greeting() {
        assert_eq!(
            greeting(Some("ada")),
            "Hello ada! This is the Lua programming language!\nFeel free to type in commands\n"
        );
        assert!(greeting(None).starts_with("Hello user!"));
        assert!(greeting(Some("")).starts_with("Hello user!"));
    }

    #[test]
    fn test_exit_line() {
        let out = run("exit\nlocal x\n", &ReplOptions::default());
        assert_eq!(out, format!("{}lua> Goodbye!\n", BANNER));
    }

    #[test]
    fn test_invalid_utf8_line_keeps_session_alive() {
        let out = run_bytes(b"x \xff y\nlocal z\nexit\n", &ReplOptions::default());
        assert!(out.contains("{Type:IDENT Literal:x Line:1 Column:1}\n"));
        assert!(out.contains("{Type:ILLEGAL Literal:\u{fffd} Line:1 Column:3}\n"));
        assert!(out.contains("{Type:IDENT Literal:y Line:1 Column:7}\n"));
        assert!(out.contains("{Type:local Literal:local Line:1 Column:1}\n"));
        assert!(out.contains("{Type:IDENT Literal:z Line:1 Column:7}\n"));
        assert!(out.ends_with("lua> Goodbye!\n"));
    }

    #[test]
    fn test_crlf_line_ending() {
        let out = run("a\r\nexit\r\n", &ReplOptions::default());
        assert_eq!(
            out,
            format!("{}lua> {{Type:IDENT Literal:a Line:1 Column:1}}\nlua> Goodbye!\n", BANNER)
        );
    }

    #[test]
    fn test_last_line_without_newline() {
        let out = run("b", &ReplOptions::default());
        assert_eq!(
            out,
            format!("{}lua> {{Type:IDENT Literal:b Line:1 Column:1}}\nlua> ", BANNER)
        );
    }

    #[test]
    fn test_end_of_input() {
        assert_eq!(run("", &ReplOptions::default()), format!("{}lua> ", BANNER));
    }

    #[test]
    fn test_echo_tokens() {
        let out = run("x = 1\n", &ReplOptions::default());
        assert_eq!(
            out,
            format!(
                "{}lua> {{Type:IDENT Literal:x Line:1 Column:1}}\n\
                 {{Type:= Literal:= Line:1 Column:3}}\n\
                 {{Type:NUMBER Literal:1 Line:1 Column:5}}\n\
                 lua> ",
                BANNER
            )
        );
    }

    #[test]
    fn test_blank_line_echoes_nothing() {
        let out = run("\n   \n", &ReplOptions::default());
        assert_eq!(out, format!("{}lua> lua> lua> ", BANNER));
    }

    #[test]
    fn test_exit_must_match_whole_line() {
        let out = run(" exit\n", &ReplOptions::default());
        assert!(out.contains("Literal:exit"));
        assert!(!out.contains("Goodbye!"));
    }

    #[test]
    fn test_custom_options() {
        let options = ReplOptions {
            prompt: "> ".to_string(),
            echo_format: EchoFormat::Json,
            show_diagnostics: true,
            exit_command: "quit".to_string(),
        };
        let out = run("'abc\nquit\n", &options);
        assert!(out.starts_with("Lua Interpreter (Lexer Phase)\nType 'quit' to quit\n\n> "));
        assert!(out.contains(r#""type":"STRING""#));
        assert!(out.contains("1:1: error LUA1002: Unterminated string literal."));
        assert!(out.ends_with("> Goodbye!\n"));
    }
}
