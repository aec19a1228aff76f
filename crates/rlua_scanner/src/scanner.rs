//! The scanner.
//!
//! A single forward pass over the input bytes with one byte of lookahead.
//! Each call to [`Scanner::next_token`] skips whitespace and comments, then
//! classifies exactly one lexeme by its first byte and consumes it.

use crate::char_codes::*;
use crate::token::{lookup_ident, Token, TokenKind};
use log::{debug, trace};
use memchr::memchr;
use rlua_core::text::{TextPos, TextSpan};
use rlua_diagnostics::{messages, Diagnostic, DiagnosticCollection, DiagnosticMessage};

/// The scanner converts source text into tokens.
pub struct Scanner {
    /// The source text being scanned.
    text: String,
    /// Offset of `ch`.
    pos: usize,
    /// Offset just past `ch`.
    read_pos: usize,
    /// The byte under examination, `None` once the input is exhausted.
    ch: Option<u8>,
    /// 1-based line of `ch`.
    line: u32,
    /// Column tracker, reset to 0 when a newline becomes `ch`.
    column: u32,
    /// Accumulated diagnostics.
    diagnostics: DiagnosticCollection,
}

impl Scanner {
    /// Create a new scanner over a copy of `text` and prime the first byte.
    pub fn new(text: &str) -> Self {
        let mut scanner = Self {
            text: text.to_owned(),
            pos: 0,
            read_pos: 0,
            ch: None,
            line: 1,
            column: 0,
            diagnostics: DiagnosticCollection::new(),
        };
        scanner.read_char();
        scanner
    }

    /// Get the full source text.
    pub fn text(&self) -> &str {
        &self.text
    }

    /// Get the full source text length in bytes.
    pub fn text_len(&self) -> usize {
        self.text.len()
    }

    /// Byte offset of the next unconsumed byte.
    #[inline]
    pub fn pos(&self) -> usize {
        self.pos
    }

    #[inline]
    pub fn line(&self) -> u32 {
        self.line
    }

    #[inline]
    pub fn column(&self) -> u32 {
        self.column
    }

    /// Whether all input has been consumed.
    #[inline]
    pub fn is_eof(&self) -> bool {
        self.ch.is_none()
    }

    /// Get the accumulated diagnostics.
    pub fn diagnostics(&self) -> &DiagnosticCollection {
        &self.diagnostics
    }

    /// Take the accumulated diagnostics, leaving an empty collection.
    pub fn take_diagnostics(&mut self) -> DiagnosticCollection {
        std::mem::take(&mut self.diagnostics)
    }

    /// Scan every remaining token. The last element is always the `Eof` token.
    pub fn tokenize(&mut self) -> Vec<Token> {
        let mut tokens = Vec::new();
        loop {
            let token = self.next_token();
            let done = token.is_eof();
            tokens.push(token);
            if done {
                return tokens;
            }
        }
    }

    // ========================================================================
    // Cursor
    // ========================================================================

    /// Move to the next byte. A no-op once the end of input has been read.
    #[inline]
    fn read_char(&mut self) {
        if self.read_pos > self.text.len() {
            return;
        }
        self.ch = self.text.as_bytes().get(self.read_pos).copied();
        self.pos = self.read_pos;
        self.read_pos += 1;
        self.column += 1;
        if self.ch == Some(LINE_FEED) {
            self.line += 1;
            self.column = 0;
        }
    }

    /// Look at the byte after `ch` without advancing.
    #[inline]
    fn peek_char(&self) -> Option<u8> {
        self.text.as_bytes().get(self.read_pos).copied()
    }

    /// Copy `start..end` of the input. Both ends sit on character boundaries.
    fn slice(&self, start: usize, end: usize) -> String {
        self.text[start..end].to_owned()
    }

    /// Span from `start` to the cursor.
    fn span_from(&self, start: usize) -> TextSpan {
        TextSpan::from_bounds(text_pos(start), text_pos(self.pos))
    }

    fn report(&mut self, start: usize, message: &DiagnosticMessage, args: &[&str]) {
        let span = self.span_from(start);
        let diagnostic = Diagnostic::with_span(span, message, args);
        debug!("{} at {:?}", diagnostic, span);
        self.diagnostics.add(diagnostic);
    }

    // ========================================================================
    // Core scanning
    // ========================================================================

    /// Scan the next token. Returns `Eof` forever once the input is exhausted.
    pub fn next_token(&mut self) -> Token {
        self.skip_trivia();

        let start = self.pos;
        let line = self.line;
        let column = self.column;

        let (kind, literal) = match self.ch {
            None => (TokenKind::Eof, String::new()),
            Some(ch) => self.scan_lexeme(ch),
        };

        let token = Token::new(kind, literal)
            .at(line, column)
            .with_span(self.span_from(start));
        trace!("{}", token);
        token
    }

    /// Skip whitespace and comments until the next lexeme or the end of input.
    fn skip_trivia(&mut self) {
        loop {
            match self.ch {
                Some(ch) if is_white_space(ch) => self.read_char(),
                Some(MINUS) if self.peek_char() == Some(MINUS) => self.skip_comment(),
                _ => return,
            }
        }
    }

    fn skip_comment(&mut self) {
        let start = self.pos;
        self.read_char(); // skip first -
        self.read_char(); // skip second -

        if self.ch == Some(OPEN_BRACKET) && self.peek_char() == Some(OPEN_BRACKET) {
            self.skip_block_comment(start);
        } else {
            self.skip_line_comment();
        }
    }

    /// Skip to the end of the line, leaving the newline for whitespace skipping.
    fn skip_line_comment(&mut self) {
        let rest = &self.text.as_bytes()[self.pos..];
        let len = memchr(LINE_FEED, rest).unwrap_or(rest.len());
        if len == 0 {
            return;
        }
        // No newline in the skipped run, so the column moves with the offset.
        self.column += (len - 1) as u32;
        self.read_pos = self.pos + len;
        self.read_char();
    }

    fn skip_block_comment(&mut self, start: usize) {
        self.read_char(); // skip [
        self.read_char(); // skip [
        loop {
            match self.ch {
                None => {
                    self.report(start, &messages::UNTERMINATED_BLOCK_COMMENT, &[]);
                    return;
                }
                Some(CLOSE_BRACKET) if self.peek_char() == Some(CLOSE_BRACKET) => {
                    self.read_char();
                    self.read_char();
                    return;
                }
                Some(_) => self.read_char(),
            }
        }
    }

    /// Classify and consume the lexeme starting at `ch`.
    fn scan_lexeme(&mut self, ch: u8) -> (TokenKind, String) {
        match ch {
            b'=' => self.scan_operator(EQUALS, TokenKind::Eq, TokenKind::Assign),
            b'<' => self.scan_operator(EQUALS, TokenKind::Lte, TokenKind::Lt),
            b'>' => self.scan_operator(EQUALS, TokenKind::Gte, TokenKind::Gt),
            b'.' => self.scan_operator(DOT, TokenKind::Concat, TokenKind::Dot),
            b'~' if self.peek_char() == Some(EQUALS) => self.scan_pair(TokenKind::NotEq),

            b'+' => self.scan_single(TokenKind::Plus),
            b'-' => self.scan_single(TokenKind::Minus),
            b'*' => self.scan_single(TokenKind::Asterisk),
            b'/' => self.scan_single(TokenKind::Slash),
            b'%' => self.scan_single(TokenKind::Modulo),
            b'^' => self.scan_single(TokenKind::Power),
            b'#' => self.scan_single(TokenKind::Hash),
            b',' => self.scan_single(TokenKind::Comma),
            b';' => self.scan_single(TokenKind::Semicolon),
            b':' => self.scan_single(TokenKind::Colon),
            b'(' => self.scan_single(TokenKind::LParen),
            b')' => self.scan_single(TokenKind::RParen),
            b'{' => self.scan_single(TokenKind::LBrace),
            b'}' => self.scan_single(TokenKind::RBrace),
            b']' => self.scan_single(TokenKind::RBracket),
            b'[' if self.peek_char() == Some(OPEN_BRACKET) => {
                (TokenKind::String, self.scan_long_string())
            }
            b'[' => self.scan_single(TokenKind::LBracket),

            DOUBLE_QUOTE | SINGLE_QUOTE => (TokenKind::String, self.scan_string(ch)),

            _ if is_letter(ch) => {
                let text = self.scan_identifier();
                (lookup_ident(&text), text)
            }
            _ if is_digit(ch) => (TokenKind::Number, self.scan_number()),

            _ => self.scan_illegal(),
        }
    }

    // ========================================================================
    // Token-specific scanning methods
    // ========================================================================

    fn scan_single(&mut self, kind: TokenKind) -> (TokenKind, String) {
        let start = self.pos;
        self.read_char();
        (kind, self.slice(start, self.pos))
    }

    fn scan_pair(&mut self, kind: TokenKind) -> (TokenKind, String) {
        let start = self.pos;
        self.read_char();
        self.read_char();
        (kind, self.slice(start, self.pos))
    }

    /// Scan `ch` followed by `second` as `double`, or `ch` alone as `single`.
    fn scan_operator(&mut self, second: u8, double: TokenKind, single: TokenKind) -> (TokenKind, String) {
        if self.peek_char() == Some(second) {
            self.scan_pair(double)
        } else {
            self.scan_single(single)
        }
    }

    /// Scan a quoted string, decoding escapes. The closing quote must match
    /// the opening one; the end of input closes the string as well.
    fn scan_string(&mut self, quote: u8) -> String {
        let start = self.pos;
        self.read_char(); // skip opening quote
        let mut result = Vec::new();
        loop {
            match self.ch {
                None => {
                    self.report(start, &messages::UNTERMINATED_STRING_LITERAL, &[]);
                    break;
                }
                Some(ch) if ch == quote => {
                    self.read_char();
                    break;
                }
                Some(BACKSLASH) => {
                    self.read_char();
                    if let Some(escaped) = self.ch {
                        result.push(unescape(escaped));
                        self.read_char();
                    }
                }
                Some(ch) => {
                    result.push(ch);
                    self.read_char();
                }
            }
        }
        String::from_utf8(result)
            .unwrap_or_else(|e| String::from_utf8_lossy(e.as_bytes()).into_owned())
    }

    /// Scan a `[[ ... ]]` string verbatim. One newline right after the opening
    /// brackets is dropped.
    fn scan_long_string(&mut self) -> String {
        let start = self.pos;
        self.read_char(); // skip first [
        self.read_char(); // skip second [
        if self.ch == Some(LINE_FEED) {
            self.read_char();
        }

        let content_start = self.pos;
        loop {
            match self.ch {
                None => {
                    self.report(start, &messages::UNTERMINATED_LONG_STRING, &[]);
                    return self.slice(content_start, self.pos);
                }
                Some(CLOSE_BRACKET) if self.peek_char() == Some(CLOSE_BRACKET) => {
                    let content = self.slice(content_start, self.pos);
                    self.read_char();
                    self.read_char();
                    return content;
                }
                Some(_) => self.read_char(),
            }
        }
    }

    fn scan_number(&mut self) -> String {
        let start = self.pos;

        if self.ch == Some(_0) && matches!(self.peek_char(), Some(X_LOWER | X_UPPER)) {
            self.read_char(); // skip 0
            self.read_char(); // skip x
            self.scan_while(is_hex_digit);
            return self.slice(start, self.pos);
        }

        self.scan_while(is_digit);

        // A dot only belongs to the number when a digit follows it.
        if self.ch == Some(DOT) && self.peek_char().map_or(false, is_digit) {
            self.read_char();
            self.scan_while(is_digit);
        }

        if let Some(E_LOWER | E_UPPER) = self.ch {
            self.read_char();
            if let Some(b'+' | b'-') = self.ch {
                self.read_char();
            }
            let digits = self.pos;
            self.scan_while(is_digit);
            if self.pos == digits {
                let literal = self.slice(start, self.pos);
                self.report(start, &messages::EXPONENT_HAS_NO_DIGITS, &[literal.as_str()]);
            }
        }

        self.slice(start, self.pos)
    }

    fn scan_identifier(&mut self) -> String {
        let start = self.pos;
        self.scan_while(is_identifier_part);
        self.slice(start, self.pos)
    }

    /// Consume one unrecognized character. ASCII bytes take one byte; other
    /// characters take their whole UTF-8 sequence.
    fn scan_illegal(&mut self) -> (TokenKind, String) {
        let start = self.pos;
        let width = self
            .text
            .get(start..)
            .and_then(|rest| rest.chars().next())
            .map_or(1, char::len_utf8);
        for _ in 0..width {
            self.read_char();
        }
        let literal = self.slice(start, self.pos);
        let shown = literal.escape_debug().to_string();
        self.report(start, &messages::INVALID_CHARACTER, &[shown.as_str()]);
        (TokenKind::Illegal, literal)
    }

    #[inline]
    fn scan_while(&mut self, pred: impl Fn(u8) -> bool) {
        while self.ch.map_or(false, &pred) {
            self.read_char();
        }
    }
}

/// Offsets past `u32::MAX` saturate.
#[inline]
fn text_pos(offset: usize) -> TextPos {
    TextPos::try_from(offset).unwrap_or(TextPos::MAX)
}

impl Iterator for Scanner {
    type Item = Token;

    /// Yields tokens up to, not including, `Eof`.
    fn next(&mut self) -> Option<Token> {
        let token = self.next_token();
        (!token.is_eof()).then_some(token)
    }
}

impl std::iter::FusedIterator for Scanner {}

#[cfg(test)]
mod tests {
    use super::*;

    fn kinds(source: &str) -> Vec<TokenKind> {
        Scanner::new(source).map(|t| t.kind).collect()
    }

    #[test]
    fn test_scan_simple_tokens() {
        let mut scanner = Scanner::new("( ) { } [ ] ; , : #");
        assert_eq!(scanner.next_token().kind, TokenKind::LParen);
        assert_eq!(scanner.next_token().kind, TokenKind::RParen);
        assert_eq!(scanner.next_token().kind, TokenKind::LBrace);
        assert_eq!(scanner.next_token().kind, TokenKind::RBrace);
        assert_eq!(scanner.next_token().kind, TokenKind::LBracket);
        assert_eq!(scanner.next_token().kind, TokenKind::RBracket);
        assert_eq!(scanner.next_token().kind, TokenKind::Semicolon);
        assert_eq!(scanner.next_token().kind, TokenKind::Comma);
        assert_eq!(scanner.next_token().kind, TokenKind::Colon);
        assert_eq!(scanner.next_token().kind, TokenKind::Hash);
        assert_eq!(scanner.next_token().kind, TokenKind::Eof);
    }

    #[test]
    fn test_scan_operators() {
        assert_eq!(
            kinds("+ - * / % ^ .. == ~= < <= > >= = ."),
            vec![
                TokenKind::Plus,
                TokenKind::Minus,
                TokenKind::Asterisk,
                TokenKind::Slash,
                TokenKind::Modulo,
                TokenKind::Power,
                TokenKind::Concat,
                TokenKind::Eq,
                TokenKind::NotEq,
                TokenKind::Lt,
                TokenKind::Lte,
                TokenKind::Gt,
                TokenKind::Gte,
                TokenKind::Assign,
                TokenKind::Dot,
            ]
        );
    }

    #[test]
    fn test_operators_without_spaces() {
        assert_eq!(
            kinds("a<=b==c...d"),
            vec![
                TokenKind::Ident,
                TokenKind::Lte,
                TokenKind::Ident,
                TokenKind::Eq,
                TokenKind::Ident,
                TokenKind::Concat,
                TokenKind::Dot,
                TokenKind::Ident,
            ]
        );
    }

    #[test]
    fn test_lone_tilde_is_illegal() {
        let mut scanner = Scanner::new("~ ~=");
        let tilde = scanner.next_token();
        assert_eq!(tilde.kind, TokenKind::Illegal);
        assert_eq!(tilde.literal, "~");
        assert_eq!(scanner.next_token().kind, TokenKind::NotEq);
        assert_eq!(scanner.diagnostics().error_count(), 1);
    }

    #[test]
    fn test_line_comment_at_end_of_input() {
        let mut scanner = Scanner::new("x -- trailing");
        assert_eq!(scanner.next_token().literal, "x");
        let eof = scanner.next_token();
        assert!(eof.is_eof());
        assert_eq!(eof.column, 14);
        assert!(scanner.diagnostics().is_empty());
    }

    #[test]
    fn test_line_comment_keeps_line_count() {
        let mut scanner = Scanner::new("-- one\n-- two\nx");
        let x = scanner.next_token();
        assert_eq!(x.literal, "x");
        assert_eq!((x.line, x.column), (3, 1));
    }

    #[test]
    fn test_unterminated_block_comment_is_silent_in_stream() {
        let mut scanner = Scanner::new("a --[[ never closed");
        assert_eq!(scanner.next_token().kind, TokenKind::Ident);
        assert_eq!(scanner.next_token().kind, TokenKind::Eof);
        let diags = scanner.diagnostics().diagnostics();
        assert_eq!(diags.len(), 1);
        assert_eq!(diags[0].code, messages::UNTERMINATED_BLOCK_COMMENT.code);
        assert_eq!(diags[0].span, Some(TextSpan::from_bounds(2, 19)));
    }

    #[test]
    fn test_exponent_without_digits_warns() {
        let mut scanner = Scanner::new("1e+");
        let tok = scanner.next_token();
        assert_eq!(tok.literal, "1e+");
        assert!(!scanner.diagnostics().has_errors());
        assert_eq!(scanner.diagnostics().len(), 1);
    }

    #[test]
    fn test_non_ascii_is_one_illegal_token() {
        let mut scanner = Scanner::new("é");
        let tok = scanner.next_token();
        assert_eq!(tok.kind, TokenKind::Illegal);
        assert_eq!(tok.literal, "é");
        assert_eq!(tok.span, TextSpan::from_bounds(0, 2));
        assert!(scanner.next_token().is_eof());
    }

    #[test]
    fn test_nul_byte_is_illegal_not_eof() {
        let mut scanner = Scanner::new("a\0b");
        assert_eq!(scanner.next_token().literal, "a");
        let nul = scanner.next_token();
        assert_eq!(nul.kind, TokenKind::Illegal);
        assert_eq!(nul.literal, "\0");
        assert_eq!(scanner.next_token().literal, "b");
    }

    #[test]
    fn test_cursor_accessors() {
        let source = "s = 'a\nb'\nx";
        let mut scanner = Scanner::new(source);
        assert_eq!(scanner.text(), source);
        assert_eq!(scanner.text_len(), 11);
        assert_eq!((scanner.pos(), scanner.line(), scanner.column()), (0, 1, 1));

        scanner.next_token();
        scanner.next_token();
        let string = scanner.next_token();
        assert_eq!(string.literal, "a\nb");
        // The cursor rests on the newline after the closing quote.
        assert_eq!((scanner.pos(), scanner.line(), scanner.column()), (9, 3, 0));
        assert!(!scanner.is_eof());

        scanner.tokenize();
        assert!(scanner.is_eof());
        assert_eq!((scanner.pos(), scanner.line(), scanner.column()), (11, 3, 2));
    }

    #[test]
    fn test_text_pos_saturates() {
        assert_eq!(text_pos(0), 0);
        assert_eq!(text_pos(70_000), 70_000);
        assert_eq!(text_pos(TextPos::MAX as usize), TextPos::MAX);
        #[cfg(target_pointer_width = "64")]
        assert_eq!(text_pos(TextPos::MAX as usize + 1), TextPos::MAX);
    }

    #[test]
    fn test_tokenize_ends_with_eof() {
        let tokens = Scanner::new("x = 1").tokenize();
        assert_eq!(tokens.len(), 4);
        assert!(tokens[3].is_eof());
        assert_eq!(tokens[3].span, TextSpan::empty(5));
    }

    #[test]
    fn test_span_covers_quotes() {
        let mut scanner = Scanner::new(r#"  "hi""#);
        let tok = scanner.next_token();
        assert_eq!(tok.literal, "hi");
        assert_eq!(tok.span, TextSpan::from_bounds(2, 6));
    }
}
