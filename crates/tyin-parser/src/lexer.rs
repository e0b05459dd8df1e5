//! Hand-written lexer.
//!
//! Tokenizes the whole source up front; the parser walks the token
//! vector with lookahead. Tokens carry spans only — literal values are
//! re-read from the source text when the parser builds AST nodes.

use crate::token::{Token, TokenKind, keyword_kind};
use tyin_common::{Diagnostic, Span};

pub struct Lexer<'a> {
    source: &'a str,
    bytes: &'a [u8],
    pos: usize,
    /// Set when a line terminator is seen before the next token.
    saw_newline: bool,
    pub diagnostics: Vec<Diagnostic>,
}

impl<'a> Lexer<'a> {
    pub fn new(source: &'a str) -> Self {
        Lexer {
            source,
            bytes: source.as_bytes(),
            pos: 0,
            saw_newline: false,
            diagnostics: Vec::new(),
        }
    }

    /// Tokenize the entire source. Always ends with an `EndOfFile` token.
    pub fn tokenize(mut self) -> (Vec<Token>, Vec<Diagnostic>) {
        let mut tokens = Vec::new();
        loop {
            let token = self.next_token();
            let done = token.kind == TokenKind::EndOfFile;
            tokens.push(token);
            if done {
                break;
            }
        }
        (tokens, self.diagnostics)
    }

    fn next_token(&mut self) -> Token {
        self.skip_trivia();
        let start = self.pos;
        let newline = std::mem::take(&mut self.saw_newline);

        let Some(&byte) = self.bytes.get(self.pos) else {
            return Token::new(
                TokenKind::EndOfFile,
                Span::at(self.offset(start)),
                newline,
            );
        };

        let kind = match byte {
            b'0'..=b'9' => self.scan_number(),
            b'"' | b'\'' => self.scan_string(byte),
            b'`' => self.scan_template(),
            b'.' => {
                if self.bytes.get(self.pos + 1).is_some_and(u8::is_ascii_digit) {
                    self.scan_number()
                } else {
                    self.scan_punctuation()
                }
            }
            b if b.is_ascii_alphabetic() || b == b'_' || b == b'$' || b >= 0x80 => {
                self.scan_identifier_or_keyword()
            }
            _ => self.scan_punctuation(),
        };

        let span = Span::new(self.offset(start), self.offset(self.pos));
        Token::new(kind, span, newline)
    }

    fn offset(&self, pos: usize) -> u32 {
        u32::try_from(pos).unwrap_or(u32::MAX)
    }

    fn skip_trivia(&mut self) {
        while let Some(&byte) = self.bytes.get(self.pos) {
            match byte {
                b' ' | b'\t' => self.pos += 1,
                b'\n' | b'\r' => {
                    self.saw_newline = true;
                    self.pos += 1;
                }
                b'/' => match self.bytes.get(self.pos + 1) {
                    Some(b'/') => {
                        while let Some(&b) = self.bytes.get(self.pos) {
                            if b == b'\n' || b == b'\r' {
                                break;
                            }
                            self.pos += 1;
                        }
                    }
                    Some(b'*') => {
                        let start = self.pos;
                        self.pos += 2;
                        let mut closed = false;
                        while self.pos < self.bytes.len() {
                            if self.bytes[self.pos] == b'*'
                                && self.bytes.get(self.pos + 1) == Some(&b'/')
                            {
                                self.pos += 2;
                                closed = true;
                                break;
                            }
                            if self.bytes[self.pos] == b'\n' {
                                self.saw_newline = true;
                            }
                            self.pos += 1;
                        }
                        if !closed {
                            self.diagnostics.push(Diagnostic::error(
                                "Unterminated block comment",
                                Span::new(self.offset(start), self.offset(self.pos)),
                            ));
                        }
                    }
                    _ => return,
                },
                _ => return,
            }
        }
    }

    fn scan_identifier_or_keyword(&mut self) -> TokenKind {
        let start = self.pos;
        while let Some(&b) = self.bytes.get(self.pos) {
            if b.is_ascii_alphanumeric() || b == b'_' || b == b'$' || b >= 0x80 {
                self.pos += 1;
            } else {
                break;
            }
        }
        let word = &self.source[start..self.pos];
        keyword_kind(word).unwrap_or(TokenKind::Identifier)
    }

    fn scan_number(&mut self) -> TokenKind {
        let start = self.pos;

        if self.bytes[self.pos] == b'0'
            && matches!(
                self.bytes.get(self.pos + 1),
                Some(b'x' | b'X' | b'o' | b'O' | b'b' | b'B')
            )
        {
            self.pos += 2;
            while self
                .bytes
                .get(self.pos)
                .is_some_and(|b| b.is_ascii_alphanumeric() || *b == b'_')
            {
                self.pos += 1;
            }
        } else {
            while self.bytes.get(self.pos).is_some_and(u8::is_ascii_digit) {
                self.pos += 1;
            }
            if self.bytes.get(self.pos) == Some(&b'.') {
                self.pos += 1;
                while self.bytes.get(self.pos).is_some_and(u8::is_ascii_digit) {
                    self.pos += 1;
                }
            }
            if matches!(self.bytes.get(self.pos), Some(b'e' | b'E')) {
                let mut lookahead = self.pos + 1;
                if matches!(self.bytes.get(lookahead), Some(b'+' | b'-')) {
                    lookahead += 1;
                }
                if self.bytes.get(lookahead).is_some_and(u8::is_ascii_digit) {
                    self.pos = lookahead;
                    while self.bytes.get(self.pos).is_some_and(u8::is_ascii_digit) {
                        self.pos += 1;
                    }
                }
            }
        }

        if self.bytes.get(self.pos) == Some(&b'n') {
            self.pos += 1;
            // A fractional part makes the bigint suffix invalid
            if self.source[start..self.pos].contains('.') {
                self.diagnostics.push(Diagnostic::error(
                    "Invalid bigint literal",
                    Span::new(self.offset(start), self.offset(self.pos)),
                ));
                return TokenKind::NumberLiteral;
            }
            return TokenKind::BigIntLiteral;
        }
        TokenKind::NumberLiteral
    }

    fn scan_string(&mut self, quote: u8) -> TokenKind {
        let start = self.pos;
        self.pos += 1;
        while let Some(&b) = self.bytes.get(self.pos) {
            match b {
                b'\\' => self.pos += 2,
                b'\n' | b'\r' => break,
                b if b == quote => {
                    self.pos += 1;
                    return TokenKind::StringLiteral;
                }
                _ => self.pos += 1,
            }
        }
        self.diagnostics.push(Diagnostic::error(
            "Unterminated string literal",
            Span::new(self.offset(start), self.offset(self.pos)),
        ));
        TokenKind::StringLiteral
    }

    fn scan_template(&mut self) -> TokenKind {
        let start = self.pos;
        self.pos += 1;
        while let Some(&b) = self.bytes.get(self.pos) {
            match b {
                b'\\' => self.pos += 2,
                b'`' => {
                    self.pos += 1;
                    return TokenKind::TemplateLiteral;
                }
                b'$' if self.bytes.get(self.pos + 1) == Some(&b'{') => {
                    self.diagnostics.push(Diagnostic::error(
                        "Template substitution is not supported",
                        Span::new(self.offset(self.pos), self.offset(self.pos + 2)),
                    ));
                    self.pos += 2;
                }
                b'\n' => {
                    self.saw_newline = true;
                    self.pos += 1;
                }
                _ => self.pos += 1,
            }
        }
        self.diagnostics.push(Diagnostic::error(
            "Unterminated template literal",
            Span::new(self.offset(start), self.offset(self.pos)),
        ));
        TokenKind::TemplateLiteral
    }

    fn scan_punctuation(&mut self) -> TokenKind {
        let rest = &self.bytes[self.pos..];

        // Maximal munch: try the longest operators first.
        let table: &[(&[u8], TokenKind)] = &[
            (b">>>=", TokenKind::GreaterThanGreaterThanGreaterThanEquals),
            (b"...", TokenKind::DotDotDot),
            (b"===", TokenKind::EqualsEqualsEquals),
            (b"!==", TokenKind::ExclamationEqualsEquals),
            (b"**=", TokenKind::AsteriskAsteriskEquals),
            (b"<<=", TokenKind::LessThanLessThanEquals),
            (b">>=", TokenKind::GreaterThanGreaterThanEquals),
            (b">>>", TokenKind::GreaterThanGreaterThanGreaterThan),
            (b"&&=", TokenKind::AmpersandAmpersandEquals),
            (b"||=", TokenKind::BarBarEquals),
            (b"??=", TokenKind::QuestionQuestionEquals),
            (b"=>", TokenKind::Arrow),
            (b"==", TokenKind::EqualsEquals),
            (b"!=", TokenKind::ExclamationEquals),
            (b"<=", TokenKind::LessThanEquals),
            (b">=", TokenKind::GreaterThanEquals),
            (b"&&", TokenKind::AmpersandAmpersand),
            (b"||", TokenKind::BarBar),
            (b"??", TokenKind::QuestionQuestion),
            (b"?.", TokenKind::QuestionDot),
            (b"++", TokenKind::PlusPlus),
            (b"--", TokenKind::MinusMinus),
            (b"**", TokenKind::AsteriskAsterisk),
            (b"+=", TokenKind::PlusEquals),
            (b"-=", TokenKind::MinusEquals),
            (b"*=", TokenKind::AsteriskEquals),
            (b"/=", TokenKind::SlashEquals),
            (b"%=", TokenKind::PercentEquals),
            (b"&=", TokenKind::AmpersandEquals),
            (b"|=", TokenKind::BarEquals),
            (b"^=", TokenKind::CaretEquals),
            (b"<<", TokenKind::LessThanLessThan),
            (b">>", TokenKind::GreaterThanGreaterThan),
            (b"{", TokenKind::OpenBrace),
            (b"}", TokenKind::CloseBrace),
            (b"(", TokenKind::OpenParen),
            (b")", TokenKind::CloseParen),
            (b"[", TokenKind::OpenBracket),
            (b"]", TokenKind::CloseBracket),
            (b";", TokenKind::Semicolon),
            (b",", TokenKind::Comma),
            (b".", TokenKind::Dot),
            (b":", TokenKind::Colon),
            (b"?", TokenKind::Question),
            (b"+", TokenKind::Plus),
            (b"-", TokenKind::Minus),
            (b"*", TokenKind::Asterisk),
            (b"/", TokenKind::Slash),
            (b"%", TokenKind::Percent),
            (b"<", TokenKind::LessThan),
            (b">", TokenKind::GreaterThan),
            (b"=", TokenKind::Equals),
            (b"&", TokenKind::Ampersand),
            (b"|", TokenKind::Bar),
            (b"^", TokenKind::Caret),
            (b"~", TokenKind::Tilde),
            (b"!", TokenKind::Exclamation),
        ];

        for &(text, kind) in table {
            if rest.starts_with(text) {
                self.pos += text.len();
                return kind;
            }
        }

        let start = self.pos;
        // Skip one whole character, not one byte
        let ch_len = self.source[self.pos..]
            .chars()
            .next()
            .map_or(1, char::len_utf8);
        self.pos += ch_len;
        self.diagnostics.push(Diagnostic::error(
            format!(
                "Unexpected character '{}'",
                &self.source[start..self.pos]
            ),
            Span::new(self.offset(start), self.offset(self.pos)),
        ));
        TokenKind::Unknown
    }
}

/// Decode the cooked value of a string or template literal token.
///
/// `raw` includes the surrounding quotes.
pub fn cook_string(raw: &str) -> String {
    let inner = if raw.len() >= 2 {
        &raw[1..raw.len() - 1]
    } else {
        raw
    };
    let mut out = String::with_capacity(inner.len());
    let mut chars = inner.chars();
    while let Some(ch) = chars.next() {
        if ch != '\\' {
            out.push(ch);
            continue;
        }
        match chars.next() {
            Some('n') => out.push('\n'),
            Some('t') => out.push('\t'),
            Some('r') => out.push('\r'),
            Some('b') => out.push('\u{0008}'),
            Some('f') => out.push('\u{000C}'),
            Some('v') => out.push('\u{000B}'),
            Some('0') => out.push('\0'),
            Some('x') => {
                let hex: String = chars.by_ref().take(2).collect();
                if let Ok(code) = u32::from_str_radix(&hex, 16)
                    && let Some(decoded) = char::from_u32(code)
                {
                    out.push(decoded);
                }
            }
            Some('u') => {
                let mut rest = chars.clone();
                if rest.next() == Some('{') {
                    let hex: String = rest.by_ref().take_while(|c| *c != '}').collect();
                    if let Ok(code) = u32::from_str_radix(&hex, 16)
                        && let Some(decoded) = char::from_u32(code)
                    {
                        out.push(decoded);
                    }
                    chars = rest;
                } else {
                    let hex: String = chars.by_ref().take(4).collect();
                    if let Ok(code) = u32::from_str_radix(&hex, 16)
                        && let Some(decoded) = char::from_u32(code)
                    {
                        out.push(decoded);
                    }
                }
            }
            Some(other) => out.push(other),
            None => {}
        }
    }
    out
}

/// Parse the numeric value of a number literal token.
pub fn parse_number(raw: &str) -> f64 {
    let cleaned: String = raw.chars().filter(|c| *c != '_').collect();
    if let Some(hex) = cleaned.strip_prefix("0x").or_else(|| cleaned.strip_prefix("0X")) {
        return u64::from_str_radix(hex, 16).map_or(f64::NAN, |v| v as f64);
    }
    if let Some(oct) = cleaned.strip_prefix("0o").or_else(|| cleaned.strip_prefix("0O")) {
        return u64::from_str_radix(oct, 8).map_or(f64::NAN, |v| v as f64);
    }
    if let Some(bin) = cleaned.strip_prefix("0b").or_else(|| cleaned.strip_prefix("0B")) {
        return u64::from_str_radix(bin, 2).map_or(f64::NAN, |v| v as f64);
    }
    cleaned.parse().unwrap_or(f64::NAN)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn kinds(source: &str) -> Vec<TokenKind> {
        let (tokens, diagnostics) = Lexer::new(source).tokenize();
        assert!(diagnostics.is_empty(), "unexpected diagnostics: {diagnostics:?}");
        tokens.iter().map(|t| t.kind).collect()
    }

    #[test]
    fn test_keywords_and_identifiers() {
        assert_eq!(
            kinds("let x = y;"),
            vec![
                TokenKind::LetKeyword,
                TokenKind::Identifier,
                TokenKind::Equals,
                TokenKind::Identifier,
                TokenKind::Semicolon,
                TokenKind::EndOfFile,
            ]
        );
    }

    #[test]
    fn test_numbers() {
        assert_eq!(parse_number("42"), 42.0);
        assert_eq!(parse_number("4.5"), 4.5);
        assert_eq!(parse_number("1e3"), 1000.0);
        assert_eq!(parse_number("0xff"), 255.0);
        assert_eq!(parse_number("0b101"), 5.0);
        assert_eq!(parse_number("1_000"), 1000.0);
    }

    #[test]
    fn test_bigint_literal() {
        let (tokens, diagnostics) = Lexer::new("123n").tokenize();
        assert!(diagnostics.is_empty());
        assert_eq!(tokens[0].kind, TokenKind::BigIntLiteral);
    }

    #[test]
    fn test_string_cooking() {
        assert_eq!(cook_string(r#""a\nb""#), "a\nb");
        assert_eq!(cook_string(r#"'it\'s'"#), "it's");
        assert_eq!(cook_string(r#""A""#), "A");
        assert_eq!(cook_string(r#""\u{1F600}""#), "\u{1F600}");
    }

    #[test]
    fn test_maximal_munch() {
        assert_eq!(
            kinds("a >>>= b"),
            vec![
                TokenKind::Identifier,
                TokenKind::GreaterThanGreaterThanGreaterThanEquals,
                TokenKind::Identifier,
                TokenKind::EndOfFile,
            ]
        );
        assert_eq!(
            kinds("a ?? b ?. c"),
            vec![
                TokenKind::Identifier,
                TokenKind::QuestionQuestion,
                TokenKind::Identifier,
                TokenKind::QuestionDot,
                TokenKind::Identifier,
                TokenKind::EndOfFile,
            ]
        );
    }

    #[test]
    fn test_newline_tracking() {
        let (tokens, _) = Lexer::new("a\nb").tokenize();
        assert!(!tokens[0].preceded_by_newline);
        assert!(tokens[1].preceded_by_newline);
    }

    #[test]
    fn test_comments_are_trivia() {
        assert_eq!(
            kinds("a // line\n/* block */ b"),
            vec![TokenKind::Identifier, TokenKind::Identifier, TokenKind::EndOfFile]
        );
    }

    #[test]
    fn test_unterminated_string_reports() {
        let (_, diagnostics) = Lexer::new("\"abc").tokenize();
        assert_eq!(diagnostics.len(), 1);
        assert!(diagnostics[0].message_text.contains("Unterminated"));
    }
}
