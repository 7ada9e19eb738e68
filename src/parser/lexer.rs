//! VEX Lexer
//!
//! Tokenizes VEX input line by line into block headers, group
//! delimiters, statements, references, and comments. Tokens are
//! produced lazily through [`Lexer::next_token`]; the full input is
//! never materialized as a token buffer.

use crate::ast::{GroupKind, Span};
use crate::errors::{VexError, VexResult};

/// Token types produced by the lexer
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Token {
    /// `$NAME;` section header
    BlockStart { name: String, span: Span },
    /// `def NAME;` or `scan NAME;` group opener
    DefStart {
        name: String,
        kind: GroupKind,
        span: Span,
    },
    /// `enddef;` or `endscan;` group closer
    DefEnd { kind: GroupKind, span: Span },
    /// `name = field[:field...];` assignment; fields are trimmed raw text
    Statement {
        name: String,
        fields: Vec<String>,
        span: Span,
    },
    /// `ref $BLOCK = field[:field...];` cross-reference
    Reference {
        target: String,
        fields: Vec<String>,
        span: Span,
    },
    /// Line whose first non-whitespace character is `*`; text is
    /// everything after the marker
    Comment { text: String, span: Span },
    /// End of input
    Eof,
}

impl Token {
    /// Get span if token has one
    pub fn span(&self) -> Option<&Span> {
        match self {
            Token::BlockStart { span, .. }
            | Token::DefStart { span, .. }
            | Token::DefEnd { span, .. }
            | Token::Statement { span, .. }
            | Token::Reference { span, .. }
            | Token::Comment { span, .. } => Some(span),
            Token::Eof => None,
        }
    }
}

/// Lexer state. Single pass, non-restartable.
pub struct Lexer<'a> {
    /// Lines split from input
    lines: Vec<&'a str>,
    /// Current line index (0-based)
    line_idx: usize,
    /// Statement text accumulated across lines until a `;` appears,
    /// with the line it started on
    pending: Option<(String, usize)>,
}

impl<'a> Lexer<'a> {
    /// Create new lexer from input string
    pub fn new(input: &'a str) -> Self {
        Self {
            lines: input.lines().collect(),
            line_idx: 0,
            pending: None,
        }
    }

    /// Check if all input lines have been consumed
    pub fn is_eof(&self) -> bool {
        self.line_idx >= self.lines.len()
    }

    /// Current line number (1-indexed for user display)
    pub fn current_line_number(&self) -> usize {
        self.line_idx + 1
    }

    /// Get next token.
    ///
    /// Blank lines are skipped. Comment lines are emitted immediately,
    /// even while a multi-line statement is still accumulating, so they
    /// keep their original position in the token sequence. Any other
    /// line accumulates until its `;` terminator is seen; the trimmed
    /// pieces are joined with single spaces.
    pub fn next_token(&mut self) -> VexResult<Token> {
        loop {
            let Some(&raw) = self.lines.get(self.line_idx) else {
                if let Some((_, start)) = self.pending.take() {
                    return Err(VexError::lex("statement never terminated with ';'", start));
                }
                return Ok(Token::Eof);
            };
            let line_no = self.current_line_number();
            self.line_idx += 1;

            let trimmed = raw.trim();
            if trimmed.is_empty() {
                continue;
            }

            if let Some(text) = trimmed.strip_prefix('*') {
                return Ok(Token::Comment {
                    text: text.to_string(),
                    span: Span::line(line_no),
                });
            }

            if !trimmed.contains(';') {
                match &mut self.pending {
                    Some((buf, _)) => {
                        buf.push(' ');
                        buf.push_str(trimmed);
                    }
                    None => self.pending = Some((trimmed.to_string(), line_no)),
                }
                continue;
            }

            let (text, start) = match self.pending.take() {
                Some((mut buf, start)) => {
                    buf.push(' ');
                    buf.push_str(trimmed);
                    (buf, start)
                }
                None => (trimmed.to_string(), line_no),
            };
            return classify(&text, Span::new(start, line_no));
        }
    }
}

impl<'a> Iterator for Lexer<'a> {
    type Item = VexResult<Token>;

    fn next(&mut self) -> Option<Self::Item> {
        match self.next_token() {
            Ok(Token::Eof) => None,
            other => Some(other),
        }
    }
}

/// Split accumulated text at its first terminator
fn split_at_terminator(text: &str) -> (&str, &str) {
    match text.split_once(';') {
        Some((head, rest)) => (head, rest),
        None => (text, ""),
    }
}

/// Validate a block, definition, or scan name: non-empty, no whitespace
fn check_name(name: &str, what: &str, line: usize) -> VexResult<()> {
    if name.is_empty() {
        return Err(VexError::lex(format!("missing {what} name"), line));
    }
    if name.contains(char::is_whitespace) {
        return Err(VexError::lex(format!("invalid {what} name '{name}'"), line));
    }
    Ok(())
}

/// Classify a terminated line (or joined multi-line statement) into a token
fn classify(text: &str, span: Span) -> VexResult<Token> {
    let line = span.start_line;

    if let Some(rest) = text.strip_prefix('$') {
        let (head, trailing) = split_at_terminator(rest);
        if !trailing.trim().is_empty() {
            return Err(VexError::lex("trailing content after block header", line));
        }
        let name = head.trim();
        check_name(name, "block", line)?;
        return Ok(Token::BlockStart {
            name: name.to_string(),
            span,
        });
    }

    let (head, trailing) = split_at_terminator(text);
    let head = head.trim();
    match head.split_whitespace().next() {
        Some(opener @ ("def" | "scan")) => {
            let kind = if opener == "def" {
                GroupKind::Def
            } else {
                GroupKind::Scan
            };
            if !trailing.trim().is_empty() {
                return Err(VexError::lex(
                    format!("trailing content after '{opener}' line"),
                    line,
                ));
            }
            let name = head[opener.len()..].trim();
            check_name(name, kind.opener(), line)?;
            return Ok(Token::DefStart {
                name: name.to_string(),
                kind,
                span,
            });
        }
        Some(closer @ ("enddef" | "endscan")) => {
            let kind = if closer == "enddef" {
                GroupKind::Def
            } else {
                GroupKind::Scan
            };
            if head != closer || !trailing.trim().is_empty() {
                return Err(VexError::lex(
                    format!("unexpected content in '{closer}' line"),
                    line,
                ));
            }
            return Ok(Token::DefEnd { kind, span });
        }
        _ => {}
    }

    // A plain statement or reference. Split on the first '=' only, so
    // later '=' characters stay in the value text. The terminator is
    // removed only when it is the final character; an interior ';'
    // (e.g. a trailing annotation on a chan_def line) stays verbatim.
    let Some((key_raw, value_raw)) = text.split_once('=') else {
        return Err(VexError::lex("expected 'name = value;' statement", line));
    };
    let key = key_raw.trim();
    if key.is_empty() {
        return Err(VexError::lex("missing parameter name", line));
    }
    let mut value = value_raw.trim();
    if let Some(stripped) = value.strip_suffix(';') {
        value = stripped.trim_end();
    }
    let fields: Vec<String> = value.split(':').map(|field| field.trim().to_string()).collect();

    if key.split_whitespace().next() == Some("ref") {
        let target = key["ref".len()..].trim();
        let Some(target) = target.strip_prefix('$') else {
            return Err(VexError::lex("reference must name a '$' block", line));
        };
        let target = target.trim();
        check_name(target, "reference target", line)?;
        return Ok(Token::Reference {
            target: target.to_string(),
            fields,
            span,
        });
    }

    Ok(Token::Statement {
        name: key.to_string(),
        fields,
        span,
    })
}
