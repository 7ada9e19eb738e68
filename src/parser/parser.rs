//! VEX Parser
//!
//! Pulls tokens from the lexer and assembles the document model,
//! enforcing VEX nesting rules: blocks at the top level, definitions
//! and scans inside blocks, statements and comments inside either.
//! Blocks are not explicitly terminated; the next `$` header or end of
//! input closes the current one. Nesting depth is statically two, so
//! the state machine keeps one open-block slot and one open-group slot
//! instead of a general stack.

use crate::ast::{Block, Definition, Entry, Statement, StatementKind, VexDocument};
use crate::errors::{VexError, VexResult};
use crate::parser::lexer::{Lexer, Token};

/// Parse VEX text into a document.
///
/// The sole entry point; stateless with respect to prior calls. The
/// first lexical or structural error aborts the parse — there is no
/// partial or best-effort result.
pub fn parse_str(input: &str) -> VexResult<VexDocument> {
    let mut lexer = Lexer::new(input);
    let mut doc = VexDocument::default();
    let mut block: Option<Block> = None;
    let mut group: Option<Definition> = None;

    loop {
        match lexer.next_token()? {
            Token::Eof => {
                if let Some(open) = &group {
                    return Err(unterminated(open));
                }
                if let Some(done) = block.take() {
                    doc.entries_mut().insert(done.name.clone(), Entry::Block(done));
                }
                return Ok(doc);
            }

            Token::Comment { text, span } => {
                if let Some(open) = group.as_mut() {
                    open.span.end_line = span.end_line;
                    open.entries_mut().push_comment(text);
                } else if let Some(current) = block.as_mut() {
                    current.span.end_line = span.end_line;
                    current.entries_mut().push_comment(text);
                } else {
                    doc.entries_mut().push_comment(text);
                }
            }

            Token::BlockStart { name, span } => {
                if let Some(open) = &group {
                    return Err(unterminated(open));
                }
                if let Some(done) = block.take() {
                    doc.entries_mut().insert(done.name.clone(), Entry::Block(done));
                }
                if doc.get(&name).is_some() {
                    return Err(VexError::parse(
                        format!("duplicate block '${name}'"),
                        span.start_line,
                    ));
                }
                block = Some(Block::new(name, span));
            }

            Token::DefStart { name, kind, span } => {
                if let Some(open) = &group {
                    return Err(VexError::parse(
                        format!(
                            "'{}' may not appear inside '{} {}'",
                            kind.opener(),
                            open.kind.opener(),
                            open.name
                        ),
                        span.start_line,
                    ));
                }
                let Some(current) = block.as_mut() else {
                    return Err(VexError::parse(
                        format!("'{} {}' outside of any block", kind.opener(), name),
                        span.start_line,
                    ));
                };
                if current.get(&name).is_some() {
                    return Err(VexError::parse(
                        format!(
                            "definition name '{}' already used in block '${}'",
                            name, current.name
                        ),
                        span.start_line,
                    ));
                }
                group = Some(Definition::new(name, kind, span));
            }

            Token::DefEnd { kind, span } => {
                let Some(mut done) = group.take() else {
                    return Err(VexError::parse(
                        format!("'{};' without a matching '{}'", kind.closer(), kind.opener()),
                        span.start_line,
                    ));
                };
                if done.kind != kind {
                    return Err(VexError::parse(
                        format!(
                            "'{};' closes '{} {}'",
                            kind.closer(),
                            done.kind.opener(),
                            done.name
                        ),
                        span.start_line,
                    ));
                }
                done.span.end_line = span.end_line;
                // a group can only have been opened inside a block
                if let Some(current) = block.as_mut() {
                    current.span.end_line = span.end_line;
                    current.entries_mut().insert(done.name.clone(), Entry::Definition(done));
                }
            }

            Token::Statement { name, fields, span } => {
                let stmt = Statement::new(name, StatementKind::Parameter, fields, span);
                place(&mut block, &mut group, stmt)?;
            }

            Token::Reference { target, fields, span } => {
                let stmt = Statement::new(target, StatementKind::Reference, fields, span);
                place(&mut block, &mut group, stmt)?;
            }
        }
    }
}

/// Route a statement into the innermost open scope
fn place(
    block: &mut Option<Block>,
    group: &mut Option<Definition>,
    stmt: Statement,
) -> VexResult<()> {
    let line = stmt.span.start_line;

    if let Some(open) = group.as_mut() {
        check_slot(open.entries().get(&stmt.name), &stmt.name, line)?;
        open.span.end_line = stmt.span.end_line;
        open.entries_mut().push_statement(stmt);
        return Ok(());
    }
    if let Some(current) = block.as_mut() {
        check_slot(current.get(&stmt.name), &stmt.name, line)?;
        current.span.end_line = stmt.span.end_line;
        current.entries_mut().push_statement(stmt);
        return Ok(());
    }
    Err(VexError::parse(
        format!("'{}' assignment outside of any block", stmt.name),
        line,
    ))
}

/// A parameter may repeat, but only on a key that already holds
/// statement occurrences
fn check_slot(existing: Option<&Entry>, name: &str, line: usize) -> VexResult<()> {
    match existing {
        None | Some(Entry::Statements(_)) => Ok(()),
        Some(_) => Err(VexError::parse(
            format!("parameter '{name}' conflicts with an earlier entry of a different kind"),
            line,
        )),
    }
}

fn unterminated(group: &Definition) -> VexError {
    VexError::parse(
        format!(
            "'{} {}' never closed with '{};'",
            group.kind.opener(),
            group.name,
            group.kind.closer()
        ),
        group.span.start_line,
    )
}
