//! # vexfile
//!
//! A schema-agnostic parser for VEX (VLBI Experiment EXchange) files,
//! the interchange format used to describe VLBI observations
//! (<https://vlbi.org/vex>).
//!
//! A VEX file is parsed into an order-preserving hierarchical model:
//! `$NAME` blocks containing `def`/`enddef` (and `scan`/`endscan`)
//! groups and `name = value;` statements. No validation is performed
//! against the VEX standard: unknown block and parameter names parse
//! like standard ones, and every value is kept verbatim as text.
//! Comments are preserved as numbered `comment-<N>` entries within
//! their enclosing scope.
//!
//! ## Parse a document
//!
//! ```rust
//! use vexfile::parse_str;
//!
//! let input = r#"
//! $STATION;
//! def Jb;
//! * this is a comment
//! site_name = JODRELL2;
//! enddef;
//! "#;
//!
//! let doc = parse_str(input).unwrap();
//! let station = doc.block("STATION").unwrap();
//! let jb = station.definition("Jb").unwrap();
//!
//! assert_eq!(jb.statements("site_name").unwrap()[0].value(), "JODRELL2");
//! assert_eq!(jb.keys().collect::<Vec<_>>(), vec!["comment-1", "site_name"]);
//! assert_eq!(jb.comments().next(), Some((1, " this is a comment")));
//! ```
//!
//! ## Repeated parameters and references
//!
//! A parameter name may legally repeat within a scope; occurrences are
//! kept as an ordered list, never overwritten. `ref $BLOCK = ...;`
//! statements are stored under the target block's name and flagged as
//! references.
//!
//! ```rust
//! use vexfile::parse_str;
//!
//! let input = r#"
//! $MODE;
//! def SX;
//! ref $IF = LO@2100MHz;
//! ref $IF = LO@8400MHz;
//! enddef;
//! "#;
//!
//! let doc = parse_str(input).unwrap();
//! let sx = doc.block("MODE").unwrap().definition("SX").unwrap();
//!
//! assert_eq!(sx.statements("IF").unwrap().len(), 2);
//! assert!(sx.statements("IF").unwrap()[0].is_reference());
//! ```
//!
//! ## Errors
//!
//! Structural problems abort the parse with the offending line; there
//! is no partial result.
//!
//! ```rust
//! use vexfile::{parse_str, VexError};
//!
//! let err = parse_str("$STATION;\ndef Jb;\nsite_name = JODRELL2;\n").unwrap_err();
//! assert!(matches!(err, VexError::Parse { line: 2, .. }));
//! ```
//!
//! ## Write-back
//!
//! `Display` on the model regenerates VEX text with canonical spacing.
//! The output reconstructs the logical structure (order, nesting,
//! comments, repeats), not the original byte-level formatting, and
//! re-parses to an equal document.

pub mod ast;
pub mod errors;
pub mod parser;

// Re-exports for convenience
pub use ast::{
    Block, Definition, Entry, EntryMap, GroupKind, Span, Statement, StatementKind, VexDocument,
};
pub use errors::{VexError, VexResult};
pub use parser::{parse_str, Lexer, Token};

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_and_query() {
        let input = "$EXPER;\nexper_name = N14C3;\n";
        let doc = parse_str(input).unwrap();
        assert_eq!(
            doc.block("EXPER").unwrap().statements("exper_name").unwrap()[0].value(),
            "N14C3"
        );
    }

    #[test]
    fn test_display_reparses_to_equal_document() {
        let input = "$STATION;\ndef Jb;\n* note\nsite_name = JODRELL2;\nenddef;\n";
        let doc = parse_str(input).unwrap();
        let rendered = doc.to_string();
        let reparsed = parse_str(&rendered).unwrap();

        let first = doc.block("STATION").unwrap().definition("Jb").unwrap();
        let second = reparsed.block("STATION").unwrap().definition("Jb").unwrap();
        assert_eq!(
            first.keys().collect::<Vec<_>>(),
            second.keys().collect::<Vec<_>>()
        );
    }
}
