//! VEX Document Model
//!
//! Core data structures for parsed VEX files: documents, blocks,
//! definitions, statements, and the ordered entry maps that hold them.
//! Everything is stored as verbatim text in file-encounter order; the
//! model performs no validation against the VEX standard schema.

use std::collections::HashMap;
use std::fmt;

use serde::Serialize;

/// Indent used when regenerating statement lines as VEX text
const STATEMENT_INDENT: usize = 5;

/// Source location span for error reporting (lines are 1-indexed)
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct Span {
    /// Start line
    pub start_line: usize,
    /// End line (inclusive; differs from start for multi-line statements)
    pub end_line: usize,
}

impl Span {
    /// Create a new span
    pub fn new(start_line: usize, end_line: usize) -> Self {
        Self {
            start_line,
            end_line,
        }
    }

    /// Single-line span
    pub fn line(line: usize) -> Self {
        Self::new(line, line)
    }
}

impl Default for Span {
    fn default() -> Self {
        Self::line(1)
    }
}

/// How a statement was written in the source
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum StatementKind {
    /// Plain `name = value;` assignment
    Parameter,
    /// `ref $BLOCK = value;` cross-reference to another block
    Reference,
}

/// Delimiter pair of a named group inside a block
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum GroupKind {
    /// `def NAME;` ... `enddef;`
    Def,
    /// `scan NAME;` ... `endscan;` (used in $SCHED sections)
    Scan,
}

impl GroupKind {
    /// Keyword that opens the group
    pub fn opener(&self) -> &'static str {
        match self {
            GroupKind::Def => "def",
            GroupKind::Scan => "scan",
        }
    }

    /// Keyword that closes the group
    pub fn closer(&self) -> &'static str {
        match self {
            GroupKind::Def => "enddef",
            GroupKind::Scan => "endscan",
        }
    }
}

/// A single `name = value[:value...];` assignment, stored unevaluated
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Statement {
    /// Parameter name; for references, the target block name (after `$`)
    pub name: String,
    /// Plain parameter or `ref` cross-reference
    pub kind: StatementKind,
    /// Raw text fields, split on `:`, each trimmed; never empty
    pub fields: Vec<String>,
    /// Source location
    pub span: Span,
}

impl Statement {
    /// Create a new statement
    pub fn new(name: impl Into<String>, kind: StatementKind, fields: Vec<String>, span: Span) -> Self {
        Self {
            name: name.into(),
            kind,
            fields,
            span,
        }
    }

    /// First field of the statement
    pub fn value(&self) -> &str {
        self.fields.first().map(String::as_str).unwrap_or("")
    }

    /// True if this was written as `ref $BLOCK = ...;`
    pub fn is_reference(&self) -> bool {
        self.kind == StatementKind::Reference
    }

    fn write_indented(&self, f: &mut fmt::Formatter<'_>, indent: usize) -> fmt::Result {
        let joined = self.fields.join(":");
        match self.kind {
            StatementKind::Parameter => {
                writeln!(f, "{:indent$}{} = {};", "", self.name, joined)
            }
            StatementKind::Reference => {
                writeln!(f, "{:indent$}ref ${} = {};", "", self.name, joined)
            }
        }
    }
}

impl fmt::Display for Statement {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        self.write_indented(f, 0)
    }
}

/// One value in an ordered entry map
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub enum Entry {
    /// A `$NAME` section (document level only)
    Block(Block),
    /// A `def`/`enddef` or `scan`/`endscan` group (block level only)
    Definition(Definition),
    /// One or more occurrences of the same parameter, in file order
    Statements(Vec<Statement>),
    /// A comment line, stored under a synthetic `comment-<N>` key;
    /// the text is everything after the `*` marker
    Comment(String),
}

impl Entry {
    /// Entry as a block, if it is one
    pub fn as_block(&self) -> Option<&Block> {
        match self {
            Entry::Block(block) => Some(block),
            _ => None,
        }
    }

    /// Entry as a definition, if it is one
    pub fn as_definition(&self) -> Option<&Definition> {
        match self {
            Entry::Definition(def) => Some(def),
            _ => None,
        }
    }

    /// Entry as a list of statement occurrences, if it is one
    pub fn as_statements(&self) -> Option<&[Statement]> {
        match self {
            Entry::Statements(list) => Some(list),
            _ => None,
        }
    }

    /// Entry as comment text, if it is one
    pub fn as_comment(&self) -> Option<&str> {
        match self {
            Entry::Comment(text) => Some(text),
            _ => None,
        }
    }

    fn write_indented(&self, f: &mut fmt::Formatter<'_>, indent: usize) -> fmt::Result {
        match self {
            Entry::Block(block) => write!(f, "{block}"),
            Entry::Definition(def) => write!(f, "{def}"),
            Entry::Statements(list) => {
                for stmt in list {
                    stmt.write_indented(f, indent)?;
                }
                Ok(())
            }
            Entry::Comment(text) => writeln!(f, "*{text}"),
        }
    }
}

impl fmt::Display for Entry {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        self.write_indented(f, 0)
    }
}

/// Insertion-ordered key/value map used at every nesting level.
///
/// Backed by a vector of pairs plus a key index, so iteration replays
/// file order while lookups stay cheap. Repeated parameter names extend
/// the existing occurrence list; comment entries get sequential
/// `comment-<N>` keys counted per enclosing scope.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
#[serde(transparent)]
pub struct EntryMap {
    entries: Vec<(String, Entry)>,
    #[serde(skip)]
    index: HashMap<String, usize>,
    #[serde(skip)]
    comment_count: usize,
}

impl EntryMap {
    /// Number of entries (each occurrence list counts once)
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// True if the map holds no entries
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// True if the key is present
    pub fn contains_key(&self, key: &str) -> bool {
        self.index.contains_key(key)
    }

    /// Look up an entry by exact key; absence is not an error
    pub fn get(&self, key: &str) -> Option<&Entry> {
        self.index.get(key).map(|&i| &self.entries[i].1)
    }

    /// Keys in file-encounter order
    pub fn keys(&self) -> impl Iterator<Item = &str> {
        self.entries.iter().map(|(key, _)| key.as_str())
    }

    /// `(key, entry)` pairs in file-encounter order
    pub fn iter(&self) -> impl Iterator<Item = (&str, &Entry)> {
        self.entries.iter().map(|(key, entry)| (key.as_str(), entry))
    }

    /// Comments directly in this scope as `(number, text)`, numbered
    /// from 1 in file order
    pub fn comments(&self) -> impl Iterator<Item = (usize, &str)> {
        let mut number = 0;
        self.entries.iter().filter_map(move |(_, entry)| match entry {
            Entry::Comment(text) => {
                number += 1;
                Some((number, text.as_str()))
            }
            _ => None,
        })
    }

    /// Occurrences of a parameter, if the key holds statements
    pub fn statements(&self, key: &str) -> Option<&[Statement]> {
        self.get(key).and_then(Entry::as_statements)
    }

    /// All `ref $BLOCK = ...;` statements directly in this scope
    pub fn references(&self) -> impl Iterator<Item = &Statement> {
        self.entries
            .iter()
            .flat_map(|(_, entry)| entry.as_statements().unwrap_or(&[]).iter())
            .filter(|stmt| stmt.is_reference())
    }

    pub(crate) fn push_comment(&mut self, text: String) {
        self.comment_count += 1;
        let key = format!("comment-{}", self.comment_count);
        self.index.insert(key.clone(), self.entries.len());
        self.entries.push((key, Entry::Comment(text)));
    }

    /// Append a statement, extending the occurrence list if the name
    /// repeats. The caller guarantees the key does not already hold an
    /// entry of another kind.
    pub(crate) fn push_statement(&mut self, stmt: Statement) {
        match self.index.get(&stmt.name) {
            Some(&i) => {
                if let Entry::Statements(list) = &mut self.entries[i].1 {
                    list.push(stmt);
                }
            }
            None => {
                let key = stmt.name.clone();
                self.index.insert(key.clone(), self.entries.len());
                self.entries.push((key, Entry::Statements(vec![stmt])));
            }
        }
    }

    /// Insert under a fresh key. The caller guarantees the key is absent.
    pub(crate) fn insert(&mut self, key: String, entry: Entry) {
        self.index.insert(key.clone(), self.entries.len());
        self.entries.push((key, entry));
    }

    fn write_indented(&self, f: &mut fmt::Formatter<'_>, indent: usize) -> fmt::Result {
        for (_, entry) in self.iter() {
            entry.write_indented(f, indent)?;
        }
        Ok(())
    }
}

/// A named `def`/`enddef` (or `scan`/`endscan`) group inside a block
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Definition {
    /// Name written after the opening keyword
    pub name: String,
    /// Delimiter pair the group was written with
    pub kind: GroupKind,
    /// Source location, opener through closer
    pub span: Span,
    entries: EntryMap,
}

impl Definition {
    pub(crate) fn new(name: String, kind: GroupKind, span: Span) -> Self {
        Self {
            name,
            kind,
            span,
            entries: EntryMap::default(),
        }
    }

    /// Ordered entries of this definition
    pub fn entries(&self) -> &EntryMap {
        &self.entries
    }

    /// Look up an entry by key
    pub fn get(&self, key: &str) -> Option<&Entry> {
        self.entries.get(key)
    }

    /// Entry keys in file order
    pub fn keys(&self) -> impl Iterator<Item = &str> {
        self.entries.keys()
    }

    /// Occurrences of a parameter within this definition
    pub fn statements(&self, key: &str) -> Option<&[Statement]> {
        self.entries.statements(key)
    }

    /// Cross-references within this definition
    pub fn references(&self) -> impl Iterator<Item = &Statement> {
        self.entries.references()
    }

    /// Comments directly within this definition, numbered from 1
    pub fn comments(&self) -> impl Iterator<Item = (usize, &str)> {
        self.entries.comments()
    }

    /// Number of entries
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// True if the definition holds no entries
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub(crate) fn entries_mut(&mut self) -> &mut EntryMap {
        &mut self.entries
    }
}

impl fmt::Display for Definition {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "{} {};", self.kind.opener(), self.name)?;
        self.entries.write_indented(f, STATEMENT_INDENT)?;
        writeln!(f, "{};", self.kind.closer())
    }
}

/// A top-level `$NAME` section of a VEX file
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Block {
    /// Name written after the `$` marker
    pub name: String,
    /// Source location, header through last entry
    pub span: Span,
    entries: EntryMap,
}

impl Block {
    pub(crate) fn new(name: String, span: Span) -> Self {
        Self {
            name,
            span,
            entries: EntryMap::default(),
        }
    }

    /// Ordered entries of this block
    pub fn entries(&self) -> &EntryMap {
        &self.entries
    }

    /// Look up an entry by key
    pub fn get(&self, key: &str) -> Option<&Entry> {
        self.entries.get(key)
    }

    /// Entry keys in file order
    pub fn keys(&self) -> impl Iterator<Item = &str> {
        self.entries.keys()
    }

    /// Look up a definition (or scan) by name
    pub fn definition(&self, name: &str) -> Option<&Definition> {
        self.get(name).and_then(Entry::as_definition)
    }

    /// All definitions and scans, in file order
    pub fn definitions(&self) -> impl Iterator<Item = &Definition> {
        self.entries.iter().filter_map(|(_, entry)| entry.as_definition())
    }

    /// Occurrences of a parameter written directly in the block
    pub fn statements(&self, key: &str) -> Option<&[Statement]> {
        self.entries.statements(key)
    }

    /// Cross-references written directly in the block
    pub fn references(&self) -> impl Iterator<Item = &Statement> {
        self.entries.references()
    }

    /// Comments directly within this block, numbered from 1.
    /// Comments inside nested definitions are not counted here.
    pub fn comments(&self) -> impl Iterator<Item = (usize, &str)> {
        self.entries.comments()
    }

    /// Number of entries
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// True if the block holds no entries
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub(crate) fn entries_mut(&mut self) -> &mut EntryMap {
        &mut self.entries
    }
}

impl fmt::Display for Block {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "${};", self.name)?;
        self.entries.write_indented(f, STATEMENT_INDENT)
    }
}

/// A complete parsed VEX file: blocks keyed by name plus any preamble
/// comments, in file-encounter order. Read-only once parsing returns.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct VexDocument {
    entries: EntryMap,
}

impl VexDocument {
    /// Ordered top-level entries
    pub fn entries(&self) -> &EntryMap {
        &self.entries
    }

    /// Look up a top-level entry by key
    pub fn get(&self, key: &str) -> Option<&Entry> {
        self.entries.get(key)
    }

    /// Look up a block by exact name; absence is not an error
    pub fn block(&self, name: &str) -> Option<&Block> {
        self.get(name).and_then(Entry::as_block)
    }

    /// All blocks in file order
    pub fn blocks(&self) -> impl Iterator<Item = &Block> {
        self.entries.iter().filter_map(|(_, entry)| entry.as_block())
    }

    /// Top-level keys in file order
    pub fn keys(&self) -> impl Iterator<Item = &str> {
        self.entries.keys()
    }

    /// File-level preamble comments, numbered from 1
    pub fn comments(&self) -> impl Iterator<Item = (usize, &str)> {
        self.entries.comments()
    }

    /// Number of top-level entries
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// True if the document holds no entries
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub(crate) fn entries_mut(&mut self) -> &mut EntryMap {
        &mut self.entries
    }
}

impl fmt::Display for VexDocument {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        self.entries.write_indented(f, 0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn stmt(name: &str, value: &str, line: usize) -> Statement {
        Statement::new(
            name,
            StatementKind::Parameter,
            vec![value.to_string()],
            Span::line(line),
        )
    }

    #[test]
    fn test_entry_map_preserves_order() {
        let mut map = EntryMap::default();
        map.push_statement(stmt("zulu", "1", 1));
        map.push_comment(" note".to_string());
        map.push_statement(stmt("alpha", "2", 3));

        let keys: Vec<&str> = map.keys().collect();
        assert_eq!(keys, vec!["zulu", "comment-1", "alpha"]);
    }

    #[test]
    fn test_repeated_statement_extends_list() {
        let mut map = EntryMap::default();
        map.push_statement(stmt("axis_offset", "1.234 m", 1));
        map.push_statement(stmt("axis_offset", "1.240 m", 2));

        let occurrences = map.statements("axis_offset").unwrap();
        assert_eq!(occurrences.len(), 2);
        assert_eq!(occurrences[0].value(), "1.234 m");
        assert_eq!(occurrences[1].value(), "1.240 m");
        assert_eq!(map.len(), 1);
    }

    #[test]
    fn test_comment_numbering_is_local() {
        let mut outer = EntryMap::default();
        outer.push_comment(" first".to_string());
        outer.push_comment(" second".to_string());
        let mut inner = EntryMap::default();
        inner.push_comment(" fresh scope".to_string());

        assert_eq!(
            outer.comments().collect::<Vec<_>>(),
            vec![(1, " first"), (2, " second")]
        );
        assert_eq!(inner.comments().collect::<Vec<_>>(), vec![(1, " fresh scope")]);
        assert!(outer.get("comment-2").is_some());
        assert!(inner.get("comment-2").is_none());
    }

    #[test]
    fn test_statement_display() {
        let s = stmt("site_name", "JODRELL2", 1);
        assert_eq!(s.to_string(), "site_name = JODRELL2;\n");

        let r = Statement::new(
            "IF",
            StatementKind::Reference,
            vec!["LO@2100MHzDPolTone/1".to_string()],
            Span::line(2),
        );
        assert_eq!(r.to_string(), "ref $IF = LO@2100MHzDPolTone/1;\n");
        assert!(r.is_reference());
    }

    #[test]
    fn test_definition_display() {
        let mut def = Definition::new("Jb".to_string(), GroupKind::Def, Span::line(1));
        def.entries_mut().push_comment(" antenna".to_string());
        def.entries_mut().push_statement(stmt("site_name", "JODRELL2", 3));

        assert_eq!(
            def.to_string(),
            "def Jb;\n* antenna\n     site_name = JODRELL2;\nenddef;\n"
        );
    }

    #[test]
    fn test_multi_field_statement_value() {
        let s = Statement::new(
            "clock_early",
            StatementKind::Parameter,
            vec!["2.0 usec".to_string(), "5.0e-13".to_string()],
            Span::line(1),
        );
        assert_eq!(s.value(), "2.0 usec");
        assert_eq!(s.to_string(), "clock_early = 2.0 usec:5.0e-13;\n");
    }
}
