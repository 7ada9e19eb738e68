//! Failure mode tests: every structural and lexical error is fatal and
//! carries the offending source line.

use vexfile::{parse_str, VexError};

#[test]
fn test_unterminated_def_before_next_block() {
    let input = "\
$STATION;
def Jb;
     site_name = JODRELL2;
$SOURCE;
";
    let err = parse_str(input).unwrap_err();
    assert_eq!(
        err,
        VexError::parse("'def Jb' never closed with 'enddef;'", 2)
    );
}

#[test]
fn test_unterminated_def_at_end_of_input() {
    let input = "$STATION;\ndef Jb;\n     site_name = JODRELL2;\n";
    let err = parse_str(input).unwrap_err();
    assert_eq!(
        err,
        VexError::parse("'def Jb' never closed with 'enddef;'", 2)
    );
}

#[test]
fn test_unterminated_scan() {
    let input = "$SCHED;\nscan No0001;\n     start = 2014y285d08h30m00s;\n";
    let err = parse_str(input).unwrap_err();
    assert_eq!(
        err,
        VexError::parse("'scan No0001' never closed with 'endscan;'", 2)
    );
}

#[test]
fn test_enddef_without_def() {
    let err = parse_str("$STATION;\nenddef;\n").unwrap_err();
    assert_eq!(err, VexError::parse("'enddef;' without a matching 'def'", 2));
}

#[test]
fn test_endscan_closing_a_def() {
    let err = parse_str("$SCHED;\ndef No0001;\nendscan;\n").unwrap_err();
    assert_eq!(err, VexError::parse("'endscan;' closes 'def No0001'", 3));
}

#[test]
fn test_nested_groups_rejected() {
    let err = parse_str("$SCHED;\nscan No0001;\nscan No0002;\n").unwrap_err();
    assert_eq!(
        err,
        VexError::parse("'scan' may not appear inside 'scan No0001'", 3)
    );
}

#[test]
fn test_duplicate_top_level_block() {
    let err = parse_str("$STATION;\n$SOURCE;\n$STATION;\n").unwrap_err();
    assert_eq!(err, VexError::parse("duplicate block '$STATION'", 3));
}

#[test]
fn test_duplicate_definition_in_block() {
    let input = "$STATION;\ndef Jb;\nenddef;\ndef Jb;\nenddef;\n";
    let err = parse_str(input).unwrap_err();
    assert_eq!(
        err,
        VexError::parse("definition name 'Jb' already used in block '$STATION'", 4)
    );
}

#[test]
fn test_statement_before_first_block() {
    let err = parse_str("VEX_rev = 1.5;\n$GLOBAL;\n").unwrap_err();
    assert_eq!(
        err,
        VexError::parse("'VEX_rev' assignment outside of any block", 1)
    );
}

#[test]
fn test_parameter_name_colliding_with_definition() {
    let input = "$STATION;\ndef Jb;\nenddef;\nJb = oops;\n";
    let err = parse_str(input).unwrap_err();
    assert_eq!(
        err,
        VexError::parse(
            "parameter 'Jb' conflicts with an earlier entry of a different kind",
            4
        )
    );
}

#[test]
fn test_unterminated_statement_at_end_of_input() {
    let input = "$SCHED;\nstart = 2014y285d08h30m00s\n";
    let err = parse_str(input).unwrap_err();
    assert_eq!(err, VexError::lex("statement never terminated with ';'", 2));
    assert!(err.is_lex());
}

#[test]
fn test_line_without_assignment() {
    let err = parse_str("$STATION;\nno equals sign here;\n").unwrap_err();
    assert_eq!(err, VexError::lex("expected 'name = value;' statement", 2));
}

#[test]
fn test_reference_without_block_marker() {
    let err = parse_str("$GLOBAL;\nref EXPER = N14C3;\n").unwrap_err();
    assert_eq!(err, VexError::lex("reference must name a '$' block", 2));
}

#[test]
fn test_empty_block_name() {
    let err = parse_str("$;\n").unwrap_err();
    assert_eq!(err, VexError::lex("missing block name", 1));
}

#[test]
fn test_def_without_name() {
    let err = parse_str("$STATION;\ndef;\n").unwrap_err();
    assert_eq!(err, VexError::lex("missing def name", 2));
}

#[test]
fn test_first_error_wins() {
    // the duplicate block on line 3 is reported, not the later missing '='
    let input = "$A;\n$B;\n$A;\nnonsense line;\n";
    let err = parse_str(input).unwrap_err();
    assert_eq!(err.line(), 3);
    assert!(err.is_parse());
}
