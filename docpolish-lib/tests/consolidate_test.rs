use docpolish_lib::style::consolidate::{consolidate, extract_rules, merge_rules};
use pretty_assertions::assert_eq;

fn sheet_of(css: &str) -> docpolish_lib::style::consolidate::ConsolidatedSheet {
    merge_rules(&extract_rules(css))
}

#[test]
fn extracts_flat_blocks_in_source_order() {
    let rules = extract_rules(".a { color: red; }\n.b { color: blue; }");
    assert_eq!(
        rules,
        vec![
            (".a".to_string(), "color: red;".to_string()),
            (".b".to_string(), "color: blue;".to_string()),
        ]
    );
}

#[test]
fn selector_expansion_preserves_order() {
    let rules = extract_rules(".a, .b { x: 1; }");
    assert_eq!(
        rules,
        vec![
            (".a".to_string(), "x: 1;".to_string()),
            (".b".to_string(), "x: 1;".to_string()),
        ]
    );
}

#[test]
fn blank_selectors_are_dropped() {
    let rules = extract_rules(".a, , .b { x: 1; }");
    let selectors: Vec<&str> = rules.iter().map(|(s, _)| s.as_str()).collect();
    assert_eq!(selectors, vec![".a", ".b"]);
}

#[test]
fn nested_blocks_are_parsed_flat() {
    // Flat extraction picks up the inner rule and drops the at-rule header.
    let rules = extract_rules("@media screen { .a { color: red; } }");
    assert_eq!(rules, vec![(".a".to_string(), "color: red;".to_string())]);
}

#[test]
fn unterminated_block_is_ignored() {
    assert_eq!(extract_rules(".a { color: red;"), vec![]);
    assert_eq!(extract_rules(".a { x: 1; } .b { oops"), vec![(".a".to_string(), "x: 1;".to_string())]);
}

#[test]
fn empty_body_yields_no_rule() {
    assert_eq!(extract_rules(".a {}"), vec![]);
}

#[test]
fn important_beats_later_normal_declaration() {
    let sheet = sheet_of(".a { color: red; color: blue !important; color: green; }");
    let rule = sheet.rule(".a").unwrap();
    let decl = rule.get("color").unwrap();
    assert_eq!(decl.value, "blue !important");
    assert!(decl.important);
}

#[test]
fn later_important_beats_earlier_important() {
    let sheet = sheet_of(".a { color: red !important; color: blue !important; }");
    let decl = sheet.rule(".a").unwrap().get("color").unwrap();
    assert_eq!(decl.value, "blue !important");
}

#[test]
fn last_write_wins_across_blocks() {
    let sheet = sheet_of(".a { color: red; } .a { color: blue; }");
    let decl = sheet.rule(".a").unwrap().get("color").unwrap();
    assert_eq!(decl.value, "blue");
    assert!(!decl.important);
}

#[test]
fn property_position_is_stable_under_overwrite() {
    let css = ".a { x: 1; y: 2; } .a { x: 3; }";
    assert_eq!(consolidate(css), ".a { x: 3; y: 2; }");
}

#[test]
fn selector_order_is_first_seen() {
    let css = ".b { x: 1; } .a { y: 2; } .b { z: 3; }";
    let sheet = sheet_of(css);
    let selectors: Vec<&str> = sheet.selectors().collect();
    assert_eq!(selectors, vec![".b", ".a"]);
    assert_eq!(consolidate(css), ".b { x: 1; z: 3; }\n\n.a { y: 2; }");
}

#[test]
fn value_may_contain_colons() {
    let sheet = sheet_of(".a { background: url(data:image/png;base64,x) }");
    // The `;` inside the data URI splits the clause; the first piece keeps
    // everything after the first colon.
    let decl = sheet.rule(".a").unwrap().get("background").unwrap();
    assert_eq!(decl.value, "url(data:image/png");
}

#[test]
fn malformed_clauses_are_dropped() {
    let sheet = sheet_of(".a { color red; margin: 0; ; }");
    let rule = sheet.rule(".a").unwrap();
    assert_eq!(rule.len(), 1);
    assert_eq!(rule.get("margin").unwrap().value, "0");
}

#[test]
fn selector_with_only_malformed_clauses_is_absent() {
    let sheet = sheet_of(".a { nonsense } .b { x: 1; }");
    assert!(sheet.rule(".a").is_none());
    let selectors: Vec<&str> = sheet.selectors().collect();
    assert_eq!(selectors, vec![".b"]);
}

#[test]
fn empty_input_yields_empty_output() {
    assert_eq!(consolidate(""), "");
    assert_eq!(consolidate("no blocks here"), "");
    assert!(sheet_of("").is_empty());
}

#[test]
fn consolidation_is_idempotent() {
    let inputs = [
        ".a { color: red; color: blue !important; } .b, .c { x: 1; } .a { margin: 0; }",
        "h1 { font-size: 2em; }\n\np { line-height: 1.6; }",
        ".a { background: url(data:image/png;base64,x); border: 1px solid #000; }",
    ];
    for css in inputs {
        let once = consolidate(css);
        let twice = consolidate(&once);
        assert_eq!(once, twice, "not a fixed point for {:?}", css);
    }
}

#[test]
fn serialized_form_has_trailing_semicolon() {
    assert_eq!(
        consolidate(".a { color: red }"),
        ".a { color: red; }"
    );
}
