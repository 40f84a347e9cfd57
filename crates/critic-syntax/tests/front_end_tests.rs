use critic_syntax::ast::*;
use critic_syntax::flow::{self, Callee, Instruction};
use critic_syntax::types::{BasicKind, TypeArena};
use critic_syntax::{check_file, printer, CheckConfig, Sizes, SourceFile};

const SAMPLE: &str = r#"// Package store keeps things.
package store

import (
	"errors"
	"strings"
)

const (
	KindA = iota
	KindB
)

var ErrMissing = errors.New("missing")

type Item struct {
	Name  string
	Tags  []string
	Count int
}

type Store struct {
	items map[string]*Item
}

func (s *Store) Get(name string) (*Item, error) {
	item, ok := s.items[strings.ToLower(name)]
	if !ok {
		return nil, ErrMissing
	}
	return item, nil
}

func (s *Store) Len() int {
	n := 0
	for range s.items {
		n++
	}
	return n
}

func Sum(xs ...int) int {
	total := 0
	for _, x := range xs {
		total += x
	}
	return total
}
"#;

fn parse(src: &str) -> SourceFile {
    SourceFile::parse("store.go", src).unwrap()
}

// ============================================================================
// Parsing
// ============================================================================

#[test]
fn test_sample_parses() {
    let file = parse(SAMPLE);
    assert_eq!(file.file.package.name, "store");
    let imports: Vec<String> = file.file.imports().map(|i| i.path_value()).collect();
    assert_eq!(imports, vec!["errors", "strings"]);
    let funcs: Vec<&str> = file.file.funcs().map(|f| f.name.name.as_str()).collect();
    assert_eq!(funcs, vec!["Get", "Len", "Sum"]);
    assert!(file.doc().is_some());
    assert!(!file.is_generated());
}

#[test]
fn test_semicolon_insertion_after_closing_brace() {
    let file = parse("package p\nfunc f() int {\n\tif true {\n\t\treturn 1\n\t}\n\treturn 2\n}\n");
    let func = file.file.funcs().next().unwrap();
    assert_eq!(func.body.as_ref().unwrap().stmts.len(), 2);
}

#[test]
fn test_composite_literal_not_allowed_in_if_header() {
    let file = parse("package p\ntype T struct{}\nfunc f(x T) {\n\tif x == (T{}) {\n\t}\n}\n");
    let func = file.file.funcs().next().unwrap();
    assert!(matches!(func.body.as_ref().unwrap().stmts[0], Stmt::If(_)));
}

// ============================================================================
// Type checking
// ============================================================================

#[test]
fn test_method_names_are_qualified() {
    let file = parse(SAMPLE);
    let info = check_file(&file.file, &CheckConfig::default());
    let names: Vec<String> = file
        .file
        .funcs()
        .filter_map(|f| info.object_of(&f.name))
        .filter_map(|obj| info.full_name(obj))
        .collect();
    assert_eq!(names, vec!["(*store.Store).Get", "(*store.Store).Len", "store.Sum"]);
}

#[test]
fn test_struct_size_follows_word_size() {
    let file = parse(SAMPLE);
    let info = check_file(&file.file, &CheckConfig::default());
    let item = info
        .objects
        .iter()
        .find(|obj| obj.name == "Item")
        .map(|obj| obj.ty)
        .unwrap();
    // string (16) + slice (24) + int (8)
    assert_eq!(Sizes::default().size_of(&info.types, item), Some(48));
    assert_eq!(Sizes::new(4).size_of(&info.types, item), Some(24));
}

#[test]
fn test_iota_constants() {
    let file = parse(SAMPLE);
    let info = check_file(&file.file, &CheckConfig::default());
    let kind_b = info.objects.iter().find(|obj| obj.name == "KindB").unwrap();
    assert_eq!(kind_b.const_value().and_then(|v| v.as_int()), Some(1));
    assert_eq!(kind_b.ty, TypeArena::basic(BasicKind::UntypedInt));
}

// ============================================================================
// Flow form
// ============================================================================

#[test]
fn test_flow_functions_cover_bodies() {
    let file = parse(SAMPLE);
    let info = check_file(&file.file, &CheckConfig::default());
    let program = flow::build(&file.file, &info);
    assert_eq!(program.functions.len(), 3);
    for function in &program.functions {
        assert!(function.entry().unwrap().preds.is_empty());
        for block in &function.blocks {
            assert!(block.control().is_some(), "block {} of {} has no terminator", block.index, function.name);
        }
    }
}

#[test]
fn test_flow_calls_resolve_external_functions() {
    let file = parse(SAMPLE);
    let info = check_file(&file.file, &CheckConfig::default());
    let program = flow::build(&file.file, &info);
    let get = &program.functions[0];
    let callees: Vec<String> = get
        .blocks
        .iter()
        .flat_map(|b| &b.instrs)
        .filter_map(Instruction::call)
        .filter_map(|call| match call.callee {
            Callee::Function(obj) => info.full_name(obj),
            _ => None,
        })
        .collect();
    assert_eq!(callees, vec!["strings.ToLower"]);
}

// ============================================================================
// Printing
// ============================================================================

#[test]
fn test_printed_statement_reparses() {
    let file = parse(SAMPLE);
    let get = file.file.funcs().next().unwrap();
    let stmt = &get.body.as_ref().unwrap().stmts[1];
    let printed = printer::stmt(stmt);
    assert_eq!(printed, "if !ok {\n\treturn nil, ErrMissing\n}");
    let wrapped = format!("package p\nfunc f() {{\n{}\n}}\n", printed);
    assert!(SourceFile::parse("p.go", wrapped).is_ok());
}
