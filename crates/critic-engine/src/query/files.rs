//! File-level classification

use critic_syntax::ast::{FuncDecl, Spanned, Spec};
use critic_syntax::SourceFile;

use crate::model::Program;

/// Returns true if `path` names a test file.
pub fn is_test_file(path: &str) -> bool {
    path.ends_with("_test.go")
}

pub fn is_in_test(program: &Program<'_>) -> bool {
    is_test_file(program.path())
}

pub fn is_in_main(program: &Program<'_>) -> bool {
    program.file().package.name == "main"
}

/// Returns true for `Example*` functions in test files.
pub fn is_example(program: &Program<'_>, func: &FuncDecl) -> bool {
    func.name.name.starts_with("Example") && is_in_test(program)
}

/// Returns true if the first comment of the file marks it as generated.
pub fn is_generated(source: &SourceFile) -> bool {
    source.is_generated()
}

/// Text of the comments above the package doc comment, or above the
/// `package` clause when there is no doc comment, joined by newlines.
pub fn preamble(source: &SourceFile) -> String {
    let cutoff = source
        .doc()
        .map_or(source.file.package_span.start, |doc| doc.span().start);
    source
        .comments
        .iter()
        .take_while(|group| group.span().start < cutoff)
        .map(|group| group.text())
        .collect::<Vec<_>>()
        .join("\n")
}

/// Split specs into runs of consecutive lines. A spec starts a new group
/// when a blank line (or anything else) separates it from the previous
/// spec's last line.
pub fn group_specs<'s>(program: &Program<'_>, specs: &'s [Spec]) -> Vec<Vec<&'s Spec>> {
    let mut groups: Vec<Vec<&'s Spec>> = Vec::new();
    let mut last_line = 0;
    for spec in specs {
        let span = spec.span();
        let start_line = program.line_of(span.start);
        let end_line = program.line_of(span.end.saturating_sub(1));
        match groups.last_mut() {
            Some(group) if start_line == last_line + 1 => group.push(spec),
            _ => groups.push(vec![spec]),
        }
        last_line = end_line;
    }
    groups
}
