//! Checker: dupImport (diagnostic)
//!
//! Flags a package imported more than once in the same file, usually under
//! different names. Blank imports are ignored.

use critic_engine::{Checker, CheckerContext, CheckerInfo, InitContext, WalkKind};
use critic_syntax::ast::File;
use rustc_hash::FxHashMap;

pub const NAME: &str = "dupImport";

pub fn info() -> CheckerInfo {
    CheckerInfo::new(NAME, "Detects multiple imports of the same package")
        .tags(&["diagnostic"])
        .example(
            "import (\n\t\"fmt\"\n\tprinter \"fmt\"\n)",
            "import \"fmt\"",
        )
}

pub fn create(_cx: &InitContext<'_>) -> Box<dyn Checker> {
    Box::new(DupImport)
}

pub struct DupImport;

impl Checker for DupImport {
    fn kinds(&self) -> &[WalkKind] {
        &[WalkKind::File]
    }

    fn visit_file(&mut self, file: &File, cx: &mut CheckerContext<'_, '_>) {
        let program = cx.program();
        let mut seen: FxHashMap<String, u32> = FxHashMap::default();
        for import in file.imports() {
            if import.name.as_ref().is_some_and(|name| name.name == "_") {
                continue;
            }
            let path = import.path_value();
            match seen.get(&path) {
                Some(&line) => cx.warn(
                    &import.span,
                    format!("package {:?} is already imported on line {}", path, line),
                ),
                None => {
                    seen.insert(path, program.line_of(import.span.start));
                }
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::testing::lint;
    use pretty_assertions::assert_eq;

    #[test]
    fn test_aliased_duplicate_flagged() {
        let source = r#"package p

import (
	"fmt"
	"strings"
	printer "fmt"
)

import . "strings"

func f() {
	fmt.Println(strings.ToUpper("x"))
	printer.Println(ToLower("x"))
}
"#;
        let diags = lint(NAME, source);
        let found: Vec<(u32, &str)> = diags
            .iter()
            .map(|d| (d.position.line, d.message.as_str()))
            .collect();
        assert_eq!(
            found,
            vec![
                (6, "package \"fmt\" is already imported on line 4"),
                (9, "package \"strings\" is already imported on line 5"),
            ]
        );
    }

    #[test]
    fn test_distinct_and_blank_imports_ok() {
        let source = r#"package p

import (
	"fmt"
	_ "fmt"
	"strings"
)

func f() {
	fmt.Println(strings.ToUpper("x"))
}
"#;
        assert!(lint(NAME, source).is_empty());
    }
}
