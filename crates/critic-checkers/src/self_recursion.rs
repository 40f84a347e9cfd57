//! Checker: selfRecursion (diagnostic, experimental)
//!
//! Flags functions whose entry block calls the function itself. Every
//! instruction of the entry block runs before the first branch or return,
//! so such a call recurses unconditionally.
//!
//! Methods are skipped: a call through a different receiver value is
//! ordinary recursion over a data structure.

use critic_engine::{query, Checker, CheckerContext, CheckerInfo, InitContext, WalkKind};
use critic_syntax::flow::{BasicBlock, FlowFunction, Instruction};

pub const NAME: &str = "selfRecursion";

pub fn info() -> CheckerInfo {
    CheckerInfo::new(NAME, "Detects functions that unconditionally call themselves")
        .tags(&["diagnostic", "experimental"])
        .example(
            "func fact(n int) int { return n * fact(n-1) }",
            "func fact(n int) int { if n == 0 { return 1 }; return n * fact(n-1) }",
        )
}

pub fn create(_cx: &InitContext<'_>) -> Box<dyn Checker> {
    Box::new(SelfRecursion)
}

pub struct SelfRecursion;

impl Checker for SelfRecursion {
    fn kinds(&self) -> &[WalkKind] {
        &[WalkKind::FlowBlock]
    }

    fn visit_flow_block(
        &mut self,
        func: &FlowFunction,
        block: &BasicBlock,
        cx: &mut CheckerContext<'_, '_>,
    ) {
        if func.entry().map(|entry| entry.index) != Some(block.index) {
            return;
        }
        // Func literals have no object of their own.
        let Some(obj) = func.object.and_then(|id| cx.program().object(id)) else {
            return;
        };
        if obj.recv.is_some() {
            return;
        }
        let program = cx.program();
        let own_name = obj.full_name(program.types());
        let recursive = block.instrs.iter().find_map(|instr| match instr {
            Instruction::Call(call) => {
                (query::flow_call_name(program, call).as_deref() == Some(own_name.as_str()))
                    .then_some(call.span)
            }
            _ => None,
        });
        if let Some(span) = recursive {
            cx.warn(&span, format!("infinite recursive call to {}", obj.name));
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::testing::lint;
    use pretty_assertions::assert_eq;

    #[test]
    fn test_unconditional_call_flagged() {
        let source = r#"package p

func count(n int) int {
	println(n)
	return count(n + 1)
}
"#;
        let diags = lint(NAME, source);
        assert_eq!(diags.len(), 1, "got: {:?}", diags);
        assert_eq!(diags[0].message, "infinite recursive call to count");
        assert_eq!(diags[0].position.line, 5);
        assert_eq!(diags[0].position.column, 9);
    }

    #[test]
    fn test_guarded_recursion_ok() {
        let source = r#"package p

func fact(n int) int {
	if n == 0 {
		return 1
	}
	return n * fact(n-1)
}

func either(ok bool) bool {
	return ok && either(!ok)
}
"#;
        assert!(lint(NAME, source).is_empty());
    }

    #[test]
    fn test_go_and_defer_ignored() {
        let source = r#"package p

func spin() {
	go spin()
}

func cleanup() {
	defer cleanup()
}
"#;
        assert!(lint(NAME, source).is_empty());
    }

    #[test]
    fn test_methods_and_literals_skipped() {
        let source = r#"package p

type Node struct {
	next *Node
}

func (n *Node) Walk() {
	n.next.Walk()
}

func outer() {
	inner := func() {
		outer()
	}
	inner()
}
"#;
        assert!(lint(NAME, source).is_empty());
    }

    #[test]
    fn test_one_warning_per_function() {
        let source = "package p\n\nfunc loop() {\n\tloop()\n\tloop()\n}\n";
        assert_eq!(lint(NAME, source).len(), 1);
    }
}
