//! Lowered control-flow form
//!
//! Each function body becomes a list of basic blocks. Block 0 is the entry;
//! every block that is not empty ends with a terminator (`If`, `Jump`,
//! `Return` or `Panic`). Blocks unreachable from the entry are dropped.
//! Function literals are lowered as functions of their own named
//! `outer$N`.

mod lower;

pub use lower::build;

use crate::ast::NodeId;
use crate::check::ObjectId;
use crate::token::Span;

#[derive(Debug, Clone, Default, PartialEq)]
pub struct FlowProgram {
    pub functions: Vec<FlowFunction>,
}

impl FlowProgram {
    /// Flow function lowered from the declaration or literal `decl`.
    pub fn function(&self, decl: NodeId) -> Option<&FlowFunction> {
        self.functions.iter().find(|f| f.decl == decl)
    }

    pub fn instruction_count(&self) -> usize {
        self.functions
            .iter()
            .flat_map(|f| &f.blocks)
            .map(|b| b.instrs.len())
            .sum()
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct FlowFunction {
    pub name: String,
    /// Declared function object; None for function literals
    pub object: Option<ObjectId>,
    /// Node id of the `FuncDecl` or `FuncLit`
    pub decl: NodeId,
    pub span: Span,
    pub blocks: Vec<BasicBlock>,
}

impl FlowFunction {
    pub fn entry(&self) -> Option<&BasicBlock> {
        self.blocks.first()
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct BasicBlock {
    pub index: usize,
    pub instrs: Vec<Instruction>,
    pub succs: Vec<usize>,
    pub preds: Vec<usize>,
}

impl BasicBlock {
    /// The terminating instruction, if the block has one.
    pub fn control(&self) -> Option<&Instruction> {
        self.instrs.last().filter(|instr| instr.is_terminator())
    }
}

/// Static target of a call.
#[derive(Debug, Clone, PartialEq)]
pub enum Callee {
    /// Declared function or method, or a member of an imported package
    Function(ObjectId),
    Builtin(String),
    /// Method call through an interface value
    Invoke { method: String },
    /// Call of a function value
    Value,
}

#[derive(Debug, Clone, PartialEq)]
pub struct CallInstr {
    pub callee: Callee,
    /// The `CallExpr` this was lowered from
    pub call: NodeId,
    pub span: Span,
}

impl CallInstr {
    pub fn is_invoke(&self) -> bool {
        matches!(self.callee, Callee::Invoke { .. })
    }
}

#[derive(Debug, Clone, PartialEq)]
pub enum Instruction {
    Call(CallInstr),
    Go(CallInstr),
    Defer(CallInstr),
    /// Store to one or more locations
    Assign { span: Span },
    Send { span: Span },
    /// Source reference to a variable, kept for debugging
    DebugRef {
        expr: NodeId,
        object: ObjectId,
        span: Span,
    },
    /// Conditional branch: successors are (then, else)
    If { cond: NodeId, span: Span },
    Jump { span: Span },
    Return { span: Span },
    Panic { span: Span },
}

impl Instruction {
    pub fn span(&self) -> Span {
        match self {
            Instruction::Call(call) | Instruction::Go(call) | Instruction::Defer(call) => call.span,
            Instruction::Assign { span }
            | Instruction::Send { span }
            | Instruction::DebugRef { span, .. }
            | Instruction::If { span, .. }
            | Instruction::Jump { span }
            | Instruction::Return { span }
            | Instruction::Panic { span } => *span,
        }
    }

    pub fn is_terminator(&self) -> bool {
        matches!(
            self,
            Instruction::If { .. }
                | Instruction::Jump { .. }
                | Instruction::Return { .. }
                | Instruction::Panic { .. }
        )
    }

    /// The call of a `Call`, `Go` or `Defer` instruction.
    pub fn call(&self) -> Option<&CallInstr> {
        match self {
            Instruction::Call(call) | Instruction::Go(call) | Instruction::Defer(call) => {
                Some(call)
            }
            _ => None,
        }
    }
}
