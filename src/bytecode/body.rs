use crate::bytecode::{constant::Constant, op_code::Instructions};

/// The compiled form of a recorded call expression: a branch-free, linear
/// instruction stream plus its constant pool.
#[derive(Debug, Clone, PartialEq)]
pub struct ClosureBody {
    pub instructions: Instructions,
    pub constants: Vec<Constant>,
}
