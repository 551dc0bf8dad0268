use crate::{
    bytecode::{
        body::ClosureBody,
        constant::{Constant, FieldRef, MethodRef},
        op_code::{self, OpCode},
    },
    value::JobValue,
};

use super::errors::{ArithOp, ExtractionError};

/// One decoded operation of a closure body.
#[derive(Debug, Clone, PartialEq)]
pub enum Instruction {
    Const(JobValue),
    GetCaptured(usize),
    GetElement,
    GetTarget,
    GetStatic(FieldRef),
    GetField(String),
    New { class_name: String, arg_count: usize },
    Invoke(MethodRef),
    InvokeStatic(MethodRef),
    Pop,
    Return,
    Arith(ArithOp),
    Jump(OpCode),
    NestedClosure,
}

/// The decoded, structurally validated instruction list for one closure
/// shape. Layouts are immutable and shared through the layout cache.
#[derive(Debug, Clone, PartialEq)]
pub struct InstructionLayout {
    pub instructions: Vec<Instruction>,
}

/// Decodes a closure body into its linear operation list, validating opcode
/// bytes, operand widths, and constant-pool references.
pub fn extract(body: &ClosureBody) -> Result<InstructionLayout, ExtractionError> {
    if body.instructions.is_empty() {
        return Err(ExtractionError::EmptyBody);
    }
    tracing::trace!(
        disassembly = %op_code::disassemble(&body.instructions),
        "decoding closure body"
    );

    let bytes = &body.instructions;
    let mut decoded = Vec::new();
    let mut offset = 0;

    while offset < bytes.len() {
        let op = OpCode::from_byte(bytes[offset]).ok_or(ExtractionError::UnknownOpCode {
            byte: bytes[offset],
            offset,
        })?;

        let widths = op_code::operand_widths(op);
        let mut operands = Vec::with_capacity(widths.len());
        let mut cursor = offset + 1;
        for width in widths {
            if cursor + width > bytes.len() {
                return Err(ExtractionError::TruncatedOperand { op, offset });
            }
            let operand = match width {
                1 => op_code::read_u8(bytes, cursor) as usize,
                _ => op_code::read_u16(bytes, cursor) as usize,
            };
            operands.push(operand);
            cursor += width;
        }

        decoded.push(decode_one(op, &operands, &body.constants)?);
        offset = cursor;
    }

    Ok(InstructionLayout {
        instructions: decoded,
    })
}

fn decode_one(
    op: OpCode,
    operands: &[usize],
    constants: &[Constant],
) -> Result<Instruction, ExtractionError> {
    let instruction = match op {
        OpCode::OpConst => Instruction::Const(value_constant(constants, operands[0], op)?),
        OpCode::OpTrue => Instruction::Const(JobValue::Bool(true)),
        OpCode::OpFalse => Instruction::Const(JobValue::Bool(false)),
        OpCode::OpNull => Instruction::Const(JobValue::Null),
        OpCode::OpGetCaptured => Instruction::GetCaptured(operands[0]),
        OpCode::OpGetElement => Instruction::GetElement,
        OpCode::OpGetTarget => Instruction::GetTarget,
        OpCode::OpGetStatic => Instruction::GetStatic(field_constant(constants, operands[0], op)?),
        OpCode::OpGetField => Instruction::GetField(name_constant(constants, operands[0], op)?),
        OpCode::OpNew => Instruction::New {
            class_name: name_constant(constants, operands[0], op)?,
            arg_count: operands[1],
        },
        OpCode::OpInvoke => Instruction::Invoke(method_constant(constants, operands[0], op)?),
        OpCode::OpInvokeStatic => {
            Instruction::InvokeStatic(method_constant(constants, operands[0], op)?)
        }
        OpCode::OpPop => Instruction::Pop,
        OpCode::OpReturn => Instruction::Return,
        OpCode::OpAdd => Instruction::Arith(ArithOp::Add),
        OpCode::OpSub => Instruction::Arith(ArithOp::Sub),
        OpCode::OpMul => Instruction::Arith(ArithOp::Mul),
        OpCode::OpDiv => Instruction::Arith(ArithOp::Div),
        OpCode::OpJump | OpCode::OpJumpNotTruthy => Instruction::Jump(op),
        OpCode::OpClosure => Instruction::NestedClosure,
    };
    Ok(instruction)
}

fn value_constant(
    constants: &[Constant],
    index: usize,
    op: OpCode,
) -> Result<JobValue, ExtractionError> {
    match constants.get(index) {
        Some(Constant::Value(value)) => Ok(value.clone()),
        _ => Err(ExtractionError::BadConstant { op, index }),
    }
}

fn name_constant(
    constants: &[Constant],
    index: usize,
    op: OpCode,
) -> Result<String, ExtractionError> {
    match constants.get(index) {
        Some(Constant::Name(name)) => Ok(name.clone()),
        _ => Err(ExtractionError::BadConstant { op, index }),
    }
}

fn field_constant(
    constants: &[Constant],
    index: usize,
    op: OpCode,
) -> Result<FieldRef, ExtractionError> {
    match constants.get(index) {
        Some(Constant::Field(field)) => Ok(field.clone()),
        _ => Err(ExtractionError::BadConstant { op, index }),
    }
}

fn method_constant(
    constants: &[Constant],
    index: usize,
    op: OpCode,
) -> Result<MethodRef, ExtractionError> {
    match constants.get(index) {
        Some(Constant::Method(method)) => Ok(method.clone()),
        _ => Err(ExtractionError::BadConstant { op, index }),
    }
}
