use std::fmt;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[repr(u8)]
pub enum OpCode {
    OpConst = 0,
    OpTrue = 1,
    OpFalse = 2,
    OpNull = 3,
    OpGetCaptured = 4,
    OpGetElement = 5,
    OpGetTarget = 6,
    OpGetStatic = 7,
    OpGetField = 8,
    OpNew = 9,
    OpInvoke = 10,
    OpInvokeStatic = 11,
    OpPop = 12,
    OpReturn = 13,
    OpAdd = 14,
    OpSub = 15,
    OpMul = 16,
    OpDiv = 17,
    OpJump = 18,
    OpJumpNotTruthy = 19,
    OpClosure = 20,
}

impl OpCode {
    pub fn from_byte(byte: u8) -> Option<OpCode> {
        match byte {
            0 => Some(OpCode::OpConst),
            1 => Some(OpCode::OpTrue),
            2 => Some(OpCode::OpFalse),
            3 => Some(OpCode::OpNull),
            4 => Some(OpCode::OpGetCaptured),
            5 => Some(OpCode::OpGetElement),
            6 => Some(OpCode::OpGetTarget),
            7 => Some(OpCode::OpGetStatic),
            8 => Some(OpCode::OpGetField),
            9 => Some(OpCode::OpNew),
            10 => Some(OpCode::OpInvoke),
            11 => Some(OpCode::OpInvokeStatic),
            12 => Some(OpCode::OpPop),
            13 => Some(OpCode::OpReturn),
            14 => Some(OpCode::OpAdd),
            15 => Some(OpCode::OpSub),
            16 => Some(OpCode::OpMul),
            17 => Some(OpCode::OpDiv),
            18 => Some(OpCode::OpJump),
            19 => Some(OpCode::OpJumpNotTruthy),
            20 => Some(OpCode::OpClosure),
            _ => None,
        }
    }
}

impl fmt::Display for OpCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:?}", self)
    }
}

pub fn operand_widths(op: OpCode) -> Vec<usize> {
    match op {
        OpCode::OpConst
        | OpCode::OpGetStatic
        | OpCode::OpGetField
        | OpCode::OpInvoke
        | OpCode::OpInvokeStatic
        | OpCode::OpJump
        | OpCode::OpJumpNotTruthy => vec![2],
        OpCode::OpGetCaptured => vec![1],
        OpCode::OpNew | OpCode::OpClosure => vec![2, 1],
        _ => vec![],
    }
}

pub type Instructions = Vec<u8>;

pub fn make(op: OpCode, operands: &[usize]) -> Instructions {
    let widths = operand_widths(op);
    let mut instruction = vec![op as u8];

    for (i, operand) in operands.iter().enumerate() {
        let width = widths.get(i).copied().unwrap_or(0);
        match width {
            1 => instruction.push(*operand as u8),
            2 => {
                instruction.push((*operand >> 8) as u8);
                instruction.push(*operand as u8);
            }
            _ => {}
        }
    }

    instruction
}

pub fn read_u16(instructions: &[u8], offset: usize) -> u16 {
    ((instructions[offset] as u16) << 8) | (instructions[offset + 1] as u16)
}

pub fn read_u8(instructions: &[u8], offset: usize) -> u8 {
    instructions[offset]
}

pub fn disassemble(instructions: &Instructions) -> String {
    let mut result = String::new();
    let mut i = 0;

    while i < instructions.len() {
        let Some(op) = OpCode::from_byte(instructions[i]) else {
            result.push_str(&format!("{:04} ??({})\n", i, instructions[i]));
            i += 1;
            continue;
        };
        let widths = operand_widths(op);

        let mut operands = Vec::new();
        let mut offset = i + 1;

        for width in widths {
            if offset + width > instructions.len() {
                break;
            }
            match width {
                1 => {
                    operands.push(read_u8(instructions, offset) as usize);
                    offset += 1;
                }
                2 => {
                    operands.push(read_u16(instructions, offset) as usize);
                    offset += 2;
                }
                _ => {}
            }
        }

        let operand_str = operands
            .iter()
            .map(|o| o.to_string())
            .collect::<Vec<_>>()
            .join(" ");
        result.push_str(&format!("{:04} {} {}\n", i, op, operand_str));
        i = offset;
    }

    result
}
