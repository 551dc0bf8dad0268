pub mod body;
pub mod constant;
pub mod op_code;
pub mod recorder;
