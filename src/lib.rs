pub mod analysis;
pub mod bytecode;
pub mod closure;
pub mod jobs;
pub mod value;
