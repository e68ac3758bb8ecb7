//! Parsers which load binary modules into memory.

pub mod spv;
