/*! SPIR-V backend

Re-emits the words of a decoded [`Module`](crate::Module), and assembles
modules from hand-built instructions.
!*/

mod helpers;
mod layout;


pub use helpers::string_to_words;

use crate::{Header, Module, Word};

struct PhysicalLayout {
    magic_number: Word,
    version: Word,
    generator: Word,
    bound: Word,
    instruction_schema: Word,
}

/// An instruction under construction.
///
/// The word count is tracked as operands are added, so the leading
/// word is always consistent with the rest.
#[derive(Clone, Debug)]
pub struct Instruction {
    op: spirv::Op,
    wc: u32,
    type_id: Option<Word>,
    result_id: Option<Word>,
    operands: Vec<Word>,
}

/// Words of a module: the header, then every instruction verbatim.
pub fn write_vec(module: &Module) -> Vec<Word> {
    let mut words = Vec::new();
    PhysicalLayout::new(&module.header).in_words(&mut words);
    for (_, inst) in module.instructions().iter() {
        words.extend_from_slice(inst.words());
    }
    words
}

/// Same as [`write_vec`], in little-endian bytes.
pub fn write_bytes(module: &Module) -> Vec<u8> {
    helpers::words_to_bytes(&write_vec(module))
}

/// Words of a module made of `header` and `instructions`.
pub fn assemble(header: &Header, instructions: &[Instruction]) -> Vec<Word> {
    let mut words = Vec::new();
    PhysicalLayout::new(header).in_words(&mut words);
    for instruction in instructions {
        instruction.to_words(&mut words);
    }
    words
}
