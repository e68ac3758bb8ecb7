use super::{helpers, Instruction, PhysicalLayout};
use spirv::{Op, Word, MAGIC_NUMBER};
use std::iter;

impl PhysicalLayout {
    pub(super) fn new(header: &crate::Header) -> Self {
        PhysicalLayout {
            magic_number: MAGIC_NUMBER,
            version: header.version_word(),
            generator: header.generator.to_word(),
            bound: header.bound,
            instruction_schema: header.reserved,
        }
    }

    pub(super) fn in_words(&self, sink: &mut impl Extend<Word>) {
        sink.extend(iter::once(self.magic_number));
        sink.extend(iter::once(self.version));
        sink.extend(iter::once(self.generator));
        sink.extend(iter::once(self.bound));
        sink.extend(iter::once(self.instruction_schema));
    }
}

impl Instruction {
    pub fn new(op: Op) -> Self {
        Instruction {
            op,
            wc: 1, // Always start at 1 for the first word (OP + WC),
            type_id: None,
            result_id: None,
            operands: vec![],
        }
    }

    #[allow(clippy::panic)]
    pub fn set_type(&mut self, id: Word) {
        assert!(self.type_id.is_none(), "Type can only be set once");
        self.type_id = Some(id);
        self.wc += 1;
    }

    #[allow(clippy::panic)]
    pub fn set_result(&mut self, id: Word) {
        assert!(self.result_id.is_none(), "Result can only be set once");
        self.result_id = Some(id);
        self.wc += 1;
    }

    pub fn add_operand(&mut self, operand: Word) {
        self.operands.push(operand);
        self.wc += 1;
    }

    pub fn add_operands(&mut self, operands: Vec<Word>) {
        for operand in operands.into_iter() {
            self.add_operand(operand)
        }
    }

    /// Append a nul-terminated literal string.
    pub fn add_string(&mut self, string: &str) {
        self.add_operands(helpers::string_to_words(string));
    }

    pub fn word_count(&self) -> u32 {
        self.wc
    }

    pub fn to_words(&self, sink: &mut impl Extend<Word>) {
        sink.extend(Some(self.wc << 16 | self.op as u32));
        sink.extend(self.type_id);
        sink.extend(self.result_id);
        sink.extend(self.operands.iter().cloned());
    }
}
