//! Read access to a decoded module and small helpers on the data model.

use crate::{Arena, Handle, Header, Instruction, Literal, Module, Operand, Pointer, RawInstruction, Type, Word};

impl Pointer {
    pub fn storage_class(&self) -> spirv::StorageClass {
        match *self {
            Pointer::Forward { storage_class } | Pointer::Resolved { storage_class, .. } => {
                storage_class
            }
        }
    }

    /// The pointee, `None` while only forward declared.
    pub fn target(&self) -> Option<Handle<Type>> {
        match *self {
            Pointer::Forward { .. } => None,
            Pointer::Resolved { target, .. } => Some(target),
        }
    }
}

impl Type {
    /// Returns `true` for booleans, integers and floats.
    pub fn is_scalar(&self) -> bool {
        match *self {
            Type::Bool | Type::Int { .. } | Type::Float { .. } => true,
            _ => false,
        }
    }

    pub fn pointer(&self) -> Option<&Pointer> {
        match *self {
            Type::Pointer(ref pointer) => Some(pointer),
            _ => None,
        }
    }

    /// Name of a struct member, as attached by `OpMemberName`.
    pub fn member_name(&self, index: Word) -> Option<&str> {
        match *self {
            Type::Struct {
                ref member_names, ..
            } => member_names.get(&index).map(String::as_str),
            _ => None,
        }
    }
}

impl Literal {
    /// The value as an unsigned integer, if it is a non-negative integer.
    pub fn as_u64(&self) -> Option<u64> {
        use std::convert::TryFrom;
        match *self {
            Literal::U16(v) => Some(u64::from(v)),
            Literal::U32(v) => Some(u64::from(v)),
            Literal::U64(v) => Some(v),
            Literal::I16(v) => u64::try_from(v).ok(),
            Literal::I32(v) => u64::try_from(v).ok(),
            Literal::I64(v) => u64::try_from(v).ok(),
            Literal::F32(_) | Literal::F64(_) | Literal::Bool(_) => None,
        }
    }
}

impl Instruction {
    /// `None` for opcodes outside of the known grammar.
    pub fn op(&self) -> Option<spirv::Op> {
        self.op
    }

    pub fn opcode(&self) -> u16 {
        self.raw.opcode
    }

    pub fn raw(&self) -> &RawInstruction {
        &self.raw
    }

    /// All the words of the instruction, as they appear in the binary.
    pub fn words(&self) -> &[Word] {
        &self.raw.words
    }

    pub fn operands(&self) -> &[Operand] {
        &self.operands
    }

    pub fn result_id(&self) -> Option<Word> {
        self.result_id
    }

    /// Type of the result. For type declarations, the declared type itself.
    pub fn result_type(&self) -> Option<Handle<Type>> {
        self.result_type
    }

    /// Decoded literal of a constant.
    pub fn value(&self) -> Option<Literal> {
        self.value
    }

    /// Debug name attached by `OpName`.
    pub fn name(&self) -> Option<&str> {
        self.name.as_deref()
    }
}

impl Module {
    pub fn header(&self) -> &Header {
        &self.header
    }

    /// All the instructions, in source order.
    pub fn instructions(&self) -> &Arena<Instruction> {
        &self.instructions
    }

    pub fn types(&self) -> &Arena<Type> {
        &self.types
    }

    /// Handle of the instruction defining `id`.
    pub fn lookup_handle(&self, id: Word) -> Option<Handle<Instruction>> {
        self.ids.get(&id).copied()
    }

    /// Instruction defining `id`.
    pub fn lookup(&self, id: Word) -> Option<&Instruction> {
        self.lookup_handle(id).map(|handle| &self.instructions[handle])
    }

    /// Type of the result `id`, or the type it declares.
    pub fn result_type(&self, id: Word) -> Option<&Type> {
        self.lookup(id)
            .and_then(Instruction::result_type)
            .map(|ty| &self.types[ty])
    }

    /// The `OpEntryPoint` instructions, in source order.
    pub fn entry_points(&self) -> impl Iterator<Item = &Instruction> {
        self.entry_points
            .iter()
            .map(move |&handle| &self.instructions[handle])
    }

    /// Follows an ID operand to the instruction it refers to.
    pub fn target(&self, operand: &Operand) -> Option<&Instruction> {
        match *operand {
            Operand::Id {
                target: Some(handle),
                ..
            } => Some(&self.instructions[handle]),
            _ => None,
        }
    }
}
