/*! SPIR-V frontend

## Passes

Instructions are decoded up front, then resolved in three passes:

1. The main pass walks the instructions in source order. Types are constructed,
   result types are looked up, constants get their literal decoded, and every
   result ID is registered in the object table. Debug instructions and entry
   points are only set aside.
2. The debug pass attaches names. It runs after the main pass, since names may
   refer to anything declared later in the module.
3. The reference pass points every ID operand to the instruction defining it.
   Entry points may reference functions declared further down, so this can only
   happen once the object table is complete. Referring to an ID the module never
   defines is an error, except for the target of `OpName`.

## Forward pointers

`OpTypeForwardPointer` allocates a pointer type without a target and registers it
under the pointer ID right away. The `OpTypePointer` with the same ID completes
that type in place, so every type referring to the forward declaration observes
the final pointer. A forward pointer left without its `OpTypePointer` is an error.

!*/

mod constant;
mod convert;
mod error;
pub mod generator;
mod instruction;
pub mod reader;
pub mod schema;
mod types;

pub use error::Error;
pub use reader::WordReader;

use crate::{Arena, FastHashMap, Handle, Instruction, Literal, Module, Pointer, Type, Word};
use std::io::BufRead;

/// The object table: result ID to the instruction defining it.
pub(crate) type IdLookup = FastHashMap<Word, Handle<Instruction>>;

trait LookupHelper {
    type Target;
    fn lookup(&self, key: Word) -> Result<&Self::Target, Error>;
}

impl<T> LookupHelper for FastHashMap<Word, T> {
    type Target = T;
    fn lookup(&self, key: Word) -> Result<&T, Error> {
        self.get(&key).ok_or(Error::InvalidId(key))
    }
}

#[derive(Clone, Debug, Default)]
pub struct Options {
    /// Reject opcodes missing from the grammar, instead of keeping
    /// them with plain literal operands.
    pub strict_opcodes: bool,
    /// Reject result IDs that are not below the bound declared in the header,
    /// instead of only warning about them.
    pub check_bound: bool,
}

pub struct Parser<R> {
    reader: WordReader<R>,
    options: Options,
    ids: IdLookup,
    instructions: Arena<Instruction>,
    types: Arena<Type>,
    deferred_debug: Vec<Handle<Instruction>>,
    entry_points: Vec<Handle<Instruction>>,
    forward_pointers: Vec<(Word, Handle<Instruction>)>,
}

impl<R: BufRead> Parser<R> {
    pub fn new(data: R, options: &Options) -> Self {
        Parser {
            reader: WordReader::new(data),
            options: options.clone(),
            ids: FastHashMap::default(),
            instructions: Arena::new(),
            types: Arena::new(),
            deferred_debug: Vec::new(),
            entry_points: Vec::new(),
            forward_pointers: Vec::new(),
        }
    }

    pub fn parse(mut self) -> Result<Module, Error> {
        let header = self.reader.read_header()?;
        log::info!(
            "Generated by {} ({:?}) version {}, SPIR-V {}.{}, bound {}",
            header.generator.vendor,
            header.generator.tool,
            header.generator.version,
            header.version.0,
            header.version.1,
            header.bound,
        );
        if header.generator.vendor == generator::UNKNOWN_VENDOR {
            log::warn!("Unregistered generator tool {}", header.generator.tool_id);
        }
        let raw = self.reader.read_instructions()?;
        log::debug!("Decoded {} instructions", raw.len());

        self.instructions = Arena::with_capacity(raw.len());
        for (index, inst) in raw.into_iter().enumerate() {
            let opcode = inst.opcode;
            self.main_pass(inst, header.bound)
                .map_err(|e| e.at(index, opcode))?;
        }

        self.check_forward_pointers()?;

        log::debug!("Naming {} objects", self.deferred_debug.len());
        for handle in std::mem::take(&mut self.deferred_debug) {
            let opcode = self.instructions[handle].raw.opcode;
            self.debug_pass(handle)
                .map_err(|e| e.at(handle.index(), opcode))?;
        }

        log::debug!("Resolving references");
        for (handle, inst) in self.instructions.iter_mut() {
            let opcode = inst.raw.opcode;
            inst.resolve_references(&self.ids)
                .map_err(|e| e.at(handle.index(), opcode))?;
        }

        Ok(Module {
            header,
            instructions: self.instructions,
            types: self.types,
            ids: self.ids,
            entry_points: self.entry_points,
        })
    }
}

impl<R> Parser<R> {
    fn main_pass(&mut self, raw: crate::RawInstruction, bound: Word) -> Result<(), Error> {
        let mut inst = Instruction::new(raw, &self.options)?;
        log::debug!("\t{:?} [{}]", inst.op, inst.raw.word_count);

        let op = match inst.op {
            Some(op) if schema::is_debug(op) => {
                let handle = self.instructions.append(inst);
                self.deferred_debug.push(handle);
                return Ok(());
            }
            Some(op) if schema::is_entry_point(op) => {
                let handle = self.instructions.append(inst);
                self.entry_points.push(handle);
                return Ok(());
            }
            Some(op) => op,
            None => {
                self.instructions.append(inst);
                return Ok(());
            }
        };

        let mut register = inst.result_id;
        if schema::is_type_declaration(op) {
            let ty = self.declare_type(op, &inst)?;
            inst.set_declared_type(ty);
            if op == spirv::Op::TypeForwardPointer {
                register = Some(inst.id_operand(0)?);
            }
        }
        inst.resolve_result_type(&self.ids, &self.instructions)?;

        if schema::is_literal_constant(op) {
            let ty = inst
                .result_type
                .ok_or(Error::MissingResultType(inst.result_id.unwrap_or_default()))?;
            let words = inst
                .raw
                .words
                .get(constant::LITERAL_OFFSET..)
                .unwrap_or_default();
            let literal = constant::decode_literal(words, &self.types[ty])?;
            log::trace!("\t\tvalue {:?}", literal);
            inst.set_value(literal);
        } else if let Some(value) = schema::bool_constant_value(op) {
            match inst.result_type.map(|ty| &self.types[ty]) {
                Some(&Type::Bool) => inst.set_value(Literal::Bool(value)),
                Some(other) => return Err(Error::UnsupportedLiteral(other.clone())),
                None => {
                    return Err(Error::MissingResultType(
                        inst.result_id.unwrap_or_default(),
                    ))
                }
            }
        }

        let handle = self.instructions.append(inst);
        if let Some(id) = register {
            self.register(id, handle, bound)?;
            if op == spirv::Op::TypeForwardPointer {
                self.forward_pointers.push((id, handle));
            }
        }
        Ok(())
    }

    /// Every forward pointer must have been completed by its `OpTypePointer`.
    fn check_forward_pointers(&self) -> Result<(), Error> {
        for &(id, handle) in self.forward_pointers.iter() {
            let completed = self.ids.get(&id) != Some(&handle)
                && match self.instructions[handle].result_type.map(|ty| &self.types[ty]) {
                    Some(&Type::Pointer(Pointer::Resolved { .. })) => true,
                    _ => false,
                };
            if !completed {
                let opcode = self.instructions[handle].raw.opcode;
                return Err(Error::UnresolvedForwardPointer(id).at(handle.index(), opcode));
            }
        }
        Ok(())
    }

    /// Insert `id` into the object table.
    fn register(&mut self, id: Word, handle: Handle<Instruction>, bound: Word) -> Result<(), Error> {
        if id >= bound {
            if self.options.check_bound {
                return Err(Error::IdOutOfBound(id, bound));
            }
            log::warn!("Id %{} is out of the declared bound {}", id, bound);
        }
        if let Some(previous) = self.ids.insert(id, handle) {
            // only a pointer declaration may take over its forward declaration
            let replaces_forward = self.instructions[previous].op
                == Some(spirv::Op::TypeForwardPointer)
                && self.instructions[handle].op == Some(spirv::Op::TypePointer);
            if !replaces_forward {
                return Err(Error::DuplicateId(id));
            }
        }
        Ok(())
    }

    fn debug_pass(&mut self, handle: Handle<Instruction>) -> Result<(), Error> {
        let inst = &self.instructions[handle];
        let op = inst.op;
        match op {
            Some(spirv::Op::MemberName) => {
                let id = inst.id_operand(0)?;
                let member = inst.word_operand(1)?;
                let name = inst.string_operand(2)?.to_string();
                let ty = self.instructions[*self.ids.lookup(id)?]
                    .result_type
                    .ok_or(Error::MissingResultType(id))?;
                match *self.types.get_mut(ty) {
                    Type::Struct {
                        ref members,
                        ref mut member_names,
                    } => {
                        if member as usize >= members.len() {
                            return Err(Error::InvalidMemberIndex(id, member));
                        }
                        log::trace!("\t\tmember {} of %{} is {:?}", member, id, name);
                        member_names.insert(member, name);
                    }
                    _ => return Err(Error::InvalidInnerType(id)),
                }
            }
            Some(spirv::Op::Name) => {
                let id = inst.id_operand(0)?;
                let name = inst.string_operand(1)?.to_string();
                match self.ids.get(&id).copied() {
                    Some(target) => {
                        log::trace!("\t\t%{} is {:?}", id, name);
                        self.instructions.get_mut(target).set_name(&name);
                    }
                    None => log::debug!("\t\tskipping name {:?} of unknown %{}", name, id),
                }
            }
            _ => {}
        }
        Ok(())
    }
}

pub fn parse_u8_slice(data: &[u8], options: &Options) -> Result<Module, Error> {
    if data.len() % 4 != 0 {
        return Err(Error::IncompleteData);
    }
    Parser::new(data, options).parse()
}

pub fn parse_words(words: &[Word], options: &Options) -> Result<Module, Error> {
    let bytes = words
        .iter()
        .flat_map(|word| word.to_le_bytes().to_vec())
        .collect::<Vec<u8>>();
    Parser::new(&bytes[..], options).parse()
}

#[cfg(test)]
mod test;
