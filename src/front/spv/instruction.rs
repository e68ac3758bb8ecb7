use super::{
    error::Error,
    schema::{self, OperandKind, OperandSpec, Quantifier},
    IdLookup, LookupHelper, Options,
};
use crate::{Arena, Handle, Instruction, Literal, Operand, RawInstruction, Type, Word};
use num_traits::cast::FromPrimitive;

/// Cursor over the operand words of one instruction.
struct Operands<'a> {
    op: spirv::Op,
    word_count: u16,
    words: &'a [Word],
}

impl<'a> Operands<'a> {
    fn is_empty(&self) -> bool {
        self.words.is_empty()
    }

    fn next(&mut self) -> Result<Word, Error> {
        let (&first, rest) = self
            .words
            .split_first()
            .ok_or(Error::InvalidOperandCount(self.op, self.word_count))?;
        self.words = rest;
        Ok(first)
    }

    fn next_string(&mut self) -> Result<String, Error> {
        let mut bytes = Vec::new();
        loop {
            let chars = self.next().map_err(|_| Error::BadString)?.to_le_bytes();
            let pos = chars.iter().position(|&c| c == 0).unwrap_or(4);
            bytes.extend_from_slice(&chars[..pos]);
            if pos < 4 {
                break;
            }
        }
        String::from_utf8(bytes).map_err(|_| Error::BadString)
    }

    fn next_operand(&mut self, kind: OperandKind, sink: &mut Vec<Operand>) -> Result<(), Error> {
        match kind {
            OperandKind::ResultType | OperandKind::Id => sink.push(Operand::Id {
                id: self.next()?,
                target: None,
            }),
            OperandKind::Result => sink.push(Operand::Result(self.next()?)),
            OperandKind::Literal => sink.push(Operand::Literal(self.next()?)),
            OperandKind::Number => {
                if self.is_empty() {
                    return Err(Error::InvalidOperandCount(self.op, self.word_count));
                }
                let words = std::mem::take(&mut self.words).to_vec();
                sink.push(Operand::Number { words, value: None });
            }
            OperandKind::String => sink.push(Operand::String(self.next_string()?)),
            OperandKind::Enum(kind) => {
                let value = self.next()?;
                sink.push(Operand::Enum { kind, value });
                for parameter in schema::mask_parameters(kind, value) {
                    self.next_operand(parameter, sink)?;
                }
            }
            OperandKind::SpecConstantOp => {
                let opcode = self.next()?;
                sink.push(Operand::Literal(opcode));
                match spirv::Op::from_u32(opcode) {
                    // the wrapped instruction has no result slots of its own
                    Some(op) => self.decode_into(
                        schema::operands(op).filter(|spec| !spec.kind.is_result_slot()),
                        sink,
                    )?,
                    None => log::warn!("\t\tunknown opcode {} in a specialization constant", opcode),
                }
            }
            OperandKind::LiteralIdPairs => {
                sink.push(Operand::Literal(self.next()?));
                self.next_operand(OperandKind::Id, sink)?;
            }
            OperandKind::IdLiteralPairs => {
                self.next_operand(OperandKind::Id, sink)?;
                sink.push(Operand::Literal(self.next()?));
            }
            OperandKind::IdPairs => {
                self.next_operand(OperandKind::Id, sink)?;
                self.next_operand(OperandKind::Id, sink)?;
            }
        }
        Ok(())
    }

    fn decode_into(
        &mut self,
        specs: impl Iterator<Item = OperandSpec>,
        sink: &mut Vec<Operand>,
    ) -> Result<(), Error> {
        for spec in specs {
            match spec.quantifier {
                Quantifier::One => self.next_operand(spec.kind, sink)?,
                Quantifier::Optional => {
                    if !self.is_empty() {
                        self.next_operand(spec.kind, sink)?;
                    }
                }
                Quantifier::Variadic => {
                    while !self.is_empty() {
                        self.next_operand(spec.kind, sink)?;
                    }
                }
            }
        }
        Ok(())
    }

    fn decode(mut self) -> Result<Vec<Operand>, Error> {
        let mut operands = Vec::with_capacity(self.words.len());
        self.decode_into(schema::operands(self.op), &mut operands)?;
        if !self.is_empty() {
            let kind = schema::trailing_kind(self.op);
            log::trace!(
                "\t\t{:?} has {} trailing words, decoded as {:?}",
                self.op,
                self.words.len(),
                kind
            );
            while !self.is_empty() {
                self.next_operand(kind, &mut operands)?;
            }
        }
        Ok(operands)
    }
}

impl Instruction {
    /// Decode the operands of `raw` according to its opcode layout.
    pub(super) fn new(raw: RawInstruction, options: &Options) -> Result<Self, Error> {
        let op = spirv::Op::from_u16(raw.opcode);
        let operands = match op {
            Some(op) => Operands {
                op,
                word_count: raw.word_count,
                words: raw.operand_words(),
            }
            .decode()?,
            None if options.strict_opcodes => return Err(Error::UnknownInstruction(raw.opcode)),
            None => {
                log::warn!("Unknown opcode {}, operands kept as literals", raw.opcode);
                raw.operand_words()
                    .iter()
                    .map(|&word| Operand::Literal(word))
                    .collect()
            }
        };
        let result_id = operands.iter().find_map(|operand| match *operand {
            Operand::Result(id) => Some(id),
            _ => None,
        });
        Ok(Instruction {
            raw,
            op,
            operands,
            result_id,
            result_type: None,
            value: None,
            name: None,
        })
    }

    /// Whether the opcode layout defines a result ID slot.
    pub fn has_result(&self) -> bool {
        self.op.map_or(false, schema::has_result)
    }

    /// Whether the opcode layout defines a result type slot.
    pub fn has_result_type(&self) -> bool {
        self.op.map_or(false, schema::has_result_type)
    }

    /// ID stored in the result type slot, if the layout has one.
    pub(super) fn result_type_id(&self) -> Option<Word> {
        if !self.has_result_type() {
            return None;
        }
        // the result type always comes first
        match self.operands.first() {
            Some(&Operand::Id { id, .. }) => Some(id),
            _ => None,
        }
    }

    /// ID operand at `index`, counting all operands.
    pub(super) fn id_operand(&self, index: usize) -> Result<Word, Error> {
        match self.operands.get(index) {
            Some(&Operand::Id { id, .. }) => Ok(id),
            _ => Err(self.operand_count_error()),
        }
    }

    /// Literal or enumerant word at `index`, counting all operands.
    pub(super) fn word_operand(&self, index: usize) -> Result<Word, Error> {
        match self.operands.get(index) {
            Some(&Operand::Literal(value)) | Some(&Operand::Enum { value, .. }) => Ok(value),
            _ => Err(self.operand_count_error()),
        }
    }

    pub(super) fn string_operand(&self, index: usize) -> Result<&str, Error> {
        match self.operands.get(index) {
            Some(&Operand::String(ref string)) => Ok(string),
            _ => Err(self.operand_count_error()),
        }
    }

    /// All the ID operands starting at `index`.
    pub(super) fn id_operands_from(&self, index: usize) -> impl Iterator<Item = Word> + '_ {
        self.operands
            .iter()
            .skip(index)
            .filter_map(|operand| match *operand {
                Operand::Id { id, .. } => Some(id),
                _ => None,
            })
    }

    fn operand_count_error(&self) -> Error {
        match self.op {
            Some(op) => Error::InvalidOperandCount(op, self.raw.word_count),
            None => Error::UnknownInstruction(self.raw.opcode),
        }
    }

    /// Set the result type from the type ID operand.
    ///
    /// Does nothing for instructions without a result type slot.
    pub(super) fn resolve_result_type(
        &mut self,
        ids: &IdLookup,
        instructions: &Arena<Instruction>,
    ) -> Result<(), Error> {
        if let Some(type_id) = self.result_type_id() {
            let handle = *ids.lookup(type_id)?;
            let ty = instructions[handle]
                .result_type
                .ok_or(Error::MissingResultType(type_id))?;
            self.result_type = Some(ty);
        }
        Ok(())
    }

    /// Point every ID operand to the instruction defining it.
    ///
    /// An ID the module never defines is an error, except for the target
    /// of `OpName`, which is left unresolved.
    pub(super) fn resolve_references(&mut self, ids: &IdLookup) -> Result<(), Error> {
        let tolerated = self.op == Some(spirv::Op::Name);
        for operand in self.operands.iter_mut() {
            if let Operand::Id {
                id,
                ref mut target,
            } = *operand
            {
                *target = ids.get(&id).copied();
                if target.is_none() {
                    if !tolerated {
                        return Err(Error::InvalidId(id));
                    }
                    log::trace!("\t\tunresolved reference to %{}", id);
                }
            }
        }
        Ok(())
    }

    /// Store the decoded literal of a constant.
    pub(super) fn set_value(&mut self, literal: Literal) {
        for operand in self.operands.iter_mut() {
            if let Operand::Number { ref mut value, .. } = *operand {
                *value = Some(literal);
            }
        }
        self.value = Some(literal);
    }

    pub(super) fn set_name(&mut self, name: &str) {
        self.name = Some(name.to_string());
    }

    /// Set the result type of a type declaration to the type it declares.
    pub(super) fn set_declared_type(&mut self, ty: Handle<Type>) {
        self.result_type = Some(ty);
    }
}
