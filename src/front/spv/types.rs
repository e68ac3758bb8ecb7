use super::{convert::*, error::Error, LookupHelper, Parser};
use crate::{Handle, Instruction, Pointer, Type, Word};
use spirv::Op;
use std::collections::BTreeMap;

impl Pointer {
    /// Supply the target of a pointer, completing a forward declaration.
    ///
    /// Completing an already resolved pointer with the same storage class and
    /// target does nothing.
    fn complete(
        &mut self,
        id: Word,
        storage_class: spirv::StorageClass,
        target: Handle<Type>,
    ) -> Result<(), Error> {
        let declared = self.storage_class();
        if declared != storage_class {
            return Err(Error::InconsistentForwardPointer {
                id,
                declared,
                found: storage_class,
            });
        }
        match *self {
            Pointer::Forward { .. } => {
                *self = Pointer::Resolved {
                    storage_class,
                    target,
                };
                Ok(())
            }
            Pointer::Resolved {
                target: existing, ..
            } if existing == target => Ok(()),
            Pointer::Resolved { .. } => Err(Error::PointerRedefinition(id)),
        }
    }
}

impl<R> Parser<R> {
    /// Type declared by the instruction defining `id`.
    fn lookup_type(&self, id: Word) -> Result<Handle<Type>, Error> {
        let handle = *self.ids.lookup(id)?;
        self.instructions[handle]
            .result_type
            .ok_or(Error::MissingResultType(id))
    }

    /// Same as `lookup_type`, also checking the kind of the type found.
    fn lookup_type_of(
        &self,
        id: Word,
        check: impl Fn(&Type) -> bool,
    ) -> Result<Handle<Type>, Error> {
        let handle = self.lookup_type(id)?;
        if check(&self.types[handle]) {
            Ok(handle)
        } else {
            Err(Error::InvalidInnerType(id))
        }
    }

    /// Array length, taken from the decoded value of a constant.
    fn lookup_array_length(&self, id: Word) -> Result<u64, Error> {
        let handle = *self.ids.lookup(id)?;
        self.instructions[handle]
            .value
            .and_then(|literal| literal.as_u64())
            .ok_or(Error::InvalidArraySize(id))
    }

    /// Construct the type declared by `inst`.
    pub(super) fn declare_type(&mut self, op: Op, inst: &Instruction) -> Result<Handle<Type>, Error> {
        let ty = match op {
            Op::TypeVoid => Type::Void,
            Op::TypeBool => Type::Bool,
            Op::TypeSampler => Type::Sampler,
            Op::TypeInt => Type::Int {
                width: inst.word_operand(1)?,
                signed: map_signedness(inst.word_operand(2)?)?,
            },
            Op::TypeFloat => Type::Float {
                width: inst.word_operand(1)?,
            },
            Op::TypeVector => Type::Vector {
                element: self.lookup_type_of(inst.id_operand(1)?, Type::is_scalar)?,
                count: inst.word_operand(2)?,
            },
            Op::TypeMatrix => Type::Matrix {
                column: self.lookup_type_of(inst.id_operand(1)?, |ty| match *ty {
                    Type::Vector { .. } => true,
                    _ => false,
                })?,
                count: inst.word_operand(2)?,
            },
            Op::TypeArray => Type::Array {
                element: self.lookup_type(inst.id_operand(1)?)?,
                length: self.lookup_array_length(inst.id_operand(2)?)?,
            },
            Op::TypeRuntimeArray => Type::RuntimeArray {
                element: self.lookup_type(inst.id_operand(1)?)?,
            },
            Op::TypeImage => Type::Image {
                sampled_type: self.lookup_type(inst.id_operand(1)?)?,
                dim: map_image_dim(inst.word_operand(2)?)?,
                depth: inst.word_operand(3)?,
                arrayed: inst.word_operand(4)? != 0,
                multisampled: inst.word_operand(5)? != 0,
                sampled: inst.word_operand(6)?,
                format: map_image_format(inst.word_operand(7)?)?,
                access: match inst.operands.get(8) {
                    Some(_) => map_access_qualifier(inst.word_operand(8)?)?,
                    None => spirv::AccessQualifier::ReadOnly,
                },
            },
            Op::TypeSampledImage => Type::SampledImage {
                image: self.lookup_type_of(inst.id_operand(1)?, |ty| match *ty {
                    Type::Image { .. } => true,
                    _ => false,
                })?,
            },
            Op::TypeOpaque => Type::Opaque {
                name: inst.string_operand(1)?.to_string(),
            },
            Op::TypeFunction => Type::Function {
                return_type: self.lookup_type(inst.id_operand(1)?)?,
                parameters: inst
                    .id_operands_from(2)
                    .map(|id| self.lookup_type(id))
                    .collect::<Result<_, _>>()?,
            },
            Op::TypeStruct => Type::Struct {
                members: inst
                    .id_operands_from(1)
                    .map(|id| self.lookup_type(id))
                    .collect::<Result<_, _>>()?,
                member_names: BTreeMap::new(),
            },
            Op::TypeForwardPointer => Type::Pointer(Pointer::Forward {
                storage_class: map_storage_class(inst.word_operand(1)?)?,
            }),
            Op::TypePointer => return self.declare_pointer(inst),
            _ => return Err(Error::UnknownInstruction(op as u16)),
        };
        log::trace!("\t\tdeclared {:?}", ty);
        Ok(self.types.append(ty))
    }

    /// `OpTypePointer` either completes a forward declaration of the same ID
    /// in place, or allocates a new resolved pointer.
    fn declare_pointer(&mut self, inst: &Instruction) -> Result<Handle<Type>, Error> {
        let id = inst.result_id.ok_or(Error::InvalidOperandCount(
            Op::TypePointer,
            inst.raw.word_count,
        ))?;
        let storage_class = map_storage_class(inst.word_operand(1)?)?;
        let target = self.lookup_type(inst.id_operand(2)?)?;

        let forward = match self.ids.get(&id) {
            Some(&existing) => Some(
                self.instructions[existing]
                    .result_type
                    .ok_or(Error::MissingResultType(id))?,
            ),
            None => None,
        };
        match forward {
            Some(handle) => {
                log::trace!("\t\tcompleting forward pointer %{}", id);
                match *self.types.get_mut(handle) {
                    Type::Pointer(ref mut pointer) => pointer.complete(id, storage_class, target)?,
                    _ => return Err(Error::DuplicateId(id)),
                }
                Ok(handle)
            }
            None => Ok(self.types.append(Type::Pointer(Pointer::Resolved {
                storage_class,
                target,
            }))),
        }
    }
}

#[cfg(test)]
mod test {
    use super::*;

    #[test]
    fn complete_forward() {
        let mut arena = crate::Arena::new();
        let target = arena.append(Type::Bool);
        let mut pointer = Pointer::Forward {
            storage_class: spirv::StorageClass::Uniform,
        };
        pointer
            .complete(3, spirv::StorageClass::Uniform, target)
            .unwrap();
        assert_eq!(
            pointer,
            Pointer::Resolved {
                storage_class: spirv::StorageClass::Uniform,
                target
            }
        );
        // repeating the same completion is harmless
        pointer
            .complete(3, spirv::StorageClass::Uniform, target)
            .unwrap();
    }

    #[test]
    fn complete_mismatch() {
        let mut arena = crate::Arena::new();
        let target = arena.append(Type::Bool);
        let mut pointer = Pointer::Forward {
            storage_class: spirv::StorageClass::Uniform,
        };
        assert!(matches!(
            pointer.complete(3, spirv::StorageClass::Private, target),
            Err(Error::InconsistentForwardPointer {
                id: 3,
                declared: spirv::StorageClass::Uniform,
                found: spirv::StorageClass::Private,
            })
        ));
        assert_eq!(
            pointer,
            Pointer::Forward {
                storage_class: spirv::StorageClass::Uniform,
            }
        );
    }

    #[test]
    fn complete_other_target() {
        let mut arena = crate::Arena::new();
        let first = arena.append(Type::Bool);
        let second = arena.append(Type::Void);
        let mut pointer = Pointer::Resolved {
            storage_class: spirv::StorageClass::Private,
            target: first,
        };
        assert!(matches!(
            pointer.complete(4, spirv::StorageClass::Private, second),
            Err(Error::PointerRedefinition(4))
        ));
    }
}
