use super::{parse_u8_slice, parse_words, Error, Options};
use crate::{
    back::spv::{assemble, string_to_words, Instruction},
    Generator, Header, Literal, Operand, Pointer, Type, Word,
};
use spirv::{Op, StorageClass};

fn header() -> Header {
    Header {
        version: (1, 0),
        generator: Generator::from_word(0),
        bound: 100,
        reserved: 0,
    }
}

fn inst(op: Op, result_type: Option<Word>, result: Option<Word>, operands: &[Word]) -> Instruction {
    let mut inst = Instruction::new(op);
    if let Some(id) = result_type {
        inst.set_type(id);
    }
    if let Some(id) = result {
        inst.set_result(id);
    }
    inst.add_operands(operands.to_vec());
    inst
}

fn name(id: Word, string: &str) -> Instruction {
    let mut inst = inst(Op::Name, None, None, &[id]);
    inst.add_string(string);
    inst
}

fn parse(instructions: &[Instruction]) -> Result<crate::Module, Error> {
    parse_words(&assemble(&header(), instructions), &Options::default())
}

#[test]
fn empty_module() {
    let module = parse(&[]).unwrap();
    assert_eq!(module.header, header());
    assert!(module.instructions.is_empty());
    assert!(module.types.is_empty());
}

#[test]
fn unaligned_bytes() {
    let mut bytes = Vec::new();
    for word in assemble(&header(), &[]) {
        bytes.extend_from_slice(&word.to_le_bytes());
    }
    bytes.push(0);
    assert!(matches!(
        parse_u8_slice(&bytes, &Options::default()),
        Err(Error::IncompleteData)
    ));
}

#[test]
fn forward_pointer_completes_in_place() {
    let module = parse(&[
        inst(Op::TypeForwardPointer, None, None, &[3, StorageClass::Uniform as u32]),
        inst(Op::TypeStruct, None, Some(2), &[3]),
        inst(Op::TypePointer, None, Some(3), &[StorageClass::Uniform as u32, 2]),
    ])
    .unwrap();

    let forward = module.instructions.iter().next().unwrap().1.result_type;
    let pointer = module.instructions[module.ids[&3]].result_type;
    assert_eq!(module.instructions[module.ids[&3]].op, Some(Op::TypePointer));
    assert_eq!(forward, pointer);

    let structure = module.instructions[module.ids[&2]].result_type.unwrap();
    match module.types[structure] {
        Type::Struct { ref members, .. } => assert_eq!(members, &vec![pointer.unwrap()]),
        ref other => panic!("unexpected {:?}", other),
    }
    assert_eq!(
        module.types[pointer.unwrap()],
        Type::Pointer(Pointer::Resolved {
            storage_class: StorageClass::Uniform,
            target: structure,
        })
    );
    // forward declaration and completion share one slot
    assert_eq!(module.types.len(), 2);
}

#[test]
fn forward_pointer_mismatch() {
    let error = parse(&[
        inst(Op::TypeForwardPointer, None, None, &[3, StorageClass::Uniform as u32]),
        inst(Op::TypeStruct, None, Some(2), &[3]),
        inst(Op::TypePointer, None, Some(3), &[StorageClass::Private as u32, 2]),
    ])
    .unwrap_err();
    match error {
        Error::Instruction {
            index: 2,
            opcode,
            ref source,
        } => {
            assert_eq!(opcode, Op::TypePointer as u16);
            assert!(matches!(
                **source,
                Error::InconsistentForwardPointer {
                    id: 3,
                    declared: StorageClass::Uniform,
                    found: StorageClass::Private,
                }
            ));
        }
        other => panic!("unexpected {:?}", other),
    }
}

#[test]
fn duplicate_id() {
    let error = parse(&[
        inst(Op::TypeVoid, None, Some(1), &[]),
        inst(Op::TypeBool, None, Some(1), &[]),
    ])
    .unwrap_err();
    assert!(matches!(error.inner(), &Error::DuplicateId(1)));
}

#[test]
fn id_bound() {
    let words = assemble(
        &Header {
            bound: 2,
            ..header()
        },
        &[inst(Op::TypeVoid, None, Some(5), &[])],
    );
    assert!(parse_words(&words, &Options::default()).is_ok());
    let strict = Options {
        check_bound: true,
        ..Options::default()
    };
    assert!(matches!(
        parse_words(&words, &strict).unwrap_err().inner(),
        &Error::IdOutOfBound(5, 2)
    ));
}

#[test]
fn bool_constants() {
    let module = parse(&[
        inst(Op::TypeBool, None, Some(1), &[]),
        inst(Op::ConstantTrue, Some(1), Some(2), &[]),
        inst(Op::SpecConstantFalse, Some(1), Some(3), &[]),
    ])
    .unwrap();
    assert_eq!(module.instructions[module.ids[&2]].value, Some(Literal::Bool(true)));
    assert_eq!(module.instructions[module.ids[&3]].value, Some(Literal::Bool(false)));
}

#[test]
fn constant_of_unsupported_type() {
    let error = parse(&[
        inst(Op::TypeBool, None, Some(1), &[]),
        inst(Op::Constant, Some(1), Some(2), &[1]),
    ])
    .unwrap_err();
    assert!(matches!(error.inner(), &Error::UnsupportedLiteral(Type::Bool)));
}

#[test]
fn names_declared_before_target() {
    let module = parse(&[
        name(1, "nothing"),
        inst(Op::TypeVoid, None, Some(1), &[]),
    ])
    .unwrap();
    assert_eq!(
        module.instructions[module.ids[&1]].name.as_deref(),
        Some("nothing")
    );
}

#[test]
fn member_name_out_of_range() {
    let mut member = inst(Op::MemberName, None, None, &[2, 1]);
    member.add_string("b");
    let error = parse(&[
        inst(Op::TypeFloat, None, Some(1), &[32]),
        inst(Op::TypeStruct, None, Some(2), &[1]),
        member,
    ])
    .unwrap_err();
    assert!(matches!(error.inner(), &Error::InvalidMemberIndex(2, 1)));
}

#[test]
fn member_name_of_non_struct() {
    let mut member = inst(Op::MemberName, None, None, &[1, 0]);
    member.add_string("x");
    let error = parse(&[inst(Op::TypeFloat, None, Some(1), &[32]), member]).unwrap_err();
    assert!(matches!(error.inner(), &Error::InvalidInnerType(1)));
}

#[test]
fn entry_point_references() {
    let mut entry = inst(Op::EntryPoint, None, None, &[spirv::ExecutionModel::Fragment as u32, 3]);
    entry.add_string("main");
    entry.add_operand(4);
    let module = parse(&[
        entry,
        inst(Op::TypeVoid, None, Some(1), &[]),
        inst(Op::TypeFunction, None, Some(2), &[1]),
        inst(Op::TypeFloat, None, Some(5), &[32]),
        inst(Op::TypePointer, None, Some(6), &[StorageClass::Output as u32, 5]),
        inst(Op::Variable, Some(6), Some(4), &[StorageClass::Output as u32]),
        inst(Op::Function, Some(1), Some(3), &[0, 2]),
        inst(Op::FunctionEnd, None, None, &[]),
    ])
    .unwrap();

    assert_eq!(module.entry_points.len(), 1);
    let entry = &module.instructions[module.entry_points[0]];
    assert_eq!(
        entry.operands[1],
        Operand::Id {
            id: 3,
            target: Some(module.ids[&3]),
        }
    );
    assert_eq!(entry.operands[2], Operand::String("main".to_string()));
    assert_eq!(
        entry.operands[3],
        Operand::Id {
            id: 4,
            target: Some(module.ids[&4]),
        }
    );
}

#[test]
fn entry_point_interface_undefined() {
    let mut entry = inst(Op::EntryPoint, None, None, &[spirv::ExecutionModel::Fragment as u32, 3]);
    entry.add_string("main");
    entry.add_operand(7);
    let error = parse(&[
        entry,
        inst(Op::TypeVoid, None, Some(1), &[]),
        inst(Op::TypeFunction, None, Some(2), &[1]),
        inst(Op::Function, Some(1), Some(3), &[0, 2]),
        inst(Op::FunctionEnd, None, None, &[]),
    ])
    .unwrap_err();
    match error {
        Error::Instruction {
            index: 0,
            opcode,
            ref source,
        } => {
            assert_eq!(opcode, Op::EntryPoint as u16);
            assert!(matches!(**source, Error::InvalidId(7)));
        }
        other => panic!("unexpected {:?}", other),
    }
}

#[test]
fn forward_pointer_never_completed() {
    let error = parse(&[
        inst(
            Op::TypeForwardPointer,
            None,
            None,
            &[3, StorageClass::PhysicalStorageBuffer as u32],
        ),
        inst(Op::TypeInt, None, Some(1), &[32, 1]),
        inst(Op::TypeStruct, None, Some(2), &[1, 3]),
    ])
    .unwrap_err();
    match error {
        Error::Instruction {
            index: 0,
            opcode,
            ref source,
        } => {
            assert_eq!(opcode, Op::TypeForwardPointer as u16);
            assert!(matches!(**source, Error::UnresolvedForwardPointer(3)));
        }
        other => panic!("unexpected {:?}", other),
    }
}

#[test]
fn vector_of_non_scalar() {
    let error = parse(&[
        inst(Op::TypeVoid, None, Some(1), &[]),
        inst(Op::TypeVector, None, Some(2), &[1, 4]),
    ])
    .unwrap_err();
    assert!(matches!(error.inner(), &Error::InvalidInnerType(1)));
}

#[test]
fn negative_array_length() {
    let error = parse(&[
        inst(Op::TypeInt, None, Some(1), &[32, 1]),
        inst(Op::Constant, Some(1), Some(2), &[0xffff_ffff]),
        inst(Op::TypeArray, None, Some(3), &[1, 2]),
    ])
    .unwrap_err();
    assert!(matches!(error.inner(), &Error::InvalidArraySize(2)));
}

#[test]
fn image_types() {
    let module = parse(&[
        inst(Op::TypeFloat, None, Some(1), &[32]),
        inst(
            Op::TypeImage,
            None,
            Some(2),
            &[1, spirv::Dim::Dim2D as u32, 0, 0, 0, 1, spirv::ImageFormat::Unknown as u32],
        ),
        inst(Op::TypeSampledImage, None, Some(3), &[2]),
    ])
    .unwrap();
    let image = module.instructions[module.ids[&2]].result_type.unwrap();
    match module.types[image] {
        Type::Image {
            dim, sampled, access, ..
        } => {
            assert_eq!(dim, spirv::Dim::Dim2D);
            assert_eq!(sampled, 1);
            assert_eq!(access, spirv::AccessQualifier::ReadOnly);
        }
        ref other => panic!("unexpected {:?}", other),
    }
    let sampled = module.instructions[module.ids[&3]].result_type.unwrap();
    assert_eq!(module.types[sampled], Type::SampledImage { image });
}

#[test]
fn opaque_name() {
    let mut opaque = inst(Op::TypeOpaque, None, Some(1), &[]);
    opaque.add_operands(string_to_words("handle"));
    let module = parse(&[opaque]).unwrap();
    assert_eq!(
        module.types.iter().next().unwrap().1,
        &Type::Opaque {
            name: "handle".to_string()
        }
    );
}
