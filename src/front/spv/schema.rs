/*! Operand layouts of the known opcodes.

The layouts come from the SPIR-V core grammar shipped with `rspirv`: every
opcode maps to a list of [`OperandSpec`]s, describing how the words following
the first one are to be interpreted. Parameters of bit masks (image operands,
memory access, loop control) are not part of the grammar lists and are
derived from the mask value instead.
!*/

use crate::{EnumKind, Word};
use rspirv::grammar::{CoreInstructionTable, LogicalOperand, OperandKind as GKind, OperandQuantifier};
use spirv::Op;

#[derive(Clone, Copy, Debug, PartialEq)]
pub enum OperandKind {
    /// `IdResultType`: the type of the result.
    ResultType,
    /// `IdResult`: the ID this instruction defines.
    Result,
    /// `IdRef` and its scope/semantics flavors.
    Id,
    /// `LiteralInteger`, or any other single literal word.
    Literal,
    /// `LiteralContextDependentNumber`: takes all the remaining words.
    Number,
    /// Nul-terminated string spanning one or more words.
    String,
    Enum(EnumKind),
    /// Opcode wrapped by `OpSpecConstantOp`, followed by its own operands.
    SpecConstantOp,
    /// Alternating `LiteralInteger`, `IdRef` pairs, as used by `OpSwitch` targets.
    LiteralIdPairs,
    /// Alternating `IdRef`, `LiteralInteger` pairs, as used by `OpGroupMemberDecorate`.
    IdLiteralPairs,
    /// `IdRef` pairs, as used by `OpPhi`.
    IdPairs,
}

impl OperandKind {
    fn from_grammar(kind: &GKind) -> Self {
        use OperandKind as K;
        #[allow(unreachable_patterns)]
        match *kind {
            GKind::IdResultType => K::ResultType,
            GKind::IdResult => K::Result,
            GKind::IdRef | GKind::IdScope | GKind::IdMemorySemantics => K::Id,
            GKind::LiteralInteger | GKind::LiteralExtInstInteger => K::Literal,
            GKind::LiteralContextDependentNumber => K::Number,
            GKind::LiteralString => K::String,
            GKind::LiteralSpecConstantOpInteger => K::SpecConstantOp,
            GKind::PairLiteralIntegerIdRef => K::LiteralIdPairs,
            GKind::PairIdRefLiteralInteger => K::IdLiteralPairs,
            GKind::PairIdRefIdRef => K::IdPairs,
            GKind::ImageOperands => K::Enum(EnumKind::ImageOperands),
            GKind::FPFastMathMode => K::Enum(EnumKind::FPFastMathMode),
            GKind::SelectionControl => K::Enum(EnumKind::SelectionControl),
            GKind::LoopControl => K::Enum(EnumKind::LoopControl),
            GKind::FunctionControl => K::Enum(EnumKind::FunctionControl),
            GKind::MemorySemantics => K::Enum(EnumKind::MemorySemantics),
            GKind::MemoryAccess => K::Enum(EnumKind::MemoryAccess),
            GKind::KernelProfilingInfo => K::Enum(EnumKind::KernelProfilingInfo),
            GKind::RayFlags => K::Enum(EnumKind::RayFlags),
            GKind::FragmentShadingRate => K::Enum(EnumKind::FragmentShadingRate),
            GKind::SourceLanguage => K::Enum(EnumKind::SourceLanguage),
            GKind::ExecutionModel => K::Enum(EnumKind::ExecutionModel),
            GKind::AddressingModel => K::Enum(EnumKind::AddressingModel),
            GKind::MemoryModel => K::Enum(EnumKind::MemoryModel),
            GKind::ExecutionMode => K::Enum(EnumKind::ExecutionMode),
            GKind::StorageClass => K::Enum(EnumKind::StorageClass),
            GKind::Dim => K::Enum(EnumKind::Dim),
            GKind::SamplerAddressingMode => K::Enum(EnumKind::SamplerAddressingMode),
            GKind::SamplerFilterMode => K::Enum(EnumKind::SamplerFilterMode),
            GKind::ImageFormat => K::Enum(EnumKind::ImageFormat),
            GKind::ImageChannelOrder => K::Enum(EnumKind::ImageChannelOrder),
            GKind::ImageChannelDataType => K::Enum(EnumKind::ImageChannelDataType),
            GKind::FPRoundingMode => K::Enum(EnumKind::FPRoundingMode),
            GKind::LinkageType => K::Enum(EnumKind::LinkageType),
            GKind::AccessQualifier => K::Enum(EnumKind::AccessQualifier),
            GKind::FunctionParameterAttribute => K::Enum(EnumKind::FunctionParameterAttribute),
            GKind::Decoration => K::Enum(EnumKind::Decoration),
            GKind::BuiltIn => K::Enum(EnumKind::BuiltIn),
            GKind::Scope => K::Enum(EnumKind::Scope),
            GKind::GroupOperation => K::Enum(EnumKind::GroupOperation),
            GKind::KernelEnqueueFlags => K::Enum(EnumKind::KernelEnqueueFlags),
            GKind::Capability => K::Enum(EnumKind::Capability),
            GKind::RayQueryIntersection => K::Enum(EnumKind::RayQueryIntersection),
            GKind::RayQueryCommittedIntersectionType => {
                K::Enum(EnumKind::RayQueryCommittedIntersectionType)
            }
            GKind::RayQueryCandidateIntersectionType => {
                K::Enum(EnumKind::RayQueryCandidateIntersectionType)
            }
            _ => K::Literal,
        }
    }

    /// Result type and result ID slots.
    pub fn is_result_slot(self) -> bool {
        match self {
            OperandKind::ResultType | OperandKind::Result => true,
            _ => false,
        }
    }
}

#[derive(Clone, Copy, Debug, PartialEq)]
pub enum Quantifier {
    One,
    Optional,
    Variadic,
}

#[derive(Clone, Copy, Debug, PartialEq)]
pub struct OperandSpec {
    pub kind: OperandKind,
    pub quantifier: Quantifier,
}

impl OperandSpec {
    fn from_grammar(operand: &LogicalOperand) -> Self {
        OperandSpec {
            kind: OperandKind::from_grammar(&operand.kind),
            quantifier: match operand.quantifier {
                OperandQuantifier::One => Quantifier::One,
                OperandQuantifier::ZeroOrOne => Quantifier::Optional,
                OperandQuantifier::ZeroOrMore => Quantifier::Variadic,
            },
        }
    }
}

/// Returns the operand layout of `op`.
pub fn operands(op: Op) -> impl Iterator<Item = OperandSpec> + Clone {
    let layout: &'static [LogicalOperand] =
        CoreInstructionTable::lookup_opcode(op as u16).map_or(&[][..], |inst| inst.operands);
    layout.iter().map(OperandSpec::from_grammar)
}

pub fn has_result(op: Op) -> bool {
    operands(op).any(|spec| spec.kind == OperandKind::Result)
}

pub fn has_result_type(op: Op) -> bool {
    operands(op).any(|spec| spec.kind == OperandKind::ResultType)
}

const ID: &[OperandKind] = &[OperandKind::Id];
const ID_PAIR: &[OperandKind] = &[OperandKind::Id, OperandKind::Id];
const LITERAL: &[OperandKind] = &[OperandKind::Literal];

const IMAGE_OPERAND_PARAMETERS: &[(Word, &[OperandKind])] = &[
    (0x1, ID),
    (0x2, ID),
    (0x4, ID_PAIR),
    (0x8, ID),
    (0x10, ID),
    (0x20, ID),
    (0x40, ID),
    (0x80, ID),
    (0x100, ID),
    (0x200, ID),
];
const MEMORY_ACCESS_PARAMETERS: &[(Word, &[OperandKind])] = &[(0x2, LITERAL), (0x8, ID), (0x10, ID)];
const LOOP_CONTROL_PARAMETERS: &[(Word, &[OperandKind])] = &[
    (0x8, LITERAL),
    (0x10, LITERAL),
    (0x20, LITERAL),
    (0x40, LITERAL),
    (0x80, LITERAL),
    (0x100, LITERAL),
];

/// Parameters following a bit mask operand, in the order of the set bits.
pub fn mask_parameters(kind: EnumKind, mask: Word) -> Vec<OperandKind> {
    let per_bit = match kind {
        EnumKind::ImageOperands => IMAGE_OPERAND_PARAMETERS,
        EnumKind::MemoryAccess => MEMORY_ACCESS_PARAMETERS,
        EnumKind::LoopControl => LOOP_CONTROL_PARAMETERS,
        _ => &[],
    };
    per_bit
        .iter()
        .filter(|&&(bit, _)| mask & bit != 0)
        .flat_map(|&(_, parameters)| parameters.iter().cloned())
        .collect()
}

/// Kind of the words left over once the layout of `op` is exhausted,
/// such as decoration and execution mode parameters.
pub fn trailing_kind(op: Op) -> OperandKind {
    match op {
        Op::DecorateId | Op::ExecutionModeId => OperandKind::Id,
        Op::DecorateString | Op::MemberDecorateString => OperandKind::String,
        _ => OperandKind::Literal,
    }
}

/// Debug instructions are set aside during the main pass and
/// processed once all the objects exist.
pub fn is_debug(op: Op) -> bool {
    match op {
        Op::Source
        | Op::SourceContinued
        | Op::SourceExtension
        | Op::Name
        | Op::MemberName
        | Op::Line
        | Op::NoLine
        | Op::ModuleProcessed => true,
        _ => false,
    }
}

pub fn is_entry_point(op: Op) -> bool {
    op == Op::EntryPoint
}

/// Instructions that declare a type, constructed by the type system.
pub fn is_type_declaration(op: Op) -> bool {
    match op {
        Op::TypeVoid
        | Op::TypeBool
        | Op::TypeInt
        | Op::TypeFloat
        | Op::TypeVector
        | Op::TypeMatrix
        | Op::TypeImage
        | Op::TypeSampler
        | Op::TypeSampledImage
        | Op::TypeArray
        | Op::TypeRuntimeArray
        | Op::TypeStruct
        | Op::TypeOpaque
        | Op::TypePointer
        | Op::TypeFunction
        | Op::TypeForwardPointer => true,
        _ => false,
    }
}

/// Instructions carrying a literal that is decoded against their result type.
pub fn is_literal_constant(op: Op) -> bool {
    match op {
        Op::Constant | Op::SpecConstant => true,
        _ => false,
    }
}

/// Boolean constants, whose value is implied by the opcode.
pub fn bool_constant_value(op: Op) -> Option<bool> {
    match op {
        Op::ConstantTrue | Op::SpecConstantTrue => Some(true),
        Op::ConstantFalse | Op::SpecConstantFalse => Some(false),
        _ => None,
    }
}
