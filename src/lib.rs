/*! SPIR-V module decoder.

The central structure of the crate is [`Module`].

A SPIR-V binary is a flat list of instructions that refer to each other
through numeric IDs. Decoding it produces a graph where every such reference
has already been followed: instructions are stored in an [`Arena`] in source
order, types live in a second arena, and every ID operand points to the
[`Handle`] of the instruction that defines it.

Types are created once per declaring instruction and shared by handle.
Pointer types may be declared before their target exists (`OpTypeForwardPointer`);
the arena slot of such a pointer is completed in place once the matching
`OpTypePointer` shows up, so every earlier reference observes the final type.

!*/

#![allow(
    renamed_and_removed_lints,
    unknown_lints,
    clippy::new_without_default,
    clippy::match_like_matches_macro
)]
#![warn(
    trivial_casts,
    trivial_numeric_casts,
    unused_extern_crates,
    unused_qualifications,
    clippy::pattern_type_mismatch
)]
#![deny(clippy::panic)]

mod arena;
pub mod back;
pub mod front;
mod proc;

pub use crate::arena::{Arena, Handle};

use std::{
    collections::{BTreeMap, HashMap},
    hash::BuildHasherDefault,
};

#[cfg(feature = "deserialize")]
use serde::Deserialize;
#[cfg(feature = "serialize")]
use serde::Serialize;

pub use spirv::Word;

/// Hash map that is faster but not resilient to DoS attacks.
pub type FastHashMap<K, T> = HashMap<K, T, BuildHasherDefault<fxhash::FxHasher>>;

/// Information about the tool that produced a module.
#[derive(Clone, Debug, Hash, Eq, PartialEq)]
#[cfg_attr(feature = "serialize", derive(Serialize))]
#[cfg_attr(feature = "deserialize", derive(Deserialize))]
pub struct Generator {
    /// Registered tool ID, the upper half of the generator word.
    pub tool_id: u16,
    /// Tool-specific version, the lower half of the generator word.
    pub version: u16,
    /// Vendor name, `"unknown"` for unregistered tool IDs.
    pub vendor: String,
    /// Tool name, if the registry lists one.
    pub tool: Option<String>,
}

/// Module header, decoded from the words following the magic number.
#[derive(Clone, Debug, Hash, Eq, PartialEq)]
#[cfg_attr(feature = "serialize", derive(Serialize))]
#[cfg_attr(feature = "deserialize", derive(Deserialize))]
pub struct Header {
    /// Major and minor version of the format.
    pub version: (u16, u8),
    pub generator: Generator,
    /// One past the largest ID used in the module, as claimed by the producer.
    pub bound: Word,
    /// Reserved for instruction schemas, currently always zero.
    pub reserved: Word,
}

/// An instruction exactly as it appears in the binary.
#[derive(Clone, Debug, Hash, Eq, PartialEq)]
#[cfg_attr(feature = "serialize", derive(Serialize))]
#[cfg_attr(feature = "deserialize", derive(Deserialize))]
pub struct RawInstruction {
    pub opcode: u16,
    pub word_count: u16,
    /// All the words of the instruction, including the leading
    /// `word_count << 16 | opcode` word.
    pub words: Vec<Word>,
}

/// Group of enumerants an [`Operand::Enum`] value belongs to.
#[derive(Clone, Copy, Debug, Hash, Eq, Ord, PartialEq, PartialOrd)]
#[cfg_attr(feature = "serialize", derive(Serialize))]
#[cfg_attr(feature = "deserialize", derive(Deserialize))]
#[allow(missing_docs)] // The names match the SPIR-V operand kinds
pub enum EnumKind {
    ImageOperands,
    FPFastMathMode,
    SelectionControl,
    LoopControl,
    FunctionControl,
    MemorySemantics,
    MemoryAccess,
    KernelProfilingInfo,
    RayFlags,
    FragmentShadingRate,
    SourceLanguage,
    ExecutionModel,
    AddressingModel,
    MemoryModel,
    ExecutionMode,
    StorageClass,
    Dim,
    SamplerAddressingMode,
    SamplerFilterMode,
    ImageFormat,
    ImageChannelOrder,
    ImageChannelDataType,
    FPRoundingMode,
    LinkageType,
    AccessQualifier,
    FunctionParameterAttribute,
    Decoration,
    BuiltIn,
    Scope,
    GroupOperation,
    KernelEnqueueFlags,
    Capability,
    RayQueryIntersection,
    RayQueryCommittedIntersectionType,
    RayQueryCandidateIntersectionType,
}

/// Decoded value of a literal constant.
#[derive(Clone, Copy, Debug, PartialEq)]
#[cfg_attr(feature = "serialize", derive(Serialize))]
#[cfg_attr(feature = "deserialize", derive(Deserialize))]
pub enum Literal {
    I16(i16),
    U16(u16),
    I32(i32),
    U32(u32),
    I64(i64),
    U64(u64),
    F32(f32),
    F64(f64),
    Bool(bool),
}

/// A single decoded operand of an instruction.
#[derive(Clone, Debug, PartialEq)]
#[cfg_attr(feature = "serialize", derive(Serialize))]
#[cfg_attr(feature = "deserialize", derive(Deserialize))]
pub enum Operand {
    /// The result ID slot of the instruction.
    Result(Word),
    /// Reference to the result of another instruction.
    ///
    /// `target` is filled in once the module is resolved. Only the target of
    /// an `OpName` may stay `None`, when the module never defines it.
    Id {
        id: Word,
        target: Option<Handle<Instruction>>,
    },
    /// Literal integer, or a word the schema has no better description for.
    Literal(Word),
    /// Literal whose interpretation depends on the result type,
    /// as used by `OpConstant` and `OpSpecConstant`.
    Number {
        words: Vec<Word>,
        value: Option<Literal>,
    },
    String(String),
    Enum { kind: EnumKind, value: Word },
}

/// A decoded instruction, together with everything resolution attached to it.
#[derive(Clone, Debug, PartialEq)]
#[cfg_attr(feature = "serialize", derive(Serialize))]
#[cfg_attr(feature = "deserialize", derive(Deserialize))]
pub struct Instruction {
    pub(crate) raw: RawInstruction,
    /// `None` for opcodes that are not part of the known grammar.
    pub(crate) op: Option<spirv::Op>,
    pub(crate) operands: Vec<Operand>,
    pub(crate) result_id: Option<Word>,
    /// For type declarations, the declared type itself.
    pub(crate) result_type: Option<Handle<Type>>,
    pub(crate) value: Option<Literal>,
    pub(crate) name: Option<String>,
}

/// State of a pointer type.
#[derive(Clone, Copy, Debug, Hash, Eq, PartialEq)]
#[cfg_attr(feature = "serialize", derive(Serialize))]
#[cfg_attr(feature = "deserialize", derive(Deserialize))]
pub enum Pointer {
    /// Declared by `OpTypeForwardPointer`, waiting for its `OpTypePointer`.
    Forward { storage_class: spirv::StorageClass },
    Resolved {
        storage_class: spirv::StorageClass,
        target: Handle<Type>,
    },
}

/// A type declared by one of the `OpType*` instructions.
///
/// Each declaring instruction owns exactly one slot in [`Module::types`];
/// references to the declaration share that slot.
#[derive(Clone, Debug, Hash, Eq, PartialEq)]
#[cfg_attr(feature = "serialize", derive(Serialize))]
#[cfg_attr(feature = "deserialize", derive(Deserialize))]
pub enum Type {
    Void,
    Bool,
    Int {
        width: Word,
        signed: bool,
    },
    Float {
        width: Word,
    },
    Vector {
        element: Handle<Type>,
        count: Word,
    },
    Matrix {
        column: Handle<Type>,
        count: Word,
    },
    Array {
        element: Handle<Type>,
        length: u64,
    },
    /// Array whose length is only known at runtime.
    RuntimeArray {
        element: Handle<Type>,
    },
    Pointer(Pointer),
    Struct {
        members: Vec<Handle<Type>>,
        /// Names attached by `OpMemberName`, keyed by member index.
        member_names: BTreeMap<Word, String>,
    },
    Function {
        return_type: Handle<Type>,
        parameters: Vec<Handle<Type>>,
    },
    Image {
        sampled_type: Handle<Type>,
        dim: spirv::Dim,
        /// 0 = not a depth image, 1 = depth image, 2 = unknown.
        depth: Word,
        arrayed: bool,
        multisampled: bool,
        /// 0 = unknown, 1 = used with a sampler, 2 = storage image.
        sampled: Word,
        format: spirv::ImageFormat,
        access: spirv::AccessQualifier,
    },
    SampledImage {
        image: Handle<Type>,
    },
    Sampler,
    Opaque {
        name: String,
    },
}

/// A fully decoded and resolved module.
///
/// Produced by [`front::spv::Parser::parse`], read-only afterwards.
#[derive(Debug)]
#[cfg_attr(feature = "serialize", derive(Serialize))]
#[cfg_attr(feature = "deserialize", derive(Deserialize))]
pub struct Module {
    pub header: Header,
    pub(crate) instructions: Arena<Instruction>,
    pub(crate) types: Arena<Type>,
    /// The object table: result ID to defining instruction.
    pub(crate) ids: FastHashMap<Word, Handle<Instruction>>,
    pub(crate) entry_points: Vec<Handle<Instruction>>,
}
