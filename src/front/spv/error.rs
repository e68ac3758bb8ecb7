use crate::Word;

#[derive(Debug, thiserror::Error)]
pub enum Error {
    #[error("invalid header")]
    InvalidHeader,
    #[error("invalid word count")]
    InvalidWordCount,
    #[error("incomplete data")]
    IncompleteData,
    #[error("unable to read words: {0}")]
    Io(#[from] std::io::Error),
    #[error("unknown instruction {0}")]
    UnknownInstruction(u16),
    #[error("invalid operand count {1} for {0:?}")]
    InvalidOperandCount(spirv::Op, u16),
    #[error("bad string")]
    BadString,
    #[error("invalid id %{0}")]
    InvalidId(Word),
    #[error("duplicate id %{0}")]
    DuplicateId(Word),
    #[error("id %{0} is out of the declared bound {1}")]
    IdOutOfBound(Word, Word),
    #[error("invalid inner type %{0}")]
    InvalidInnerType(Word),
    #[error("id %{0} has no result type")]
    MissingResultType(Word),
    #[error("invalid sign %{0}")]
    InvalidSign(Word),
    #[error("invalid array size %{0}")]
    InvalidArraySize(Word),
    #[error("invalid member index {1} of %{0}")]
    InvalidMemberIndex(Word, Word),
    #[error("pointer %{id} was forward declared as {declared:?}, but defined as {found:?}")]
    InconsistentForwardPointer {
        id: Word,
        declared: spirv::StorageClass,
        found: spirv::StorageClass,
    },
    #[error("forward pointer %{0} is never completed")]
    UnresolvedForwardPointer(Word),
    #[error("pointer %{0} is already defined with a different target")]
    PointerRedefinition(Word),
    #[error("unsupported storage class %{0}")]
    UnsupportedStorageClass(Word),
    #[error("unsupported image dimension %{0}")]
    UnsupportedImageDim(Word),
    #[error("unsupported image format %{0}")]
    UnsupportedImageFormat(Word),
    #[error("unsupported access qualifier %{0}")]
    UnsupportedAccessQualifier(Word),
    #[error("cannot construct literal of type {0:?}")]
    UnsupportedLiteral(crate::Type),
    #[error("literal needs {0} words, found {1}")]
    IncompleteLiteral(usize, usize),
    #[error("instruction #{index} (opcode {opcode}): {source}")]
    Instruction {
        index: usize,
        opcode: u16,
        #[source]
        source: Box<Error>,
    },
}

impl Error {
    /// Attach the position of the instruction being processed.
    pub(super) fn at(self, index: usize, opcode: u16) -> Self {
        match self {
            Error::Instruction { .. } => self,
            other => Error::Instruction {
                index,
                opcode,
                source: Box::new(other),
            },
        }
    }

    /// The underlying failure, without the instruction position.
    pub fn inner(&self) -> &Error {
        match *self {
            Error::Instruction { ref source, .. } => source.inner(),
            ref other => other,
        }
    }
}
