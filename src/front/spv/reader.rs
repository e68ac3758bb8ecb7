use super::error::Error;
use crate::{Header, RawInstruction, Word};
use std::io::{self, BufRead};

/// Sequential reader of little-endian 32-bit words.
pub struct WordReader<R> {
    inner: R,
    position: usize,
}

impl<R: BufRead> WordReader<R> {
    pub fn new(inner: R) -> Self {
        WordReader { inner, position: 0 }
    }

    /// Number of words consumed so far.
    pub fn position(&self) -> usize {
        self.position
    }

    pub fn read_word(&mut self) -> Result<Word, Error> {
        let mut bytes = [0u8; 4];
        self.inner.read_exact(&mut bytes).map_err(|e| match e.kind() {
            io::ErrorKind::UnexpectedEof => Error::IncompleteData,
            _ => Error::Io(e),
        })?;
        self.position += 1;
        Ok(Word::from_le_bytes(bytes))
    }

    /// Returns `true` once the underlying stream has no more bytes.
    pub fn at_end(&mut self) -> Result<bool, Error> {
        Ok(self.inner.fill_buf()?.is_empty())
    }

    /// Read the magic number followed by the four header words.
    pub fn read_header(&mut self) -> Result<Header, Error> {
        if self.read_word()? != spirv::MAGIC_NUMBER {
            return Err(Error::InvalidHeader);
        }
        let version = self.read_word()?;
        let generator = self.read_word()?;
        let bound = self.read_word()?;
        let reserved = self.read_word()?;
        Ok(Header::from_words(version, generator, bound, reserved))
    }

    pub fn read_instruction(&mut self) -> Result<RawInstruction, Error> {
        let first = self.read_word()?;
        let (word_count, opcode) = ((first >> 16) as u16, (first & 0xffff) as u16);
        if word_count == 0 {
            return Err(Error::InvalidWordCount);
        }
        let mut words = Vec::with_capacity(word_count as usize);
        words.push(first);
        for _ in 1..word_count {
            words.push(self.read_word()?);
        }
        Ok(RawInstruction {
            opcode,
            word_count,
            words,
        })
    }

    /// Decode instructions until the stream ends.
    pub fn read_instructions(&mut self) -> Result<Vec<RawInstruction>, Error> {
        let mut instructions = Vec::new();
        while !self.at_end()? {
            let inst = self.read_instruction()?;
            log::trace!("\t[{}] opcode {} [{}]", self.position, inst.opcode, inst.word_count);
            instructions.push(inst);
        }
        Ok(instructions)
    }
}

impl Header {
    /// Split the raw header words that follow the magic number.
    pub fn from_words(version: Word, generator: Word, bound: Word, reserved: Word) -> Self {
        Header {
            version: ((version >> 16) as u16, ((version >> 8) & 0xff) as u8),
            generator: crate::Generator::from_word(generator),
            bound,
            reserved,
        }
    }

    pub fn version_word(&self) -> Word {
        (Word::from(self.version.0) << 16) | (Word::from(self.version.1) << 8)
    }
}

impl RawInstruction {
    /// Operand words, without the leading word count and opcode.
    pub fn operand_words(&self) -> &[Word] {
        &self.words[1..]
    }
}

#[cfg(test)]
mod test {
    use super::*;

    fn bytes(words: &[Word]) -> Vec<u8> {
        words.iter().flat_map(|w| w.to_le_bytes().to_vec()).collect()
    }

    #[test]
    fn words_and_end() {
        let data = bytes(&[0x0102_0304, 7]);
        let mut reader = WordReader::new(&data[..]);
        assert!(!reader.at_end().unwrap());
        assert_eq!(reader.read_word().unwrap(), 0x0102_0304);
        assert_eq!(reader.read_word().unwrap(), 7);
        assert!(reader.at_end().unwrap());
        assert_eq!(reader.position(), 2);
    }

    #[test]
    fn truncated_word() {
        let data = [1u8, 2, 3];
        let mut reader = WordReader::new(&data[..]);
        assert!(matches!(reader.read_word(), Err(Error::IncompleteData)));
    }

    #[test]
    fn header() {
        let data = bytes(&[spirv::MAGIC_NUMBER, 0x0001_0300, 0x0008_000a, 42, 0]);
        let header = WordReader::new(&data[..]).read_header().unwrap();
        assert_eq!(header.version, (1, 3));
        assert_eq!(header.version_word(), 0x0001_0300);
        assert_eq!(header.generator.tool_id, 8);
        assert_eq!(header.generator.version, 10);
        assert_eq!(header.generator.vendor, "Khronos");
        assert_eq!(header.bound, 42);
        assert_eq!(header.reserved, 0);
    }

    #[test]
    fn bad_magic() {
        let data = bytes(&[0x1234_5678, 0, 0, 0, 0]);
        assert!(matches!(
            WordReader::new(&data[..]).read_header(),
            Err(Error::InvalidHeader)
        ));
    }

    #[test]
    fn instructions() {
        // OpCapability Shader; OpMemoryModel Logical GLSL450
        let data = bytes(&[0x0002_0011, 1, 0x0003_000e, 0, 1]);
        let instructions = WordReader::new(&data[..]).read_instructions().unwrap();
        assert_eq!(instructions.len(), 2);
        assert_eq!(instructions[0].opcode, spirv::Op::Capability as u16);
        assert_eq!(instructions[0].operand_words(), &[1]);
        assert_eq!(instructions[1].word_count, 3);
        assert_eq!(instructions[1].words, vec![0x0003_000e, 0, 1]);
    }

    #[test]
    fn zero_word_count() {
        let data = bytes(&[0x0000_0011]);
        assert!(matches!(
            WordReader::new(&data[..]).read_instructions(),
            Err(Error::InvalidWordCount)
        ));
    }

    #[test]
    fn truncated_instruction() {
        let data = bytes(&[0x0003_000e, 0]);
        assert!(matches!(
            WordReader::new(&data[..]).read_instructions(),
            Err(Error::IncompleteData)
        ));
    }
}
