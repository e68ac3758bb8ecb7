use super::error::Error;
use crate::{Literal, Type, Word};

/// Position of the first literal word in `OpConstant` and `OpSpecConstant`.
pub const LITERAL_OFFSET: usize = 3;

fn literal_words(words: &[Word], count: usize) -> Result<&[Word], Error> {
    words
        .get(..count)
        .ok_or(Error::IncompleteLiteral(count, words.len()))
}

fn wide(words: &[Word]) -> u64 {
    (u64::from(words[1]) << 32) | u64::from(words[0])
}

/// Decode the literal `words` of a constant declared with type `ty`.
///
/// 64-bit values span two words, low-order word first.
pub fn decode_literal(words: &[Word], ty: &Type) -> Result<Literal, Error> {
    let unsupported = || Error::UnsupportedLiteral(ty.clone());
    match *ty {
        Type::Int { width, signed } => {
            let value = match (width, signed) {
                (16, true) => Literal::I16(literal_words(words, 1)?[0] as u16 as i16),
                (16, false) => Literal::U16(literal_words(words, 1)?[0] as u16),
                (32, true) => Literal::I32(literal_words(words, 1)?[0] as i32),
                (32, false) => Literal::U32(literal_words(words, 1)?[0]),
                (64, true) => Literal::I64(wide(literal_words(words, 2)?) as i64),
                (64, false) => Literal::U64(wide(literal_words(words, 2)?)),
                _ => return Err(unsupported()),
            };
            Ok(value)
        }
        Type::Float { width: 32 } => Ok(Literal::F32(f32::from_bits(
            literal_words(words, 1)?[0],
        ))),
        Type::Float { width: 64 } => Ok(Literal::F64(f64::from_bits(wide(literal_words(
            words, 2,
        )?)))),
        _ => Err(unsupported()),
    }
}
