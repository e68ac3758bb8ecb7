use super::error::Error;
use crate::Word;
use num_traits::cast::FromPrimitive;

pub fn map_storage_class(word: Word) -> Result<spirv::StorageClass, Error> {
    spirv::StorageClass::from_u32(word).ok_or(Error::UnsupportedStorageClass(word))
}

pub fn map_image_dim(word: Word) -> Result<spirv::Dim, Error> {
    spirv::Dim::from_u32(word).ok_or(Error::UnsupportedImageDim(word))
}

pub fn map_image_format(word: Word) -> Result<spirv::ImageFormat, Error> {
    spirv::ImageFormat::from_u32(word).ok_or(Error::UnsupportedImageFormat(word))
}

pub fn map_access_qualifier(word: Word) -> Result<spirv::AccessQualifier, Error> {
    spirv::AccessQualifier::from_u32(word).ok_or(Error::UnsupportedAccessQualifier(word))
}

pub fn map_signedness(word: Word) -> Result<bool, Error> {
    match word {
        0 => Ok(false),
        1 => Ok(true),
        _ => Err(Error::InvalidSign(word)),
    }
}

#[cfg(test)]
mod test {
    use super::*;

    #[test]
    fn storage_class() {
        assert_eq!(
            map_storage_class(spirv::StorageClass::Uniform as Word).unwrap(),
            spirv::StorageClass::Uniform
        );
        assert!(matches!(
            map_storage_class(0xdead),
            Err(Error::UnsupportedStorageClass(0xdead))
        ));
    }

    #[test]
    fn signedness() {
        assert!(!map_signedness(0).unwrap());
        assert!(map_signedness(1).unwrap());
        assert!(matches!(map_signedness(2), Err(Error::InvalidSign(2))));
    }
}
