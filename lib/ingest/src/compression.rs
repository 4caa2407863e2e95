use bzip2::read::MultiBzDecoder;
use flate2::read::MultiGzDecoder;
use std::io::{self, Read};

/// The compression of a source file, detected from its file name suffix.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Compression {
    None,
    Gzip,
    Bzip2,
    Zstd,
}

/// Suffixes of compression codecs without a decoder.
const UNSUPPORTED_SUFFIXES: &[&str] = &["lzo", "snappy"];

impl Compression {
    /// Splits the compression suffix off the `file_name`.
    ///
    /// Returns the detected compression and the remaining file name, or the suffix if the file is
    /// compressed with an unsupported codec.
    pub fn detect(file_name: &str) -> Result<(Self, &str), &str> {
        let Some((stem, suffix)) = file_name.rsplit_once('.') else {
            return Ok((Self::None, file_name));
        };
        let compression = match suffix.to_ascii_lowercase().as_str() {
            "gz" => Self::Gzip,
            "bz2" => Self::Bzip2,
            "zst" => Self::Zstd,
            other if UNSUPPORTED_SUFFIXES.contains(&other) => return Err(suffix),
            _ => return Ok((Self::None, file_name)),
        };
        Ok((compression, stem))
    }

    /// Wraps `reader` with the matching decoder.
    pub fn decoder<'a, R: Read + Send + 'a>(self, reader: R) -> io::Result<Box<dyn Read + Send + 'a>> {
        Ok(match self {
            Self::None => Box::new(reader),
            Self::Gzip => Box::new(MultiGzDecoder::new(reader)),
            Self::Bzip2 => Box::new(MultiBzDecoder::new(reader)),
            Self::Zstd => Box::new(zstd::Decoder::new(reader)?),
        })
    }
}
