use crate::chunk::ChunkTag;
use core::convert::Infallible;

/// Error type for the different decoding failures
#[derive(Debug, PartialEq, Clone, Copy, thiserror::Error)]
pub enum Error {
    /// The `fmt ` or `data` chunk could not be found by the scan
    #[error("no `{0}` chunk found")]
    MissingChunk(ChunkTag),
    /// Audio format is not linear PCM
    #[error("unsupported compression, audio format {0}")]
    UnsupportedCompression(u16),
    /// Channel count outside of mono or stereo
    #[error("unsupported channel count {0}")]
    UnsupportedChannelCount(u16),
    /// Byte rate, block size or sample rate disagree with the rest of the header
    #[error("inconsistent header data")]
    InconsistentHeader,
    /// Bit depth other than 8, 16 or 24
    #[error("unsupported bit depth {0}")]
    UnsupportedBitDepth(u16),
    /// The byte source ended before a declared field or sample
    #[error("byte source ended before the declared data")]
    TruncatedData,
}

impl Error {
    /// The kind of this error
    pub fn kind(&self) -> ErrorKind {
        match self {
            Error::MissingChunk(_) => ErrorKind::MissingChunk,
            Error::UnsupportedCompression(_) => ErrorKind::UnsupportedCompression,
            Error::UnsupportedChannelCount(_) => ErrorKind::UnsupportedChannelCount,
            Error::InconsistentHeader => ErrorKind::InconsistentHeader,
            Error::UnsupportedBitDepth(_) => ErrorKind::UnsupportedBitDepth,
            Error::TruncatedData => ErrorKind::TruncatedData,
        }
    }
}

/// Error returned when decoding from a byte source
#[derive(Debug, PartialEq, thiserror::Error)]
pub enum ReadError<E> {
    /// Error reported by the underlying byte source
    #[error("byte source unavailable: {0:?}")]
    SourceUnavailable(E),
    /// Error from the parser
    #[error(transparent)]
    Parser(#[from] Error),
}

impl<E> ReadError<E> {
    /// The kind of this error
    pub fn kind(&self) -> ErrorKind {
        match self {
            ReadError::SourceUnavailable(_) => ErrorKind::SourceUnavailable,
            ReadError::Parser(e) => e.kind(),
        }
    }
}

impl<E> From<embedded_io::ReadExactError<E>> for ReadError<E> {
    fn from(e: embedded_io::ReadExactError<E>) -> Self {
        match e {
            embedded_io::ReadExactError::UnexpectedEof => ReadError::Parser(Error::TruncatedData),
            embedded_io::ReadExactError::Other(e) => ReadError::SourceUnavailable(e),
        }
    }
}

impl From<ReadError<Infallible>> for Error {
    fn from(e: ReadError<Infallible>) -> Self {
        match e {
            ReadError::Parser(e) => e,
            ReadError::SourceUnavailable(never) => match never {},
        }
    }
}

/// Discriminant of every failure a load can end in
#[derive(Debug, PartialEq, Eq, Clone, Copy)]
pub enum ErrorKind {
    /// Byte source cannot be opened or read
    SourceUnavailable,
    /// `fmt ` or `data` chunk not found
    MissingChunk,
    /// Audio format other than PCM
    UnsupportedCompression,
    /// Channels outside of 1 or 2
    UnsupportedChannelCount,
    /// Declared byte rate or block size don't match derived values
    InconsistentHeader,
    /// Bit depth outside of 8, 16 or 24
    UnsupportedBitDepth,
    /// Byte source shorter than its declared contents
    TruncatedData,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn read_exact_errors_map_to_kinds() {
        let eof: ReadError<u8> = embedded_io::ReadExactError::UnexpectedEof.into();
        assert_eq!(eof, ReadError::Parser(Error::TruncatedData));
        assert_eq!(eof.kind(), ErrorKind::TruncatedData);

        let other: ReadError<u8> = embedded_io::ReadExactError::Other(7).into();
        assert_eq!(other, ReadError::SourceUnavailable(7));
        assert_eq!(other.kind(), ErrorKind::SourceUnavailable);
    }

    #[test]
    fn parser_error_kinds() {
        assert_eq!(
            Error::MissingChunk(ChunkTag::Data).kind(),
            ErrorKind::MissingChunk
        );
        assert_eq!(
            Error::UnsupportedCompression(3).kind(),
            ErrorKind::UnsupportedCompression
        );
        assert_eq!(
            ReadError::<()>::Parser(Error::InconsistentHeader).kind(),
            ErrorKind::InconsistentHeader
        );
    }

    #[test]
    fn infallible_read_error_unwraps_to_parser_error() {
        let e: Error = ReadError::<Infallible>::Parser(Error::UnsupportedBitDepth(12)).into();
        assert_eq!(e, Error::UnsupportedBitDepth(12));
    }
}
