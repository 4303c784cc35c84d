use crate::error::ReadError;
use core::convert::Infallible;
use embedded_io::{Read, Seek, SeekFrom};

/// In-memory byte source over a slice.
///
/// Implements both the blocking and the async `embedded-io` read and seek
/// traits, seeking past either end clamps to the slice bounds.
///
/// ```
/// use embedded_io::{Read, Seek, SeekFrom};
/// use pcm_wav::SliceSource;
///
/// let mut source = SliceSource::new(b"RIFF....WAVE");
/// source.seek(SeekFrom::Start(8)).unwrap();
///
/// let mut tag = [0; 4];
/// source.read_exact(&mut tag).unwrap();
/// assert_eq!(&tag, b"WAVE");
/// ```
#[derive(Debug, Clone)]
pub struct SliceSource<'a> {
    data: &'a [u8],
    pos: usize,
}

impl<'a> SliceSource<'a> {
    /// Wrap a slice, positioned at its start
    pub fn new(data: &'a [u8]) -> Self {
        Self { data, pos: 0 }
    }

    fn read_into(&mut self, buf: &mut [u8]) -> usize {
        let remaining = self.data.len().saturating_sub(self.pos);
        let to_read = remaining.min(buf.len());
        buf[..to_read].copy_from_slice(&self.data[self.pos..self.pos + to_read]);
        self.pos += to_read;
        to_read
    }

    fn seek_to(&mut self, pos: SeekFrom) -> u64 {
        let offset_from = |base: usize, offset: i64| {
            if offset >= 0 {
                base.saturating_add(offset as usize)
            } else {
                base.saturating_sub(offset.unsigned_abs() as usize)
            }
        };

        let new_pos = match pos {
            SeekFrom::Start(offset) => usize::try_from(offset).unwrap_or(usize::MAX),
            SeekFrom::Current(offset) => offset_from(self.pos, offset),
            SeekFrom::End(offset) => offset_from(self.data.len(), offset),
        };
        self.pos = new_pos.min(self.data.len());
        self.pos as u64
    }
}

impl embedded_io::ErrorType for SliceSource<'_> {
    type Error = Infallible;
}

impl Read for SliceSource<'_> {
    fn read(&mut self, buf: &mut [u8]) -> Result<usize, Self::Error> {
        Ok(self.read_into(buf))
    }
}

impl Seek for SliceSource<'_> {
    fn seek(&mut self, pos: SeekFrom) -> Result<u64, Self::Error> {
        Ok(self.seek_to(pos))
    }
}

impl embedded_io_async::Read for SliceSource<'_> {
    async fn read(&mut self, buf: &mut [u8]) -> Result<usize, Self::Error> {
        Ok(self.read_into(buf))
    }
}

impl embedded_io_async::Seek for SliceSource<'_> {
    async fn seek(&mut self, pos: SeekFrom) -> Result<u64, Self::Error> {
        Ok(self.seek_to(pos))
    }
}

/// Total length of the source in bytes
pub(crate) fn source_len<R: Seek>(source: &mut R) -> Result<u64, ReadError<R::Error>> {
    source
        .seek(SeekFrom::End(0))
        .map_err(ReadError::SourceUnavailable)
}

/// Read exactly `N` bytes starting at `offset` into a stack buffer
pub(crate) fn read_array<R, const N: usize>(
    source: &mut R,
    offset: u64,
) -> Result<[u8; N], ReadError<R::Error>>
where
    R: Read + Seek,
{
    source
        .seek(SeekFrom::Start(offset))
        .map_err(ReadError::SourceUnavailable)?;
    let mut bytes = [0; N];
    source.read_exact(&mut bytes)?;
    Ok(bytes)
}

/// Read a little-endian `u32` at `offset`
pub(crate) fn read_u32_le<R>(source: &mut R, offset: u64) -> Result<u32, ReadError<R::Error>>
where
    R: Read + Seek,
{
    read_array::<R, 4>(source, offset).map(u32::from_le_bytes)
}

pub(crate) mod asynch {
    use super::*;
    use embedded_io_async::{Read, Seek};

    pub(crate) async fn source_len<R: Seek>(source: &mut R) -> Result<u64, ReadError<R::Error>> {
        source
            .seek(SeekFrom::End(0))
            .await
            .map_err(ReadError::SourceUnavailable)
    }

    pub(crate) async fn read_array<R, const N: usize>(
        source: &mut R,
        offset: u64,
    ) -> Result<[u8; N], ReadError<R::Error>>
    where
        R: Read + Seek,
    {
        source
            .seek(SeekFrom::Start(offset))
            .await
            .map_err(ReadError::SourceUnavailable)?;
        let mut bytes = [0; N];
        source.read_exact(&mut bytes).await?;
        Ok(bytes)
    }

    pub(crate) async fn read_u32_le<R>(
        source: &mut R,
        offset: u64,
    ) -> Result<u32, ReadError<R::Error>>
    where
        R: Read + Seek,
    {
        read_array::<R, 4>(source, offset)
            .await
            .map(u32::from_le_bytes)
    }
}

#[cfg(feature = "std")]
mod file_wrapper {
    use std::fs;
    use std::io::{self, Read, Seek};

    /// Wrapper making [`std::fs::File`] an `embedded-io` byte source.
    /// Used by [`AudioFile::load_file`](crate::AudioFile::load_file).
    pub struct File(pub fs::File);

    /// Error of the [`File`] byte source
    #[derive(Debug)]
    pub struct FileError(pub io::Error);

    impl embedded_io::Error for FileError {
        fn kind(&self) -> embedded_io::ErrorKind {
            embedded_io::ErrorKind::Other
        }
    }

    impl embedded_io::ErrorType for File {
        type Error = FileError;
    }

    impl embedded_io::Read for File {
        fn read(&mut self, buf: &mut [u8]) -> Result<usize, Self::Error> {
            self.0.read(buf).map_err(FileError)
        }
    }

    impl embedded_io::Seek for File {
        fn seek(&mut self, pos: embedded_io::SeekFrom) -> Result<u64, Self::Error> {
            let pos = match pos {
                embedded_io::SeekFrom::Start(offset) => io::SeekFrom::Start(offset),
                embedded_io::SeekFrom::End(offset) => io::SeekFrom::End(offset),
                embedded_io::SeekFrom::Current(offset) => io::SeekFrom::Current(offset),
            };
            self.0.seek(pos).map_err(FileError)
        }
    }
}

#[cfg(feature = "std")]
pub use file_wrapper::{File, FileError};

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::Error;

    #[test]
    fn slice_source_seek_clamps() {
        let mut source = SliceSource::new(&[1, 2, 3, 4]);

        assert_eq!(source.seek(SeekFrom::Start(10)).unwrap(), 4);
        assert_eq!(source.seek(SeekFrom::Current(-10)).unwrap(), 0);
        assert_eq!(source.seek(SeekFrom::End(-1)).unwrap(), 3);

        let mut buf = [0; 4];
        assert_eq!(Read::read(&mut source, &mut buf).unwrap(), 1);
        assert_eq!(buf[0], 4);
        assert_eq!(Read::read(&mut source, &mut buf).unwrap(), 0);
    }

    #[test]
    fn read_array_at_offset() {
        let mut source = SliceSource::new(&[0xaa, 0x01, 0x02, 0x03, 0x04]);

        assert_eq!(read_array::<_, 2>(&mut source, 1).unwrap(), [0x01, 0x02]);
        assert_eq!(read_u32_le(&mut source, 1).unwrap(), 0x04030201);
        assert_eq!(source_len(&mut source).unwrap(), 5);
    }

    #[test]
    fn read_past_end_is_truncated() {
        let mut source = SliceSource::new(&[0x01, 0x02]);

        assert_eq!(
            read_u32_le(&mut source, 0),
            Err(ReadError::Parser(Error::TruncatedData))
        );
    }

    #[tokio::test]
    async fn async_read_array_at_offset() {
        let mut source = SliceSource::new(&[0xaa, 0x01, 0x02, 0x03, 0x04]);

        assert_eq!(
            asynch::read_u32_le(&mut source, 1).await.unwrap(),
            0x04030201
        );
        assert_eq!(asynch::source_len(&mut source).await.unwrap(), 5);
        assert_eq!(
            asynch::read_array::<_, 2>(&mut source, 4).await,
            Err(ReadError::Parser(Error::TruncatedData))
        );
    }
}
