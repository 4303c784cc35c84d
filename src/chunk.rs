use crate::error::ReadError;
use crate::source;
use core::fmt;
use embedded_io::{Read, Seek};
use log::trace;

/// Four character RIFF chunk identifier
#[derive(Debug, PartialEq, Eq, Clone, Copy)]
pub enum ChunkTag {
    /// `RIFF`
    Riff,
    /// `WAVE`
    Wave,
    /// `fmt `
    Fmt,
    /// `data`
    Data,
    /// `LIST`
    List,
    /// `fact`
    Fact,
    /// Any other tag
    Unknown([u8; 4]),
}

impl ChunkTag {
    /// Identify a tag from its raw bytes
    pub fn from_bytes(bytes: &[u8; 4]) -> Self {
        match bytes {
            b"RIFF" => ChunkTag::Riff,
            b"WAVE" => ChunkTag::Wave,
            b"fmt " => ChunkTag::Fmt,
            b"data" => ChunkTag::Data,
            b"LIST" => ChunkTag::List,
            b"fact" => ChunkTag::Fact,
            _ => ChunkTag::Unknown(*bytes),
        }
    }

    /// The raw bytes of the tag as they appear in the file
    pub fn to_bytes(self) -> [u8; 4] {
        match self {
            ChunkTag::Riff => *b"RIFF",
            ChunkTag::Wave => *b"WAVE",
            ChunkTag::Fmt => *b"fmt ",
            ChunkTag::Data => *b"data",
            ChunkTag::List => *b"LIST",
            ChunkTag::Fact => *b"fact",
            ChunkTag::Unknown(bytes) => bytes,
        }
    }
}

impl fmt::Display for ChunkTag {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for byte in self.to_bytes() {
            if byte.is_ascii_graphic() || byte == b' ' {
                write!(f, "{}", byte as char)?;
            } else {
                write!(f, "\\x{:02x}", byte)?;
            }
        }
        Ok(())
    }
}

/// Location of a chunk found by [`find_chunk`]
#[derive(Debug, PartialEq, Eq, Clone, Copy)]
pub struct ChunkDescriptor {
    /// The tag that was searched for
    pub tag: ChunkTag,
    /// Byte position of the tag itself
    pub offset: u64,
}

impl ChunkDescriptor {
    /// Byte position of the 4 byte little-endian chunk size field
    pub fn size_offset(&self) -> u64 {
        self.offset + 4
    }

    /// Byte position of the first byte of the chunk body
    pub fn body_offset(&self) -> u64 {
        self.offset + 8
    }
}

/// Number of bytes in a chunk identifier
const TAG_LEN: u64 = 4;

/// Search the source byte by byte for the first occurrence of `tag`.
///
/// Every offset from the start of the source up to and including
/// `len - 4` is compared, so tags don't need to sit on chunk boundaries
/// and unknown chunks in between are skipped over. Returns `None` when the
/// tag doesn't occur.
///
/// ```
/// use pcm_wav::{find_chunk, ChunkTag, SliceSource};
///
/// let mut source = SliceSource::new(b"RIFF\x04\x00\x00\x00WAVEdata");
/// let chunk = find_chunk(&mut source, ChunkTag::Data).unwrap().unwrap();
///
/// assert_eq!(chunk.offset, 12);
/// assert_eq!(find_chunk(&mut source, ChunkTag::Fmt).unwrap(), None);
/// ```
pub fn find_chunk<R>(
    source: &mut R,
    tag: ChunkTag,
) -> Result<Option<ChunkDescriptor>, ReadError<R::Error>>
where
    R: Read + Seek,
{
    let needle = tag.to_bytes();
    let len = source::source_len(source)?;
    trace!("scanning {} bytes for `{}`", len, tag);

    let Some(last) = len.checked_sub(TAG_LEN) else {
        return Ok(None);
    };

    for offset in 0..=last {
        let candidate = source::read_array::<R, 4>(source, offset)?;
        if candidate == needle {
            return Ok(Some(ChunkDescriptor { tag, offset }));
        }
    }

    Ok(None)
}

pub(crate) mod asynch {
    use super::*;
    use crate::source::asynch as source;
    use embedded_io_async::{Read, Seek};

    pub(crate) async fn find_chunk<R>(
        source: &mut R,
        tag: ChunkTag,
    ) -> Result<Option<ChunkDescriptor>, ReadError<R::Error>>
    where
        R: Read + Seek,
    {
        let needle = tag.to_bytes();
        let len = source::source_len(source).await?;
        trace!("scanning {} bytes for `{}`", len, tag);

        let Some(last) = len.checked_sub(TAG_LEN) else {
            return Ok(None);
        };

        for offset in 0..=last {
            let candidate = source::read_array::<R, 4>(source, offset).await?;
            if candidate == needle {
                return Ok(Some(ChunkDescriptor { tag, offset }));
            }
        }

        Ok(None)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::source::SliceSource;

    #[test]
    fn tag_round_trips_through_bytes() {
        assert_eq!(ChunkTag::from_bytes(b"fmt "), ChunkTag::Fmt);
        assert_eq!(ChunkTag::from_bytes(b"junk"), ChunkTag::Unknown(*b"junk"));
        assert_eq!(&ChunkTag::Data.to_bytes(), b"data");
    }

    #[test]
    fn tag_display() {
        assert_eq!(std::format!("{}", ChunkTag::Fmt), "fmt ");
        assert_eq!(
            std::format!("{}", ChunkTag::Unknown([b'a', 0, b'b', 0xff])),
            "a\\x00b\\xff"
        );
    }

    #[test]
    fn finds_first_occurrence() {
        let bytes = b"xxdataxxdata";
        let mut source = SliceSource::new(bytes);

        let chunk = find_chunk(&mut source, ChunkTag::Data).unwrap().unwrap();
        assert_eq!(chunk.offset, 2);
        assert_eq!(chunk.size_offset(), 6);
        assert_eq!(chunk.body_offset(), 10);
    }

    #[test]
    fn finds_tag_at_very_end() {
        let mut source = SliceSource::new(b"abcdata");

        let chunk = find_chunk(&mut source, ChunkTag::Data).unwrap().unwrap();
        assert_eq!(chunk.offset, 3);
    }

    #[test]
    fn compares_all_four_bytes() {
        // "fmt" without the trailing space must not match
        let mut source = SliceSource::new(b"RIFFfmt_WAVEfmtX");
        assert_eq!(find_chunk(&mut source, ChunkTag::Fmt).unwrap(), None);

        let mut source = SliceSource::new(b"datfmtdat");
        assert_eq!(find_chunk(&mut source, ChunkTag::Data).unwrap(), None);
    }

    #[test]
    fn source_shorter_than_tag() {
        let mut source = SliceSource::new(b"dat");
        assert_eq!(find_chunk(&mut source, ChunkTag::Data).unwrap(), None);

        let mut source = SliceSource::new(b"");
        assert_eq!(find_chunk(&mut source, ChunkTag::Data).unwrap(), None);
    }

    #[test]
    fn skips_unknown_chunks() {
        let bytes: [u8; 24] = [
            0x4c, 0x49, 0x53, 0x54, // LIST
            0x04, 0x00, 0x00, 0x00, // chunk size
            0x49, 0x4e, 0x46, 0x4f, // INFO
            0x66, 0x6d, 0x74, 0x20, // fmt_
            0x10, 0x00, 0x00, 0x00, // chunk size
            0x01, 0x00, 0x01, 0x00, // start of body
        ];
        let mut source = SliceSource::new(&bytes);

        let chunk = find_chunk(&mut source, ChunkTag::Fmt).unwrap().unwrap();
        assert_eq!(chunk.offset, 12);
        assert_eq!(chunk.body_offset(), 20);
    }

    #[tokio::test]
    async fn async_scan_matches_blocking_scan() {
        let bytes = b"RIFF\x00\x00\x00\x00WAVEfmt \x10\x00\x00\x00";

        let mut source = SliceSource::new(bytes);
        let blocking = find_chunk(&mut source, ChunkTag::Fmt).unwrap();

        let mut source = SliceSource::new(bytes);
        let non_blocking = asynch::find_chunk(&mut source, ChunkTag::Fmt).await.unwrap();

        assert_eq!(blocking, non_blocking);
        assert_eq!(non_blocking.map(|c| c.offset), Some(12));
    }
}
