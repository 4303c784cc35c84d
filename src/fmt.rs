use crate::error::{Error, ReadError};
use crate::source;
use embedded_io::{Read, Seek};

/// Audio format code for uncompressed linear PCM
pub const PCM: u16 = 1;

/// Bit depths that can be decoded
#[derive(Debug, PartialEq, Eq, Clone, Copy)]
pub enum BitDepth {
    /// Unsigned 8-bit samples
    Eight = 8,
    /// Signed 16-bit samples
    Sixteen = 16,
    /// Signed 24-bit samples
    TwentyFour = 24,
}

impl BitDepth {
    fn from_u16(value: u16) -> Result<Self, Error> {
        match value {
            8 => Ok(BitDepth::Eight),
            16 => Ok(BitDepth::Sixteen),
            24 => Ok(BitDepth::TwentyFour),
            _ => Err(Error::UnsupportedBitDepth(value)),
        }
    }

    /// Number of bits per sample
    pub fn bits(self) -> u16 {
        self as u16
    }

    /// Number of bytes a single sample occupies
    pub fn bytes_per_sample(self) -> u16 {
        self.bits() / 8
    }
}

/// Struct representing the `fmt ` section of a WAV file
///
/// for more information see [`here`]
///
/// [`here`]: http://soundfile.sapp.org/doc/WaveFormat/
#[derive(Debug, PartialEq, Clone, Copy)]
pub struct Fmt {
    /// audio format, always [`PCM`] after validation
    pub audio_format: u16,
    /// number of audio channels in the sample data, `1` or `2`, channels are interleaved
    pub num_channels: u16,
    /// sample rate, typical values are `44_100`, `48_000` or `96_000`
    pub sample_rate: u32,
    /// declared byte rate
    pub bytes_per_second: u32,
    /// declared size of one interleaved frame holding a sample of each channel
    pub bytes_per_block: u16,
    /// bit depth for each sample
    pub bit_depth: BitDepth,
}

/// Size of the fields read from the start of the `fmt ` chunk body
pub const FMT_BODY_LEN: usize = 16;

impl Fmt {
    /// Parse and validate the first 16 bytes of a `fmt ` chunk body.
    ///
    /// Checks run in order and stop at the first failure: PCM format,
    /// mono or stereo, consistent header, supported bit depth.
    ///
    /// ```
    /// use pcm_wav::{BitDepth, Error, Fmt};
    ///
    /// let body = [
    ///     0x01, 0x00, // audio format
    ///     0x02, 0x00, // num channels
    ///     0x44, 0xac, 0x00, 0x00, // sample rate
    ///     0x10, 0xb1, 0x02, 0x00, // byte rate
    ///     0x04, 0x00, // block align
    ///     0x10, 0x00, // bits per sample
    /// ];
    ///
    /// let fmt = Fmt::from_bytes(&body).unwrap();
    /// assert_eq!(fmt.sample_rate, 44_100);
    /// assert_eq!(fmt.bit_depth, BitDepth::Sixteen);
    ///
    /// let mut float = body;
    /// float[0] = 0x03;
    /// assert_eq!(Fmt::from_bytes(&float), Err(Error::UnsupportedCompression(3)));
    /// ```
    pub fn from_bytes(bytes: &[u8; FMT_BODY_LEN]) -> Result<Self, Error> {
        let audio_format = u16::from_le_bytes([bytes[0], bytes[1]]);
        let num_channels = u16::from_le_bytes([bytes[2], bytes[3]]);
        let sample_rate = u32::from_le_bytes([bytes[4], bytes[5], bytes[6], bytes[7]]);
        let bytes_per_second = u32::from_le_bytes([bytes[8], bytes[9], bytes[10], bytes[11]]);
        let bytes_per_block = u16::from_le_bytes([bytes[12], bytes[13]]);
        let bit_depth = u16::from_le_bytes([bytes[14], bytes[15]]);

        if audio_format != PCM {
            return Err(Error::UnsupportedCompression(audio_format));
        }

        if !(1..=2).contains(&num_channels) {
            return Err(Error::UnsupportedChannelCount(num_channels));
        }

        // A zero rate would make every duration infinite
        if sample_rate == 0 {
            return Err(Error::InconsistentHeader);
        }

        let expected_bytes_per_second =
            num_channels as u64 * sample_rate as u64 * bit_depth as u64 / 8;
        let expected_bytes_per_block = num_channels as u64 * (bit_depth as u64 / 8);

        if bytes_per_second as u64 != expected_bytes_per_second
            || bytes_per_block as u64 != expected_bytes_per_block
        {
            return Err(Error::InconsistentHeader);
        }

        let bit_depth = BitDepth::from_u16(bit_depth)?;

        Ok(Fmt {
            audio_format,
            num_channels,
            sample_rate,
            bytes_per_second,
            bytes_per_block,
            bit_depth,
        })
    }

    /// Read and validate the `fmt ` chunk body starting at `body_offset`
    pub fn read_from<R>(source: &mut R, body_offset: u64) -> Result<Self, ReadError<R::Error>>
    where
        R: Read + Seek,
    {
        let bytes = source::read_array::<R, FMT_BODY_LEN>(source, body_offset)?;
        Ok(Self::from_bytes(&bytes)?)
    }

    /// Number of bytes a single sample occupies
    pub fn bytes_per_sample(&self) -> u16 {
        self.bit_depth.bytes_per_sample()
    }
}

pub(crate) mod asynch {
    use super::*;
    use crate::source::asynch as source;
    use embedded_io_async::{Read, Seek};

    pub(crate) async fn read_fmt<R>(
        source: &mut R,
        body_offset: u64,
    ) -> Result<Fmt, ReadError<R::Error>>
    where
        R: Read + Seek,
    {
        let bytes = source::read_array::<R, FMT_BODY_LEN>(source, body_offset).await?;
        Ok(Fmt::from_bytes(&bytes)?)
    }
}
