use crate::error::ReadError;
use crate::fmt::BitDepth;
use crate::source;
use core::fmt::Debug;
use embedded_io::{Read, Seek};

mod private {
    pub trait Sealed {}

    impl Sealed for f32 {}
    impl Sealed for f64 {}
}

/// Floating point type decoded samples are normalized into.
///
/// Implemented for `f32` and `f64`. All conversions map the full integer
/// range of a bit depth onto `[-1.0, 1.0)`.
pub trait Sample: private::Sealed + Copy + Default + PartialOrd + Debug {
    /// Convert an unsigned 8-bit sample, `128` being silence
    fn from_u8(sample: u8) -> Self;
    /// Convert a signed 16-bit sample
    fn from_i16(sample: i16) -> Self;
    /// Convert a sign-extended 24-bit sample
    fn from_i24(sample: i32) -> Self;
}

impl Sample for f32 {
    fn from_u8(sample: u8) -> Self {
        (sample as f32 - 128.0) / 128.0
    }
    fn from_i16(sample: i16) -> Self {
        sample as f32 / 32_768.0
    }
    fn from_i24(sample: i32) -> Self {
        sample as f32 / 8_388_608.0
    }
}

impl Sample for f64 {
    fn from_u8(sample: u8) -> Self {
        (sample as f64 - 128.0) / 128.0
    }
    fn from_i16(sample: i16) -> Self {
        sample as f64 / 32_768.0
    }
    fn from_i24(sample: i32) -> Self {
        sample as f64 / 8_388_608.0
    }
}

/// Reassemble three little-endian bytes into a sign-extended 24-bit value
pub fn i24_from_le_bytes(bytes: [u8; 3]) -> i32 {
    let mut value = (bytes[2] as i32) << 16 | (bytes[1] as i32) << 8 | bytes[0] as i32;

    if value & 0x80_0000 != 0 {
        value |= !0xff_ffff;
    }

    value
}

/// Read and normalize the single sample starting at `offset`.
///
/// Reads `bit_depth.bytes_per_sample()` bytes into a stack buffer.
///
/// ```
/// use pcm_wav::{decode_sample, BitDepth, SliceSource};
///
/// let mut source = SliceSource::new(&[0x00, 0x40, 0xff, 0xff, 0x7f]);
///
/// let sample: f32 = decode_sample(&mut source, 0, BitDepth::Sixteen).unwrap();
/// assert_eq!(sample, 0.5);
///
/// let sample: f64 = decode_sample(&mut source, 2, BitDepth::TwentyFour).unwrap();
/// assert_eq!(sample, 8_388_607.0 / 8_388_608.0);
/// ```
pub fn decode_sample<T, R>(
    source: &mut R,
    offset: u64,
    bit_depth: BitDepth,
) -> Result<T, ReadError<R::Error>>
where
    T: Sample,
    R: Read + Seek,
{
    let sample = match bit_depth {
        BitDepth::Eight => {
            let [byte] = source::read_array::<R, 1>(source, offset)?;
            T::from_u8(byte)
        }
        BitDepth::Sixteen => {
            let bytes = source::read_array::<R, 2>(source, offset)?;
            T::from_i16(i16::from_le_bytes(bytes))
        }
        BitDepth::TwentyFour => {
            let bytes = source::read_array::<R, 3>(source, offset)?;
            T::from_i24(i24_from_le_bytes(bytes))
        }
    };

    Ok(sample)
}

pub(crate) mod asynch {
    use super::*;
    use crate::source::asynch as source;
    use embedded_io_async::{Read, Seek};

    pub(crate) async fn decode_sample<T, R>(
        source: &mut R,
        offset: u64,
        bit_depth: BitDepth,
    ) -> Result<T, ReadError<R::Error>>
    where
        T: Sample,
        R: Read + Seek,
    {
        let sample = match bit_depth {
            BitDepth::Eight => {
                let [byte] = source::read_array::<R, 1>(source, offset).await?;
                T::from_u8(byte)
            }
            BitDepth::Sixteen => {
                let bytes = source::read_array::<R, 2>(source, offset).await?;
                T::from_i16(i16::from_le_bytes(bytes))
            }
            BitDepth::TwentyFour => {
                let bytes = source::read_array::<R, 3>(source, offset).await?;
                T::from_i24(i24_from_le_bytes(bytes))
            }
        };

        Ok(sample)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::Error;
    use crate::source::SliceSource;

    #[test]
    fn test_f32_conversions() {
        assert_eq!(f32::from_u8(128), 0.0);
        assert_eq!(f32::from_u8(255), 0.9921875);
        assert_eq!(f32::from_u8(0), -1.0);

        assert_eq!(f32::from_i16(0), 0.0);
        assert_eq!(f32::from_i16(16384), 0.5);
        assert_eq!(f32::from_i16(32767), 0.9999695);
        assert_eq!(f32::from_i16(-32768), -1.0);

        assert_eq!(f32::from_i24(0), 0.0);
        assert_eq!(f32::from_i24(0x7f_ffff), 8_388_607.0 / 8_388_608.0);
        assert_eq!(f32::from_i24(-0x80_0000), -1.0);
    }

    #[test]
    fn test_f64_conversions() {
        assert_eq!(f64::from_u8(0), -1.0);
        assert_eq!(f64::from_u8(255), 0.9921875);
        assert_eq!(f64::from_i16(32767), 0.999969482421875);
        assert_eq!(f64::from_i16(-32768), -1.0);
        assert_eq!(f64::from_i24(-1), -1.0 / 8_388_608.0);
    }

    #[test]
    fn test_i24_sign_extension() {
        assert_eq!(i24_from_le_bytes([0x00, 0x00, 0x00]), 0);
        assert_eq!(i24_from_le_bytes([0xff, 0xff, 0x7f]), 0x7f_ffff);
        assert_eq!(i24_from_le_bytes([0x00, 0x00, 0x80]), -0x80_0000);
        assert_eq!(i24_from_le_bytes([0xff, 0xff, 0xff]), -1);
        assert_eq!(i24_from_le_bytes([0x1e, 0xf3, 0x3c]), 0x3c_f31e);
    }

    #[test]
    fn decode_boundaries() {
        let bytes = [
            0x00, // 8-bit minimum
            0xff, // 8-bit maximum
            0x00, 0x80, // 16-bit minimum
            0xff, 0x7f, // 16-bit maximum
            0x00, 0x00, 0x80, // 24-bit minimum
            0xff, 0xff, 0x7f, // 24-bit maximum
            0xff, 0xff, 0xff, // 24-bit -1
        ];
        let mut source = SliceSource::new(&bytes);

        let mut decode = |offset, bit_depth| -> f32 {
            decode_sample(&mut source, offset, bit_depth).unwrap()
        };

        assert_eq!(decode(0, BitDepth::Eight), -1.0);
        assert_eq!(decode(1, BitDepth::Eight), 0.9921875);
        assert_eq!(decode(2, BitDepth::Sixteen), -1.0);
        assert_eq!(decode(4, BitDepth::Sixteen), 32_767.0 / 32_768.0);
        assert_eq!(decode(6, BitDepth::TwentyFour), -1.0);
        assert_eq!(decode(9, BitDepth::TwentyFour), 8_388_607.0 / 8_388_608.0);

        let minus_one = decode(12, BitDepth::TwentyFour);
        assert!(minus_one < 0.0);
        assert_eq!(minus_one, -1.0 / 8_388_608.0);
    }

    #[test]
    fn decode_past_end_is_truncated() {
        let mut source = SliceSource::new(&[0x00, 0x00]);

        let result: Result<f32, _> = decode_sample(&mut source, 0, BitDepth::TwentyFour);
        assert_eq!(result, Err(ReadError::Parser(Error::TruncatedData)));
    }

    #[tokio::test]
    async fn async_decode_matches_blocking_decode() {
        let bytes = [0x13, 0x3c, 0x94];

        let mut source = SliceSource::new(&bytes);
        let blocking: f64 = decode_sample(&mut source, 0, BitDepth::TwentyFour).unwrap();

        let mut source = SliceSource::new(&bytes);
        let non_blocking: f64 = asynch::decode_sample(&mut source, 0, BitDepth::TwentyFour)
            .await
            .unwrap();

        assert_eq!(blocking, non_blocking);
        assert!(non_blocking < 0.0);
    }
}
