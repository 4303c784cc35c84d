//! `no_std` decoder for uncompressed PCM WAV files.
//!
//! Samples are read from any random-access byte source implementing the
//! `embedded-io` [`Read`](embedded_io::Read) and [`Seek`](embedded_io::Seek)
//! traits and normalized into per-channel `f32` or `f64` sequences. Mono and
//! stereo files at 8, 16 or 24 bits per sample are supported, anything else
//! is rejected with an [`Error`].
//!
//! Decoding a WAV file held in memory:
//! ```
//! use pcm_wav::AudioFile;
//!
//! let bytes: [u8; 52] = [
//!     0x52, 0x49, 0x46, 0x46, // RIFF
//!     0x2c, 0x00, 0x00, 0x00, // chunk size
//!     0x57, 0x41, 0x56, 0x45, // WAVE
//!     0x66, 0x6d, 0x74, 0x20, // fmt_
//!     0x10, 0x00, 0x00, 0x00, // chunk size
//!     0x01, 0x00, // audio format
//!     0x02, 0x00, // num channels
//!     0x80, 0xbb, 0x00, 0x00, // sample rate
//!     0x00, 0xee, 0x02, 0x00, // byte rate
//!     0x04, 0x00, // block align
//!     0x10, 0x00, // bits per sample
//!     0x64, 0x61, 0x74, 0x61, // data
//!     0x08, 0x00, 0x00, 0x00, // chunk size
//!     0x00, 0x40, 0x00, 0xc0, // sample 1 L+R
//!     0x00, 0x00, 0xff, 0x7f, // sample 2 L+R
//! ];
//!
//! let mut audio = AudioFile::<f32>::new();
//! audio.load_bytes(&bytes).unwrap();
//!
//! assert_eq!(audio.num_channels(), 2);
//! assert_eq!(audio.bit_depth(), 16);
//! assert_eq!(audio.sample_rate(), 48_000);
//! assert_eq!(audio.channel(0), Some(&[0.5, 0.0][..]));
//! assert_eq!(audio.channel(1), Some(&[-0.5, 0.9999695][..]));
//! ```
//!
//! Reading from a file with the `std` feature:
//! ```no_run
//! # #[cfg(feature = "std")]
//! # fn main() -> Result<(), Box<dyn std::error::Error>> {
//! use pcm_wav::AudioFile;
//!
//! let mut audio = AudioFile::<f64>::new();
//! audio
//!     .load_file("./stereo_24_48000.wav")
//!     .map_err(|e| format!("{e:?}"))?;
//!
//! let mut summary = String::new();
//! audio.print_summary(&mut summary)?;
//! println!("{summary}");
//! # Ok(())
//! # }
//! # #[cfg(not(feature = "std"))]
//! # fn main() {}
//! ```
//!
//! Any other byte source works through the `embedded-io` traits, blocking
//! with [`AudioFile::load`] or async with [`AudioFile::load_async`].

#![cfg_attr(all(not(test), not(feature = "std")), no_std)]
#![warn(missing_docs)]

extern crate alloc;

mod audio_file;
mod buffer;
mod chunk;
mod conversion;
mod error;
mod fmt;
mod source;

pub use audio_file::{AudioFile, LoadState, Summary};
pub use buffer::AudioBuffer;
pub use chunk::{find_chunk, ChunkDescriptor, ChunkTag};
pub use conversion::{decode_sample, i24_from_le_bytes, Sample};
pub use error::{Error, ErrorKind, ReadError};
pub use fmt::{BitDepth, Fmt, FMT_BODY_LEN, PCM};
pub use source::SliceSource;

#[cfg(feature = "std")]
pub use source::{File, FileError};
