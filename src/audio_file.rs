use crate::buffer::AudioBuffer;
use crate::chunk::{self, ChunkDescriptor, ChunkTag};
use crate::conversion::{self, Sample};
use crate::error::{Error, ErrorKind, ReadError};
use crate::fmt::{self as wav_fmt, Fmt};
use crate::source::{self, SliceSource};
use core::fmt;
use embedded_io::{Read, Seek};
use log::{debug, warn};

const DEFAULT_SAMPLE_RATE: u32 = 44_100;
const DEFAULT_BIT_DEPTH: u16 = 16;

/// Where an [`AudioFile`] is in its load cycle
#[derive(Debug, PartialEq, Eq, Clone, Copy)]
pub enum LoadState {
    /// Nothing loaded yet, or cleared
    Unloaded,
    /// Searching for the `fmt ` and `data` chunks
    Scanning,
    /// Checking the `fmt ` chunk
    Validating,
    /// Converting sample data
    Decoding,
    /// Buffers hold the decoded file
    Loaded,
    /// The last load failed, buffers are empty
    Failed(ErrorKind),
}

/// Where the interleaved samples live inside the source
#[derive(Debug, Clone, Copy)]
struct DataLayout {
    start: u64,
    samples_per_channel: usize,
    num_channels: usize,
    bytes_per_block: u64,
    bytes_per_sample: u64,
}

impl DataLayout {
    fn new(fmt: &Fmt, data: &ChunkDescriptor, data_size: u32) -> Self {
        let num_channels = fmt.num_channels as usize;
        let bytes_per_sample = fmt.bytes_per_sample() as u64;
        let bytes_per_block = fmt.bytes_per_block as u64;

        Self {
            start: data.body_offset(),
            samples_per_channel: (data_size as u64 / bytes_per_block) as usize,
            num_channels,
            bytes_per_block,
            bytes_per_sample,
        }
    }

    fn end(&self) -> u64 {
        self.start + self.samples_per_channel as u64 * self.bytes_per_block
    }

    fn sample_offset(&self, sample_index: usize, channel: usize) -> u64 {
        self.start
            + sample_index as u64 * self.bytes_per_block
            + channel as u64 * self.bytes_per_sample
    }

    /// Offsets in file order, outer loop over samples, inner over channels
    fn offsets(&self) -> impl Iterator<Item = (usize, u64)> + '_ {
        (0..self.samples_per_channel).flat_map(move |sample_index| {
            (0..self.num_channels)
                .map(move |channel| (channel, self.sample_offset(sample_index, channel)))
        })
    }

    fn check_fits(&self, source_len: u64) -> Result<(), Error> {
        if self.end() > source_len {
            return Err(Error::TruncatedData);
        }
        Ok(())
    }
}

/// A decoded PCM WAV file.
///
/// `T` picks the floating point precision of the samples. Every call to
/// [`load`](AudioFile::load) replaces the previous contents completely: on
/// success all channels hold the new file, on failure they are empty.
///
/// ```
/// use pcm_wav::{AudioFile, LoadState};
///
/// let bytes: [u8; 48] = [
///     0x52, 0x49, 0x46, 0x46, // RIFF
///     0x28, 0x00, 0x00, 0x00, // chunk size
///     0x57, 0x41, 0x56, 0x45, // WAVE
///     0x66, 0x6d, 0x74, 0x20, // fmt_
///     0x10, 0x00, 0x00, 0x00, // chunk size
///     0x01, 0x00, // audio format
///     0x01, 0x00, // num channels
///     0x40, 0x1f, 0x00, 0x00, // sample rate
///     0x80, 0x3e, 0x00, 0x00, // byte rate
///     0x02, 0x00, // block align
///     0x10, 0x00, // bits per sample
///     0x64, 0x61, 0x74, 0x61, // data
///     0x04, 0x00, 0x00, 0x00, // chunk size
///     0x00, 0x00, 0x00, 0x40, // samples
/// ];
///
/// let mut audio = AudioFile::<f32>::new();
/// audio.load_bytes(&bytes).unwrap();
///
/// assert_eq!(audio.state(), LoadState::Loaded);
/// assert_eq!(audio.sample_rate(), 8_000);
/// assert_eq!(audio.channel(0), Some(&[0.0, 0.5][..]));
/// assert_eq!(audio.length_in_seconds(), 0.00025);
/// ```
#[derive(Debug, Clone)]
pub struct AudioFile<T = f32> {
    sample_rate: u32,
    bit_depth: u16,
    samples: AudioBuffer<T>,
    state: LoadState,
}

impl<T: Sample> AudioFile<T> {
    /// An unloaded file with no channels
    pub fn new() -> Self {
        Self {
            sample_rate: DEFAULT_SAMPLE_RATE,
            bit_depth: DEFAULT_BIT_DEPTH,
            samples: AudioBuffer::new(),
            state: LoadState::Unloaded,
        }
    }

    /// Decode a PCM WAV file from a seekable byte source.
    ///
    /// Previously loaded samples are discarded before anything is read.
    /// Any failure leaves the file empty in [`LoadState::Failed`].
    pub fn load<R>(&mut self, source: &mut R) -> Result<(), ReadError<R::Error>>
    where
        R: Read + Seek,
    {
        self.clear();
        let result = self.decode(source);
        self.finish(result)
    }

    /// Decode a PCM WAV file held in memory
    pub fn load_bytes(&mut self, bytes: &[u8]) -> Result<(), Error> {
        let mut source = SliceSource::new(bytes);
        Ok(self.load(&mut source)?)
    }

    /// Open and decode a PCM WAV file from disk
    #[cfg(feature = "std")]
    pub fn load_file(
        &mut self,
        path: impl AsRef<std::path::Path>,
    ) -> Result<(), ReadError<source::FileError>> {
        match std::fs::File::open(path) {
            Ok(file) => self.load(&mut source::File(file)),
            Err(e) => {
                self.clear();
                self.finish(Err(ReadError::SourceUnavailable(source::FileError(e))))
            }
        }
    }

    /// Async version of [`load`](AudioFile::load) for `embedded-io-async` sources
    pub async fn load_async<R>(&mut self, source: &mut R) -> Result<(), ReadError<R::Error>>
    where
        R: embedded_io_async::Read + embedded_io_async::Seek,
    {
        self.clear();
        let result = self.decode_async(source).await;
        self.finish(result)
    }

    fn decode<R>(&mut self, source: &mut R) -> Result<(), ReadError<R::Error>>
    where
        R: Read + Seek,
    {
        self.state = LoadState::Scanning;
        let data = chunk::find_chunk(source, ChunkTag::Data)?
            .ok_or(Error::MissingChunk(ChunkTag::Data))?;
        let fmt_chunk = chunk::find_chunk(source, ChunkTag::Fmt)?
            .ok_or(Error::MissingChunk(ChunkTag::Fmt))?;
        debug!(
            "found `data` at {} and `fmt ` at {}",
            data.offset, fmt_chunk.offset
        );

        self.state = LoadState::Validating;
        let fmt = Fmt::read_from(source, fmt_chunk.body_offset())?;
        let data_size = source::read_u32_le(source, data.size_offset())?;
        let layout = DataLayout::new(&fmt, &data, data_size);
        layout.check_fits(source::source_len(source)?)?;

        self.state = LoadState::Decoding;
        debug!(
            "decoding {} samples per channel, {} channels, {} bit",
            layout.samples_per_channel,
            layout.num_channels,
            fmt.bit_depth.bits()
        );
        let mut samples =
            AudioBuffer::with_capacity(layout.num_channels, layout.samples_per_channel);
        for (channel, offset) in layout.offsets() {
            let sample = conversion::decode_sample(source, offset, fmt.bit_depth)?;
            samples.push(channel, sample);
        }

        self.commit(&fmt, samples);
        Ok(())
    }

    async fn decode_async<R>(&mut self, source: &mut R) -> Result<(), ReadError<R::Error>>
    where
        R: embedded_io_async::Read + embedded_io_async::Seek,
    {
        self.state = LoadState::Scanning;
        let data = chunk::asynch::find_chunk(source, ChunkTag::Data)
            .await?
            .ok_or(Error::MissingChunk(ChunkTag::Data))?;
        let fmt_chunk = chunk::asynch::find_chunk(source, ChunkTag::Fmt)
            .await?
            .ok_or(Error::MissingChunk(ChunkTag::Fmt))?;
        debug!(
            "found `data` at {} and `fmt ` at {}",
            data.offset, fmt_chunk.offset
        );

        self.state = LoadState::Validating;
        let fmt = wav_fmt::asynch::read_fmt(source, fmt_chunk.body_offset()).await?;
        let data_size = source::asynch::read_u32_le(source, data.size_offset()).await?;
        let layout = DataLayout::new(&fmt, &data, data_size);
        layout.check_fits(source::asynch::source_len(source).await?)?;

        self.state = LoadState::Decoding;
        let mut samples =
            AudioBuffer::with_capacity(layout.num_channels, layout.samples_per_channel);
        for (channel, offset) in layout.offsets() {
            let sample = conversion::asynch::decode_sample(source, offset, fmt.bit_depth).await?;
            samples.push(channel, sample);
        }

        self.commit(&fmt, samples);
        Ok(())
    }

    fn commit(&mut self, fmt: &Fmt, samples: AudioBuffer<T>) {
        self.sample_rate = fmt.sample_rate;
        self.bit_depth = fmt.bit_depth.bits();
        self.samples = samples;
    }

    fn finish<E>(&mut self, result: Result<(), ReadError<E>>) -> Result<(), ReadError<E>> {
        match &result {
            Ok(()) => {
                self.state = LoadState::Loaded;
                debug!("loaded {}", self.summary());
            }
            Err(e) => {
                warn!("failed to load wav data: {:?}", e.kind());
                self.clear();
                self.state = LoadState::Failed(e.kind());
            }
        }
        result
    }

    /// Discard all samples and return to [`LoadState::Unloaded`]
    pub fn clear(&mut self) {
        self.sample_rate = DEFAULT_SAMPLE_RATE;
        self.bit_depth = DEFAULT_BIT_DEPTH;
        self.samples.clear();
        self.state = LoadState::Unloaded;
    }

    /// Current load state
    pub fn state(&self) -> LoadState {
        self.state
    }

    /// Sample rate in Hz
    pub fn sample_rate(&self) -> u32 {
        self.sample_rate
    }

    /// Bits per sample of the source file
    pub fn bit_depth(&self) -> u16 {
        self.bit_depth
    }

    /// Number of decoded channels
    pub fn num_channels(&self) -> usize {
        self.samples.num_channels()
    }

    /// Number of samples in each channel
    pub fn num_samples_per_channel(&self) -> usize {
        self.samples.num_samples_per_channel()
    }

    /// Duration in seconds
    pub fn length_in_seconds(&self) -> f64 {
        self.num_samples_per_channel() as f64 / self.sample_rate as f64
    }

    /// All decoded channels
    pub fn samples(&self) -> &AudioBuffer<T> {
        &self.samples
    }

    /// Samples of a single channel
    pub fn channel(&self, channel: usize) -> Option<&[T]> {
        self.samples.channel(channel)
    }

    /// Snapshot of the metadata for diagnostics
    pub fn summary(&self) -> Summary {
        Summary {
            num_channels: self.num_channels(),
            num_samples_per_channel: self.num_samples_per_channel(),
            sample_rate: self.sample_rate,
            bit_depth: self.bit_depth,
            length_in_seconds: self.length_in_seconds(),
        }
    }

    /// Write a human readable summary to `sink`
    pub fn print_summary<W: fmt::Write>(&self, sink: &mut W) -> fmt::Result {
        write!(sink, "{}", self.summary())
    }
}

impl<T: Sample> Default for AudioFile<T> {
    fn default() -> Self {
        Self::new()
    }
}

/// Metadata of a loaded file, displayed as a framed block of text
#[derive(Debug, PartialEq, Clone, Copy)]
pub struct Summary {
    /// Number of channels
    pub num_channels: usize,
    /// Samples in each channel
    pub num_samples_per_channel: usize,
    /// Sample rate in Hz
    pub sample_rate: u32,
    /// Bits per sample
    pub bit_depth: u16,
    /// Duration in seconds
    pub length_in_seconds: f64,
}

impl fmt::Display for Summary {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "|======================================|")?;
        writeln!(f, "Num Channels: {}", self.num_channels)?;
        writeln!(f, "Num Samples Per Channel: {}", self.num_samples_per_channel)?;
        writeln!(f, "Sample Rate: {}", self.sample_rate)?;
        writeln!(f, "Bit Depth: {}", self.bit_depth)?;
        writeln!(f, "Length in Seconds: {}", self.length_in_seconds)?;
        writeln!(f, "|======================================|")
    }
}
