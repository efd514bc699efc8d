use crate::error::{ModemError, Result};
use crate::WAV_HEADER_SIZE;

// RIFF/WAVE container for 8-bit mono PCM
//
// Offset  Size  Field
//   0      4    "RIFF"
//   4      4    chunk size = data size + 36
//   8      4    "WAVE"
//  12      4    "fmt "
//  16      4    16
//  20      2    1 (PCM)
//  22      2    channels
//  24      4    sample rate
//  28      4    byte rate
//  32      2    block align
//  34      2    bits per sample
//  36      4    "data"
//  40      4    data size
//  44      ..   samples
// All integers little-endian.

const FMT_CHUNK_SIZE: u32 = 16;
const FORMAT_PCM: u16 = 1;
const RIFF_OVERHEAD: u32 = 36;

/// Largest sample count whose RIFF chunk size still fits in 32 bits
pub const MAX_DATA_SIZE: usize = (u32::MAX - RIFF_OVERHEAD) as usize;

/// Data chunk size for `len` samples, or `DataTooLarge` if the container
/// could not describe it
pub fn data_size(len: usize) -> Result<u32> {
    if len > MAX_DATA_SIZE {
        return Err(ModemError::DataTooLarge(len));
    }
    u32::try_from(len).map_err(|_| ModemError::DataTooLarge(len))
}

/// Parsed or to-be-written 44-byte WAV header
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct WavHeader {
    pub chunk_size: u32,
    pub audio_format: u16,
    pub channels: u16,
    pub sample_rate: u32,
    pub byte_rate: u32,
    pub block_align: u16,
    pub bits_per_sample: u16,
    pub data_size: u32,
}

impl WavHeader {
    /// Header for `data_size` bytes of unsigned 8-bit mono samples
    pub fn pcm8_mono(sample_rate: u32, data_size: u32) -> Result<Self> {
        let chunk_size = data_size
            .checked_add(RIFF_OVERHEAD)
            .ok_or(ModemError::DataTooLarge(data_size as usize))?;
        let channels = 1u16;
        let bits_per_sample = 8u16;
        Ok(Self {
            chunk_size,
            audio_format: FORMAT_PCM,
            channels,
            sample_rate,
            byte_rate: sample_rate * channels as u32 * (bits_per_sample as u32 / 8),
            block_align: channels * bits_per_sample / 8,
            bits_per_sample,
            data_size,
        })
    }

    /// Total container length this header declares
    pub fn declared_len(&self) -> usize {
        self.chunk_size as usize + 8
    }

    /// Write the 44 header bytes field by field
    pub fn write_to(&self, buffer: &mut Vec<u8>) {
        // RIFF header
        buffer.extend_from_slice(b"RIFF");
        buffer.extend_from_slice(&self.chunk_size.to_le_bytes());
        buffer.extend_from_slice(b"WAVE");

        // fmt chunk
        buffer.extend_from_slice(b"fmt ");
        buffer.extend_from_slice(&FMT_CHUNK_SIZE.to_le_bytes());
        buffer.extend_from_slice(&self.audio_format.to_le_bytes());
        buffer.extend_from_slice(&self.channels.to_le_bytes());
        buffer.extend_from_slice(&self.sample_rate.to_le_bytes());
        buffer.extend_from_slice(&self.byte_rate.to_le_bytes());
        buffer.extend_from_slice(&self.block_align.to_le_bytes());
        buffer.extend_from_slice(&self.bits_per_sample.to_le_bytes());

        // data chunk
        buffer.extend_from_slice(b"data");
        buffer.extend_from_slice(&self.data_size.to_le_bytes());
    }

    /// Parse and check the header at the start of a container
    pub fn parse(data: &[u8]) -> Result<Self> {
        if data.len() < WAV_HEADER_SIZE {
            return Err(ModemError::MalformedContainer(format!(
                "{} bytes is shorter than the {}-byte header",
                data.len(),
                WAV_HEADER_SIZE
            )));
        }

        for (offset, tag) in [(0, b"RIFF"), (8, b"WAVE"), (12, b"fmt "), (36, b"data")] {
            if &data[offset..offset + 4] != tag {
                return Err(ModemError::MalformedContainer(format!(
                    "expected {:?} at offset {}, got {:?}",
                    String::from_utf8_lossy(tag),
                    offset,
                    String::from_utf8_lossy(&data[offset..offset + 4])
                )));
            }
        }

        let fmt_size = read_u32(data, 16);
        if fmt_size != FMT_CHUNK_SIZE {
            return Err(ModemError::MalformedContainer(format!(
                "fmt chunk size {} (expected {})",
                fmt_size, FMT_CHUNK_SIZE
            )));
        }

        let header = Self {
            chunk_size: read_u32(data, 4),
            audio_format: read_u16(data, 20),
            channels: read_u16(data, 22),
            sample_rate: read_u32(data, 24),
            byte_rate: read_u32(data, 28),
            block_align: read_u16(data, 32),
            bits_per_sample: read_u16(data, 34),
            data_size: read_u32(data, 40),
        };

        if header.chunk_size as u64 != header.data_size as u64 + RIFF_OVERHEAD as u64 {
            return Err(ModemError::MalformedContainer(format!(
                "chunk size {} does not match data size {}",
                header.chunk_size, header.data_size
            )));
        }

        Ok(header)
    }
}

fn read_u16(data: &[u8], offset: usize) -> u16 {
    u16::from_le_bytes([data[offset], data[offset + 1]])
}

fn read_u32(data: &[u8], offset: usize) -> u32 {
    u32::from_le_bytes([
        data[offset],
        data[offset + 1],
        data[offset + 2],
        data[offset + 3],
    ])
}

/// The container must be exactly as long as its header says
fn check_len(header: &WavHeader, actual: usize) -> Result<()> {
    let declared = header.declared_len();
    if actual != declared || actual != WAV_HEADER_SIZE + header.data_size as usize {
        return Err(ModemError::Encoding { declared, actual });
    }
    Ok(())
}

/// Wrap 8-bit PCM samples in a mono WAV container
///
/// The buffer is sized up front to `44 + samples.len()` and the result is
/// checked against the length the header declares before it is returned.
pub fn encode_wav(samples: &[u8], sample_rate: u32) -> Result<Vec<u8>> {
    let header = WavHeader::pcm8_mono(sample_rate, data_size(samples.len())?)?;

    let mut buffer = Vec::with_capacity(WAV_HEADER_SIZE + samples.len());
    header.write_to(&mut buffer);
    buffer.extend_from_slice(samples);
    check_len(&header, buffer.len())?;

    log::trace!(
        "encoded {} samples at {} Hz into {} byte container",
        samples.len(),
        sample_rate,
        buffer.len()
    );
    Ok(buffer)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_header_layout() {
        let wav = encode_wav(&[128, 200, 50], 8000).unwrap();
        assert_eq!(wav.len(), 47);
        assert_eq!(&wav[0..4], b"RIFF");
        assert_eq!(&wav[4..8], &39u32.to_le_bytes());
        assert_eq!(&wav[8..12], b"WAVE");
        assert_eq!(&wav[12..16], b"fmt ");
        assert_eq!(&wav[16..20], &16u32.to_le_bytes());
        assert_eq!(&wav[20..22], &1u16.to_le_bytes());
        assert_eq!(&wav[22..24], &1u16.to_le_bytes());
        assert_eq!(&wav[24..28], &8000u32.to_le_bytes());
        assert_eq!(&wav[28..32], &8000u32.to_le_bytes());
        assert_eq!(&wav[32..34], &1u16.to_le_bytes());
        assert_eq!(&wav[34..36], &8u16.to_le_bytes());
        assert_eq!(&wav[36..40], b"data");
        assert_eq!(&wav[40..44], &3u32.to_le_bytes());
        assert_eq!(&wav[44..], &[128, 200, 50]);
    }

    #[test]
    fn test_empty_samples_still_encode() {
        let wav = encode_wav(&[], 44100).unwrap();
        assert_eq!(wav.len(), WAV_HEADER_SIZE);
        let header = WavHeader::parse(&wav).unwrap();
        assert_eq!(header.data_size, 0);
        assert_eq!(header.chunk_size, 36);
    }

    #[test]
    fn test_parse_round_trip() {
        let wav = encode_wav(&vec![128u8; 1000], 11025).unwrap();
        let header = WavHeader::parse(&wav).unwrap();
        assert_eq!(header, WavHeader::pcm8_mono(11025, 1000).unwrap());
        assert_eq!(header.byte_rate, 11025);
        assert_eq!(header.block_align, 1);
        assert_eq!(header.declared_len(), wav.len());
    }

    #[test]
    fn test_parse_rejects_bad_tags() {
        let mut wav = encode_wav(&[1, 2, 3], 8000).unwrap();
        wav[8] = b'X';
        assert!(matches!(
            WavHeader::parse(&wav),
            Err(ModemError::MalformedContainer(_))
        ));
    }

    #[test]
    fn test_parse_rejects_short_input() {
        assert!(WavHeader::parse(b"RIFF").is_err());
    }

    #[test]
    fn test_parse_rejects_size_mismatch() {
        let mut wav = encode_wav(&[1, 2, 3], 8000).unwrap();
        wav[40..44].copy_from_slice(&4u32.to_le_bytes());
        assert!(WavHeader::parse(&wav).is_err());
    }

    #[test]
    fn test_length_check_catches_mismatch() {
        let header = WavHeader::pcm8_mono(8000, 3).unwrap();
        assert!(check_len(&header, 47).is_ok());
        assert!(matches!(
            check_len(&header, 46),
            Err(ModemError::Encoding {
                declared: 47,
                actual: 46
            })
        ));

        let mut inconsistent = header;
        inconsistent.chunk_size = 100;
        assert!(matches!(
            check_len(&inconsistent, 47),
            Err(ModemError::Encoding {
                declared: 108,
                actual: 47
            })
        ));
    }

    #[test]
    fn test_data_size_limit() {
        assert_eq!(data_size(2240).unwrap(), 2240);
        assert_eq!(data_size(MAX_DATA_SIZE).unwrap() as usize, MAX_DATA_SIZE);
        assert!(matches!(
            data_size(MAX_DATA_SIZE + 1),
            Err(ModemError::DataTooLarge(_))
        ));
    }

    #[test]
    fn test_chunk_size_overflow() {
        assert!(matches!(
            WavHeader::pcm8_mono(8000, u32::MAX - 10),
            Err(ModemError::DataTooLarge(_))
        ));
    }
}
