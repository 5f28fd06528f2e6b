use anyhow::{Context, Result};
use hound::{SampleFormat, WavSpec, WavWriter};
use std::io::Cursor;

/// MIME type attached to every encoded chunk
pub const WAV_MIME_TYPE: &str = "audio/wav";

/// Encode stereo float channels as an in-memory 16-bit PCM WAV buffer
///
/// Output is the canonical 44-byte RIFF/WAVE header (PCM, 2 channels,
/// 16 bits per sample, block align 4) followed by interleaved samples
/// L0 R0 L1 R1 ..., each float scaled by 32767. Inputs are expected in
/// [-1.0, 1.0].
///
/// `left` and `right` must be equal length, which the accumulator
/// guarantees by construction.
pub fn encode_wav(left: &[f32], right: &[f32], sample_rate: u32) -> Result<Vec<u8>> {
    debug_assert_eq!(left.len(), right.len());

    let spec = WavSpec {
        channels: 2,
        sample_rate,
        bits_per_sample: 16,
        sample_format: SampleFormat::Int,
    };

    let mut buffer = Cursor::new(Vec::new());
    {
        let mut writer =
            WavWriter::new(&mut buffer, spec).context("Failed to create WAV writer")?;

        for (l, r) in left.iter().zip(right.iter()) {
            writer
                .write_sample((l * 32767.0) as i16)
                .context("Failed to write left sample")?;
            writer
                .write_sample((r * 32767.0) as i16)
                .context("Failed to write right sample")?;
        }

        writer.finalize().context("Failed to finalize WAV stream")?;
    }

    Ok(buffer.into_inner())
}
