//! Stand-in voice track used when no speech service answers.

use hound::{SampleFormat, WavSpec, WavWriter};
use std::io::Cursor;

const SAMPLE_RATE: u32 = 16_000;
const WORDS_PER_MINUTE: f32 = 150.0;
const MAX_SECONDS: f32 = 120.0;

/// How long `text` takes to say at a relaxed speaking pace.
pub fn spoken_seconds(text: &str) -> f32 {
    let words = text.split_whitespace().count() as f32;
    (words / WORDS_PER_MINUTE * 60.0).clamp(1.0, MAX_SECONDS)
}

/// Mono 16-bit PCM silence.
pub fn silent_wav(seconds: f32) -> Result<Vec<u8>, hound::Error> {
    let spec = WavSpec {
        channels: 1,
        sample_rate: SAMPLE_RATE,
        bits_per_sample: 16,
        sample_format: SampleFormat::Int,
    };
    let samples = (seconds.max(0.0) * SAMPLE_RATE as f32).round() as u32;

    let mut buffer = Vec::new();
    {
        let mut writer = WavWriter::new(Cursor::new(&mut buffer), spec)?;
        for _ in 0..samples {
            writer.write_sample(0i16)?;
        }
        writer.finalize()?;
    }
    Ok(buffer)
}
