//! Channel downmix and 16 kHz resampling for the transcriber.
//!
//! Whisper consumes **16 kHz mono `f32`**; microphone hardware rarely
//! delivers that natively.  [`whisper_input`] performs both conversion
//! steps on one [`AudioChunk`].
//!
//! The resampler is linear interpolation — fast and dependency-free.  For
//! higher fidelity swap the inner loop for `rubato` (`SincFixedIn`), which
//! is already listed in `Cargo.toml` as the upgrade path.

use super::capture::AudioChunk;

/// Target rate required by the transcriber.
pub const WHISPER_SAMPLE_RATE: u32 = 16_000;

// ---------------------------------------------------------------------------
// downmix_mono
// ---------------------------------------------------------------------------

/// Average interleaved channels down to mono.
///
/// Output length is `samples.len() / channels`; mono input is returned
/// unchanged (as an owned copy) and zero channels yields an empty vector.
pub fn downmix_mono(samples: &[f32], channels: u16) -> Vec<f32> {
    match channels {
        0 => Vec::new(),
        1 => samples.to_vec(),
        n => {
            let n = usize::from(n);
            samples
                .chunks_exact(n)
                .map(|frame| frame.iter().sum::<f32>() / n as f32)
                .collect()
        }
    }
}

// ---------------------------------------------------------------------------
// resample_16k
// ---------------------------------------------------------------------------

/// Linearly resample mono samples from `source_rate` to 16 kHz.
pub fn resample_16k(samples: &[f32], source_rate: u32) -> Vec<f32> {
    if source_rate == WHISPER_SAMPLE_RATE {
        return samples.to_vec();
    }
    if samples.is_empty() {
        return Vec::new();
    }

    let step = source_rate as f64 / WHISPER_SAMPLE_RATE as f64;
    let output_len = (samples.len() as f64 / step).ceil() as usize;
    let mut output = Vec::with_capacity(output_len);

    let mut pos = 0.0_f64;
    for _ in 0..output_len {
        let idx = pos as usize;
        let frac = (pos - idx as f64) as f32;

        let sample = match (samples.get(idx), samples.get(idx + 1)) {
            (Some(&a), Some(&b)) => a * (1.0 - frac) + b * frac,
            (Some(&a), None) => a,
            _ => 0.0,
        };
        output.push(sample);
        pos += step;
    }

    output
}

// ---------------------------------------------------------------------------
// whisper_input
// ---------------------------------------------------------------------------

/// Convert one raw microphone chunk into transcriber-ready samples
/// (mono, 16 kHz).
pub fn whisper_input(chunk: &AudioChunk) -> Vec<f32> {
    let mono = downmix_mono(&chunk.samples, chunk.channels);
    resample_16k(&mono, chunk.sample_rate)
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
