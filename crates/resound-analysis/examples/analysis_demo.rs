//! Analysis demo: windowed spectrum, window comparison, and resampling.
//!
//! Run with: cargo run -p resound-analysis --example analysis_demo
//!
//! Set `RUST_LOG=debug` to see resampler events.

use resound_analysis::spectrum::{magnitudes, peak_frequency, spectrum};
use resound_analysis::{AudioResampler, ResamplerKind, WindowType};
use std::f32::consts::PI;
use tracing_subscriber::EnvFilter;

fn main() -> Result<(), resound_analysis::Error> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| "info".into()))
        .init();

    let sample_rate = 48000.0;
    let fft_size = 4096;

    // --- Spectrum of a 1 kHz sine wave ---
    println!("=== Spectrum of a 1 kHz Sine Wave ===\n");

    let freq = 1000.0;
    let signal: Vec<f32> = (0..fft_size)
        .map(|i| (2.0 * PI * freq * i as f32 / sample_rate).sin())
        .collect();

    let window = WindowType::Hann;
    let bins = spectrum(&window.applied(&signal), sample_rate);
    let mags = magnitudes(&bins);
    let peak = peak_frequency(&bins).unwrap_or(0.0);
    let peak_bin = (peak * fft_size as f32 / sample_rate).round() as usize;

    println!("FFT size: {fft_size}, Window: {window}");
    println!("Peak frequency: {peak:.1} Hz");

    println!("\nSpectrum around peak:");
    println!("{:>8} {:>10} {:>10}", "Bin", "Freq (Hz)", "Magnitude");
    println!("{:->8} {:->10} {:->10}", "", "", "");
    let start = peak_bin.saturating_sub(4);
    let end = (peak_bin + 5).min(bins.len());
    for bin in &bins[start..end] {
        let k = (bin.frequency * fft_size as f32 / sample_rate).round() as usize;
        let marker = if k == peak_bin { " <--" } else { "" };
        println!(
            "{:>8} {:>10.1} {:>10.2}{}",
            k, bin.frequency, bin.amplitude, marker
        );
    }

    // --- Window comparison ---
    println!("\n=== Windows (amplitude estimate of a 0.5 tone) ===\n");
    println!("{:>20} {:>12} {:>12}", "Window", "Compensation", "Estimate");
    println!("{:->20} {:->12} {:->12}", "", "", "");

    // 1500 Hz sits exactly on bin 128 at 48 kHz / 4096
    let tone: Vec<f32> = (0..fft_size)
        .map(|i| 0.5 * (2.0 * PI * 1500.0 * i as f32 / sample_rate).sin())
        .collect();
    for window in WindowType::ALL {
        let mags = magnitudes(&spectrum(&window.applied(&tone), sample_rate));
        let estimate = mags[128] * 2.0 / fft_size as f32 / window.compensation() as f32;
        println!(
            "{:>20} {:>12.4} {:>12.4}",
            window.to_string(),
            window.compensation(),
            estimate
        );
    }

    // --- Resampling ---
    println!("\n=== Resampling 44.1 kHz -> 48 kHz ===\n");

    let input: Vec<f32> = (0..4410)
        .map(|i| (2.0 * PI * 440.0 * i as f32 / 44100.0).sin())
        .collect();
    for kind in ResamplerKind::ALL {
        let resampler = AudioResampler::new(kind, 3)?;
        let out = resampler.resample(&[input.as_slice()], 4800)?;
        let bins = spectrum(&WindowType::Hann.applied(&out[0][..fft_size]), sample_rate);
        println!(
            "{:>8}: {} -> {} samples, peak {:.1} Hz",
            kind.name(),
            input.len(),
            out[0].len(),
            peak_frequency(&bins).unwrap_or(0.0)
        );
    }

    let total: f32 = mags.iter().sum();
    tracing::info!(total_magnitude = total, "analysis demo finished");
    Ok(())
}
