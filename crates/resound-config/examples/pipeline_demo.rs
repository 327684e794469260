//! Pipeline demo: build a configuration, validate it, and process a tone.
//!
//! Run with: cargo run -p resound-config --example pipeline_demo
//!
//! Set `RUST_LOG=debug` to see filter construction.

use resound_analysis::ResamplerKind;
use resound_config::{FilterConfig, PipelineConfig, ResamplerConfig, filter_params};
use resound_core::BandwidthMode;
use resound_io::{from_samples, to_samples};
use tracing_subscriber::EnvFilter;

fn main() -> Result<(), Box<dyn std::error::Error>> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .init();

    // --- Parameter ranges ---
    println!("=== Filter Parameters ===\n");
    for mode in [BandwidthMode::Octaves, BandwidthMode::Q] {
        println!("{mode:?}:");
        for desc in filter_params(mode) {
            println!(
                "  {:<10} {:>8.2} .. {:<8.2} default {}",
                desc.name, desc.min, desc.max, desc.default
            );
        }
    }

    // --- Configuration ---
    println!("\n=== Pipeline ===\n");
    let config = PipelineConfig::new("Telephone Band")
        .with_description("Band-limit to 300-3400 Hz and resample to 16 kHz")
        .with_filter(FilterConfig::new("highpass").with_order(4).with_cutoff(300.0))
        .with_filter(FilterConfig::new("lowpass").with_order(4).with_cutoff(3400.0))
        .with_filter(FilterConfig::new("!notch").with_cutoff(50.0))
        .with_resampler(
            ResamplerConfig::new(ResamplerKind::Lanczos)
                .with_quality(3)
                .with_target_rate(16000),
        );
    println!("{}", config.to_toml()?);

    let broken = config.clone().with_filter(FilterConfig::new("comb").with_order(5));
    if let Err(e) = broken.validate() {
        println!("Invalid variant: {e}\n");
    }

    // --- Processing ---
    println!("=== Processing ===\n");
    let mut pipeline = config.build()?;
    let rate = pipeline.format().sample_rate() as f32;

    println!("{:>8} {:>10} {:>10}", "Tone Hz", "In peak", "Out peak");
    for freq in [100.0f32, 1000.0, 3000.0, 6000.0] {
        pipeline.reset();
        let tone: Vec<f32> = (0..44100)
            .map(|n| 0.5 * (std::f32::consts::TAU * freq * n as f32 / rate).sin())
            .collect();
        let bytes = from_samples(&[tone.clone(), tone], pipeline.format())?;
        let out = to_samples(&pipeline.process_bytes(&bytes)?, pipeline.output_format())?;

        let settled = &out[0][out[0].len() / 2..];
        let peak = settled.iter().fold(0.0f32, |m, s| m.max(s.abs()));
        println!("{freq:>8.0} {:>10.3} {peak:>10.3}", 0.5);
    }

    println!("\nOutput format: {}", pipeline.output_format());
    Ok(())
}
