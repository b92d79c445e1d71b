//! Shader Variant Stripping Report
//!
//! Loads serialized pipeline settings and a candidate variant list, runs the
//! common stripping policy over every family found in the list and prints the
//! variants to compile along with per-rule strip counts.
//!
//! ```text
//! strip_report <settings.json> <variants.json> [--parallel]
//! RUST_LOG=trace strip_report data/settings.json data/variants.json
//! ```

use std::collections::BTreeSet;
use std::fs;

use anyhow::{Context, bail};
use shader_strip::{ConfigurationSnapshot, ShaderFamily, common_pipeline, variants_from_json};

fn main() -> anyhow::Result<()> {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    let args: Vec<String> = std::env::args().skip(1).collect();
    let parallel = args.iter().any(|a| a == "--parallel");
    let paths: Vec<&String> = args.iter().filter(|a| !a.starts_with("--")).collect();

    let [settings_path, variants_path] = paths.as_slice() else {
        bail!("usage: strip_report <settings.json> <variants.json> [--parallel]");
    };

    let settings = fs::read_to_string(settings_path)
        .with_context(|| format!("reading settings from {settings_path}"))?;
    let config = ConfigurationSnapshot::from_json(&settings).with_context(|| {
        format!("invalid render pipeline settings in {settings_path}")
    })?;

    let variants_json = fs::read_to_string(variants_path)
        .with_context(|| format!("reading variants from {variants_path}"))?;
    let variants = variants_from_json(&variants_json)
        .with_context(|| format!("invalid variant list in {variants_path}"))?;

    let families: BTreeSet<ShaderFamily> = variants.iter().map(|v| v.family()).collect();
    log::info!(
        "Loaded {} variants across {} shader families",
        variants.len(),
        families.len()
    );

    let pipeline = common_pipeline(families);
    let outcome = if parallel {
        pipeline.evaluate_parallel(variants, &config)
    } else {
        pipeline.evaluate(variants, &config)
    };

    println!("Kept variants:");
    for variant in &outcome.kept {
        println!("  {variant}");
    }
    println!();
    print!("{}", outcome.report);

    Ok(())
}
