//! Implementation of the 'convert' subcommand.
//!
//! Builds a conversion request from the flags (optionally seeded by a
//! preset), checks it before anything touches the disk, runs the pipeline and
//! reports the resulting video.

use crate::cli::ConvertArgs;
use crate::error::{CliErrorContext, CliResult};
use crate::progress::ProgressBarHandler;
use crate::terminal;

use framelapse_core::events::json_handler::JsonProgressHandler;
use framelapse_core::file_logging::FileLoggingHandler;
use framelapse_core::library;
use framelapse_core::presets::find_preset;
use framelapse_core::utils::get_filename_safe;
use framelapse_core::{
    ConversionKind, ConversionRequest, CoreConfigBuilder, CoreError, EventDispatcher, Pipeline,
    QualityTier, TimelapseMetrics, Transition, format_bytes, format_duration,
    format_duration_words,
};

use log::{debug, info};
use serde_json::json;

use std::fs;
use std::path::{Path, PathBuf};
use std::sync::Arc;
use std::time::{Duration, Instant};

/// Builds the request: preset values first, then explicit flags on top.
pub fn build_request(args: &ConvertArgs, output_path: PathBuf) -> CliResult<ConversionRequest> {
    let mut request = ConversionRequest::new(args.archive.clone(), output_path);

    if let Some(name) = &args.preset {
        let preset = find_preset(name)
            .ok_or_else(|| CoreError::Validation(format!("Unknown preset '{name}'")))?;
        debug!("Applying preset '{}'", preset.key);
        preset.apply_to(&mut request);
    }

    if let Some(fps) = args.fps {
        request.frame_rate = fps;
    }
    if let Some(interval) = args.interval {
        request.capture_interval_secs = interval;
    }
    if let Some(quality) = &args.quality {
        request.quality = QualityTier::parse_lenient(quality);
    }
    if args.stabilize {
        request.stabilize = true;
    }
    if let Some(transition) = &args.transition {
        request.transition = Transition::parse_lenient(transition);
    }

    Ok(request)
}

/// Rejects archives whose name does not end in `.zip`.
pub fn check_archive_extension(archive: &Path) -> CliResult<()> {
    let is_zip = archive
        .extension()
        .is_some_and(|ext| ext.eq_ignore_ascii_case("zip"));
    if is_zip {
        Ok(())
    } else {
        Err(CoreError::Validation(format!(
            "Only ZIP archives are accepted: {}",
            archive.display()
        )))
    }
}

fn output_path_for(args: &ConvertArgs) -> PathBuf {
    match &args.output_file {
        Some(path) => path.clone(),
        None => args.output.output_dir.join(library::output_file_name()),
    }
}

fn build_dispatcher(args: &ConvertArgs) -> EventDispatcher {
    let mut dispatcher = EventDispatcher::new();
    dispatcher.add_handler(Arc::new(FileLoggingHandler::new()));
    if args.json_progress {
        dispatcher.add_handler(Arc::new(JsonProgressHandler::new()));
    } else if args.json {
        dispatcher.add_handler(Arc::new(ProgressBarHandler::hidden()));
    } else {
        dispatcher.add_handler(Arc::new(ProgressBarHandler::new()));
    }
    dispatcher
}

fn display_request(request: &ConversionRequest) {
    terminal::print_section("Conversion");
    terminal::print_status("Archive", &request.source_archive.display().to_string(), false);
    terminal::print_status("Output", &request.output_path.display().to_string(), false);
    terminal::print_status("Type", request.kind().label(), false);
    terminal::print_status("Frame rate", &format!("{} fps", request.frame_rate), false);
    terminal::print_status("Quality", request.quality.as_str(), false);
    terminal::print_status("Stabilize", if request.stabilize { "yes" } else { "no" }, false);
    terminal::print_status("Transition", request.transition.as_str(), false);
}

fn display_summary(
    request: &ConversionRequest,
    metrics: &TimelapseMetrics,
    size: u64,
    elapsed: Duration,
) {
    let kind = request.kind();
    terminal::print_section(&format!("{} complete", kind.label()));
    terminal::print_success(&format!("Created {}", request.output_path.display()));
    terminal::print_status("Frames", &metrics.frame_count.to_string(), false);
    terminal::print_status(
        "Duration",
        &format!("{:.2}s", metrics.video_duration_seconds),
        true,
    );
    terminal::print_status("Frame rate", &format!("{} fps", metrics.frame_rate), false);
    terminal::print_status("Dimensions", &metrics.geometry.to_string(), false);
    terminal::print_status("Size", &format_bytes(size), false);

    if kind == ConversionKind::Timelapse {
        terminal::print_status(
            "Real duration",
            &format_duration_words(metrics.real_duration_seconds),
            false,
        );
        terminal::print_status("Speedup", &format!("{}x", metrics.speedup_factor), true);
        terminal::print_status(
            "Interval",
            &format!("{}s", request.capture_interval_secs),
            false,
        );
    }

    terminal::print_status("Total time", &format_duration(elapsed.as_secs_f64()), false);
}

fn result_json(
    request: &ConversionRequest,
    metrics: &TimelapseMetrics,
    size: u64,
) -> CliResult<serde_json::Value> {
    let filename = get_filename_safe(&request.output_path)?;
    Ok(json!({
        "success": true,
        "type": request.kind().label().to_lowercase(),
        "filename": filename,
        "outputPath": request.output_path.display().to_string(),
        "size": size,
        "metadata": metrics,
    }))
}

/// Runs one conversion and reports it on stdout.
pub fn run_convert(args: ConvertArgs) -> CliResult<()> {
    let started = Instant::now();

    let request = build_request(&args, output_path_for(&args))?;
    request.validate()?;
    check_archive_extension(&request.source_archive)?;

    let mut builder = CoreConfigBuilder::new()
        .temp_dir(args.temp_dir.clone())
        .output_dir(args.output.output_dir.clone());
    if let Some(workers) = args.workers {
        builder = builder.max_workers(workers);
    }
    if let Some(seconds) = args.timeout {
        builder = builder.encode_timeout(Duration::from_secs(seconds));
    }
    let config = builder.build();
    config.validate()?;

    framelapse_core::check_dependency("ffmpeg")?;
    library::ensure_directories(&config)
        .cli_context("Failed to prepare output and temp directories")?;

    let quiet = args.json || args.json_progress;
    if !quiet {
        display_request(&request);
    }
    info!(
        "Converting {} ({} mode)",
        request.source_archive.display(),
        request.kind().label()
    );

    let pipeline = Pipeline::standard(config).with_dispatcher(build_dispatcher(&args));
    let metrics = pipeline.convert(&request)?;

    let size = fs::metadata(&request.output_path)
        .map(|m| m.len())
        .cli_with_context(|| format!("Cannot read {}", request.output_path.display()))?;

    if args.json {
        println!("{}", serde_json::to_string_pretty(&result_json(&request, &metrics, size)?)?);
    } else if !args.json_progress {
        display_summary(&request, &metrics, size, started.elapsed());
    }

    Ok(())
}
