//! Implementation of the 'presets' subcommand.

use crate::cli::PresetsArgs;
use crate::error::CliResult;
use crate::terminal;

use framelapse_core::format_duration_words;
use framelapse_core::presets::{PRESETS, Preset};
use serde_json::{Map, Value};

/// Presets keyed by their command-line name.
pub fn presets_json() -> CliResult<Value> {
    let mut map = Map::new();
    for preset in PRESETS {
        map.insert(preset.key.to_string(), serde_json::to_value(preset)?);
    }
    Ok(Value::Object(map))
}

fn describe(preset: &Preset) -> String {
    let mut text = format!(
        "every {}, {} fps, {} quality",
        format_duration_words(preset.capture_interval_secs as u64),
        preset.frame_rate,
        preset.quality
    );
    if preset.stabilize {
        text.push_str(", stabilized");
    }
    text
}

pub fn run_presets(args: PresetsArgs) -> CliResult<()> {
    if args.json {
        println!("{}", serde_json::to_string_pretty(&presets_json()?)?);
        return Ok(());
    }

    terminal::print_section("Presets");
    for preset in PRESETS {
        terminal::print_status(preset.key, preset.name, true);
        println!("  {:16} {}", "", describe(preset));
    }
    Ok(())
}
