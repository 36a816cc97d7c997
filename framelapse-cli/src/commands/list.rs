//! Implementation of the 'list' subcommand.

use crate::cli::ListArgs;
use crate::error::CliResult;
use crate::terminal;

use framelapse_core::format_bytes;
use framelapse_core::library::{VideoEntry, list_videos};

/// One line of the human-readable listing.
pub fn format_entry(entry: &VideoEntry) -> String {
    format!(
        "{}  {:>12}  {}",
        entry.created.format("%Y-%m-%d %H:%M:%S"),
        format_bytes(entry.size),
        entry.filename
    )
}

pub fn run_list(args: ListArgs) -> CliResult<()> {
    let dir = &args.output.output_dir;
    let videos = list_videos(dir)?;

    if args.json {
        println!("{}", serde_json::to_string_pretty(&videos)?);
        return Ok(());
    }

    terminal::print_section("Videos");
    if videos.is_empty() {
        println!("No videos in {}", dir.display());
        return Ok(());
    }
    for entry in &videos {
        println!("{}", format_entry(entry));
    }
    Ok(())
}
