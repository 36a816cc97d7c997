// framelapse-cli/src/cli.rs
//
// Defines the command-line argument structures using clap.

use clap::{Args, Parser, Subcommand};
use std::path::PathBuf;

#[derive(Parser, Debug)]
#[command(
    author,
    version,
    about = "Framelapse: image archive to video and timelapse converter",
    long_about = "Turns ZIP archives of still images into H.264 videos using ffmpeg via the framelapse-core library."
)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,

    /// Enable debug logging
    #[arg(short, long, global = true)]
    pub verbose: bool,

    /// Write a timestamped log file into this directory
    #[arg(long, global = true, value_name = "LOG_DIR")]
    pub log_dir: Option<PathBuf>,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Converts a ZIP archive of images into a video or timelapse
    Convert(ConvertArgs),
    /// Lists finished videos, newest first
    List(ListArgs),
    /// Deletes a finished video by file name
    Delete(DeleteArgs),
    /// Shows the built-in timelapse presets
    Presets(PresetsArgs),
}

/// Output directory shared by every subcommand that touches finished videos.
#[derive(Args, Debug, Clone)]
pub struct OutputDirArg {
    /// Directory where finished videos are stored
    #[arg(
        long,
        value_name = "DIR",
        env = "FRAMELAPSE_OUTPUT_DIR",
        default_value = "./outputs"
    )]
    pub output_dir: PathBuf,
}

#[derive(Args, Debug)]
pub struct ConvertArgs {
    /// ZIP archive containing the source images
    #[arg(value_name = "ARCHIVE")]
    pub archive: PathBuf,

    #[command(flatten)]
    pub output: OutputDirArg,

    /// Write the video to this file instead of a generated name in the output directory
    #[arg(short, long = "output", value_name = "FILE")]
    pub output_file: Option<PathBuf>,

    /// Output frame rate (1-120)
    #[arg(long, value_name = "FPS")]
    pub fps: Option<u32>,

    /// Real-world seconds between two photographs (0.1-86400)
    #[arg(long, value_name = "SECONDS")]
    pub interval: Option<f64>,

    /// Quality tier: low, medium or high (unknown values mean medium)
    #[arg(long, value_name = "TIER")]
    pub quality: Option<String>,

    /// Apply camera shake stabilization
    #[arg(long)]
    pub stabilize: bool,

    /// Transition at start and end: none or fade
    #[arg(long, value_name = "KIND")]
    pub transition: Option<String>,

    /// Start from a named preset; explicit flags override its values
    #[arg(long, value_name = "NAME")]
    pub preset: Option<String>,

    /// Print the result as JSON instead of a summary
    #[arg(long)]
    pub json: bool,

    /// Stream progress events as JSON lines instead of drawing a progress bar
    #[arg(long)]
    pub json_progress: bool,

    /// Maximum worker threads for frame processing
    #[arg(long, value_name = "N", env = "FRAMELAPSE_WORKERS")]
    pub workers: Option<usize>,

    /// Kill the encoder after this many seconds
    #[arg(long, value_name = "SECONDS")]
    pub timeout: Option<u64>,

    /// Root for temporary job workspaces
    #[arg(
        long,
        value_name = "DIR",
        env = "FRAMELAPSE_TEMP_DIR",
        default_value = "./temp"
    )]
    pub temp_dir: PathBuf,
}

#[derive(Args, Debug)]
pub struct ListArgs {
    #[command(flatten)]
    pub output: OutputDirArg,

    /// Print the listing as JSON
    #[arg(long)]
    pub json: bool,
}

#[derive(Args, Debug)]
pub struct DeleteArgs {
    /// File name of the video, as shown by `list`
    #[arg(value_name = "FILENAME")]
    pub filename: String,

    #[command(flatten)]
    pub output: OutputDirArg,
}

#[derive(Args, Debug)]
pub struct PresetsArgs {
    /// Print the presets as JSON
    #[arg(long)]
    pub json: bool,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_convert_defaults() {
        let cli = Cli::parse_from(["framelapse", "convert", "shots.zip"]);
        match cli.command {
            Commands::Convert(args) => {
                assert_eq!(args.archive, PathBuf::from("shots.zip"));
                assert!(args.output_file.is_none());
                assert!(args.fps.is_none());
                assert!(args.interval.is_none());
                assert!(!args.stabilize);
                assert!(!args.json);
            }
            other => panic!("Expected Convert command, got {other:?}"),
        }
        assert!(!cli.verbose);
    }

    #[test]
    fn test_parse_convert_with_flags() {
        let cli = Cli::parse_from([
            "framelapse",
            "--verbose",
            "convert",
            "shots.zip",
            "--fps",
            "30",
            "--interval",
            "300",
            "--quality",
            "high",
            "--stabilize",
            "--transition",
            "fade",
            "--output-dir",
            "videos",
            "--workers",
            "3",
        ]);
        assert!(cli.verbose);
        match cli.command {
            Commands::Convert(args) => {
                assert_eq!(args.fps, Some(30));
                assert_eq!(args.interval, Some(300.0));
                assert_eq!(args.quality.as_deref(), Some("high"));
                assert!(args.stabilize);
                assert_eq!(args.transition.as_deref(), Some("fade"));
                assert_eq!(args.output.output_dir, PathBuf::from("videos"));
                assert_eq!(args.workers, Some(3));
            }
            other => panic!("Expected Convert command, got {other:?}"),
        }
    }

    #[test]
    fn test_parse_delete() {
        let cli = Cli::parse_from(["framelapse", "delete", "video_1.mp4"]);
        match cli.command {
            Commands::Delete(args) => assert_eq!(args.filename, "video_1.mp4"),
            other => panic!("Expected Delete command, got {other:?}"),
        }
    }
}
