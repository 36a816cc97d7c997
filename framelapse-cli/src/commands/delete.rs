use crate::cli::DeleteArgs;
use crate::error::CliResult;
use crate::terminal;

use framelapse_core::library::delete_video;
use log::debug;

pub fn run_delete(args: DeleteArgs) -> CliResult<()> {
    let path = delete_video(&args.output.output_dir, &args.filename)?;
    debug!("Removed {}", path.display());
    terminal::print_success(&format!("Deleted {}", args.filename));
    Ok(())
}
