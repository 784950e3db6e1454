use std::path::PathBuf;

use clap::Parser;
use publicizer::DEFAULT_OUTPUT_SUBDIRECTORY;

/// publicizer - make every type, method and field of .NET assemblies public
#[derive(Debug, Parser)]
#[command(name = "publicizer", version, about, long_about = None)]
pub struct Cli {
    /// Assembly to publicize, or a directory searched recursively for .dll and .exe files.
    #[arg(value_name = "PATH")]
    pub path: PathBuf,

    /// Appended to the file name of every output, before the extension.
    #[arg(long, default_value = "")]
    pub suffix: String,

    /// Directory next to each input that receives its publicized copy.
    #[arg(short, long, value_name = "DIR", default_value = DEFAULT_OUTPUT_SUBDIRECTORY)]
    pub output_subdirectory: String,

    /// Keep going after a failed input and never wait for Enter.
    #[arg(short, long)]
    pub quiet: bool,

    /// Enable verbose (debug-level) logging output.
    #[arg(short, long)]
    pub verbose: bool,

    /// Emit the per-file reports as JSON instead of human-readable text.
    #[arg(long)]
    pub json: bool,

    /// Pause before retrying a failed delete or move of the output.
    #[arg(long, value_name = "MS", default_value_t = 100)]
    pub retry_delay_ms: u64,

    /// Pause after releasing the input before replacing the output (default: 100 on Windows, 0 elsewhere).
    #[arg(long, value_name = "MS")]
    pub settle_ms: Option<u64>,
}
