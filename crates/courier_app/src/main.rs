mod platform;

use std::path::PathBuf;
use std::process::ExitCode;

use clap::{Parser, Subcommand, ValueEnum};

#[derive(Parser)]
#[command(name = "courier", about = "Client for a remote GUI-to-HTML compilation service")]
pub(crate) struct Cli {
    /// Backend base URL; overrides the stored value and is persisted for
    /// later runs
    #[arg(long, global = true)]
    pub(crate) api: Option<String>,

    /// Directory where response artifacts and client config are stored
    #[arg(long, global = true, default_value = "artifacts")]
    pub(crate) artifacts_dir: PathBuf,

    /// Where log output goes
    #[arg(long, global = true, value_enum, default_value_t = LogArg::File)]
    pub(crate) log: LogArg,

    /// Log at debug level
    #[arg(long, global = true)]
    pub(crate) verbose: bool,

    #[command(subcommand)]
    pub(crate) command: Commands,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub(crate) enum LogArg {
    File,
    Terminal,
    Both,
}

#[derive(Subcommand)]
pub(crate) enum Commands {
    /// Upload a .gui file and store the compiled HTML
    Compile {
        /// The .gui source file
        file: Option<PathBuf>,
    },
    /// Probe the backend liveness endpoint
    Health,
    /// Ask the backend to fetch a site's HTML
    FetchSite {
        /// The site URL to fetch
        url: String,
    },
    /// Ask the backend to analyze a site
    Analyze {
        /// The site URL to analyze
        url: String,
    },
    /// Generate HTML and .gui source from a UI screenshot
    Image {
        /// The screenshot file
        file: Option<PathBuf>,

        /// Ask the backend to run OCR on the image
        #[arg(long)]
        ocr: bool,
    },
}

fn main() -> ExitCode {
    let cli = Cli::parse();
    platform::run_app(cli)
}
