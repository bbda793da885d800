mod platform;

use std::path::PathBuf;

use clap::{Parser, ValueEnum, ValueHint};

#[derive(Parser, Debug)]
#[command(author, version, about = "Customer segmentation analysis console", long_about = None)]
struct Cli {
    /// Segmentation server base URL
    #[arg(long, default_value = "http://127.0.0.1:5000")]
    base_url: String,

    /// CSV/XLSX/XLS file to submit as the data source
    #[arg(long, value_hint = ValueHint::FilePath, conflicts_with = "sample")]
    file: Option<PathBuf>,

    /// Named sample dataset known to the server
    #[arg(long)]
    sample: Option<String>,

    /// Directory for exported reports and run history
    #[arg(long, default_value = "reports")]
    output_dir: PathBuf,

    /// Where log output goes
    #[arg(long, value_enum, default_value_t = LogArg::File)]
    log: LogArg,
}

#[derive(Debug, Clone, Copy, ValueEnum)]
enum LogArg {
    File,
    Terminal,
    Both,
}

fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();
    platform::run_app(cli)
}
