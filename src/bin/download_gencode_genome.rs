use std::process::ExitCode;

use clap::Parser;

use genome_downloader::cli;
use genome_downloader::config::DownloadArgs;
use genome_downloader::domain::Source;

#[derive(Parser)]
#[command(name = "download-gencode-genome")]
#[command(about = "Download a GENCODE genome, transcriptome and annotation")]
#[command(version)]
struct Cli {
    #[command(flatten)]
    download: DownloadArgs,

    #[arg(long, help = "Print the result as JSON")]
    json: bool,
}

fn main() -> ExitCode {
    cli::init_tracing();
    let args = Cli::parse();
    cli::finish(cli::run(Source::Gencode, args.download, args.json))
}
