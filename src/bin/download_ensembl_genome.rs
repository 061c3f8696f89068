use std::process::ExitCode;

use clap::Parser;

use genome_downloader::cli;
use genome_downloader::config::DownloadArgs;
use genome_downloader::domain::Source;

#[derive(Parser)]
#[command(name = "download-ensembl-genome")]
#[command(about = "Download an Ensembl genome, transcriptome and annotation")]
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
    cli::finish(cli::run(Source::Ensembl, args.download, args.json))
}
