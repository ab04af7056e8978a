use std::fs::File;
use std::io::{BufReader, BufWriter, Write};
use std::path::{Path, PathBuf};

use clap::{ArgAction, Parser, Subcommand};
use color_eyre::eyre::WrapErr;
use console::style;
use huffpack::container::read_container_header;
use tracing::level_filters::LevelFilter;
use tracing::{debug, info, warn};
use tracing_indicatif::IndicatifLayer;
use tracing_subscriber::layer::SubscriberExt;
use tracing_subscriber::util::SubscriberInitExt;
use tracing_subscriber::EnvFilter;

mod progress;

use progress::{fmt_size, ProgressMonitor};

#[derive(Parser)]
#[command(version, about = "Compress files with a static huffman code", long_about = None)]
struct Cli {
    /// Log more, can be repeated. RUST_LOG takes precedence
    #[arg(short, long, action = ArgAction::Count, global = true)]
    verbose: u8,
    /// Hide the progress bar and only log warnings
    #[arg(short, long, global = true, conflicts_with = "verbose")]
    quiet: bool,
    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Compress FILE into a container
    Compress {
        file: PathBuf,
        /// Where to write the container
        #[arg(short, long, default_value = "output.bin")]
        output: PathBuf,
    },
    /// Decompress the container in FILE
    Decompress {
        file: PathBuf,
        /// Where to write the decompressed data, stdout if omitted
        #[arg(short, long)]
        output: Option<PathBuf>,
    },
    /// Print the code table stored in the header of FILE
    Inspect { file: PathBuf },
}

fn main() -> color_eyre::Result<()> {
    color_eyre::install()?;
    let cli = Cli::parse();
    init_logging(cli.verbose, cli.quiet)?;

    match cli.command {
        Command::Compress { file, output } => compress(&file, &output, cli.quiet),
        Command::Decompress { file, output } => decompress(&file, output.as_deref(), cli.quiet),
        Command::Inspect { file } => inspect(&file),
    }
}

fn init_logging(verbose: u8, quiet: bool) -> color_eyre::Result<()> {
    let level = match (quiet, verbose) {
        (true, _) => LevelFilter::WARN,
        (false, 0) => LevelFilter::INFO,
        (false, 1) => LevelFilter::DEBUG,
        (false, _) => LevelFilter::TRACE,
    };
    let filter = EnvFilter::builder()
        .with_default_directive(level.into())
        .from_env()
        .wrap_err("RUST_LOG is not a valid filter")?;

    // log lines go through the layer's writer so they don't tear progress bars
    let indicatif_layer = IndicatifLayer::new();
    tracing_subscriber::registry()
        .with(filter)
        .with(
            tracing_subscriber::fmt::layer()
                .with_target(false)
                .with_writer(indicatif_layer.get_stderr_writer()),
        )
        .with(indicatif_layer)
        .try_init()
        .wrap_err("failed to install the log subscriber")?;
    Ok(())
}

/// Open `path` for reading, wrapped in a progress bar sized to the file.
fn open_monitored(
    path: &Path,
    action: &'static str,
    quiet: bool,
) -> color_eyre::Result<ProgressMonitor<BufReader<File>>> {
    let file = File::open(path).wrap_err_with(|| format!("failed to open {}", path.display()))?;
    let size = file
        .metadata()
        .wrap_err_with(|| format!("failed to stat {}", path.display()))?
        .len();
    Ok(ProgressMonitor::new(BufReader::new(file), size, action, quiet))
}

fn compress(input: &Path, output: &Path, quiet: bool) -> color_eyre::Result<()> {
    let mut source = open_monitored(input, "compressed", quiet)?;
    let mut data = Vec::new();
    std::io::Read::read_to_end(&mut source, &mut data)
        .wrap_err_with(|| format!("failed to read {}", input.display()))?;

    let target = File::create(output)
        .wrap_err_with(|| format!("failed to create {}", output.display()))?;
    huffpack::encode_to(&data, BufWriter::new(target))
        .wrap_err_with(|| format!("failed to compress {}", input.display()))?;

    let written = std::fs::metadata(output)
        .wrap_err_with(|| format!("failed to stat {}", output.display()))?
        .len();
    if data.is_empty() {
        info!("wrote an empty container to {}", output.display());
        return Ok(());
    }
    let ratio = written as f64 / data.len() as f64 * 100.0;
    let ratio = if ratio < 100.0 {
        style(format!("{ratio:.1}%")).green()
    } else {
        style(format!("{ratio:.1}%")).yellow()
    };
    info!(
        "{} -> {} ({ratio} of the input) written to {}",
        fmt_size(data.len() as u64),
        fmt_size(written),
        output.display()
    );
    Ok(())
}

fn decompress(input: &Path, output: Option<&Path>, quiet: bool) -> color_eyre::Result<()> {
    let source = open_monitored(input, "decompressed", quiet)?;
    let data = huffpack::decode_from(source)
        .wrap_err_with(|| format!("failed to decompress {}", input.display()))?;

    match output {
        Some(path) => {
            let mut target = BufWriter::new(
                File::create(path).wrap_err_with(|| format!("failed to create {}", path.display()))?,
            );
            target
                .write_all(&data)
                .and_then(|()| target.flush())
                .wrap_err_with(|| format!("failed to write {}", path.display()))?;
            info!("wrote {} to {}", fmt_size(data.len() as u64), path.display());
        }
        None => {
            let mut stdout = std::io::stdout().lock();
            stdout
                .write_all(&data)
                .and_then(|()| stdout.flush())
                .wrap_err("failed to write to stdout")?;
            debug!("wrote {} to stdout", fmt_size(data.len() as u64));
        }
    }
    Ok(())
}

fn inspect(input: &Path) -> color_eyre::Result<()> {
    let file = File::open(input).wrap_err_with(|| format!("failed to open {}", input.display()))?;
    let file_len = file
        .metadata()
        .wrap_err_with(|| format!("failed to stat {}", input.display()))?
        .len();
    let header = read_container_header(BufReader::new(file))
        .wrap_err_with(|| format!("failed to read the header of {}", input.display()))?;

    let mut stdout = std::io::stdout().lock();
    writeln!(stdout, "{} {}", style("symbols:").bold(), header.symbol_count())?;
    for entry in header.entries() {
        let printable = if entry.symbol.is_ascii_graphic() {
            char::from(entry.symbol)
        } else {
            ' '
        };
        writeln!(
            stdout,
            "  {:#04x} {printable} {} ({} bits)",
            entry.symbol,
            style(entry.code).cyan(),
            entry.code.len()
        )?;
    }
    writeln!(
        stdout,
        "{} {}",
        style("original length:").bold(),
        header.original_symbol_count()
    )?;

    let header_len = header.serialized_len() as u64;
    writeln!(
        stdout,
        "{} {} header, {} payload",
        style("file:").bold(),
        fmt_size(header_len),
        fmt_size(file_len.saturating_sub(header_len))
    )?;
    if !header.code_table().is_prefix_free() {
        warn!("the codes in this header are not a prefix code, it can't be decoded");
    }
    Ok(())
}
