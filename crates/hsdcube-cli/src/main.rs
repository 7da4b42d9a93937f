use std::fs::{self, File};
use std::io::{BufWriter, Write};
use std::path::{Path, PathBuf};
use std::process::ExitCode;
use std::time::Instant;

use anyhow::Context;
use clap::{Parser, Subcommand};
use glob::glob;
use tracing::{debug, info};

use hsdcube_core::{
    CaptureFile, DecodedCapture, LayoutInfo, LoadError, NdviError, NdviStats, load_capture,
    make_capture_report, ndvi, supported_layouts, write_ndvi_raw, write_raw_dump,
};

mod logger;

const LONG_VERSION: &str = concat!(
    env!("CARGO_PKG_VERSION"),
    " (commit ",
    env!("HSDCUBE_BUILD_COMMIT"),
    ", ",
    env!("HSDCUBE_BUILD_DATE"),
    ")"
);

/// Default red and near-infrared bands for 141-band captures.
const DEFAULT_RED_BAND: usize = 30;
const DEFAULT_NIR_BAND: usize = 60;

#[derive(Parser, Debug)]
#[command(name = "hsdcube")]
#[command(version, long_version = LONG_VERSION)]
#[command(
    about = "Decoder for raw hyperspectral camera captures (.hsd / .dat) with NDVI export.",
    long_about = None,
    after_help = "Examples:\n  hsdcube inspect capture.hsd --stdout --pretty\n  hsdcube ndvi capture.hsd --nir 60 --red 30 -o ndvi.f32\n  hsdcube dump capture.hsd -o cube.raw"
)]
struct Cli {
    /// Log progress to stderr (RUST_LOG overrides)
    #[arg(short, long, global = true)]
    verbose: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand, Debug)]
enum Commands {
    /// List the supported capture layouts (detected by exact file size).
    Formats {
        /// Print the layouts as JSON
        #[arg(long)]
        json: bool,
    },
    /// Decode a capture and write a JSON summary report.
    Inspect {
        /// Path to a .hsd or .dat capture
        input: PathBuf,

        /// Output report path (JSON)
        #[arg(short = 'o', long, required_unless_present = "stdout")]
        report: Option<PathBuf>,

        /// Write JSON report to stdout
        #[arg(long, conflicts_with = "report")]
        stdout: bool,

        /// Pretty-print JSON output
        #[arg(long)]
        pretty: bool,

        /// Compact JSON output (default)
        #[arg(long)]
        compact: bool,

        /// Suppress non-error output
        #[arg(long)]
        quiet: bool,
    },
    /// Compute NDVI from two bands and write it as raw little-endian f32.
    Ndvi {
        /// Path to a .hsd or .dat capture
        input: PathBuf,

        /// Near-infrared band index
        #[arg(long, default_value_t = DEFAULT_NIR_BAND)]
        nir: usize,

        /// Red band index
        #[arg(long, default_value_t = DEFAULT_RED_BAND)]
        red: usize,

        /// Output raster path (height x width f32, row-major)
        #[arg(short = 'o', long)]
        output: PathBuf,

        /// Suppress non-error output
        #[arg(long)]
        quiet: bool,
    },
    /// Write the decoded cube back as a headerless raw dump.
    Dump {
        /// Path to a .hsd or .dat capture
        input: PathBuf,

        /// Output dump path
        #[arg(short = 'o', long)]
        output: PathBuf,

        /// Suppress non-error output
        #[arg(long)]
        quiet: bool,
    },
}

fn main() -> ExitCode {
    let cli = Cli::parse();
    logger::init(cli.verbose);

    let result = match cli.command {
        Commands::Formats { json } => cmd_formats(json),
        Commands::Inspect {
            input,
            report,
            stdout,
            pretty,
            compact,
            quiet,
        } => cmd_inspect(input, report, stdout, pretty, compact, quiet),
        Commands::Ndvi {
            input,
            nir,
            red,
            output,
            quiet,
        } => cmd_ndvi(input, nir, red, output, quiet),
        Commands::Dump {
            input,
            output,
            quiet,
        } => cmd_dump(input, output, quiet),
    };

    match result {
        Ok(()) => ExitCode::SUCCESS,
        Err(err) => {
            eprintln!("error: {}", err.message);
            if let Some(hint) = err.hint {
                eprintln!("hint: {}", hint);
            }
            ExitCode::from(2)
        }
    }
}

#[derive(Debug)]
struct CliError {
    message: String,
    hint: Option<String>,
}

impl CliError {
    fn new(message: impl Into<String>, hint: Option<String>) -> Self {
        Self {
            message: message.into(),
            hint,
        }
    }
}

impl std::fmt::Display for CliError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.message)
    }
}

impl std::error::Error for CliError {}

impl From<anyhow::Error> for CliError {
    fn from(err: anyhow::Error) -> Self {
        CliError::new(format!("{:#}", err), None)
    }
}

impl From<LoadError> for CliError {
    fn from(err: LoadError) -> Self {
        let hint = err.unsupported_length().map(|_| {
            let sizes = supported_layouts()
                .iter()
                .map(|layout| layout.total_file_size.to_string())
                .collect::<Vec<_>>()
                .join(", ");
            format!("supported sizes (bytes): {sizes}; see `hsdcube formats`")
        });
        CliError::new(err.to_string(), hint)
    }
}

impl From<NdviError> for CliError {
    fn from(err: NdviError) -> Self {
        let NdviError::InvalidBandIndex { depth, .. } = &err;
        let hint = format!("band indices must be in 0..{depth}");
        CliError::new(err.to_string(), Some(hint))
    }
}

fn cmd_formats(json: bool) -> Result<(), CliError> {
    let layouts: Vec<LayoutInfo> = supported_layouts()
        .iter()
        .map(|layout| {
            let header = layout
                .header_len_for(layout.total_file_size)
                .unwrap_or_default();
            LayoutInfo::new(layout, header)
        })
        .collect();

    if json {
        let out = serde_json::to_string_pretty(&layouts).context("JSON serialization failed")?;
        println!("{}", out);
        return Ok(());
    }

    println!(
        "{:<16} {:>12} {:>6} {:>6} {:>6} {:>7} {:>9} {:>10}",
        "camera", "bytes", "width", "height", "bands", "sample", "downcast", "header"
    );
    for info in layouts {
        println!(
            "{:<16} {:>12} {:>6} {:>6} {:>6} {:>7} {:>9} {:>10}",
            info.camera.slug(),
            info.total_file_size,
            info.width,
            info.height,
            info.depth,
            info.sample_width.name(),
            if info.needs_8bit_downcast { "u8" } else { "-" },
            info.header_bytes
        );
    }
    Ok(())
}

fn cmd_inspect(
    input: PathBuf,
    report: Option<PathBuf>,
    stdout: bool,
    pretty: bool,
    compact: bool,
    quiet: bool,
) -> Result<(), CliError> {
    let resolved_input = resolve_input_path(&input)?;
    validate_input_file(&resolved_input)?;
    let report = if stdout {
        None
    } else {
        let path = report.ok_or_else(|| {
            CliError::new(
                "missing output path",
                Some("use -o/--report or --stdout".to_string()),
            )
        })?;
        ensure_output_differs(&resolved_input, &path)?;
        Some(path)
    };

    let (capture_file, capture) = open_and_decode(&resolved_input)?;
    let rep = make_capture_report(
        &resolved_input.display().to_string(),
        &capture,
        capture_file.modified(),
    );
    let json = serialize_report(&rep, pretty, compact)?;

    let Some(report) = report else {
        print!("{}", json);
        return Ok(());
    };

    create_parent_dir(&report)?;
    fs::write(&report, json)
        .with_context(|| format!("Failed to write report: {}", report.display()))?;
    info!(path = %report.display(), "report written");
    if !quiet {
        eprintln!("OK: report written -> {}", report.display());
    }
    Ok(())
}

fn cmd_ndvi(
    input: PathBuf,
    nir: usize,
    red: usize,
    output: PathBuf,
    quiet: bool,
) -> Result<(), CliError> {
    let resolved_input = resolve_input_path(&input)?;
    validate_input_file(&resolved_input)?;
    ensure_output_differs(&resolved_input, &output)?;

    let (_, capture) = open_and_decode(&resolved_input)?;
    let started = Instant::now();
    let raster = ndvi(&capture.cube, nir, red)?;
    debug!(elapsed_ms = started.elapsed().as_millis() as u64, "ndvi computed");

    let written = write_with(&output, |writer| {
        write_ndvi_raw(&raster, writer).map_err(anyhow::Error::from)
    })?;
    info!(path = %output.display(), bytes = written, "ndvi raster written");

    if !quiet {
        if let Some(stats) = NdviStats::from_raster(&raster) {
            eprintln!(
                "NDVI (nir={}, red={}): min {:.4}  max {:.4}  mean {:.4}",
                nir, red, stats.min, stats.max, stats.mean
            );
        }
        eprintln!(
            "OK: ndvi {}x{} f32 written -> {}",
            capture.height,
            capture.width,
            output.display()
        );
    }
    Ok(())
}

fn cmd_dump(input: PathBuf, output: PathBuf, quiet: bool) -> Result<(), CliError> {
    let resolved_input = resolve_input_path(&input)?;
    validate_input_file(&resolved_input)?;
    ensure_output_differs(&resolved_input, &output)?;

    let (_, capture) = open_and_decode(&resolved_input)?;
    let interleave = capture.layout.interleave;
    let written = write_with(&output, |writer| {
        write_raw_dump(&capture.cube, interleave, writer).map_err(anyhow::Error::from)
    })?;
    info!(path = %output.display(), bytes = written, "raw dump written");

    if !quiet {
        eprintln!(
            "OK: {} bytes ({:?}, {}) written -> {}",
            written,
            interleave,
            capture.cube.sample_width().name(),
            output.display()
        );
    }
    Ok(())
}

fn open_and_decode(input: &Path) -> Result<(CaptureFile, DecodedCapture), CliError> {
    let capture_file = CaptureFile::open(input).map_err(LoadError::from)?;
    let layout = capture_file.layout();
    info!(
        camera = %layout.camera,
        bytes = layout.total_file_size,
        "layout resolved"
    );

    let started = Instant::now();
    let capture = load_capture(&capture_file)?;
    info!(
        height = capture.height,
        width = capture.width,
        bands = capture.cube.depth(),
        header_bytes = capture.header_len,
        elapsed_ms = started.elapsed().as_millis() as u64,
        "capture decoded"
    );
    Ok((capture_file, capture))
}

fn write_with<F>(output: &Path, write: F) -> Result<u64, CliError>
where
    F: FnOnce(&mut BufWriter<File>) -> anyhow::Result<u64>,
{
    create_parent_dir(output)?;
    let file = File::create(output)
        .with_context(|| format!("Failed to create output file: {}", output.display()))?;
    let mut writer = BufWriter::new(file);
    let written =
        write(&mut writer).with_context(|| format!("Failed to write: {}", output.display()))?;
    writer
        .flush()
        .with_context(|| format!("Failed to write: {}", output.display()))?;
    Ok(written)
}

fn create_parent_dir(path: &Path) -> Result<(), CliError> {
    if let Some(parent) = path.parent() {
        if !parent.as_os_str().is_empty() {
            fs::create_dir_all(parent).with_context(|| {
                format!("Failed to create output directory: {}", parent.display())
            })?;
        }
    }
    Ok(())
}

fn serialize_report(
    rep: &hsdcube_core::CaptureReport,
    pretty: bool,
    compact: bool,
) -> Result<String, CliError> {
    if pretty && compact {
        return Err(CliError::new(
            "cannot use --pretty and --compact together",
            Some("choose one output format".to_string()),
        ));
    }
    if pretty {
        serde_json::to_string_pretty(rep)
            .context("JSON serialization failed")
            .map_err(Into::into)
    } else {
        serde_json::to_string(rep)
            .context("JSON serialization failed")
            .map_err(Into::into)
    }
}

/// Reject an output path that resolves to the input capture.
fn ensure_output_differs(input: &Path, output: &Path) -> Result<(), CliError> {
    let input_abs = fs::canonicalize(input)
        .with_context(|| format!("Failed to resolve input path: {}", input.display()))?;
    let output_dir = match output.parent() {
        Some(parent) if !parent.as_os_str().is_empty() => parent,
        _ => Path::new("."),
    };
    // A missing output directory will be created, so it cannot hold the input.
    let Ok(output_dir) = fs::canonicalize(output_dir) else {
        return Ok(());
    };
    let file_name = output
        .file_name()
        .ok_or_else(|| anyhow::anyhow!("Invalid output path: {}", output.display()))?;
    if output_dir.join(file_name) == input_abs {
        return Err(CliError::new(
            format!("output path must differ from input: {}", output.display()),
            Some("choose a different output path".to_string()),
        ));
    }
    Ok(())
}

fn validate_input_file(input: &Path) -> Result<(), CliError> {
    if !input.exists() {
        return Err(CliError::new(
            format!("input file not found: {}", input.display()),
            Some("use a .hsd or .dat capture file".to_string()),
        ));
    }
    if !input.is_file() {
        return Err(CliError::new(
            format!("input is not a file: {}", input.display()),
            Some("use a .hsd or .dat capture file".to_string()),
        ));
    }
    let ext = input
        .extension()
        .and_then(|ext| ext.to_str())
        .unwrap_or("")
        .to_ascii_lowercase();
    if ext != "hsd" && ext != "dat" {
        return Err(CliError::new(
            format!("unsupported input format '{}'", input.display()),
            Some("expected a .hsd or .dat file".to_string()),
        ));
    }
    Ok(())
}

fn resolve_input_path(input: &Path) -> Result<PathBuf, CliError> {
    let pattern = input.to_string_lossy();
    if !is_glob_pattern(&pattern) {
        return Ok(input.to_path_buf());
    }

    let mut matches = Vec::new();
    let paths = glob(&pattern).map_err(|err| {
        CliError::new(
            format!("invalid input pattern '{}'", pattern),
            Some(format!("pattern error: {}", err.msg)),
        )
    })?;
    for entry in paths {
        let path = entry.map_err(|err| {
            CliError::new(
                format!("invalid input pattern '{}'", pattern),
                Some(format!("pattern error: {}", err)),
            )
        })?;
        if path.is_file() {
            matches.push(path);
        }
    }

    match matches.len() {
        0 => Err(CliError::new(
            format!("no files match pattern '{}'", pattern),
            Some("check the path or quote the pattern; expected .hsd or .dat".to_string()),
        )),
        1 => Ok(matches.remove(0)),
        count => {
            let mut listed = matches
                .iter()
                .take(3)
                .map(|p| p.display().to_string())
                .collect::<Vec<_>>()
                .join(", ");
            if count > 3 {
                listed.push_str(", ...");
            }
            Err(CliError::new(
                format!(
                    "multiple files match pattern '{}' ({} matches); matches: {}",
                    pattern, count, listed
                ),
                Some("pass a single capture file, or run once per file".to_string()),
            ))
        }
    }
}

fn is_glob_pattern(input: &str) -> bool {
    input.contains('*') || input.contains('?') || input.contains('[')
}
