use std::path::PathBuf;
use std::process::ExitCode;

use clap::Parser;
use image::ImageReader;
use serde::Serialize;

use sudoku_scan::detect::gray_view;
use sudoku_scan::{ExtractError, ScanError, ScanParams, ScanPipeline};

// Distinct exit codes per failure class, so scripts can tell "no board in
// this photo" from "bad geometry" without parsing stderr.
const EXIT_IO: u8 = 1;
const EXIT_NOT_FOUND: u8 = 2;
const EXIT_GEOMETRY: u8 = 3;

#[derive(Parser)]
#[command(name = "sudoku-scan")]
#[command(about = "Locate a sudoku board in a photograph and report its 81 cells")]
struct Cli {
    /// Input image (any format the image crate decodes; converted to
    /// grayscale).
    #[arg(value_name = "IMAGE")]
    image: PathBuf,

    /// JSON file of pipeline parameters overriding the defaults.
    #[arg(long, value_name = "FILE")]
    params: Option<PathBuf>,

    /// Increase log verbosity (-v = debug, -vv = trace).
    #[arg(short, long, action = clap::ArgAction::Count)]
    verbose: u8,
}

#[derive(Serialize)]
struct ScanReport {
    side: usize,
    line_count: usize,
    segmented: usize,
    dropped: usize,
    occupied: usize,
    /// 81 flags in raster order: true = cell holds a glyph.
    cells: Vec<bool>,
}

fn load_params(path: Option<&PathBuf>) -> Result<ScanParams, String> {
    let Some(path) = path else {
        return Ok(ScanParams::default());
    };
    let text = std::fs::read_to_string(path)
        .map_err(|e| format!("cannot read params file {}: {e}", path.display()))?;
    serde_json::from_str(&text).map_err(|e| format!("invalid params file: {e}"))
}

fn run(cli: &Cli) -> Result<ScanReport, (u8, String)> {
    let params = load_params(cli.params.as_ref()).map_err(|e| (EXIT_IO, e))?;

    let img = ImageReader::open(&cli.image)
        .map_err(|e| (EXIT_IO, format!("cannot open {}: {e}", cli.image.display())))?
        .decode()
        .map_err(|e| (EXIT_IO, format!("cannot decode {}: {e}", cli.image.display())))?
        .to_luma8();

    let pipeline = ScanPipeline::new(params);
    let outcome = pipeline.scan(&gray_view(&img)).map_err(|e| match e {
        ScanError::Extract(ExtractError::BoardNotFound) => {
            (EXIT_NOT_FOUND, "board not found".to_string())
        }
        ScanError::Extract(ExtractError::InvalidGeometry { .. }) => {
            (EXIT_GEOMETRY, format!("{e}"))
        }
        other => (EXIT_IO, format!("{other}")),
    })?;

    Ok(ScanReport {
        side: outcome.board.side,
        line_count: outcome.board.line_count,
        segmented: outcome.segmented,
        dropped: outcome.dropped,
        occupied: outcome.grid.occupied(),
        cells: outcome.grid.cells.iter().map(|c| !c.is_blank()).collect(),
    })
}

fn init_logging(verbose: u8) {
    #[cfg(feature = "tracing")]
    {
        let _ = verbose;
        let _ = tracing_log::LogTracer::init();
        sudoku_scan::core::init_tracing(false);
    }
    #[cfg(not(feature = "tracing"))]
    {
        let level = match verbose {
            0 => log::LevelFilter::Info,
            1 => log::LevelFilter::Debug,
            _ => log::LevelFilter::Trace,
        };
        let _ = sudoku_scan::core::init_with_level(level);
    }
}

fn main() -> ExitCode {
    let cli = Cli::parse();
    init_logging(cli.verbose);

    match run(&cli) {
        Ok(report) => {
            // Machine-readable summary on stdout.
            match serde_json::to_string_pretty(&report) {
                Ok(json) => {
                    println!("{json}");
                    ExitCode::SUCCESS
                }
                Err(e) => {
                    eprintln!("error: cannot serialize report: {e}");
                    ExitCode::from(EXIT_IO)
                }
            }
        }
        Err((code, message)) => {
            eprintln!("error: {message}");
            ExitCode::from(code)
        }
    }
}
