//! Batch driver for 2D spatial velocity autocorrelation.
//!
//! Reads a table of scattered velocity observations from a CSV file, places
//! them on a dense grid, computes the radial correlation profile, and writes
//! a `distance,correlation` table.

use std::fs::File;
use std::io::{BufRead, BufReader, BufWriter, Write};
use std::path::PathBuf;

use clap::Parser;

use velcorr::{Correlation, SampledVector, VelocityField, compute_correlation, rescale_positions};

type CliError = Box<dyn std::error::Error>;
type CliResult<T> = Result<T, CliError>;

#[derive(Parser)]
#[command(name = "velcorr")]
#[command(about = "Compute the spatial autocorrelation profile of a 2D velocity field")]
#[command(version)]
struct Cli {
    /// Path to the input file (.csv).
    input: PathBuf,

    /// Path to the output file (.csv).
    output: PathBuf,

    /// Number of rows in the input preceding the column-header row.
    #[arg(long, default_value = "0", value_name = "data_start_row_ix")]
    ds: usize,

    /// The minimum radius (in grid cells) to observe.
    #[arg(long, default_value = "1.0")]
    rmin: f64,

    /// The maximum radius (in grid cells) to observe.
    #[arg(long, default_value = "25.0")]
    rmax: f64,

    /// The radius step size (in grid cells).
    #[arg(long, default_value = "1.0")]
    rstep: f64,

    /// Conversion factor between position units and px. 1 means no conversion.
    #[arg(long, default_value = "1.0")]
    pxconv: f64,

    /// The grid spacing between adjacent observations, in px.
    #[arg(long, default_value = "1", value_name = "px_grid_spacing")]
    pxstep: u32,

    /// Column name of the x-coordinate values.
    #[arg(long, default_value = "x [px]")]
    xpfea: String,

    /// Column name of the y-coordinate values.
    #[arg(long, default_value = "y [px]")]
    ypfea: String,

    /// Column name of the x-velocity values.
    #[arg(long, default_value = "u [px/frame]")]
    xvfea: String,

    /// Column name of the y-velocity values.
    #[arg(long, default_value = "v [px/frame]")]
    yvfea: String,
}

fn main() -> CliResult<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info")),
        )
        .init();

    let cli = Cli::parse();
    run(&cli)
}

fn run(cli: &Cli) -> CliResult<()> {
    tracing::info!("Reading observations from {}", cli.input.display());
    let samples = read_samples(cli)?;
    tracing::info!("Parsed {} observations", samples.len());

    let gridded = rescale_positions(&samples, cli.pxstep, cli.pxconv)?;
    let field = VelocityField::from_samples(&gridded)?;
    tracing::info!("Gridded onto a {}x{} field", field.rows(), field.cols());

    let radii = radius_sequence(cli.rmin, cli.rmax, cli.rstep)?;
    let profile = compute_correlation(&field.grid()?, &radii)?;

    let distance_per_cell = cli.pxstep as f64 * cli.pxconv;
    let file = File::create(&cli.output)?;
    let mut writer = BufWriter::new(file);
    writeln!(writer, "distance,correlation")?;
    for point in &profile {
        let distance = point.radius * distance_per_cell;
        match point.correlation {
            Correlation::Value(value) => writeln!(writer, "{distance},{value}")?,
            Correlation::Undefined(reason) => {
                tracing::warn!(
                    "correlation is undefined at radius {} ({reason}); writing nan",
                    point.radius
                );
                writeln!(writer, "{distance},nan")?;
            }
        }
    }
    writer.flush()?;
    tracing::info!("Profile written to {}", cli.output.display());
    Ok(())
}

/// Materializes `rmin, rmin + rstep, ...` up to and including `rmax`.
fn radius_sequence(rmin: f64, rmax: f64, rstep: f64) -> CliResult<Vec<f64>> {
    if !(rmin.is_finite() && rmax.is_finite() && rstep.is_finite()) {
        return Err("radius bounds and step must be finite".into());
    }
    if rmin < 0.0 || rstep <= 0.0 || rmax < rmin {
        return Err("require rmin >= 0, rstep > 0, and rmax >= rmin".into());
    }
    // the slack term admits endpoints that land on rmax up to roundoff
    let n = ((rmax - rmin) / rstep + 1.0e-9).floor() as usize + 1;
    Ok((0..n).map(|i| rmin + i as f64 * rstep).collect())
}

/// Parses the input table into sampled vectors, using the header row to
/// locate the four configured columns.
fn read_samples(cli: &Cli) -> CliResult<Vec<SampledVector>> {
    let file = File::open(&cli.input)?;
    let reader = BufReader::new(file);
    let mut lines = reader.lines();

    for _ in 0..cli.ds {
        if lines.next().transpose()?.is_none() {
            return Err("input ended before the header row".into());
        }
    }
    let header = lines
        .next()
        .transpose()?
        .ok_or("input has no header row")?;
    let columns: Vec<&str> = header.split(',').map(str::trim).collect();
    let col = |name: &str| -> CliResult<usize> {
        columns
            .iter()
            .position(|c| *c == name)
            .ok_or_else(|| format!("column {name:?} not found in header").into())
    };
    let (ix, iy) = (col(&cli.xpfea)?, col(&cli.ypfea)?);
    let (iu, iv) = (col(&cli.xvfea)?, col(&cli.yvfea)?);

    let mut samples = Vec::new();
    for (line_no, line) in lines.enumerate() {
        let line = line?;
        if line.trim().is_empty() {
            continue;
        }
        let fields: Vec<&str> = line.split(',').map(str::trim).collect();
        let parse = |i: usize| -> CliResult<f64> {
            let raw = fields
                .get(i)
                .ok_or_else(|| format!("row {}: too few fields", line_no + 1))?;
            raw.parse::<f64>()
                .map_err(|e| format!("row {}: {raw:?}: {e}", line_no + 1).into())
        };
        samples.push(SampledVector {
            x: parse(ix)?,
            y: parse(iy)?,
            u: parse(iu)?,
            v: parse(iv)?,
        });
    }
    Ok(samples)
}
