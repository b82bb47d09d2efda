use std::fmt::Write as _;
use std::path::PathBuf;
use std::process::ExitCode;

use clap::{Parser, Subcommand};
use shotgroup::core::{CalibrationError, PixelPoint};
use shotgroup::marking::{RecordIoError, SessionRecord};
use shotgroup::stats::{Angle, SessionStats, StatsParams};
use shotgroup::{calibrate, compare_sessions, LinearUnit, SessionAnalysis};

/// Shot-group statistics for saved marking sessions.
#[derive(Debug, Parser)]
#[command(author, version, about = "Shot-group analysis and target calibration")]
struct Args {
    /// Log engine decisions to stderr.
    #[arg(long, short, global = true)]
    verbose: bool,

    #[command(subcommand)]
    command: Command,
}

#[derive(Debug, Subcommand)]
enum Command {
    /// Compare one or more saved session files.
    Analyze {
        #[arg(required = true)]
        files: Vec<PathBuf>,
        /// Bootstrap resamples for the mean-radius CI.
        #[arg(long, default_value_t = 1000)]
        samples: usize,
        /// Fixed bootstrap seed.
        #[arg(long)]
        seed: Option<u64>,
        /// Print the analyses as JSON.
        #[arg(long)]
        json: bool,
    },
    /// Pixels per unit from two reference points a known distance apart.
    Calibrate {
        /// First reference point, `X,Y` in image pixels.
        #[arg(long, value_parser = parse_point, allow_hyphen_values = true)]
        p1: PixelPoint,
        /// Second reference point.
        #[arg(long, value_parser = parse_point, allow_hyphen_values = true)]
        p2: PixelPoint,
        /// Real distance between the points.
        #[arg(long, allow_negative_numbers = true)]
        distance: f64,
        /// Unit of `--distance` (`in`, `mm`, or anything else for plain units).
        #[arg(long, default_value = "in")]
        units: String,
    },
}

#[derive(thiserror::Error, Debug)]
enum CliError {
    #[error("{}: {source}", path.display())]
    Record {
        path: PathBuf,
        #[source]
        source: RecordIoError,
    },
    #[error(transparent)]
    Calibration(#[from] CalibrationError),
    #[error(transparent)]
    Json(#[from] serde_json::Error),
    #[error("failed to format report: {0}")]
    Format(#[from] std::fmt::Error),
}

fn parse_point(s: &str) -> Result<PixelPoint, String> {
    let (x, y) = s
        .split_once(',')
        .ok_or_else(|| format!("expected X,Y, got `{s}`"))?;
    let coord = |v: &str| {
        v.trim()
            .parse::<f64>()
            .map_err(|e| format!("bad coordinate `{v}`: {e}"))
    };
    Ok(PixelPoint::new(coord(x)?, coord(y)?))
}

fn main() -> ExitCode {
    let args = Args::parse();
    init_logging(args.verbose);

    match run(args.command) {
        Ok(out) => {
            print!("{out}");
            ExitCode::SUCCESS
        }
        Err(err) => {
            eprintln!("error: {err}");
            ExitCode::FAILURE
        }
    }
}

#[cfg(not(feature = "tracing"))]
fn init_logging(verbose: bool) {
    let level = if verbose {
        log::LevelFilter::Debug
    } else {
        log::LevelFilter::Warn
    };
    let _ = shotgroup::core::init_with_level(level);
}

#[cfg(feature = "tracing")]
fn init_logging(_verbose: bool) {
    shotgroup::core::init_tracing(false);
}

fn run(command: Command) -> Result<String, CliError> {
    match command {
        Command::Analyze {
            files,
            samples,
            seed,
            json,
        } => {
            let records = files
                .into_iter()
                .map(|path| {
                    SessionRecord::load_json(&path)
                        .map_err(|source| CliError::Record { path, source })
                })
                .collect::<Result<Vec<_>, _>>()?;
            let params = StatsParams {
                bootstrap_samples: samples,
                seed,
            };
            let analyses = compare_sessions(&records, &params);
            if json {
                let mut out = serde_json::to_string_pretty(&analyses)?;
                out.push('\n');
                Ok(out)
            } else {
                Ok(render_table(&analyses)?)
            }
        }
        Command::Calibrate {
            p1,
            p2,
            distance,
            units,
        } => {
            let cal = calibrate(p1, p2, distance, LinearUnit::from_label(&units))?;
            Ok(format!("{:.4} px/{}\n", cal.pixels_per_unit(), cal.units()))
        }
    }
}

fn angle(a: Option<Angle>) -> String {
    match a {
        Some(a) => format!("{:.2} moa ({:.2} mrad)", a.moa, a.mrad),
        None => "set distance".to_owned(),
    }
}

fn render_session(out: &mut String, index: usize, a: &SessionAnalysis) -> std::fmt::Result {
    let s: &SessionStats = &a.stats;
    let unit = s.raw.units;
    writeln!(out, "{}. {}", index + 1, a.session_name)?;
    writeln!(out, "   shots        {}", s.n)?;
    writeln!(
        out,
        "   mean radius  {}  [{:.3} {unit}]",
        angle(s.ang.mr),
        s.linear.mean_radius
    )?;
    writeln!(
        out,
        "   r95          {}  [{:.3} {unit}]",
        angle(s.ang.r95),
        s.linear.r95
    )?;
    let ci = match s.ang.ci {
        Some(ci) => format!("{:.2} - {:.2} moa", ci.moa[0], ci.moa[1]),
        None => format!("{:.3} - {:.3} {unit}", s.linear.ci.lower, s.linear.ci.upper),
    };
    writeln!(out, "   mr ci (95%)  {ci} ({})", s.confidence_level)?;
    writeln!(
        out,
        "   group size   {}  [{:.3} {unit}]",
        angle(s.ang.gs),
        s.linear.group_size
    )?;
    match (s.ang.a_zed, s.distance_units) {
        (Some(d), Some(du)) => writeln!(out, "   a-zed        {} {du}", d.floor())?,
        (Some(d), None) => writeln!(out, "   a-zed        {}", d.floor())?,
        _ => writeln!(out, "   a-zed        set distance")?,
    }
    writeln!(
        out,
        "   sd h / v     {} / {}",
        angle(s.ang.sd_x),
        angle(s.ang.sd_y)
    )?;
    match s.vel_sd {
        Some(sd) => writeln!(out, "   velocity sd  {sd:.2}")?,
        None => writeln!(out, "   velocity sd  N/A")?,
    }
    writeln!(out, "   dispersion   {}", a.diagnosis)
}

fn render_table(analyses: &[SessionAnalysis]) -> Result<String, std::fmt::Error> {
    if analyses.is_empty() {
        return Ok("No valid sessions found for analysis.\n".to_owned());
    }
    let mut out = String::new();
    for (i, a) in analyses.iter().enumerate() {
        if i > 0 {
            out.push('\n');
        }
        render_session(&mut out, i, a)?;
    }
    Ok(out)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn points_parse_with_spaces() {
        assert_eq!(parse_point("1.5, -2").expect("point"), PixelPoint::new(1.5, -2.0));
        assert!(parse_point("3").is_err());
        assert!(parse_point("a,b").is_err());
    }

    #[test]
    fn empty_comparison_has_a_message() {
        assert_eq!(
            render_table(&[]).expect("render"),
            "No valid sessions found for analysis.\n"
        );
    }

    #[test]
    fn sessions_render_as_numbered_blocks() {
        let record: SessionRecord = serde_json::from_str(
            r#"{"id": "t", "timestamp": "", "firearmId": "rifle", "shots": [
                {"shotNumber": 1, "group": 1, "x": 0, "y": 0, "units": "in"},
                {"shotNumber": 2, "group": 1, "x": 2, "y": 0, "units": "in"}
            ]}"#,
        )
        .expect("record");
        let params = StatsParams {
            bootstrap_samples: 50,
            seed: Some(3),
        };
        let analyses = compare_sessions(&[record.clone(), record], &params);
        let table = render_table(&analyses).expect("render");
        assert!(table.starts_with("1. rifle | No Load | No Target (2 shots)\n"));
        assert!(table.contains("\n\n2. rifle"));
        assert!(table.contains("   mean radius  set distance  [1.000 in]\n"));
        assert!(table.ends_with("   dispersion   Nominal\n"));
    }
}
