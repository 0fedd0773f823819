mod dump;

use clap::{Parser, ValueEnum};
use diagnostics::render::render_diagnostic;
use diagnostics::{Diagnostic, SimpleFiles};
use dump::{DumpError, UnitDump};
use linq_check::config::{AnalyzerConfig, ConfigError};
use linq_check::model::AssocModel;
use linq_check::{analyze_units, SourceUnit};
use query_types::TypeStore;
use serde::Serialize;
use std::fs;
use std::path::{Path, PathBuf};
use std::process::ExitCode;
use thiserror::Error;
use tracing::Level;
use tracing_subscriber::fmt::format::FmtSpan;

#[derive(Parser)]
#[command(name = "linq-check", version, about = "Find queries a remote query provider cannot translate")]
struct Cli {
  /// Resolved unit dumps (JSON) to check.
  #[arg(required = true)]
  units: Vec<PathBuf>,

  /// Analyzer configuration (JSON); omitted fields keep their defaults.
  #[arg(long)]
  config: Option<PathBuf>,

  /// Output format for diagnostics.
  #[arg(long, value_enum, default_value_t = Format::Human)]
  format: Format,

  /// Emit tracing spans (JSON) on stderr.
  #[arg(long)]
  trace: bool,
}

#[derive(Clone, Copy, ValueEnum)]
enum Format {
  Human,
  Json,
}

#[derive(Debug, Error)]
enum CliError {
  #[error("failed to read config {path}: {source}")]
  ConfigRead {
    path: PathBuf,
    #[source]
    source: std::io::Error,
  },
  #[error("{path}: {source}")]
  Config {
    path: PathBuf,
    #[source]
    source: ConfigError,
  },
  #[error("{path}: {source}")]
  Dump {
    path: PathBuf,
    #[source]
    source: DumpError,
  },
  #[error("failed to serialize JSON: {0}")]
  Serialize(#[from] serde_json::Error),
}

#[derive(Serialize)]
struct JsonUnit<'a> {
  file: &'a str,
  classified: usize,
  reported: usize,
  diagnostics: &'a [Diagnostic],
}

#[derive(Serialize)]
struct JsonOutput<'a> {
  units: Vec<JsonUnit<'a>>,
}

fn main() -> ExitCode {
  let cli = Cli::parse();
  init_tracing(cli.trace);
  match run(&cli) {
    Ok(true) => ExitCode::from(1),
    Ok(false) => ExitCode::SUCCESS,
    Err(err) => {
      eprintln!("{err}");
      ExitCode::from(2)
    }
  }
}

/// Returns whether any diagnostic was reported.
fn run(cli: &Cli) -> Result<bool, CliError> {
  let config = match &cli.config {
    Some(path) => load_config(path)?,
    None => AnalyzerConfig::default(),
  };

  let mut files = SimpleFiles::new();
  let mut store = TypeStore::new();
  let mut names = Vec::new();
  let mut units = Vec::new();
  for path in &cli.units {
    let loaded = UnitDump::read(path)
      .and_then(|dump| dump.load(&mut store))
      .map_err(|source| CliError::Dump {
        path: path.clone(),
        source,
      })?;
    let file = match &loaded.text {
      Some(text) => files.add(loaded.file.as_str(), text.as_str()),
      None => files.add_without_text(loaded.file.as_str()),
    };
    let mut unit = SourceUnit::new(file, loaded.roots);
    unit.text = loaded.text;
    names.push(loaded.file);
    units.push(unit);
  }

  let model = AssocModel::new(&store);
  let reports = analyze_units(&config, &model, &units);
  let found = reports.iter().any(|report| !report.diagnostics.is_empty());

  match cli.format {
    Format::Human => {
      for report in &reports {
        for diagnostic in &report.diagnostics {
          println!("{}", render_diagnostic(&files, diagnostic));
        }
      }
    }
    Format::Json => {
      let output = JsonOutput {
        units: names
          .iter()
          .zip(&reports)
          .map(|(name, report)| JsonUnit {
            file: name,
            classified: report.summary.classified,
            reported: report.summary.reported,
            diagnostics: &report.diagnostics,
          })
          .collect(),
      };
      println!("{}", serde_json::to_string_pretty(&output)?);
    }
  }
  Ok(found)
}

fn load_config(path: &Path) -> Result<AnalyzerConfig, CliError> {
  let text = fs::read_to_string(path).map_err(|source| CliError::ConfigRead {
    path: path.to_path_buf(),
    source,
  })?;
  AnalyzerConfig::from_json_str(&text).map_err(|source| CliError::Config {
    path: path.to_path_buf(),
    source,
  })
}

fn init_tracing(enabled: bool) {
  if !enabled {
    return;
  }
  let _ = tracing_subscriber::fmt()
    .with_span_events(FmtSpan::CLOSE)
    .with_max_level(Level::DEBUG)
    .with_writer(std::io::stderr)
    .json()
    .with_ansi(false)
    .try_init();
}
