//! Command-line surface: argument validation and the line-oriented run output.

use std::path::PathBuf;

use chrono::NaiveDate;
use clap::{ArgAction, Parser};
use lazy_static::lazy_static;
use regex::Regex;

use crate::config::RetentionConfig;
use crate::retention::{ActionMode, EnsureOutcome, RetentionReport, DEFAULT_EXCEPTION_COLUMN};

lazy_static! {
    static ref DIR_PATH: Option<Regex> = Regex::new(r"^/(?:\w[./-]?)+\w/$").ok();
    static ref EXCEPTION_FILE: Option<Regex> = Regex::new(r"(?i)\.(xlsx|xls|csv)$").ok();
}

/// Delete or archive HDFS files older than a retention threshold.
#[derive(Parser, Debug)]
#[command(name = "hdfs-retention", version, about)]
pub struct Cli {
    /// Storage path to scan, e.g. /data/logs/
    #[arg(short, long, required = true, value_parser = parse_dir_path)]
    pub path: String,

    /// Retention threshold in days; files dated on or before today minus N are candidates
    #[arg(short, long, required = true)]
    pub day: u32,

    /// Excel (.xlsx/.xls) or CSV file listing paths that must never be touched
    #[arg(short, long, value_parser = parse_exception_file)]
    pub exception: Option<PathBuf>,

    /// Column of the exception file holding the paths
    #[arg(long, default_value = DEFAULT_EXCEPTION_COLUMN)]
    pub exception_column: String,

    /// Archive to this directory instead of deleting
    #[arg(short, long, value_parser = parse_dir_path)]
    pub archive: Option<String>,

    /// Show the files that would be deleted or archived, change nothing
    #[arg(long)]
    pub dry_run: bool,

    /// Print the run report as JSON
    #[arg(long)]
    pub json: bool,

    /// Log to stderr: -v info, -vv debug
    #[arg(short, long, action = ArgAction::Count)]
    pub verbose: u8,
}

impl Cli {
    pub fn mode(&self) -> ActionMode {
        ActionMode::from_flags(self.dry_run, self.archive.clone())
    }

    pub fn into_config(self, today: NaiveDate) -> RetentionConfig {
        let mode = self.mode();
        let mut config = RetentionConfig::new(self.path, self.day, today)
            .with_mode(mode)
            .with_exception_column(self.exception_column);
        if let Some(file) = self.exception {
            config = config.with_exception_file(file);
        }
        config
    }

    pub fn log_filter(&self) -> &'static str {
        match self.verbose {
            0 => "warn",
            1 => "info",
            _ => "debug",
        }
    }
}

fn matches_pattern(pattern: &Option<Regex>, arg: &str) -> bool {
    pattern.as_ref().map(|re| re.is_match(arg)).unwrap_or(false)
}

fn parse_dir_path(arg: &str) -> Result<String, String> {
    if matches_pattern(&DIR_PATH, arg) {
        Ok(arg.to_string())
    } else {
        Err("invalid value, must start with / and must end with /".to_string())
    }
}

fn parse_exception_file(arg: &str) -> Result<PathBuf, String> {
    if matches_pattern(&EXCEPTION_FILE, arg) {
        Ok(PathBuf::from(arg))
    } else {
        Err("invalid exception file, expected .xlsx, .xls or .csv".to_string())
    }
}

/// One line per item plus a closing summary.
pub fn render_report(report: &RetentionReport, mode: &ActionMode) -> Vec<String> {
    let mut lines = Vec::with_capacity(report.outcomes.len() + 3);

    let totals = match mode {
        ActionMode::Report { archive_to } => {
            lines.extend(report.outcomes.iter().map(|o| o.path.clone()));
            let target = archive_to
                .as_deref()
                .map(|d| format!(" to {}", d))
                .unwrap_or_default();
            format!(
                "{} files would be {}{}.",
                report.candidates,
                mode.verb(),
                target
            )
        }
        ActionMode::Delete => {
            for outcome in &report.outcomes {
                if outcome.succeeded {
                    lines.push(format!("Successfully deleted: {}", outcome.path));
                } else {
                    lines.push(format!(
                        "Something bad happened while deleting: {} ({})",
                        outcome.path, outcome.detail
                    ));
                }
            }
            format!(
                "{} files deleted, {} failed.",
                report.succeeded, report.failed
            )
        }
        ActionMode::Archive { destination } => {
            match report.destination {
                Some(EnsureOutcome::AlreadyExists) => lines.push("Dir. exists".to_string()),
                Some(EnsureOutcome::Created) => lines.push("Dir. created".to_string()),
                None => {}
            }
            for outcome in &report.outcomes {
                if outcome.succeeded {
                    lines.push(format!("Successfully moved: {}", outcome.path));
                } else {
                    lines.push(format!(
                        "Something bad happened while moving: {} ({})",
                        outcome.path, outcome.detail
                    ));
                }
            }
            format!(
                "{} files archived to {}, {} failed.",
                report.succeeded, destination, report.failed
            )
        }
    };

    lines.push(summary_line(report));
    lines.push(totals);
    lines
}

/// Pipeline counts shown ahead of the totals in every mode.
pub fn summary_line(report: &RetentionReport) -> String {
    format!(
        "{} files listed, {} eligible, {} excepted.",
        report.listed_files, report.eligible, report.excepted
    )
}
