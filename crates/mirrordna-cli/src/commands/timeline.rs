//! Timeline command implementation.

use crate::errors::CliError;
use crate::output::format_json;
use clap::Subcommand;
use mirrordna_sdk::validate_timeline;
use std::path::PathBuf;

#[derive(Subcommand)]
pub enum TimelineCommand {
    /// Check a timeline file's structure
    Validate {
        /// Timeline file (JSON or YAML)
        path: PathBuf,
        /// Exit with error code if the timeline is invalid
        #[arg(long)]
        strict: bool,
        /// Output as JSON
        #[arg(long)]
        json: bool,
    },
}

pub fn run(command: TimelineCommand) -> Result<(), Box<dyn std::error::Error>> {
    match command {
        TimelineCommand::Validate { path, strict, json } => {
            let report = validate_timeline(&path);
            if json {
                println!("{}", format_json(&report));
            } else {
                println!("Timeline: {}", report.timeline_id.as_deref().unwrap_or("unknown"));
                println!("Events:   {}", report.event_count);
                println!("Valid:    {}", report.valid);
                if let (Some(first), Some(last)) = (&report.first_event, &report.last_event) {
                    println!("Span:     {} .. {}", first, last);
                }
                for error in &report.errors {
                    println!("  - {}", error);
                }
            }

            if strict && !report.valid {
                return Err(CliError::CheckFailed(format!(
                    "timeline {} is invalid",
                    path.display()
                ))
                .into());
            }
        }
    }
    Ok(())
}
