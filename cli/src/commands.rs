use std::fs::File;
use std::io::{BufWriter, Write};
use std::path::Path;
use std::time::Instant;

use chronicle_core::merge::middleware;
use chronicle_core::{AppConfig, AppConfigExt, Guid, MessageKind, Merger, ParsingSession};

pub fn merge(
    a: &Path,
    b: &Path,
    output: Option<&Path>,
    only_raw_casts: bool,
    config: &AppConfig,
) -> Result<(), String> {
    let mut merger =
        Merger::open(config.resolve_log_path(a), config.resolve_log_path(b)).map_err(|e| e.to_string())?;
    if only_raw_casts || config.only_raw_casts {
        merger = merger.with_middleware(middleware::only_raw_casts);
    }

    let written = match output {
        Some(path) => {
            let file = File::create(path).map_err(|e| format!("failed to create {}: {e}", path.display()))?;
            merger.write_to(BufWriter::new(file))
        }
        None => merger.write_to(std::io::stdout().lock()),
    }
    .map_err(|e| e.to_string())?;

    let failed = merger.failed_lines().len();
    if failed > 0 {
        tracing::warn!(failed, "Lines could not be decoded and were dropped");
    }
    tracing::info!(written, "Merge complete");
    Ok(())
}

pub fn parse(a: &Path, b: Option<&Path>, json: bool, config: &AppConfig) -> Result<(), String> {
    let timer = Instant::now();
    let mut session = ParsingSession::open(a, b, config).map_err(|e| e.to_string())?;
    tracing::info!(name = %session.me().name, guid = %session.me().guid, "Parsing");

    let mut messages = 0usize;
    let mut unparsed = 0usize;
    let mut line_errors = 0usize;
    loop {
        match session.advance() {
            Ok(Some(batch)) => {
                for msg in &batch {
                    if let MessageKind::Unparsed(content) = &msg.kind {
                        tracing::warn!(date = %msg.timestamp, content, "Unparsed line");
                        unparsed += 1;
                    }
                }
                messages += batch.len();
            }
            Ok(None) => break,
            Err(error) if !error.is_fatal() => {
                tracing::warn!(error = %error, source = ?std::error::Error::source(&error), "Skipping line");
                line_errors += 1;
            }
            Err(error) => return Err(error.to_string()),
        }
    }

    tracing::info!(
        lines = session.lines_read(),
        messages,
        unparsed,
        line_errors,
        undecodable = session.failed_lines().len(),
        elapsed_ms = timer.elapsed().as_millis() as u64,
        "Parsing complete"
    );

    let state = session.into_state();
    if json {
        let summaries = serde_json::to_string_pretty(&state.summaries()).map_err(|e| e.to_string())?;
        println!("{summaries}");
    } else {
        print!("{state}");
        if !state.zone_history().is_empty() {
            println!();
            println!("=== Zones ===");
            for zone in state.zone_history() {
                println!("{} (Instance {})", zone.name, zone.instance_id);
            }
        }
    }
    Ok(())
}

pub fn guid(value: &str) -> Result<(), String> {
    let guid: Guid = value.parse().map_err(|e: chronicle_core::ParseError| e.to_string())?;

    let kind = if guid.is_zero() {
        "none"
    } else if guid.is_player() {
        "player"
    } else if guid.is_pet() {
        "pet"
    } else if guid.is_vehicle() {
        "vehicle"
    } else if guid.is_creature() {
        "creature"
    } else {
        "unknown"
    };

    println!("{:<8} {guid}", "GUID");
    println!("{:<8} {kind}", "Type");
    println!("{:<8} {:#06X}", "High", guid.high());
    match guid.entry() {
        Some(entry) => println!("{:<8} {entry}", "Entry"),
        None => println!("{:<8} -", "Entry"),
    }
    Ok(())
}

pub fn show_config(config: &AppConfig, source: Option<&Path>) -> Result<(), String> {
    match source {
        Some(path) => println!("# {}", path.display()),
        None => match AppConfig::config_path() {
            Ok(path) => println!("# {}", path.display()),
            Err(e) => tracing::warn!(error = %e, "Configuration path unavailable"),
        },
    }
    let text = serde_json::to_string_pretty(config).map_err(|e| e.to_string())?;
    let mut stdout = std::io::stdout().lock();
    writeln!(stdout, "{text}").map_err(|e| e.to_string())
}
