// Copyright (c) 2025 Steve Wagner (ciroque@live.com)
// SPDX-License-Identifier: MIT

use anyhow::Context;
use serde::Deserialize;
use serde_json::Value;
use std::env;
use std::sync::Arc;
use tokio::fs::File;
use tokio::io::{AsyncBufRead, AsyncBufReadExt, BufReader};
use tokio::sync::mpsc;
use tokio_util::sync::CancellationToken;
use tracing_subscriber::filter::LevelFilter;
use tracing_subscriber::EnvFilter;

use the_stitcher::config::{load_and_validate_config, RuntimeBuilder};
use the_stitcher::engine::ServiceReport;
use the_stitcher::model::{ResponseEvent, Timestamp};
use the_stitcher::observability::messages::config::ConfigLoaded;
use the_stitcher::observability::messages::StructuredLog;

/// One line of a capture file.
///
/// A string `body` is the raw response text and is passed through byte for
/// byte, so captures of broken responses replay as broken responses. Any
/// other JSON value is the already-decoded body.
#[derive(Debug, Deserialize)]
struct CapturedResponse {
    url: String,
    body: Value,
}

fn parse_capture_line(line: &str) -> Result<ResponseEvent, serde_json::Error> {
    let captured: CapturedResponse = serde_json::from_str(line)?;
    let body = match captured.body {
        Value::String(raw) => raw.into_bytes(),
        decoded => serde_json::to_vec(&decoded)?,
    };
    Ok(ResponseEvent::new(captured.url, body, Timestamp::now()))
}

fn init_tracing() {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::builder()
                .with_default_directive(LevelFilter::INFO.into())
                .from_env_lossy(),
        )
        .with_target(false)
        .init();
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    init_tracing();

    let args: Vec<String> = env::args().collect();
    if args.len() < 2 || args.len() > 3 {
        eprintln!("Usage: {} <config.yaml> [capture.jsonl]", args[0]);
        eprintln!("Reads captured responses, one JSON object per line, from the file or stdin.");
        eprintln!("Example: {} configs/ffrk-capture.yaml captures/session.jsonl", args[0]);
        std::process::exit(1);
    }

    let config_path = &args[1];
    let config = load_and_validate_config(config_path)
        .with_context(|| format!("Failed to load configuration '{}'", config_path))?;
    ConfigLoaded {
        path: config_path,
        record_kinds: config.record_kinds.len(),
        sinks: config.sinks.len(),
    }
    .log();

    let service = Arc::new(RuntimeBuilder::from_config(&config).map_err(anyhow::Error::msg)?);
    let (tx, rx) = mpsc::channel(config.channel_capacity());
    let cancel = CancellationToken::new();

    let worker = {
        let service = service.clone();
        let cancel = cancel.clone();
        tokio::spawn(async move { service.run(rx, cancel).await })
    };

    let interrupt = {
        let cancel = cancel.clone();
        tokio::spawn(async move {
            if tokio::signal::ctrl_c().await.is_ok() {
                tracing::info!("Interrupted; finalizing pending endpoints");
                cancel.cancel();
            }
        })
    };

    let fed = match args.get(2) {
        Some(path) => {
            let file = File::open(path)
                .await
                .with_context(|| format!("Failed to open capture '{}'", path))?;
            feed(BufReader::new(file), &tx, &cancel).await
        }
        None => feed(BufReader::new(tokio::io::stdin()), &tx, &cancel).await,
    };

    // Closing the channel stops the service, which force-finalizes.
    drop(tx);
    let report = worker.await.context("Aggregation service panicked")?;
    interrupt.abort();

    print_report(fed?, &report);
    Ok(())
}

/// Send every parseable capture line to the service. Returns the number sent.
async fn feed<R>(
    reader: R,
    tx: &mpsc::Sender<ResponseEvent>,
    cancel: &CancellationToken,
) -> anyhow::Result<usize>
where
    R: AsyncBufRead + Unpin,
{
    let mut lines = reader.lines();
    let mut line_number = 0usize;
    let mut sent = 0usize;

    loop {
        let line = tokio::select! {
            _ = cancel.cancelled() => break,
            line = lines.next_line() => line.context("Failed to read capture input")?,
        };
        let Some(line) = line else { break };
        line_number += 1;

        if line.trim().is_empty() {
            continue;
        }

        match parse_capture_line(&line) {
            Ok(event) => {
                if tx.send(event).await.is_err() {
                    break;
                }
                sent += 1;
            }
            Err(e) => tracing::warn!(line = line_number, "Skipping capture line {}: {}", line_number, e),
        }
    }

    Ok(sent)
}

fn print_report(sent: usize, report: &ServiceReport) {
    println!("Replayed {} responses", sent);
    println!(
        "  processed: {}, ignored: {}, malformed: {}, failures: {}",
        report.events_processed, report.events_ignored, report.malformed_events, report.failures
    );
    println!("  finalizations: {}", report.finalizations);
    if report.dispatch_counts.is_empty() {
        println!("  nothing dispatched");
    }
    for (record_kind, count) in &report.dispatch_counts {
        println!("  {}: {} dispatches", record_kind, count);
    }
}
