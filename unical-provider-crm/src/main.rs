//! unical-provider-crm - CRM REST provider for unical
//!
//! This binary implements the unical provider protocol, communicating
//! with unical via JSON over stdin/stdout. Each request carries the
//! `[source]` table from the unical config (base_url, optional token).

mod crm;
mod source_config;

use std::future::Future;
use std::io::{self, BufRead, Write};

use anyhow::Result;
use serde::Serialize;
use tracing_subscriber::EnvFilter;
use unical_core::source::protocol::{Command, Request, Response};

use crate::crm::CrmClient;
use crate::source_config::CrmSourceConfig;

fn init_logging() {
    let filter = EnvFilter::try_from_env("UNICAL_LOG").unwrap_or_else(|_| EnvFilter::new("warn"));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();
}

#[tokio::main]
async fn main() -> Result<()> {
    init_logging();
    let stdin = io::stdin();
    let mut stdout = io::stdout();

    for line in stdin.lock().lines() {
        let line = match line {
            Ok(l) => l,
            Err(e) => {
                eprintln!("Failed to read stdin: {}", e);
                break;
            }
        };

        if line.trim().is_empty() {
            continue;
        }

        let response = match serde_json::from_str::<Request>(&line) {
            Ok(request) => handle_request(request).await,
            Err(e) => Response::<()>::error(&format!("Failed to parse request: {}", e)),
        };

        writeln!(stdout, "{}", response)?;
        stdout.flush()?;
    }

    Ok(())
}

async fn handle_request(request: Request) -> String {
    let client = match CrmSourceConfig::try_from(&request.params) {
        Ok(config) => CrmClient::new(config),
        Err(e) => return Response::<()>::error(&format!("Invalid params: {:#}", e)),
    };

    match request.command {
        Command::ListActionItems => respond(client.action_items()).await,
        Command::ListMeetings => respond(client.meetings()).await,
        Command::ListOrgDirectory => respond(client.org_directory()).await,
    }
}

async fn respond<T: Serialize>(fetch: impl Future<Output = Result<T>>) -> String {
    match fetch.await {
        Ok(data) => Response::success(data),
        Err(e) => Response::<()>::error(&format!("{:#}", e)),
    }
}
