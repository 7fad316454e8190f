//! Provider subprocess protocol.
//!
//! This module handles communication with external provider binaries
//! (e.g., `unical-provider-crm`) using JSON over stdin/stdout.
//!
//! Any executable that speaks the JSON protocol can be a provider. Providers
//! manage their own transport and credentials; unical only passes the
//! parameters from the `[source]` table of the config.

use std::path::{Path, PathBuf};
use std::time::Duration;

use serde::{Deserialize, Serialize};
use tokio::io::AsyncWriteExt;
use tokio::process::Command as TokioCommand;
use tokio::time::timeout;

use crate::constants::PROVIDER_BINARY_PREFIX;
use crate::error::TransportError;
use crate::source::protocol::{Command, ProviderCommand, Request, Response};

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Provider(String);

impl Provider {
    pub fn from_name(name: &str) -> Self {
        Provider(name.to_string())
    }

    pub fn name(&self) -> &str {
        &self.0
    }

    pub fn binary_name(&self) -> String {
        format!("{PROVIDER_BINARY_PREFIX}{}", self.0)
    }

    fn binary_path(&self) -> Result<PathBuf, TransportError> {
        let binary_name = self.binary_name();
        which::which(&binary_name).map_err(|_| TransportError::ProviderNotInstalled(binary_name))
    }

    /// Call a typed provider command, bounded by `limit`.
    ///
    /// The response type is inferred from the command's associated type.
    pub async fn call<C: ProviderCommand>(
        &self,
        cmd: C,
        limit: Duration,
    ) -> Result<C::Response, TransportError> {
        let binary_path = self.binary_path()?;
        call_binary(&binary_path, cmd, limit).await
    }
}

async fn call_binary<C: ProviderCommand>(
    binary_path: &Path,
    cmd: C,
    limit: Duration,
) -> Result<C::Response, TransportError> {
    timeout(limit, call_raw(binary_path, C::command(), cmd))
        .await
        .map_err(|_| TransportError::Timeout(limit))?
}

/// Low-level call that sends a command with params and deserializes the response.
async fn call_raw<P: Serialize, R: serde::de::DeserializeOwned>(
    binary_path: &Path,
    command: Command,
    params: P,
) -> Result<R, TransportError> {
    let params =
        serde_json::to_value(params).map_err(|e| TransportError::Serialization(e.to_string()))?;
    let request = Request { command, params };
    let request_json =
        serde_json::to_string(&request).map_err(|e| TransportError::Serialization(e.to_string()))?;

    tracing::debug!(provider = %binary_path.display(), ?command, "calling provider");

    let mut child = TokioCommand::new(binary_path)
        .stdin(std::process::Stdio::piped())
        .stdout(std::process::Stdio::piped())
        .stderr(std::process::Stdio::inherit())
        .kill_on_drop(true)
        .spawn()
        .map_err(|e| {
            TransportError::Provider(format!("Failed to spawn {}: {}", binary_path.display(), e))
        })?;

    let mut stdin = child
        .stdin
        .take()
        .ok_or_else(|| TransportError::Provider("Provider stdin unavailable".into()))?;
    stdin.write_all(format!("{request_json}\n").as_bytes()).await?;
    drop(stdin);

    let output = child.wait_with_output().await?;

    if !output.status.success() {
        return Err(TransportError::Provider(format!(
            "Provider exited with status: {}",
            output.status.code().unwrap_or(-1)
        )));
    }

    let response_str = String::from_utf8_lossy(&output.stdout);
    if response_str.trim().is_empty() {
        return Err(TransportError::Provider("Provider returned no response".into()));
    }

    parse_response(&response_str)
}

fn parse_response<R: serde::de::DeserializeOwned>(raw: &str) -> Result<R, TransportError> {
    let response: Response<R> = serde_json::from_str(raw.trim())
        .map_err(|e| TransportError::Provider(format!("Failed to parse response: {}", e)))?;

    match response {
        Response::Success { data } => Ok(data),
        Response::Error { error } => Err(TransportError::Provider(error)),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::ActionItem;

    #[test]
    fn test_binary_name_uses_prefix() {
        assert_eq!(Provider::from_name("crm").binary_name(), "unical-provider-crm");
    }

    #[test]
    fn test_parse_success_response() {
        let raw = r#"{"status":"success","data":[{"id":1,"title":"Call","dueDate":"2024-03-05","status":"Done"}]}"#;
        let items: Vec<ActionItem> = parse_response(raw).unwrap();
        assert_eq!(items.len(), 1);
        assert!(items[0].status.is_terminal());
    }

    #[test]
    fn test_parse_error_response_becomes_provider_error() {
        let raw = r#"{"status":"error","error":"401 Unauthorized"}"#;
        let result: Result<Vec<ActionItem>, _> = parse_response(raw);
        assert!(matches!(result, Err(TransportError::Provider(msg)) if msg == "401 Unauthorized"));
    }

    #[tokio::test]
    async fn test_missing_binary_is_reported() {
        let provider = Provider::from_name("definitely-not-installed-anywhere");
        let result = provider
            .call(
                crate::source::protocol::ListActionItems { source_config: Default::default() },
                Duration::from_secs(1),
            )
            .await;
        assert!(matches!(result, Err(TransportError::ProviderNotInstalled(_))));
    }

    #[cfg(unix)]
    fn script(dir: &Path, name: &str, body: &str) -> PathBuf {
        use std::os::unix::fs::PermissionsExt;

        let path = dir.join(name);
        std::fs::write(&path, format!("#!/bin/sh\n{body}\n")).unwrap();
        std::fs::set_permissions(&path, std::fs::Permissions::from_mode(0o755)).unwrap();
        path
    }

    #[cfg(unix)]
    #[tokio::test]
    async fn test_provider_process_outcomes() {
        use crate::source::protocol::ListActionItems;

        let dir = tempfile::tempdir().unwrap();
        // Write every script before spawning any of them.
        let answers = script(
            dir.path(),
            "answers",
            r#"read line; echo '{"status":"success","data":[]}'"#,
        );
        let hangs = script(dir.path(), "hangs", "exec sleep 30");
        let crashes = script(dir.path(), "crashes", "read line; exit 3");
        let silent = script(dir.path(), "silent", "read line; exit 0");

        let list = || ListActionItems { source_config: Default::default() };
        let limit = Duration::from_secs(5);

        let items = call_binary(&answers, list(), limit).await.unwrap();
        assert!(items.is_empty());

        let short = Duration::from_millis(200);
        let result = call_binary(&hangs, list(), short).await;
        assert!(matches!(result, Err(TransportError::Timeout(d)) if d == short));

        let result = call_binary(&crashes, list(), limit).await;
        assert!(
            matches!(result, Err(TransportError::Provider(ref msg)) if msg == "Provider exited with status: 3")
        );

        let result = call_binary(&silent, list(), limit).await;
        assert!(
            matches!(result, Err(TransportError::Provider(ref msg)) if msg == "Provider returned no response")
        );
    }
}
