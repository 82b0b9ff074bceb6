use anyhow::{Context, Result};
use serde::Serialize;
use std::process::{ExitStatus, Stdio};
use tokio::process::Command as TokioCommand;
use tracing::debug;

use crate::config::{Settings, TRANSPORT_OPERATION};
use crate::model::{SessionBundle, TargetDescriptor};

#[derive(Serialize)]
struct TargetPayload<'a> {
    #[serde(rename = "Target")]
    target: &'a str,
}

/// Materialized transport command line. Holds the session token; not `Debug`.
pub struct TransportInvocation {
    program: String,
    args: Vec<String>,
}

impl TransportInvocation {
    pub fn new(
        settings: &Settings,
        session: &SessionBundle,
        target: &TargetDescriptor,
    ) -> Result<Self> {
        let session = serde_json::to_string(session).context("failed to serialize session")?;
        let target = serde_json::to_string(&TargetPayload {
            target: target.as_str(),
        })
        .context("failed to serialize target")?;

        Ok(Self {
            program: settings.transport_program.clone(),
            args: vec![
                session,
                settings.region.clone(),
                TRANSPORT_OPERATION.to_string(),
                settings.profile.clone(),
                target,
                settings.endpoint_url(),
            ],
        })
    }

    /// Runs the transport with the operator's stdio attached and waits for it
    /// to exit. The exit status is returned as-is.
    pub async fn launch(self) -> Result<ExitStatus> {
        debug!(program = %self.program, "starting session transport");
        let status = TokioCommand::new(&self.program)
            .args(&self.args)
            .stdin(Stdio::inherit())
            .stdout(Stdio::inherit())
            .stderr(Stdio::inherit())
            .status()
            .await
            .with_context(|| {
                format!("failed to run {} (is it installed and on PATH?)", self.program)
            })?;
        debug!(%status, "session transport exited");
        Ok(status)
    }
}
