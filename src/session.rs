use anyhow::{Context, Result};
use std::io::Write;
use tracing::{debug, warn};

use crate::control::{ControlPlane, ExecRequest};
use crate::model::{SessionBundle, TargetDescriptor};

/// Opens an interactive execute-command session for the resolved container
/// and builds the transport target for it.
///
/// The session banner goes to `out` as soon as execute-command succeeds. The
/// runtime id comes from a fresh task describe. When no container record
/// matches, the target is built with an empty runtime segment.
pub async fn negotiate<C: ControlPlane, W: Write>(
    control: &C,
    out: &mut W,
    cluster: &str,
    task: &str,
    container: &str,
    shell: &str,
) -> Result<(SessionBundle, TargetDescriptor)> {
    let session = control
        .execute_command(&ExecRequest {
            cluster,
            task,
            container,
            command: shell,
            interactive: true,
        })
        .await?;
    writeln!(out, "\nstart interactive session:").context("failed to write session banner")?;
    out.flush().context("failed to flush session banner")?;

    let runtime_id = runtime_id(control, cluster, task, container).await?;
    let target = TargetDescriptor::compose(
        cluster,
        task,
        runtime_id.as_deref().unwrap_or_default(),
    );
    debug!(%target, "negotiated session target");

    Ok((session, target))
}

async fn runtime_id<C: ControlPlane>(
    control: &C,
    cluster: &str,
    task: &str,
    container: &str,
) -> Result<Option<String>> {
    let runtime_id = control
        .describe_task_containers(cluster, task)
        .await?
        .into_iter()
        .find(|record| record.name == container)
        .and_then(|record| record.runtime_id);
    if runtime_id.is_none() {
        warn!(%task, %container, "no runtime id for container, target segment left empty");
    }
    Ok(runtime_id)
}
