use anyhow::Result;
use tracing::{debug, warn};

use crate::control::ControlPlane;
use crate::model::{CandidateSet, Level, Scope};

/// Builds the candidate set for the level below `scope`.
///
/// Cluster and service candidates are display names taken from a describe
/// call over the listed ARNs. Task candidates are the raw task ARNs.
/// Container candidates are the container names of the single described task.
/// Blank names are dropped at every level.
pub async fn list<C: ControlPlane>(control: &C, scope: Scope<'_>) -> Result<CandidateSet> {
    let candidates = match scope {
        Scope::Root => list_clusters(control).await?,
        Scope::Cluster { cluster } => list_services(control, cluster).await?,
        Scope::Service { cluster, service } => control.list_task_arns(cluster, service).await?,
        Scope::Task { cluster, task } => list_containers(control, cluster, task).await?,
    };
    let level = scope.level();
    let candidates = drop_blank(level, candidates);
    debug!(
        %level,
        kind = ?level.name_kind(),
        count = candidates.len(),
        "listed candidates"
    );
    Ok(candidates)
}

fn drop_blank(level: Level, candidates: CandidateSet) -> CandidateSet {
    candidates
        .into_iter()
        .enumerate()
        .filter_map(|(index, name)| {
            if name.trim().is_empty() {
                warn!(%level, position = index + 1, "dropping blank candidate name");
                None
            } else {
                Some(name)
            }
        })
        .collect()
}

async fn list_clusters<C: ControlPlane>(control: &C) -> Result<CandidateSet> {
    let arns = control.list_cluster_arns().await?;
    if arns.is_empty() {
        return Ok(Vec::new());
    }
    control.describe_cluster_names(&arns).await
}

async fn list_services<C: ControlPlane>(control: &C, cluster: &str) -> Result<CandidateSet> {
    let arns = control.list_service_arns(cluster).await?;
    if arns.is_empty() {
        return Ok(Vec::new());
    }
    control.describe_service_names(cluster, &arns).await
}

async fn list_containers<C: ControlPlane>(
    control: &C,
    cluster: &str,
    task: &str,
) -> Result<CandidateSet> {
    Ok(control
        .describe_task_containers(cluster, task)
        .await?
        .into_iter()
        .map(|record| record.name)
        .collect())
}
