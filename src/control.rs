use crate::model::SessionBundle;
use anyhow::Result;

/// One container entry of a described task.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ContainerRecord {
    pub name: String,
    pub runtime_id: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ExecRequest<'a> {
    pub cluster: &'a str,
    pub task: &'a str,
    pub container: &'a str,
    pub command: &'a str,
    pub interactive: bool,
}

/// Read calls and execute-command against the orchestration control plane.
///
/// List calls return identifiers in control-plane order across all pages;
/// describe calls return names in the order of the identifiers passed in.
pub trait ControlPlane {
    async fn list_cluster_arns(&self) -> Result<Vec<String>>;

    async fn describe_cluster_names(&self, arns: &[String]) -> Result<Vec<String>>;

    async fn list_service_arns(&self, cluster: &str) -> Result<Vec<String>>;

    async fn describe_service_names(&self, cluster: &str, arns: &[String]) -> Result<Vec<String>>;

    async fn list_task_arns(&self, cluster: &str, service: &str) -> Result<Vec<String>>;

    async fn describe_task_containers(
        &self,
        cluster: &str,
        task: &str,
    ) -> Result<Vec<ContainerRecord>>;

    async fn execute_command(&self, request: &ExecRequest<'_>) -> Result<SessionBundle>;
}
