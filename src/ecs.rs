use anyhow::{Context, Result, bail};
use aws_config::{BehaviorVersion, Region};
use aws_sdk_ecs::Client;
use aws_sdk_ecs::types::Failure;
use tracing::{debug, warn};

use crate::control::{ContainerRecord, ControlPlane, ExecRequest};
use crate::model::SessionBundle;

const DESCRIBE_CLUSTERS_CHUNK: usize = 100;
const DESCRIBE_SERVICES_CHUNK: usize = 10;

/// [`ControlPlane`] backed by the ECS API.
#[derive(Clone)]
pub struct EcsGateway {
    client: Client,
}

impl EcsGateway {
    pub async fn new(region: &str, profile: &str) -> Self {
        let config = aws_config::defaults(BehaviorVersion::latest())
            .region(Region::new(region.to_string()))
            .profile_name(profile)
            .load()
            .await;
        debug!(%region, %profile, "loaded aws config");

        Self {
            client: Client::new(&config),
        }
    }
}

impl ControlPlane for EcsGateway {
    async fn list_cluster_arns(&self) -> Result<Vec<String>> {
        let arns = self
            .client
            .list_clusters()
            .into_paginator()
            .items()
            .send()
            .try_collect()
            .await
            .context("failed to list clusters")?;
        debug!(count = arns.len(), "listed clusters");
        Ok(arns)
    }

    async fn describe_cluster_names(&self, arns: &[String]) -> Result<Vec<String>> {
        let mut names = Vec::with_capacity(arns.len());
        for chunk in arns.chunks(DESCRIBE_CLUSTERS_CHUNK) {
            let output = self
                .client
                .describe_clusters()
                .set_clusters(Some(chunk.to_vec()))
                .send()
                .await
                .context("failed to describe clusters")?;
            warn_failures("describe clusters", output.failures());
            names.extend(
                output
                    .clusters()
                    .iter()
                    .filter_map(|cluster| cluster.cluster_name())
                    .map(str::to_string),
            );
        }
        Ok(names)
    }

    async fn list_service_arns(&self, cluster: &str) -> Result<Vec<String>> {
        let arns = self
            .client
            .list_services()
            .cluster(cluster)
            .into_paginator()
            .items()
            .send()
            .try_collect()
            .await
            .with_context(|| format!("failed to list services in cluster {cluster}"))?;
        debug!(%cluster, count = arns.len(), "listed services");
        Ok(arns)
    }

    async fn describe_service_names(&self, cluster: &str, arns: &[String]) -> Result<Vec<String>> {
        let mut names = Vec::with_capacity(arns.len());
        for chunk in arns.chunks(DESCRIBE_SERVICES_CHUNK) {
            let output = self
                .client
                .describe_services()
                .cluster(cluster)
                .set_services(Some(chunk.to_vec()))
                .send()
                .await
                .with_context(|| format!("failed to describe services in cluster {cluster}"))?;
            warn_failures("describe services", output.failures());
            names.extend(
                output
                    .services()
                    .iter()
                    .filter_map(|service| service.service_name())
                    .map(str::to_string),
            );
        }
        Ok(names)
    }

    async fn list_task_arns(&self, cluster: &str, service: &str) -> Result<Vec<String>> {
        let arns = self
            .client
            .list_tasks()
            .cluster(cluster)
            .service_name(service)
            .into_paginator()
            .items()
            .send()
            .try_collect()
            .await
            .with_context(|| format!("failed to list tasks for {cluster}/{service}"))?;
        debug!(%cluster, %service, count = arns.len(), "listed tasks");
        Ok(arns)
    }

    async fn describe_task_containers(
        &self,
        cluster: &str,
        task: &str,
    ) -> Result<Vec<ContainerRecord>> {
        let output = self
            .client
            .describe_tasks()
            .cluster(cluster)
            .tasks(task)
            .send()
            .await
            .with_context(|| format!("failed to describe task {task} in cluster {cluster}"))?;
        warn_failures("describe tasks", output.failures());

        let Some(record) = output.tasks().first() else {
            bail!("task {task} not found in cluster {cluster}");
        };
        Ok(record
            .containers()
            .iter()
            .filter_map(|container| {
                container.name().map(|name| ContainerRecord {
                    name: name.to_string(),
                    runtime_id: container.runtime_id().map(str::to_string),
                })
            })
            .collect())
    }

    async fn execute_command(&self, request: &ExecRequest<'_>) -> Result<SessionBundle> {
        let output = self
            .client
            .execute_command()
            .cluster(request.cluster)
            .task(request.task)
            .container(request.container)
            .command(request.command)
            .interactive(request.interactive)
            .send()
            .await
            .with_context(|| {
                format!(
                    "failed to execute command in container {} of task {}",
                    request.container, request.task
                )
            })?;

        let Some(session) = output.session() else {
            bail!(
                "execute command for container {} returned no session",
                request.container
            );
        };
        debug!(container = request.container, "execute command session created");

        Ok(SessionBundle {
            session_id: session.session_id().unwrap_or_default().to_string(),
            stream_url: session.stream_url().unwrap_or_default().to_string(),
            token_value: session.token_value().unwrap_or_default().to_string(),
        })
    }
}

fn warn_failures(call: &str, failures: &[Failure]) {
    for failure in failures {
        warn!(
            call,
            arn = failure.arn().unwrap_or("-"),
            reason = failure.reason().unwrap_or("-"),
            "control plane reported a failure"
        );
    }
}

#[cfg(test)]
mod tests {
    use super::EcsGateway;
    use crate::control::ControlPlane;
    use aws_sdk_ecs::Client;
    use aws_sdk_ecs::operation::describe_clusters::DescribeClustersOutput;
    use aws_sdk_ecs::operation::describe_services::DescribeServicesOutput;
    use aws_sdk_ecs::operation::describe_tasks::DescribeTasksOutput;
    use aws_sdk_ecs::operation::list_tasks::ListTasksOutput;
    use aws_sdk_ecs::types::{Cluster, Container, Service, Task};
    use aws_smithy_mocks::{RuleMode, mock, mock_client};
    use std::ops::Range;

    const ARN_PREFIX: &str = "arn:aws:ecs:ap-northeast-1:000000000000";

    fn services_page(range: Range<usize>) -> DescribeServicesOutput {
        range
            .fold(DescribeServicesOutput::builder(), |builder, index| {
                builder.services(Service::builder().service_name(format!("svc-{index}")).build())
            })
            .build()
    }

    fn clusters_page(range: Range<usize>) -> DescribeClustersOutput {
        range
            .fold(DescribeClustersOutput::builder(), |builder, index| {
                builder.clusters(Cluster::builder().cluster_name(format!("cl-{index}")).build())
            })
            .build()
    }

    #[tokio::test]
    async fn describe_services_goes_out_in_chunks_of_ten() {
        let first = mock!(Client::describe_services)
            .match_requests(|input| input.cluster() == Some("prod") && input.services().len() == 10)
            .then_output(|| services_page(0..10));
        let second = mock!(Client::describe_services)
            .match_requests(|input| input.services().len() == 1)
            .then_output(|| services_page(10..11));
        let gateway = EcsGateway {
            client: mock_client!(aws_sdk_ecs, RuleMode::Sequential, [&first, &second]),
        };

        let arns = (0..11)
            .map(|index| format!("{ARN_PREFIX}:service/prod/svc-{index}"))
            .collect::<Vec<_>>();
        let names = gateway
            .describe_service_names("prod", &arns)
            .await
            .expect("describe services");

        let expected = (0..11)
            .map(|index| format!("svc-{index}"))
            .collect::<Vec<_>>();
        assert_eq!(names, expected);
        assert_eq!(first.num_calls(), 1);
        assert_eq!(second.num_calls(), 1);
    }

    #[tokio::test]
    async fn describe_clusters_goes_out_in_chunks_of_one_hundred() {
        let first = mock!(Client::describe_clusters)
            .match_requests(|input| input.clusters().len() == 100)
            .then_output(|| clusters_page(0..100));
        let second = mock!(Client::describe_clusters)
            .match_requests(|input| input.clusters().len() == 1)
            .then_output(|| clusters_page(100..101));
        let gateway = EcsGateway {
            client: mock_client!(aws_sdk_ecs, RuleMode::Sequential, [&first, &second]),
        };

        let arns = (0..101)
            .map(|index| format!("{ARN_PREFIX}:cluster/cl-{index}"))
            .collect::<Vec<_>>();
        let names = gateway
            .describe_cluster_names(&arns)
            .await
            .expect("describe clusters");

        assert_eq!(names.len(), 101);
        assert_eq!(names.first().map(String::as_str), Some("cl-0"));
        assert_eq!(names.last().map(String::as_str), Some("cl-100"));
        assert_eq!(first.num_calls(), 1);
        assert_eq!(second.num_calls(), 1);
    }

    #[tokio::test]
    async fn list_tasks_concatenates_pages() {
        let first = mock!(Client::list_tasks)
            .match_requests(|input| {
                input.cluster() == Some("prod")
                    && input.service_name() == Some("api")
                    && input.next_token().is_none()
            })
            .then_output(|| {
                ListTasksOutput::builder()
                    .task_arns("t1")
                    .task_arns("t2")
                    .next_token("page-2")
                    .build()
            });
        let second = mock!(Client::list_tasks)
            .match_requests(|input| input.next_token() == Some("page-2"))
            .then_output(|| ListTasksOutput::builder().task_arns("t3").build());
        let gateway = EcsGateway {
            client: mock_client!(aws_sdk_ecs, RuleMode::Sequential, [&first, &second]),
        };

        let arns = gateway
            .list_task_arns("prod", "api")
            .await
            .expect("list tasks");
        assert_eq!(arns, vec!["t1", "t2", "t3"]);
        assert_eq!(second.num_calls(), 1);
    }

    #[tokio::test]
    async fn describe_tasks_without_record_is_not_found() {
        let empty =
            mock!(Client::describe_tasks).then_output(|| DescribeTasksOutput::builder().build());
        let gateway = EcsGateway {
            client: mock_client!(aws_sdk_ecs, [&empty]),
        };

        let error = gateway
            .describe_task_containers("prod", "t9")
            .await
            .expect_err("missing task");
        assert_eq!(error.to_string(), "task t9 not found in cluster prod");
    }

    #[tokio::test]
    async fn describe_tasks_maps_container_records() {
        let described = mock!(Client::describe_tasks).then_output(|| {
            DescribeTasksOutput::builder()
                .tasks(
                    Task::builder()
                        .containers(Container::builder().name("web").runtime_id("t1-1").build())
                        .containers(Container::builder().name("sidecar").build())
                        .build(),
                )
                .build()
        });
        let gateway = EcsGateway {
            client: mock_client!(aws_sdk_ecs, [&described]),
        };

        let records = gateway
            .describe_task_containers("prod", "t1")
            .await
            .expect("describe task");
        assert_eq!(records.len(), 2);
        assert_eq!(records[0].name, "web");
        assert_eq!(records[0].runtime_id.as_deref(), Some("t1-1"));
        assert_eq!(records[1].runtime_id, None);
    }
}
