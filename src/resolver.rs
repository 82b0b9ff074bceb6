use anyhow::Result;
use std::io::{BufRead, Write};
use tracing::info;

use crate::control::ControlPlane;
use crate::lister;
use crate::model::{Level, Resolved, Scope};
use crate::selector::Selector;

/// Walks cluster, service, task and container in that order. Each selection
/// scopes the next listing; any failure aborts the whole walk.
pub async fn resolve<C, R, W>(control: &C, selector: &mut Selector<R, W>) -> Result<Resolved>
where
    C: ControlPlane,
    R: BufRead,
    W: Write,
{
    let cluster = selector.select(Level::Cluster, lister::list(control, Scope::Root).await?)?;

    let services = lister::list(control, Scope::Cluster { cluster: &cluster }).await?;
    let service = selector.select(Level::Service, services)?;

    let tasks = lister::list(
        control,
        Scope::Service {
            cluster: &cluster,
            service: &service,
        },
    )
    .await?;
    let task = selector.select(Level::Task, tasks)?;

    let containers = lister::list(
        control,
        Scope::Task {
            cluster: &cluster,
            task: &task,
        },
    )
    .await?;
    let container = selector.select(Level::Container, containers)?;

    info!(%cluster, %service, %task, %container, "resolved container");
    Ok(Resolved {
        cluster,
        service,
        task,
        container,
    })
}

#[cfg(test)]
mod tests {
    use super::resolve;
    use crate::control::fake::FakeControlPlane;
    use crate::selector::Selector;
    use std::io::Cursor;

    fn selector(input: &str) -> Selector<Cursor<Vec<u8>>, Vec<u8>> {
        Selector::new(Cursor::new(input.as_bytes().to_vec()), Vec::new())
    }

    fn single_path() -> FakeControlPlane {
        FakeControlPlane::new()
            .cluster("prod")
            .service("prod", "api")
            .tasks("prod", "api", &["t1", "t2"])
            .containers("prod", "t1", &[("web", Some("t1-1"))])
            .containers("prod", "t2", &[("web", Some("t2-1"))])
    }

    #[tokio::test]
    async fn operator_choice_at_task_level_is_threaded_through() {
        let control = single_path();
        let mut selector = selector("2\n");

        let resolved = resolve(&control, &mut selector).await.expect("resolve");
        assert_eq!(resolved.cluster, "prod");
        assert_eq!(resolved.service, "api");
        assert_eq!(resolved.task, "t2");
        assert_eq!(resolved.container, "web");

        let output = String::from_utf8(selector.into_output()).expect("utf8");
        assert!(output.contains("\nchoose task:\n1: t1\n2: t2\ninput number: \n"));
        assert!(output.contains("\nchoose container:\n1: web\ninput number: 1\n"));
        assert_eq!(output.matches("input number: 1\n").count(), 3);
    }

    #[tokio::test]
    async fn listers_run_in_order_with_prior_selections() {
        let control = single_path();
        let mut selector = selector("1\n");

        resolve(&control, &mut selector).await.expect("resolve");
        assert_eq!(
            control.calls(),
            vec![
                "list_clusters",
                "describe_clusters 1",
                "list_services prod",
                "describe_services prod 1",
                "list_tasks prod/api",
                "describe_tasks prod/t1",
            ]
        );
    }

    #[tokio::test]
    async fn zero_clusters_abort_before_any_prompt() {
        let control = FakeControlPlane::new();
        let mut selector = selector("1\n");

        let error = resolve(&control, &mut selector)
            .await
            .expect_err("no clusters");
        assert_eq!(error.to_string(), "no cluster found");
        assert!(selector.into_output().is_empty());
    }

    #[tokio::test]
    async fn empty_later_level_aborts_the_walk() {
        let control = FakeControlPlane::new().cluster("prod").service("prod", "api");
        let mut selector = selector("");

        let error = resolve(&control, &mut selector)
            .await
            .expect_err("no tasks");
        assert_eq!(error.to_string(), "no task found");
        assert_eq!(control.calls().last().map(String::as_str), Some("list_tasks prod/api"));
    }

    #[tokio::test]
    async fn remote_failure_stops_further_listing() {
        let control = single_path().fail_on("list_services");
        let mut selector = selector("");

        let error = resolve(&control, &mut selector)
            .await
            .expect_err("failure");
        assert!(error.to_string().contains("list_services failed"));
        assert!(!control.calls().iter().any(|call| call.starts_with("list_tasks")));
    }
}
