use serde::Serialize;
use std::fmt::{Debug, Display, Formatter};

/// The four nested levels an operator drills through, coarsest first.
#[derive(Debug, Clone, Copy, Eq, PartialEq, Hash)]
pub enum Level {
    Cluster,
    Service,
    Task,
    Container,
}

/// What a candidate string at a level actually is.
#[derive(Debug, Clone, Copy, Eq, PartialEq)]
pub enum NameKind {
    /// A friendly name resolved through a describe call.
    DisplayName,
    /// The control-plane identifier itself (an ARN), usable for re-querying.
    RawIdentifier,
}

impl Level {
    pub fn label(self) -> &'static str {
        match self {
            Self::Cluster => "cluster",
            Self::Service => "service",
            Self::Task => "task",
            Self::Container => "container",
        }
    }

    /// Tasks have no friendlier name than their ARN, and the negotiator
    /// needs that ARN to query the task again.
    pub fn name_kind(self) -> NameKind {
        match self {
            Self::Task => NameKind::RawIdentifier,
            Self::Cluster | Self::Service | Self::Container => NameKind::DisplayName,
        }
    }
}

impl Display for Level {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.label())
    }
}

/// Ordered candidates for one level, rebuilt on every listing.
pub type CandidateSet = Vec<String>;

/// Parent scope handed to a lister. Each variant carries exactly the
/// selections made so far that the next level needs.
#[derive(Debug, Clone, Copy, Eq, PartialEq)]
pub enum Scope<'a> {
    Root,
    Cluster { cluster: &'a str },
    Service { cluster: &'a str, service: &'a str },
    Task { cluster: &'a str, task: &'a str },
}

impl Scope<'_> {
    /// The level this scope lists candidates for.
    pub fn level(&self) -> Level {
        match self {
            Self::Root => Level::Cluster,
            Self::Cluster { .. } => Level::Service,
            Self::Service { .. } => Level::Task,
            Self::Task { .. } => Level::Container,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Resolved {
    pub cluster: String,
    pub service: String,
    /// Task ARN, see [`Level::name_kind`].
    pub task: String,
    pub container: String,
}

/// Credentials for one execute-command session. Single use, never logged.
#[derive(Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "PascalCase")]
pub struct SessionBundle {
    pub session_id: String,
    pub stream_url: String,
    pub token_value: String,
}

impl Debug for SessionBundle {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SessionBundle")
            .field("session_id", &self.session_id)
            .field("stream_url", &"<redacted>")
            .field("token_value", &"<redacted>")
            .finish()
    }
}

/// Routing string for the transport: `ecs:<cluster>_<task-id>_<runtime-id>`.
///
/// The task segment is the task id, the final path segment of the task ARN,
/// not the full ARN. The runtime segment may be empty.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TargetDescriptor(String);

impl TargetDescriptor {
    pub const PREFIX: &'static str = "ecs:";
    pub const DELIMITER: char = '_';

    pub fn compose(cluster: &str, task: &str, runtime_id: &str) -> Self {
        Self(format!(
            "{}{cluster}{delim}{}{delim}{runtime_id}",
            Self::PREFIX,
            task_id(task),
            delim = Self::DELIMITER,
        ))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl Display for TargetDescriptor {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.0)
    }
}

/// Final path segment of a task ARN. Bare ids pass through unchanged.
pub fn task_id(task: &str) -> &str {
    task.rsplit('/').next().unwrap_or(task)
}
