//! Core entity types for the conversion graph.

use crate::error::{ConvertError, ConvertResult};
use chrono::{DateTime, FixedOffset};
use serde::Serialize;
use std::collections::BTreeSet;

/// Project status value meaning "active" in Timesheet exports.
pub const STATUS_ACTIVE: i64 = 1;

/// Index of a project in [`crate::resolve::EntityGraph::projects`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize)]
pub struct ProjectKey(pub usize);

/// Index of a task in [`crate::resolve::EntityGraph::tasks`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize)]
pub struct TaskKey(pub usize);

/// Where a project came from.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum ProjectOrigin {
    /// A `projects` record, keyed by its `projectId`.
    Source { project_id: String },
    /// Created by a reclassification rule.
    Synthetic,
}

/// A container in the Jiffy time tree.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Project {
    pub origin: ProjectOrigin,
    pub name: String,
    pub status: i64,
    pub color: i64,
    pub parent: Option<ProjectKey>,
}

impl Project {
    pub fn is_active(&self) -> bool {
        self.status == STATUS_ACTIVE
    }
}

/// Validated constructor for [`Project`], shared by source records and rules.
#[derive(Debug, Clone)]
pub struct ProjectBuilder {
    origin: ProjectOrigin,
    name: String,
    status: i64,
    color: i64,
    parent: Option<ProjectKey>,
}

impl ProjectBuilder {
    /// Builder for a project read from the source document.
    pub fn source(project_id: impl Into<String>, name: impl Into<String>) -> Self {
        Self::new(
            ProjectOrigin::Source {
                project_id: project_id.into(),
            },
            name,
        )
    }

    /// Builder for a project created by a rule.
    pub fn synthetic(name: impl Into<String>) -> Self {
        Self::new(ProjectOrigin::Synthetic, name)
    }

    fn new(origin: ProjectOrigin, name: impl Into<String>) -> Self {
        Self {
            origin,
            name: name.into(),
            status: STATUS_ACTIVE,
            color: 0,
            parent: None,
        }
    }

    pub fn status(mut self, status: i64) -> Self {
        self.status = status;
        self
    }

    pub fn color(mut self, color: i64) -> Self {
        self.color = color;
        self
    }

    pub fn parent(mut self, parent: ProjectKey) -> Self {
        self.parent = Some(parent);
        self
    }

    /// Finish the project. `existing` is the number of projects already in the
    /// graph; a parent must be one of them, which keeps the parent relation acyclic.
    pub fn build(self, existing: usize) -> ConvertResult<Project> {
        if let Some(parent) = self.parent {
            if parent.0 >= existing {
                return Err(ConvertError::InvalidProject(format!(
                    "parent {} of project {:?} does not exist yet",
                    parent.0, self.name
                )));
            }
        }
        Ok(Project {
            origin: self.origin,
            name: self.name,
            status: self.status,
            color: self.color,
            parent: self.parent,
        })
    }
}

/// A timed entry.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Task {
    /// Source `taskId`.
    pub task_id: String,
    pub project: ProjectKey,
    pub description: String,
    pub start: DateTime<FixedOffset>,
    pub end: DateTime<FixedOffset>,
    pub tags: BTreeSet<String>,
}

impl Task {
    pub fn has_tag(&self, tag: &str) -> bool {
        self.tags.contains(tag)
    }

    pub fn duration_ms(&self) -> i64 {
        (self.end - self.start).num_milliseconds()
    }
}

/// A pause inside a task, subtracted from the task's end.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Break {
    pub task_id: String,
    pub start: DateTime<FixedOffset>,
    pub end: DateTime<FixedOffset>,
}

/// A tag label. Only its name is ever used.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Tag {
    pub name: String,
}
