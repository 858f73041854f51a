//! Identifier synthesis for Jiffy rows.
//!
//! Jiffy identifies every tree node and time entry by a UUID stored as two
//! signed 64-bit halves. Ids here come from a deterministic allocator: the
//! `most` half is a per-run namespace and the `least` half is a sequence
//! number, so ids are unique within a run and reproducible across runs.

use crate::resolve::EntityGraph;
use crate::types::{ProjectKey, TaskKey};
use serde::{Deserialize, Serialize};

/// A Jiffy UUID as its most/least significant halves.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct IdPair {
    pub most: i64,
    pub least: i64,
}

impl IdPair {
    pub const fn new(most: i64, least: i64) -> Self {
        Self { most, least }
    }
}

/// Parent id of a top-level project. Jiffy treats this pair as its tree root.
pub const ROOT_SENTINEL: IdPair = IdPair::new(-3163649470106615801, -7251036291185311208);

/// Default allocator namespace.
pub const DEFAULT_NAMESPACE: i64 = 0x7469_6d65_7368_6565;

/// Hands out id pairs from a namespace and a counter.
#[derive(Debug, Clone)]
pub struct IdAllocator {
    namespace: i64,
    next: i64,
}

impl IdAllocator {
    pub fn new(namespace: i64) -> Self {
        Self { namespace, next: 1 }
    }

    pub fn next_id(&mut self) -> IdPair {
        let mut id = IdPair::new(self.namespace, self.next);
        self.next += 1;
        if id == ROOT_SENTINEL {
            id = IdPair::new(self.namespace, self.next);
            self.next += 1;
        }
        id
    }
}

impl Default for IdAllocator {
    fn default() -> Self {
        Self::new(DEFAULT_NAMESPACE)
    }
}

/// Ids of every project and task in a graph, indexed like the graph.
#[derive(Debug, Clone, Default)]
pub struct IdAssignment {
    projects: Vec<IdPair>,
    tasks: Vec<IdPair>,
}

impl IdAssignment {
    /// Assign ids to all projects (in graph order), then all tasks.
    pub fn assign(graph: &EntityGraph, allocator: &mut IdAllocator) -> Self {
        let projects = graph.projects.iter().map(|_| allocator.next_id()).collect();
        let tasks = graph.tasks.iter().map(|_| allocator.next_id()).collect();
        Self { projects, tasks }
    }

    pub fn project(&self, key: ProjectKey) -> IdPair {
        self.projects[key.0]
    }

    pub fn task(&self, key: TaskKey) -> IdPair {
        self.tasks[key.0]
    }

    /// Id of a project's parent, or the root sentinel.
    pub fn parent_of(&self, parent: Option<ProjectKey>) -> IdPair {
        parent.map_or(ROOT_SENTINEL, |key| self.project(key))
    }
}
