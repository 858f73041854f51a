//! Row projection: entity graph + ids → Jiffy table rows.

use crate::ids::IdAssignment;
use crate::resolve::EntityGraph;
use crate::types::{ProjectKey, TaskKey};
use rusqlite::ToSql;
use serde::Serialize;

/// `lastChanged` written on every tree row.
pub const PROJECT_LAST_CHANGED: i64 = 1509195055725;

/// `lastChanged` written on every time row.
pub const TASK_LAST_CHANGED: i64 = 1509195002928;

/// Fixed values of the projection that Jiffy lets vary per install.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RowSettings {
    pub user_id: i64,
    pub zone: String,
}

impl Default for RowSettings {
    fn default() -> Self {
        Self {
            user_id: 1,
            zone: "America/Sao_Paulo".to_string(),
        }
    }
}

/// One `jiffy_time_tree` row.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ProjectRow {
    pub user_id: i64,
    pub name: String,
    pub color: i64,
    pub archived: &'static str,
    pub worktime: i64,
    pub row_state: i64,
    pub id_most: i64,
    pub id_least: i64,
    pub parent_id_most: i64,
    pub parent_id_least: i64,
    pub local: &'static str,
    pub expanded: &'static str,
    pub server_timestamp: &'static str,
    pub last_changed: i64,
    pub shared_from_id_most: i64,
    pub shared_from_id_least: i64,
}

impl ProjectRow {
    /// Positional parameters, in table column order.
    pub fn params(&self) -> [&dyn ToSql; 16] {
        [
            &self.user_id,
            &self.name,
            &self.color,
            &self.archived,
            &self.worktime,
            &self.row_state,
            &self.id_most,
            &self.id_least,
            &self.parent_id_most,
            &self.parent_id_least,
            &self.local,
            &self.expanded,
            &self.server_timestamp,
            &self.last_changed,
            &self.shared_from_id_most,
            &self.shared_from_id_least,
        ]
    }
}

/// One `jiffy_times` row.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct TaskRow {
    pub user_id: i64,
    pub start_time_millis: i64,
    pub stop_time_millis: i64,
    pub row_state: i64,
    pub note: String,
    pub start_zone: String,
    pub stop_zone: String,
    pub id_most: i64,
    pub id_least: i64,
    pub owner_id_most: i64,
    pub owner_id_least: i64,
    pub local: &'static str,
    pub server_timestamp: i64,
    pub last_changed: i64,
    pub worktime: &'static str,
    pub locked: &'static str,
}

impl TaskRow {
    /// Positional parameters, in table column order.
    pub fn params(&self) -> [&dyn ToSql; 16] {
        [
            &self.user_id,
            &self.start_time_millis,
            &self.stop_time_millis,
            &self.row_state,
            &self.note,
            &self.start_zone,
            &self.stop_zone,
            &self.id_most,
            &self.id_least,
            &self.owner_id_most,
            &self.owner_id_least,
            &self.local,
            &self.server_timestamp,
            &self.last_changed,
            &self.worktime,
            &self.locked,
        ]
    }
}

/// Project a project to its tree row.
pub fn project_row(
    graph: &EntityGraph,
    ids: &IdAssignment,
    settings: &RowSettings,
    key: ProjectKey,
) -> ProjectRow {
    let project = graph.project(key);
    let id = ids.project(key);
    let parent = ids.parent_of(project.parent);
    ProjectRow {
        user_id: settings.user_id,
        name: project.name.clone(),
        color: project.color,
        archived: if project.is_active() { "true" } else { "false" },
        worktime: 0,
        row_state: 0,
        id_most: id.most,
        id_least: id.least,
        parent_id_most: parent.most,
        parent_id_least: parent.least,
        local: "true",
        expanded: "true",
        server_timestamp: "",
        last_changed: PROJECT_LAST_CHANGED,
        shared_from_id_most: 0,
        shared_from_id_least: 0,
    }
}

/// Project a task to its time row.
pub fn task_row(
    graph: &EntityGraph,
    ids: &IdAssignment,
    settings: &RowSettings,
    key: TaskKey,
) -> TaskRow {
    let task = graph.task(key);
    let id = ids.task(key);
    let owner = ids.project(task.project);
    TaskRow {
        user_id: settings.user_id,
        start_time_millis: task.start.timestamp_millis(),
        stop_time_millis: task.end.timestamp_millis(),
        row_state: 0,
        note: task.description.clone(),
        start_zone: settings.zone.clone(),
        stop_zone: settings.zone.clone(),
        id_most: id.most,
        id_least: id.least,
        owner_id_most: owner.most,
        owner_id_least: owner.least,
        local: "true",
        server_timestamp: -1,
        last_changed: TASK_LAST_CHANGED,
        worktime: "",
        locked: "",
    }
}

/// Rows for every project and task of the graph.
pub fn project_rows(
    graph: &EntityGraph,
    ids: &IdAssignment,
    settings: &RowSettings,
) -> (Vec<ProjectRow>, Vec<TaskRow>) {
    let projects = (0..graph.projects.len())
        .map(|i| project_row(graph, ids, settings, ProjectKey(i)))
        .collect();
    let tasks = (0..graph.tasks.len())
        .map(|i| task_row(graph, ids, settings, TaskKey(i)))
        .collect();
    (projects, tasks)
}
