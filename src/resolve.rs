//! Entity resolution: source document → entity graph.
//!
//! Groups are processed strictly in the order projects, tasks, breaks, tags,
//! taskTags, since each group references ids registered by earlier ones. The
//! id → entity mappings live in an explicit [`ResolverContext`] that later
//! stages receive as needed.

use crate::error::{ConvertError, ConvertResult};
use crate::source::{
    GROUP_BREAKS, GROUP_PROJECTS, GROUP_TAGS, GROUP_TASK_TAGS, GROUP_TASKS, Record, SourceDocument,
};
use crate::time::parse_timestamp;
use crate::types::{Break, Project, ProjectBuilder, ProjectKey, Tag, Task, TaskKey};
use std::collections::{BTreeSet, HashMap};
use tracing::{debug, warn};

/// Projects and tasks of one conversion run.
#[derive(Debug, Clone, Default)]
pub struct EntityGraph {
    pub projects: Vec<Project>,
    pub tasks: Vec<Task>,
}

impl EntityGraph {
    pub fn new() -> Self {
        Self::default()
    }

    /// Build and append a project.
    pub fn add_project(&mut self, builder: ProjectBuilder) -> ConvertResult<ProjectKey> {
        let project = builder.build(self.projects.len())?;
        self.projects.push(project);
        Ok(ProjectKey(self.projects.len() - 1))
    }

    pub fn add_task(&mut self, task: Task) -> TaskKey {
        self.tasks.push(task);
        TaskKey(self.tasks.len() - 1)
    }

    pub fn project(&self, key: ProjectKey) -> &Project {
        &self.projects[key.0]
    }

    pub fn task(&self, key: TaskKey) -> &Task {
        &self.tasks[key.0]
    }

    pub fn task_mut(&mut self, key: TaskKey) -> &mut Task {
        &mut self.tasks[key.0]
    }

    /// Keys of all projects with the given name.
    pub fn projects_named(&self, name: &str) -> Vec<ProjectKey> {
        self.projects
            .iter()
            .enumerate()
            .filter(|(_, p)| p.name == name)
            .map(|(i, _)| ProjectKey(i))
            .collect()
    }
}

/// Lookup tables from source-document ids to resolved entities.
#[derive(Debug, Clone, Default)]
pub struct ResolverContext {
    projects: HashMap<String, ProjectKey>,
    tasks: HashMap<String, TaskKey>,
    tags: HashMap<String, Tag>,
}

impl ResolverContext {
    pub fn project(&self, project_id: &str) -> Option<ProjectKey> {
        self.projects.get(project_id).copied()
    }

    pub fn task(&self, task_id: &str) -> Option<TaskKey> {
        self.tasks.get(task_id).copied()
    }

    pub fn tag(&self, tag_id: &str) -> Option<&Tag> {
        self.tags.get(tag_id)
    }

    fn register_project(&mut self, project_id: &str, key: ProjectKey) {
        if self.projects.insert(project_id.to_string(), key).is_some() {
            warn!(project_id = %project_id, "Duplicate projectId, later record wins");
        }
    }

    fn register_task(&mut self, task_id: &str, key: TaskKey) {
        if self.tasks.insert(task_id.to_string(), key).is_some() {
            warn!(task_id = %task_id, "Duplicate taskId, later record wins");
        }
    }

    fn register_tag(&mut self, tag_id: &str, tag: Tag) {
        if self.tags.insert(tag_id.to_string(), tag).is_some() {
            warn!(tag_id = %tag_id, "Duplicate tagId, later record wins");
        }
    }
}

/// Output of [`resolve`]: the graph, its lookup tables, and the breaks still
/// to be applied.
#[derive(Debug, Clone)]
pub struct Resolved {
    pub graph: EntityGraph,
    pub context: ResolverContext,
    pub breaks: Vec<Break>,
}

/// Resolve every entity of the document.
pub fn resolve(doc: &SourceDocument) -> ConvertResult<Resolved> {
    let mut graph = EntityGraph::new();
    let mut context = ResolverContext::default();

    for (index, record) in doc.group(GROUP_PROJECTS).iter().enumerate() {
        let field = |name| require(record, GROUP_PROJECTS, index, name);
        let project_id = field("projectId")?;
        let builder = ProjectBuilder::source(project_id, field("name")?)
            .status(parse_int(record, GROUP_PROJECTS, index, "status")?)
            .color(parse_int(record, GROUP_PROJECTS, index, "color")?);
        let key = graph.add_project(builder)?;
        context.register_project(project_id, key);
    }

    for (index, record) in doc.group(GROUP_TASKS).iter().enumerate() {
        let field = |name| require(record, GROUP_TASKS, index, name);
        let task_id = field("taskId")?;
        let project_id = field("projectId")?;
        let project = context
            .project(project_id)
            .ok_or_else(|| ConvertError::dangling(GROUP_TASKS, index, "project", project_id))?;
        let task = Task {
            task_id: task_id.to_string(),
            project,
            description: field("description")?.to_string(),
            start: parse_timestamp(field("startDate")?)?,
            end: parse_timestamp(field("endDate")?)?,
            tags: BTreeSet::new(),
        };
        let key = graph.add_task(task);
        context.register_task(task_id, key);
    }

    let mut breaks = Vec::new();
    for (index, record) in doc.group(GROUP_BREAKS).iter().enumerate() {
        let field = |name| require(record, GROUP_BREAKS, index, name);
        breaks.push(Break {
            task_id: field("taskId")?.to_string(),
            start: parse_timestamp(field("startDate")?)?,
            end: parse_timestamp(field("endDate")?)?,
        });
    }

    for (index, record) in doc.group(GROUP_TAGS).iter().enumerate() {
        let field = |name| require(record, GROUP_TAGS, index, name);
        let tag = Tag {
            name: field("name")?.to_string(),
        };
        context.register_tag(field("tagId")?, tag);
    }

    for (index, record) in doc.group(GROUP_TASK_TAGS).iter().enumerate() {
        let field = |name| require(record, GROUP_TASK_TAGS, index, name);
        let tag_id = field("tagId")?;
        let task_id = field("taskId")?;
        let tag = context
            .tag(tag_id)
            .ok_or_else(|| ConvertError::dangling(GROUP_TASK_TAGS, index, "tag", tag_id))?;
        let task = context
            .task(task_id)
            .ok_or_else(|| ConvertError::dangling(GROUP_TASK_TAGS, index, "task", task_id))?;
        graph.task_mut(task).tags.insert(tag.name.clone());
    }

    debug!(
        projects = graph.projects.len(),
        tasks = graph.tasks.len(),
        breaks = breaks.len(),
        "Resolved source entities"
    );

    Ok(Resolved {
        graph,
        context,
        breaks,
    })
}

fn require<'a>(
    record: &'a Record,
    group: &'static str,
    index: usize,
    field: &'static str,
) -> ConvertResult<&'a str> {
    record
        .field(field)
        .ok_or(ConvertError::UnknownField {
            group,
            index,
            field,
        })
}

fn parse_int(
    record: &Record,
    group: &'static str,
    index: usize,
    field: &'static str,
) -> ConvertResult<i64> {
    let value = require(record, group, index, field)?;
    value
        .trim()
        .parse()
        .map_err(|_| ConvertError::InvalidFieldValue {
            group,
            index,
            field,
            value: value.to_string(),
        })
}
