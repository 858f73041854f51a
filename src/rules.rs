//! Reclassification rules.
//!
//! A rule creates a sub-project ("bucket") under an anchor project and moves
//! every anchor task carrying a given tag into it. The default rule files
//! tagged contest sessions of the "Maratona" project under "Contests".

use crate::error::{ConvertError, ConvertResult};
use crate::resolve::EntityGraph;
use crate::types::{ProjectBuilder, ProjectKey};
use serde::{Deserialize, Serialize};
use tracing::info;

/// Create a bucket under `anchor_project` and move tasks tagged `tag` into it.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ReclassifyRule {
    /// Name of the existing project to split. Must match exactly one project.
    pub anchor_project: String,

    /// Name of the new child project.
    pub bucket_name: String,

    /// Status of the new project (0 = archived).
    #[serde(default)]
    pub bucket_status: i64,

    /// Color of the new project, as a signed packed ARGB value.
    #[serde(default = "default_bucket_color")]
    pub bucket_color: i64,

    /// Tag a task needs to be moved.
    pub tag: String,
}

fn default_bucket_color() -> i64 {
    -3149
}

impl Default for ReclassifyRule {
    fn default() -> Self {
        Self {
            anchor_project: "Maratona".to_string(),
            bucket_name: "Contests".to_string(),
            bucket_status: 0,
            bucket_color: default_bucket_color(),
            tag: "Contest".to_string(),
        }
    }
}

/// What a rule did.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct RuleOutcome {
    pub bucket: ProjectKey,
    pub bucket_name: String,
    pub tasks_moved: usize,
}

impl ReclassifyRule {
    /// Apply the rule to `graph`.
    pub fn apply(&self, graph: &mut EntityGraph) -> ConvertResult<RuleOutcome> {
        let anchors = graph.projects_named(&self.anchor_project);
        let anchor = match anchors.as_slice() {
            [anchor] => *anchor,
            _ => {
                return Err(ConvertError::RuleTargetNotFound {
                    name: self.anchor_project.clone(),
                    found: anchors.len(),
                });
            }
        };

        let bucket = graph.add_project(
            ProjectBuilder::synthetic(&self.bucket_name)
                .status(self.bucket_status)
                .color(self.bucket_color)
                .parent(anchor),
        )?;

        let mut tasks_moved = 0;
        for task in &mut graph.tasks {
            let owner = &graph.projects[task.project.0];
            if owner.name == self.anchor_project && task.has_tag(&self.tag) {
                task.project = bucket;
                tasks_moved += 1;
            }
        }

        info!(
            anchor = %self.anchor_project,
            bucket = %self.bucket_name,
            tag = %self.tag,
            tasks_moved,
            "Applied reclassification rule"
        );

        Ok(RuleOutcome {
            bucket,
            bucket_name: self.bucket_name.clone(),
            tasks_moved,
        })
    }
}

/// Apply rules in order.
pub fn apply_rules(
    graph: &mut EntityGraph,
    rules: &[ReclassifyRule],
) -> ConvertResult<Vec<RuleOutcome>> {
    rules.iter().map(|rule| rule.apply(graph)).collect()
}
