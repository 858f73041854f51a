//! The conversion pipeline.
//!
//! Reader output → resolve → breaks → rules → ids → rows. Every stage runs
//! before anything is written, so a structural error never leaves partial
//! output behind.

use crate::breaks::apply_breaks;
use crate::config::Config;
use crate::db::rows::{ProjectRow, RowSettings, TaskRow, project_rows};
use crate::error::{ConvertResult, DataQualityWarning};
use crate::ids::{IdAllocator, IdAssignment};
use crate::resolve::{EntityGraph, resolve};
use crate::rules::{ReclassifyRule, RuleOutcome, apply_rules};
use crate::source::SourceDocument;
use serde::Serialize;
use std::collections::BTreeMap;
use tracing::info;

/// Everything the pipeline needs besides the document.
#[derive(Debug, Clone)]
pub struct ConvertOptions {
    pub rules: Vec<ReclassifyRule>,
    pub id_namespace: i64,
    pub rows: RowSettings,
}

impl ConvertOptions {
    pub fn from_config(config: &Config) -> Self {
        Self {
            rules: config.rules.clone(),
            id_namespace: config.ids.namespace,
            rows: config.jiffy.row_settings(),
        }
    }
}

impl Default for ConvertOptions {
    fn default() -> Self {
        Self::from_config(&Config::default())
    }
}

/// A finished conversion, ready to be written.
#[derive(Debug, Clone)]
pub struct Conversion {
    pub graph: EntityGraph,
    pub ids: IdAssignment,
    pub project_rows: Vec<ProjectRow>,
    pub task_rows: Vec<TaskRow>,
    pub report: ConversionReport,
}

/// Summary of a conversion for the operator.
#[derive(Debug, Clone, Default, Serialize)]
pub struct ConversionReport {
    /// Source records per group.
    pub source_records: BTreeMap<&'static str, usize>,
    pub breaks_applied: usize,
    pub rules: Vec<RuleOutcome>,
    pub project_rows: usize,
    pub task_rows: usize,
    pub warnings: Vec<DataQualityWarning>,
}

/// Run the whole pipeline over a parsed document.
pub fn convert(doc: &SourceDocument, options: &ConvertOptions) -> ConvertResult<Conversion> {
    let resolved = resolve(doc)?;
    let mut graph = resolved.graph;

    let warnings = apply_breaks(&mut graph, &resolved.context, &resolved.breaks)?;
    let rules = apply_rules(&mut graph, &options.rules)?;

    let mut allocator = IdAllocator::new(options.id_namespace);
    let ids = IdAssignment::assign(&graph, &mut allocator);
    let (project_rows, task_rows) = project_rows(&graph, &ids, &options.rows);

    let report = ConversionReport {
        source_records: doc.group_sizes(),
        breaks_applied: resolved.breaks.len(),
        rules,
        project_rows: project_rows.len(),
        task_rows: task_rows.len(),
        warnings,
    };

    info!(
        projects = report.project_rows,
        tasks = report.task_rows,
        breaks = report.breaks_applied,
        warnings = report.warnings.len(),
        "Conversion complete"
    );

    Ok(Conversion {
        graph,
        ids,
        project_rows,
        task_rows,
        report,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::ErrorCode;

    const MARATONA: &str = r#"<timesheet>
  <projects>
    <project><projectId>1</projectId><name>Maratona</name><status>1</status><color>-16776961</color></project>
  </projects>
  <tasks>
    <task><taskId>10</taskId><projectId>1</projectId><description>Round 1</description>
      <startDate>2020-01-01T10:00:00-0300</startDate><endDate>2020-01-01T12:00:00-0300</endDate></task>
  </tasks>
  <breaks>
    <break><taskId>10</taskId><startDate>2020-01-01T10:30:00-0300</startDate><endDate>2020-01-01T10:45:00-0300</endDate></break>
  </breaks>
  <tags>
    <tag><tagId>5</tagId><name>Contest</name></tag>
  </tags>
  <taskTags>
    <taskTag><tagId>5</tagId><taskId>10</taskId></taskTag>
  </taskTags>
</timesheet>"#;

    #[test]
    fn test_convert_reports_counts() {
        let doc = SourceDocument::parse(MARATONA).unwrap();

        let conversion = convert(&doc, &ConvertOptions::default()).unwrap();

        let report = &conversion.report;
        assert_eq!(report.source_records["projects"], 1);
        assert_eq!(report.source_records["taskTags"], 1);
        assert_eq!(report.breaks_applied, 1);
        assert_eq!(report.rules.len(), 1);
        assert_eq!(report.rules[0].tasks_moved, 1);
        assert_eq!(report.project_rows, 2);
        assert_eq!(report.task_rows, 1);
        assert!(report.warnings.is_empty());
    }

    #[test]
    fn test_convert_without_rules() {
        let doc = SourceDocument::parse(MARATONA).unwrap();
        let options = ConvertOptions {
            rules: vec![],
            ..ConvertOptions::default()
        };

        let conversion = convert(&doc, &options).unwrap();

        assert_eq!(conversion.project_rows.len(), 1);
        assert_eq!(
            conversion.task_rows[0].owner_id_least,
            conversion.project_rows[0].id_least
        );
    }

    #[test]
    fn test_rule_failure_aborts() {
        let doc = SourceDocument::parse(&MARATONA.replace("Maratona", "Other")).unwrap();

        let err = convert(&doc, &ConvertOptions::default()).unwrap_err();
        assert_eq!(err.code(), ErrorCode::RuleTargetNotFound);
    }
}
