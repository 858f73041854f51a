//! Break adjustment: shorten each task by the breaks taken inside it.
//!
//! Breaks apply in document order and accumulate: every break moves the task's
//! current end back by its own duration.

use crate::error::{ConvertError, ConvertResult, DataQualityWarning};
use crate::resolve::{EntityGraph, ResolverContext};
use crate::source::GROUP_BREAKS;
use crate::types::Break;
use tracing::warn;

/// Apply `breaks` to the tasks of `graph`, returning any data-quality warnings.
pub fn apply_breaks(
    graph: &mut EntityGraph,
    context: &ResolverContext,
    breaks: &[Break],
) -> ConvertResult<Vec<DataQualityWarning>> {
    let mut warnings = Vec::new();

    for (index, brk) in breaks.iter().enumerate() {
        let key = context
            .task(&brk.task_id)
            .ok_or_else(|| ConvertError::dangling(GROUP_BREAKS, index, "task", &brk.task_id))?;

        let duration = brk.end - brk.start;
        if duration < chrono::TimeDelta::zero() {
            let warning = DataQualityWarning::NegativeBreak {
                task_id: brk.task_id.clone(),
                break_index: index,
                duration_ms: duration.num_milliseconds(),
            };
            warn!("{}", warning);
            warnings.push(warning);
        }

        let task = graph.task_mut(key);
        task.end = task
            .end
            .checked_sub_signed(duration)
            .ok_or_else(|| ConvertError::TimestampRange {
                group: GROUP_BREAKS,
                index,
                task_id: brk.task_id.clone(),
            })?;
    }

    for task in &graph.tasks {
        if task.end < task.start {
            let warning = DataQualityWarning::InvertedTask {
                task_id: task.task_id.clone(),
                start_ms: task.start.timestamp_millis(),
                end_ms: task.end.timestamp_millis(),
            };
            warn!("{}", warning);
            warnings.push(warning);
        }
    }

    Ok(warnings)
}
