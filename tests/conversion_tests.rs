//! End-to-end tests of the conversion pipeline.
//!
//! These run real Timesheet-shaped XML through `convert` and check the
//! referential properties of the produced Jiffy rows.

use std::collections::HashSet;
use timesheet_jiffy::convert::{ConvertOptions, convert};
use timesheet_jiffy::error::{ConvertError, DataQualityWarning, ErrorCode};
use timesheet_jiffy::ids::{IdPair, ROOT_SENTINEL};
use timesheet_jiffy::rules::ReclassifyRule;
use timesheet_jiffy::source::SourceDocument;

const MINUTE_MS: i64 = 60 * 1000;

fn project(id: &str, name: &str, status: i64) -> String {
    format!(
        "<project><projectId>{}</projectId><name>{}</name><status>{}</status><color>-3149</color></project>",
        id, name, status
    )
}

fn task(id: &str, project_id: &str, start: &str, end: &str) -> String {
    format!(
        "<task><taskId>{}</taskId><projectId>{}</projectId><description>task {}</description>\
         <startDate>{}</startDate><endDate>{}</endDate></task>",
        id, project_id, id, start, end
    )
}

fn brk(task_id: &str, start: &str, end: &str) -> String {
    format!(
        "<break><taskId>{}</taskId><startDate>{}</startDate><endDate>{}</endDate></break>",
        task_id, start, end
    )
}

fn tag(id: &str, name: &str) -> String {
    format!("<tag><tagId>{}</tagId><name>{}</name></tag>", id, name)
}

fn task_tag(tag_id: &str, task_id: &str) -> String {
    format!("<taskTag><tagId>{}</tagId><taskId>{}</taskId></taskTag>", tag_id, task_id)
}

fn document(
    projects: &[String],
    tasks: &[String],
    breaks: &[String],
    tags: &[String],
    task_tags: &[String],
) -> SourceDocument {
    let xml = format!(
        "<timesheet><projects>{}</projects><tasks>{}</tasks><breaks>{}</breaks>\
         <tags>{}</tags><taskTags>{}</taskTags></timesheet>",
        projects.concat(),
        tasks.concat(),
        breaks.concat(),
        tags.concat(),
        task_tags.concat()
    );
    SourceDocument::parse(&xml).expect("fixture should parse")
}

/// A mixed export: two roots, Maratona tasks with and without the Contest tag.
fn sample() -> SourceDocument {
    document(
        &[
            project("1", "Maratona", 1),
            project("2", "Work", 0),
        ],
        &[
            task("10", "1", "2020-01-01T10:00:00-0300", "2020-01-01T12:00:00-0300"),
            task("11", "1", "2020-01-02T10:00:00-0300", "2020-01-02T11:00:00-0300"),
            task("12", "2", "2020-01-03T09:00:00-0300", "2020-01-03T17:00:00-0300"),
            task("13", "1", "2020-01-04T14:00:00-0300", "2020-01-04T19:00:00-0300"),
        ],
        &[
            brk("12", "2020-01-03T12:00:00-0300", "2020-01-03T13:00:00-0300"),
        ],
        &[tag("5", "Contest"), tag("6", "Study")],
        &[
            task_tag("5", "10"),
            task_tag("6", "11"),
            task_tag("5", "12"),
            task_tag("6", "13"),
            task_tag("5", "13"),
        ],
    )
}

#[test]
fn minimal_maratona_document_round_trip() {
    let doc = document(
        &[project("1", "Maratona", 1)],
        &[task("10", "1", "2020-01-01T10:00:00-0300", "2020-01-01T12:00:00-0300")],
        &[brk("10", "2020-01-01T10:30:00-0300", "2020-01-01T10:45:00-0300")],
        &[tag("5", "Contest")],
        &[task_tag("5", "10")],
    );

    let conversion = convert(&doc, &ConvertOptions::default()).unwrap();

    assert_eq!(conversion.project_rows.len(), 2);
    let maratona = conversion
        .project_rows
        .iter()
        .find(|p| p.name == "Maratona")
        .unwrap();
    let contests = conversion
        .project_rows
        .iter()
        .find(|p| p.name == "Contests")
        .unwrap();
    assert_eq!(
        (contests.parent_id_most, contests.parent_id_least),
        (maratona.id_most, maratona.id_least)
    );
    assert_eq!(
        (maratona.parent_id_most, maratona.parent_id_least),
        (ROOT_SENTINEL.most, ROOT_SENTINEL.least)
    );
    assert_eq!(contests.archived, "false");
    assert_eq!(contests.color, -3149);

    assert_eq!(conversion.task_rows.len(), 1);
    let task = &conversion.task_rows[0];
    assert_eq!(
        (task.owner_id_most, task.owner_id_least),
        (contests.id_most, contests.id_least)
    );
    assert_eq!(task.stop_time_millis - task.start_time_millis, 105 * MINUTE_MS);
}

#[test]
fn task_owner_ids_match_final_project() {
    let conversion = convert(&sample(), &ConvertOptions::default()).unwrap();

    for (i, task) in conversion.graph.tasks.iter().enumerate() {
        let row = &conversion.task_rows[i];
        let owner = conversion.ids.project(task.project);
        assert_eq!((row.owner_id_most, row.owner_id_least), (owner.most, owner.least));
        let project_row = conversion
            .project_rows
            .iter()
            .find(|p| p.id_most == owner.most && p.id_least == owner.least)
            .expect("owner must be emitted as a project row");
        assert_eq!(project_row.name, conversion.graph.project(task.project).name);
    }
}

#[test]
fn parent_ids_match_parent_or_root() {
    let conversion = convert(&sample(), &ConvertOptions::default()).unwrap();

    for (i, project) in conversion.graph.projects.iter().enumerate() {
        let row = &conversion.project_rows[i];
        let expected = match project.parent {
            Some(parent) => conversion.ids.project(parent),
            None => ROOT_SENTINEL,
        };
        assert_eq!(
            IdPair::new(row.parent_id_most, row.parent_id_least),
            expected
        );
    }
}

#[test]
fn id_pairs_are_unique_across_all_rows() {
    let conversion = convert(&sample(), &ConvertOptions::default()).unwrap();

    let mut seen = HashSet::new();
    for row in &conversion.project_rows {
        assert!(seen.insert((row.id_most, row.id_least)));
    }
    for row in &conversion.task_rows {
        assert!(seen.insert((row.id_most, row.id_least)));
    }
    assert!(!seen.contains(&(ROOT_SENTINEL.most, ROOT_SENTINEL.least)));
    assert_eq!(seen.len(), 3 + 4);
}

#[test]
fn reclassification_moves_only_tagged_anchor_tasks() {
    let conversion = convert(&sample(), &ConvertOptions::default()).unwrap();
    let graph = &conversion.graph;

    let owner = |task_id: &str| {
        let task = graph.tasks.iter().find(|t| t.task_id == task_id).unwrap();
        graph.project(task.project).name.clone()
    };

    assert_eq!(owner("10"), "Contests");
    assert_eq!(owner("11"), "Maratona");
    // Tagged, but not under the anchor.
    assert_eq!(owner("12"), "Work");
    assert_eq!(owner("13"), "Contests");
    assert_eq!(conversion.report.rules[0].tasks_moved, 2);
}

#[test]
fn breaks_subtract_cumulatively() {
    let doc = document(
        &[project("1", "Maratona", 1)],
        &[task("10", "1", "2020-01-01T08:00:00-0300", "2020-01-01T18:00:00-0300")],
        &[
            brk("10", "2020-01-01T10:00:00-0300", "2020-01-01T10:10:00-0300"),
            brk("10", "2020-01-01T12:00:00-0300", "2020-01-01T13:00:00-0300"),
            brk("10", "2020-01-01T15:00:00-0300", "2020-01-01T15:20:00-0300"),
        ],
        &[],
        &[],
    );

    let conversion = convert(&doc, &ConvertOptions::default()).unwrap();

    let row = &conversion.task_rows[0];
    assert_eq!(
        row.stop_time_millis - row.start_time_millis,
        (10 * 60 - 10 - 60 - 20) * MINUTE_MS
    );
}

#[test]
fn breaks_on_other_tasks_do_not_interfere() {
    let conversion = convert(&sample(), &ConvertOptions::default()).unwrap();
    let graph = &conversion.graph;

    let work = graph.tasks.iter().find(|t| t.task_id == "12").unwrap();
    assert_eq!(work.duration_ms(), 7 * 60 * MINUTE_MS);
    let other = graph.tasks.iter().find(|t| t.task_id == "10").unwrap();
    assert_eq!(other.duration_ms(), 2 * 60 * MINUTE_MS);
}

#[test]
fn missing_project_id_aborts_with_no_rows() {
    let task_without_project = "<task><taskId>10</taskId><description>x</description>\
        <startDate>2020-01-01T10:00:00-0300</startDate><endDate>2020-01-01T12:00:00-0300</endDate></task>"
        .to_string();
    let doc = document(&[project("1", "Maratona", 1)], &[task_without_project], &[], &[], &[]);

    let err = convert(&doc, &ConvertOptions::default()).unwrap_err();
    assert_eq!(err.code(), ErrorCode::UnknownField);
}

#[test]
fn unknown_project_id_is_dangling() {
    let doc = document(
        &[project("1", "Maratona", 1)],
        &[task("10", "99", "2020-01-01T10:00:00-0300", "2020-01-01T12:00:00-0300")],
        &[],
        &[],
        &[],
    );

    match convert(&doc, &ConvertOptions::default()).unwrap_err() {
        ConvertError::DanglingReference { kind, id, .. } => {
            assert_eq!(kind, "project");
            assert_eq!(id, "99");
        }
        other => panic!("unexpected error: {}", other),
    }
}

#[test]
fn bad_timestamp_aborts() {
    let doc = document(
        &[project("1", "Maratona", 1)],
        &[task("10", "1", "2020-01-01 10:00", "2020-01-01T12:00:00-0300")],
        &[],
        &[],
        &[],
    );

    let err = convert(&doc, &ConvertOptions::default()).unwrap_err();
    assert_eq!(err.code(), ErrorCode::TimestampFormat);
}

#[test]
fn inverted_task_is_still_projected() {
    let doc = document(
        &[project("1", "Maratona", 1)],
        &[task("10", "1", "2020-01-01T10:00:00-0300", "2020-01-01T10:30:00-0300")],
        &[brk("10", "2020-01-01T10:00:00-0300", "2020-01-01T11:00:00-0300")],
        &[],
        &[],
    );

    let conversion = convert(&doc, &ConvertOptions::default()).unwrap();

    assert!(matches!(
        conversion.report.warnings.as_slice(),
        [DataQualityWarning::InvertedTask { .. }]
    ));
    let row = &conversion.task_rows[0];
    assert_eq!(row.stop_time_millis - row.start_time_millis, -30 * MINUTE_MS);
}

#[test]
fn custom_rules_and_namespace() {
    let options = ConvertOptions {
        rules: vec![ReclassifyRule {
            anchor_project: "Maratona".into(),
            bucket_name: "Study".into(),
            bucket_status: 1,
            bucket_color: 0,
            tag: "Study".into(),
        }],
        id_namespace: 77,
        ..ConvertOptions::default()
    };

    let conversion = convert(&sample(), &options).unwrap();

    let study = conversion
        .project_rows
        .iter()
        .find(|p| p.name == "Study")
        .unwrap();
    assert_eq!(study.archived, "true");
    assert!(conversion.project_rows.iter().all(|p| p.id_most == 77));
    assert_eq!(conversion.report.rules[0].tasks_moved, 2);
}

#[test]
fn conversion_is_deterministic() {
    let a = convert(&sample(), &ConvertOptions::default()).unwrap();
    let b = convert(&sample(), &ConvertOptions::default()).unwrap();
    assert_eq!(a.project_rows, b.project_rows);
    assert_eq!(a.task_rows, b.task_rows);
}
