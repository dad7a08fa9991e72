//! The extraction engine.
//!
//! Sequential pipeline: for each configured project, list tasks, fetch each
//! task's full detail and stories, and emit the project's batches before
//! moving on. Any upstream or sink error aborts the run with no checkpoint
//! written; batches already flushed for earlier projects stay emitted.

use std::io::Write;

use chrono::Utc;
use serde_json::Value;

use crate::asana::{Record, TaskSource};
use crate::config::{Config, State};
use crate::error::{Result, TapError};
use crate::schemas;
use crate::singer::{RecordCounter, SingerWriter};

/// Fields removed from every task before emission: redundant, heavy, or
/// unstable across calls.
const VOLATILE_TASK_FIELDS: [&str; 3] = ["enum_options", "custom_fields", "hearts"];

/// Run one full sync: schemas, then per-project record batches, then the
/// new state checkpoint. Returns the state that was written.
pub async fn sync<S, W>(
    config: &Config,
    state: State,
    source: &S,
    writer: &mut SingerWriter<W>,
) -> Result<State>
where
    S: TaskSource,
    W: Write,
{
    let schemas = schemas::load_schemas()?;

    if state.is_empty() {
        tracing::info!("Replicating all tasks");
    } else {
        let snapshot = Value::Object(state.clone());
        tracing::info!("Replicating tasks since {}", snapshot);
    }

    writer.write_schema("tasks", &schemas.tasks, "id")?;
    writer.write_schema("stories", &schemas.stories, "id")?;

    let state = extract_all_tasks(config, state, source, writer).await?;
    writer.write_state(&state)?;
    Ok(state)
}

/// Extract every configured project and stamp the new checkpoint.
async fn extract_all_tasks<S, W>(
    config: &Config,
    mut state: State,
    source: &S,
    writer: &mut SingerWriter<W>,
) -> Result<State>
where
    S: TaskSource,
    W: Write,
{
    // The watermark is computed for parity with the state contract but is
    // not applied as a listing filter: every run re-scans all tasks.
    let since = state
        .get("tasks")
        .filter(|value| !value.is_null())
        .map(watermark_string);
    if let Some(since) = &since {
        tracing::debug!(%since, "computed sync floor");
    }

    let mut counter = RecordCounter::new("tasks");

    for project in &config.projects {
        let summaries = source.tasks_for_project(project).await?;

        let mut tasks_output: Vec<Record> = Vec::new();
        let mut stories_output: Vec<Record> = Vec::new();

        for summary in summaries {
            counter.increment();

            let task_id = record_id(&summary)?;
            let task = source.task_by_id(&task_id).await?;
            // Stories carry the owning task's id value verbatim, so read it
            // from the detail record before stripping.
            let id_value = task
                .get("id")
                .cloned()
                .ok_or_else(|| TapError::InvalidJson(format!("task {} has no id", task_id)))?;

            tasks_output.push(strip_volatile_fields(&task));

            for mut story in source.stories_for_task(&task_id).await? {
                story.insert("task_id".to_string(), id_value.clone());
                stories_output.push(story);
            }
        }

        writer.write_records("tasks", &tasks_output)?;
        writer.write_records("stories", &stories_output)?;
    }

    drop(counter);

    // Run-boundary checkpoint: wall clock at extraction completion, not a
    // data-derived watermark.
    state.insert(
        "tasks".to_string(),
        Value::String(Utc::now().to_rfc3339()),
    );
    Ok(state)
}

/// Produce a copy of a task with the volatile fields removed. The upstream
/// record is left untouched.
pub fn strip_volatile_fields(task: &Record) -> Record {
    let mut stripped = task.clone();
    for field in VOLATILE_TASK_FIELDS {
        stripped.remove(field);
    }
    stripped
}

/// String form of a record's `id`, as used in detail-fetch paths.
fn record_id(record: &Record) -> Result<String> {
    match record.get("id") {
        Some(Value::String(s)) => Ok(s.clone()),
        Some(Value::Number(n)) => Ok(n.to_string()),
        _ => Err(TapError::InvalidJson(
            "task summary has no usable id".to_string(),
        )),
    }
}

fn watermark_string(value: &Value) -> String {
    match value {
        Value::String(s) => s.clone(),
        other => other.to_string(),
    }
}
