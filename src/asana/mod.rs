//! Asana API collaborator.
//!
//! The tap only needs three read operations from the upstream service, so
//! they live behind the [`TaskSource`] trait; [`AsanaClient`] is the HTTP
//! implementation and tests substitute scripted in-memory sources.

mod client;

pub use client::AsanaClient;

use async_trait::async_trait;
use serde_json::{Map, Value};

use crate::error::Result;

/// An upstream record as returned by the API. The tap passes payloads
/// through rather than modeling Asana's schema as typed structs.
pub type Record = Map<String, Value>;

/// Read-only view of the upstream project-management service.
#[async_trait]
pub trait TaskSource {
    /// List summaries of all tasks in a project, in upstream listing order.
    async fn tasks_for_project(&self, project: &str) -> Result<Vec<Record>>;

    /// Fetch the full representation of one task.
    async fn task_by_id(&self, task_id: &str) -> Result<Record>;

    /// List all stories attached to a task, in upstream listing order.
    async fn stories_for_task(&self, task_id: &str) -> Result<Vec<Record>>;
}
