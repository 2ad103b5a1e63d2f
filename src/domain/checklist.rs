//! Checklist data model.
//!
//! A checklist owns its tasks; each task owns its subtasks and error notes.
//! Team members are referenced by id from tasks (`leader`) and subtasks
//! (`assigned_member`); the team array is the source of truth and broken
//! references are pruned when a member is removed.
//!
//! All persisted shapes use camelCase field names to match the storage and
//! share-payload layout.

use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Task or list priority.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Priority {
    Low,
    Medium,
    High,
}

impl std::str::FromStr for Priority {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "low" => Ok(Priority::Low),
            "medium" | "med" => Ok(Priority::Medium),
            "high" => Ok(Priority::High),
            other => Err(format!(
                "Unknown priority '{}' (expected low, medium or high)",
                other
            )),
        }
    }
}

impl std::fmt::Display for Priority {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Priority::Low => write!(f, "low"),
            Priority::Medium => write!(f, "medium"),
            Priority::High => write!(f, "high"),
        }
    }
}

/// A free-text note documenting a problem hit while performing a task.
/// Not a software exception.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TaskError {
    pub id: u64,
    pub name: String,
}

/// A team member; referenced by id from tasks and subtasks.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TeamMember {
    pub id: u64,
    pub name: String,
}

/// A child item of a task.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Subtask {
    pub id: u64,
    pub name: String,
    pub completed: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub assigned_member: Option<u64>,
}

/// A top-level checklist item.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Task {
    pub id: u64,
    pub name: String,
    pub completed: bool,
    pub subtasks: Vec<Subtask>,
    pub errors: Vec<TaskError>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub priority: Option<Priority>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub due_date: Option<NaiveDate>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub completed_date: Option<DateTime<Utc>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub leader: Option<u64>,
}

impl Task {
    pub fn new(id: u64, name: impl Into<String>) -> Self {
        Self {
            id,
            name: name.into(),
            completed: false,
            subtasks: Vec::new(),
            errors: Vec::new(),
            priority: None,
            due_date: None,
            completed_date: None,
            leader: None,
        }
    }

    /// Toggle the task's own completion state.
    ///
    /// Completing a task cascades down: every subtask is forced completed
    /// and `completed_date` is stamped. Un-completing does not cascade;
    /// subtasks keep their individual state.
    pub fn set_completed(&mut self, completed: bool) {
        self.completed = completed;
        if completed {
            for subtask in &mut self.subtasks {
                subtask.completed = true;
            }
            self.completed_date = Some(Utc::now());
        } else {
            self.completed_date = None;
        }
    }

    /// Toggle a subtask's completion state and propagate up.
    ///
    /// Un-completing any subtask forces the parent incomplete; completing
    /// the last incomplete subtask forces the parent complete. Returns
    /// false if the subtask id is unknown.
    pub fn set_subtask_completed(&mut self, subtask_id: u64, completed: bool) -> bool {
        let Some(subtask) = self.subtasks.iter_mut().find(|s| s.id == subtask_id) else {
            return false;
        };
        subtask.completed = completed;

        if !completed {
            self.completed = false;
            self.completed_date = None;
        } else if self.subtasks.iter().all(|s| s.completed) {
            self.completed = true;
            self.completed_date = Some(Utc::now());
        }
        true
    }

    /// Next free subtask id within this task.
    pub fn next_subtask_id(&self) -> u64 {
        next_id(self.subtasks.iter().map(|s| s.id))
    }

    /// Next free error-note id within this task.
    pub fn next_error_id(&self) -> u64 {
        next_id(self.errors.iter().map(|e| e.id))
    }
}

/// Lightweight index entry persisted separately from the full record so the
/// list browser avoids loading full payloads.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SavedList {
    pub id: String,
    pub name: String,
    pub tasks_count: usize,
    pub completed_count: usize,
    pub date: DateTime<Utc>,
    pub preview: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub priority: Option<Priority>,
}

/// A full checklist. Owned by the active-list store; one instance live at
/// a time.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ChecklistData {
    pub id: String,
    pub name: String,
    pub tasks: Vec<Task>,
    #[serde(default)]
    pub observations: String,
    pub created_date: DateTime<Utc>,
    pub modified_date: DateTime<Utc>,
    #[serde(default)]
    pub team: Vec<TeamMember>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub priority: Option<Priority>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub shared_at: Option<DateTime<Utc>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub share_version: Option<String>,
}

impl ChecklistData {
    /// Create an empty named list with a fresh id.
    pub fn new(name: impl Into<String>) -> Self {
        let now = Utc::now();
        Self {
            id: Uuid::new_v4().to_string(),
            name: name.into(),
            tasks: Vec::new(),
            observations: String::new(),
            created_date: now,
            modified_date: now,
            team: Vec::new(),
            priority: None,
            shared_at: None,
            share_version: None,
        }
    }

    /// Stamp the modification date.
    pub fn touch(&mut self) {
        self.modified_date = Utc::now();
    }

    pub fn task(&self, task_id: u64) -> Option<&Task> {
        self.tasks.iter().find(|t| t.id == task_id)
    }

    pub fn task_mut(&mut self, task_id: u64) -> Option<&mut Task> {
        self.tasks.iter_mut().find(|t| t.id == task_id)
    }

    /// Append a new task and return its id.
    pub fn add_task(&mut self, name: impl Into<String>) -> u64 {
        let id = next_id(self.tasks.iter().map(|t| t.id));
        self.tasks.push(Task::new(id, name));
        id
    }

    /// Remove a task by id. Returns false if the id is unknown.
    pub fn remove_task(&mut self, task_id: u64) -> bool {
        let before = self.tasks.len();
        self.tasks.retain(|t| t.id != task_id);
        self.tasks.len() != before
    }

    /// Move a task to a new zero-based position, clamped to the list end.
    pub fn move_task(&mut self, task_id: u64, position: usize) -> bool {
        let Some(from) = self.tasks.iter().position(|t| t.id == task_id) else {
            return false;
        };
        let task = self.tasks.remove(from);
        let to = position.min(self.tasks.len());
        self.tasks.insert(to, task);
        true
    }

    /// Add a team member and return the assigned id.
    pub fn add_member(&mut self, name: impl Into<String>) -> u64 {
        let id = next_id(self.team.iter().map(|m| m.id));
        self.team.push(TeamMember {
            id,
            name: name.into(),
        });
        id
    }

    /// Remove a team member and prune every reference to them.
    ///
    /// Task leaders and subtask assignments pointing at the removed member
    /// are cleared (the team array is the source of truth).
    pub fn remove_member(&mut self, member_id: u64) -> bool {
        let before = self.team.len();
        self.team.retain(|m| m.id != member_id);
        if self.team.len() == before {
            return false;
        }
        for task in &mut self.tasks {
            if task.leader == Some(member_id) {
                task.leader = None;
            }
            for subtask in &mut task.subtasks {
                if subtask.assigned_member == Some(member_id) {
                    subtask.assigned_member = None;
                }
            }
        }
        true
    }

    pub fn member(&self, member_id: u64) -> Option<&TeamMember> {
        self.team.iter().find(|m| m.id == member_id)
    }

    pub fn completed_count(&self) -> usize {
        self.tasks.iter().filter(|t| t.completed).count()
    }

    /// Short preview of the list contents for the index entry.
    pub fn preview(&self) -> String {
        self.tasks
            .iter()
            .take(3)
            .map(|t| t.name.as_str())
            .collect::<Vec<_>>()
            .join(", ")
    }

    /// Build the lightweight index entry for this list.
    pub fn to_summary(&self) -> SavedList {
        SavedList {
            id: self.id.clone(),
            name: self.name.clone(),
            tasks_count: self.tasks.len(),
            completed_count: self.completed_count(),
            date: self.modified_date,
            preview: self.preview(),
            priority: self.priority,
        }
    }
}

/// Next free id in a sequence of numeric ids (max + 1, starting at 1).
fn next_id(ids: impl Iterator<Item = u64>) -> u64 {
    ids.max().map_or(1, |max| max + 1)
}
