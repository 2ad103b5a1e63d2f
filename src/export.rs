//! Plain-text export.
//!
//! Human-readable report with fixed section markers (header, tasks with
//! their subtasks and error notes, observations, footer). Consumed by
//! people, not machines; there is no round-trip guarantee.

use std::fmt::Write as _;

use crate::domain::{ChecklistData, Task};

const RULE: &str = "========================================";
const TASKS_MARKER: &str = "--- TASKS ---";
const SUBTASKS_MARKER: &str = "  Subtasks:";
const ERRORS_MARKER: &str = "  Errors:";
const OBSERVATIONS_MARKER: &str = "--- OBSERVATIONS ---";

fn checkbox(completed: bool) -> &'static str {
    if completed {
        "[x]"
    } else {
        "[ ]"
    }
}

/// Render a checklist as plain text.
pub fn export_text(list: &ChecklistData) -> String {
    let mut out = String::new();

    // Header
    let _ = writeln!(out, "{}", RULE);
    let _ = writeln!(out, "CHECKLIST: {}", list.name);
    let _ = writeln!(
        out,
        "Created: {}  Modified: {}",
        list.created_date.format("%Y-%m-%d %H:%M"),
        list.modified_date.format("%Y-%m-%d %H:%M")
    );
    if let Some(priority) = list.priority {
        let _ = writeln!(out, "Priority: {}", priority);
    }
    let _ = writeln!(out, "{}", RULE);

    let _ = writeln!(out, "\n{}", TASKS_MARKER);
    for task in &list.tasks {
        write_task(&mut out, list, task);
    }
    if list.tasks.is_empty() {
        let _ = writeln!(out, "(no tasks)");
    }

    if !list.observations.is_empty() {
        let _ = writeln!(out, "\n{}", OBSERVATIONS_MARKER);
        let _ = writeln!(out, "{}", list.observations);
    }

    // Footer
    let _ = writeln!(out, "\n{}", RULE);
    let _ = writeln!(
        out,
        "End of checklist - {} task(s), {} completed",
        list.tasks.len(),
        list.completed_count()
    );
    let _ = writeln!(out, "{}", RULE);

    out
}

fn write_task(out: &mut String, list: &ChecklistData, task: &Task) {
    let mut line = format!("{} {}. {}", checkbox(task.completed), task.id, task.name);
    if let Some(priority) = task.priority {
        let _ = write!(line, " [{}]", priority);
    }
    if let Some(due) = task.due_date {
        let _ = write!(line, " (due {})", due);
    }
    if let Some(leader) = task.leader.and_then(|id| list.member(id)) {
        let _ = write!(line, " (lead: {})", leader.name);
    }
    let _ = writeln!(out, "{}", line);

    if !task.subtasks.is_empty() {
        let _ = writeln!(out, "{}", SUBTASKS_MARKER);
        for subtask in &task.subtasks {
            let mut line = format!("    {} {}", checkbox(subtask.completed), subtask.name);
            if let Some(member) = subtask.assigned_member.and_then(|id| list.member(id)) {
                let _ = write!(line, " (assigned: {})", member.name);
            }
            let _ = writeln!(out, "{}", line);
        }
    }

    if !task.errors.is_empty() {
        let _ = writeln!(out, "{}", ERRORS_MARKER);
        for error in &task.errors {
            let _ = writeln!(out, "    - {}", error.name);
        }
    }
}
