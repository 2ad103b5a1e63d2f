use anyhow::{bail, Context, Result};

use crate::cli::SubtaskAction;
use crate::domain::Subtask;
use crate::storage::KvStore;

use super::active_list::with_active;

pub fn run_subtask(data_dir: Option<String>, action: SubtaskAction) -> Result<()> {
    let kv = KvStore::new(data_dir)?;

    match action {
        SubtaskAction::Add { task, name } => {
            let id = with_active(&kv, |list| {
                let parent = list
                    .task_mut(task)
                    .with_context(|| format!("Task {} not found", task))?;
                let id = parent.next_subtask_id();
                parent.subtasks.push(Subtask {
                    id,
                    name: name.clone(),
                    completed: false,
                    assigned_member: None,
                });
                // A new incomplete subtask makes a completed parent stale
                if parent.completed {
                    parent.set_completed(false);
                }
                Ok(id)
            })?;
            println!("✅ Added subtask {} to task {}: {}", id, task, name);
        }
        SubtaskAction::Done { task, id } => {
            let parent_completed = with_active(&kv, |list| {
                let parent = list
                    .task_mut(task)
                    .with_context(|| format!("Task {} not found", task))?;
                if !parent.set_subtask_completed(id, true) {
                    bail!("Subtask {} not found on task {}", id, task);
                }
                Ok(parent.completed)
            })?;
            if parent_completed {
                println!("✅ Subtask {} completed - task {} is now complete", id, task);
            } else {
                println!("✅ Subtask {} completed", id);
            }
        }
        SubtaskAction::Undo { task, id } => {
            with_active(&kv, |list| {
                let parent = list
                    .task_mut(task)
                    .with_context(|| format!("Task {} not found", task))?;
                if !parent.set_subtask_completed(id, false) {
                    bail!("Subtask {} not found on task {}", id, task);
                }
                Ok(())
            })?;
            println!("↩️  Subtask {} marked incomplete - task {} reopened", id, task);
        }
        SubtaskAction::Assign { task, id, member } => {
            with_active(&kv, |list| {
                if let Some(member_id) = member {
                    if list.member(member_id).is_none() {
                        bail!("Team member {} not found", member_id);
                    }
                }
                let parent = list
                    .task_mut(task)
                    .with_context(|| format!("Task {} not found", task))?;
                let subtask = parent
                    .subtasks
                    .iter_mut()
                    .find(|s| s.id == id)
                    .with_context(|| format!("Subtask {} not found on task {}", id, task))?;
                subtask.assigned_member = member;
                Ok(())
            })?;
            match member {
                Some(member_id) => {
                    println!("✅ Subtask {} assigned to member {}", id, member_id)
                }
                None => println!("✅ Subtask {} assignment cleared", id),
            }
        }
    }

    Ok(())
}
