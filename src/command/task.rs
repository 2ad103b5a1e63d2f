use anyhow::{bail, Context, Result};
use chrono::NaiveDate;

use crate::cli::TaskAction;
use crate::domain::Priority;
use crate::storage::KvStore;

use super::active_list::with_active;

fn parse_due(date: &str) -> Result<NaiveDate> {
    NaiveDate::parse_from_str(date, "%Y-%m-%d")
        .with_context(|| format!("Invalid date '{}' (expected YYYY-MM-DD)", date))
}

pub fn run_task(data_dir: Option<String>, action: TaskAction) -> Result<()> {
    let kv = KvStore::new(data_dir)?;

    match action {
        TaskAction::Add {
            name,
            priority,
            due,
        } => {
            let priority = priority
                .map(|p| p.parse::<Priority>().map_err(anyhow::Error::msg))
                .transpose()?;
            let due = due.map(|d| parse_due(&d)).transpose()?;
            let id = with_active(&kv, |list| {
                let id = list.add_task(&name);
                let task = list.task_mut(id).expect("task was just added");
                task.priority = priority;
                task.due_date = due;
                Ok(id)
            })?;
            println!("✅ Added task {}: {}", id, name);
        }
        TaskAction::Done { id } => {
            let subtasks = with_active(&kv, |list| {
                let task = list
                    .task_mut(id)
                    .with_context(|| format!("Task {} not found", id))?;
                task.set_completed(true);
                Ok(task.subtasks.len())
            })?;
            if subtasks > 0 {
                println!("✅ Task {} completed ({} subtask(s) completed with it)", id, subtasks);
            } else {
                println!("✅ Task {} completed", id);
            }
        }
        TaskAction::Undo { id } => {
            with_active(&kv, |list| {
                let task = list
                    .task_mut(id)
                    .with_context(|| format!("Task {} not found", id))?;
                task.set_completed(false);
                Ok(())
            })?;
            println!("↩️  Task {} marked incomplete", id);
        }
        TaskAction::Remove { id } => {
            with_active(&kv, |list| {
                if !list.remove_task(id) {
                    bail!("Task {} not found", id);
                }
                Ok(())
            })?;
            println!("🗑️  Removed task {}", id);
        }
        TaskAction::Due { id, date } => {
            let due = date.map(|d| parse_due(&d)).transpose()?;
            with_active(&kv, |list| {
                let task = list
                    .task_mut(id)
                    .with_context(|| format!("Task {} not found", id))?;
                task.due_date = due;
                Ok(())
            })?;
            match due {
                Some(date) => println!("✅ Task {} due {}", id, date),
                None => println!("✅ Task {} due date cleared", id),
            }
        }
        TaskAction::Priority { id, value } => {
            let priority = value.parse::<Priority>().map_err(anyhow::Error::msg)?;
            with_active(&kv, |list| {
                let task = list
                    .task_mut(id)
                    .with_context(|| format!("Task {} not found", id))?;
                task.priority = Some(priority);
                Ok(())
            })?;
            println!("✅ Task {} priority set to {}", id, priority);
        }
        TaskAction::Lead { id, member } => {
            with_active(&kv, |list| {
                if let Some(member_id) = member {
                    if list.member(member_id).is_none() {
                        bail!("Team member {} not found", member_id);
                    }
                }
                let task = list
                    .task_mut(id)
                    .with_context(|| format!("Task {} not found", id))?;
                task.leader = member;
                Ok(())
            })?;
            match member {
                Some(member_id) => println!("✅ Task {} led by member {}", id, member_id),
                None => println!("✅ Task {} leader cleared", id),
            }
        }
        TaskAction::Move { id, position } => {
            with_active(&kv, |list| {
                if !list.move_task(id, position) {
                    bail!("Task {} not found", id);
                }
                Ok(())
            })?;
            println!("✅ Task {} moved to position {}", id, position);
        }
    }

    Ok(())
}
