use anyhow::{bail, Context, Result};

use crate::cli::ErrorAction;
use crate::domain::TaskError;
use crate::storage::KvStore;

use super::active_list::with_active;

pub fn run_error(data_dir: Option<String>, action: ErrorAction) -> Result<()> {
    let kv = KvStore::new(data_dir)?;

    match action {
        ErrorAction::Add { task, text } => {
            let id = with_active(&kv, |list| {
                let parent = list
                    .task_mut(task)
                    .with_context(|| format!("Task {} not found", task))?;
                let id = parent.next_error_id();
                parent.errors.push(TaskError {
                    id,
                    name: text.clone(),
                });
                Ok(id)
            })?;
            println!("📝 Documented error {} on task {}", id, task);
        }
        ErrorAction::Remove { task, id } => {
            with_active(&kv, |list| {
                let parent = list
                    .task_mut(task)
                    .with_context(|| format!("Task {} not found", task))?;
                let before = parent.errors.len();
                parent.errors.retain(|e| e.id != id);
                if parent.errors.len() == before {
                    bail!("Error {} not found on task {}", id, task);
                }
                Ok(())
            })?;
            println!("🗑️  Removed error {} from task {}", id, task);
        }
    }

    Ok(())
}
