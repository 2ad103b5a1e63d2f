use anyhow::{Context, Result};
use std::io::{self, BufRead, Write};
use std::time::Duration;

use crate::domain::Subtask;
use crate::export::export_text;
use crate::state::{read_active, write_active, ActiveListStore, Autosaver, SharedActiveList};
use crate::storage::{KvStore, ListStore};

fn print_help() {
    println!("Commands:");
    println!("  add <name>            add a task");
    println!("  done <id>             complete a task (and its subtasks)");
    println!("  undo <id>             reopen a task");
    println!("  sub <task> <name>     add a subtask");
    println!("  subdone <task> <id>   complete a subtask");
    println!("  subundo <task> <id>   reopen a subtask");
    println!("  err <task> <text>     document a problem on a task");
    println!("  obs <text>            set the observations text");
    println!("  show                  print the list");
    println!("  save                  save to the saved lists now");
    println!("  quit                  save the working copy and leave");
}

fn parse_id(raw: &str) -> Option<u64> {
    raw.parse().ok()
}

fn parse_id_and_rest(raw: &str) -> Option<(u64, &str)> {
    let (id, rest) = raw.split_once(' ')?;
    Some((parse_id(id)?, rest.trim()))
}

fn parse_two_ids(raw: &str) -> Option<(u64, u64)> {
    let (a, b) = raw.split_once(' ')?;
    Some((parse_id(a.trim())?, parse_id(b.trim())?))
}

fn toggle_task(store: &SharedActiveList, id: u64, completed: bool) {
    let found = store.update(|list| match list.task_mut(id) {
        Some(task) => {
            task.set_completed(completed);
            true
        }
        None => false,
    });
    match found {
        Some(true) if completed => println!("✅ Task {} completed", id),
        Some(true) => println!("↩️  Task {} reopened", id),
        _ => println!("Task {} not found", id),
    }
}

fn toggle_subtask(store: &SharedActiveList, task: u64, id: u64, completed: bool) {
    let found = store.update(|list| match list.task_mut(task) {
        Some(parent) => parent.set_subtask_completed(id, completed),
        None => false,
    });
    match found {
        Some(true) => println!("✅ Subtask {} updated", id),
        _ => println!("Subtask {} not found on task {}", id, task),
    }
}

/// Interactive editing session. Mutations go through the active-list
/// store; a background task auto-saves the working copy on a fixed
/// interval and is torn down when the session ends.
pub async fn run_edit(data_dir: Option<String>, autosave_secs: u64) -> Result<()> {
    let kv = KvStore::new(data_dir)?;
    let list_store = ListStore::new(kv.clone());
    let initial = read_active(&kv)?
        .context("No active list. Create one with 'listo new' or open one with 'listo open'.")?;

    println!(
        "✏️  Editing '{}' (auto-save every {}s). Type 'help' for commands.",
        initial.name, autosave_secs
    );

    let store = ActiveListStore::shared(Some(initial));
    let subscription = store.subscribe(|list| {
        if let Some(list) = list {
            tracing::debug!(
                "Active list '{}' now has {} task(s)",
                list.name,
                list.tasks.len()
            );
        }
    });
    let saver = Autosaver::start(store.clone(), kv.clone(), Duration::from_secs(autosave_secs));

    let stdin = io::stdin();
    let mut line = String::new();
    loop {
        print!("> ");
        io::stdout().flush()?;
        line.clear();
        if stdin.lock().read_line(&mut line)? == 0 {
            break;
        }
        let input = line.trim();
        if input.is_empty() {
            continue;
        }
        let (cmd, rest) = match input.split_once(' ') {
            Some((cmd, rest)) => (cmd, rest.trim()),
            None => (input, ""),
        };

        match cmd {
            "help" => print_help(),
            "show" => {
                if let Some(list) = store.snapshot() {
                    print!("{}", export_text(&list));
                }
            }
            "add" if !rest.is_empty() => {
                let id = store.update(|list| list.add_task(rest));
                if let Some(id) = id {
                    println!("✅ Added task {}: {}", id, rest);
                }
            }
            "add" => println!("Usage: add <name>"),
            "done" => match parse_id(rest) {
                Some(id) => toggle_task(&store, id, true),
                None => println!("Usage: done <id>"),
            },
            "undo" => match parse_id(rest) {
                Some(id) => toggle_task(&store, id, false),
                None => println!("Usage: undo <id>"),
            },
            "sub" => match parse_id_and_rest(rest) {
                Some((task, name)) if !name.is_empty() => {
                    let added = store.update(|list| match list.task_mut(task) {
                        Some(parent) => {
                            let id = parent.next_subtask_id();
                            parent.subtasks.push(Subtask {
                                id,
                                name: name.to_string(),
                                completed: false,
                                assigned_member: None,
                            });
                            if parent.completed {
                                parent.set_completed(false);
                            }
                            Some(id)
                        }
                        None => None,
                    });
                    match added.flatten() {
                        Some(id) => println!("✅ Added subtask {} to task {}", id, task),
                        None => println!("Task {} not found", task),
                    }
                }
                _ => println!("Usage: sub <task> <name>"),
            },
            "subdone" => match parse_two_ids(rest) {
                Some((task, id)) => toggle_subtask(&store, task, id, true),
                None => println!("Usage: subdone <task> <id>"),
            },
            "subundo" => match parse_two_ids(rest) {
                Some((task, id)) => toggle_subtask(&store, task, id, false),
                None => println!("Usage: subundo <task> <id>"),
            },
            "err" => match parse_id_and_rest(rest) {
                Some((task, text)) if !text.is_empty() => {
                    let added = store.update(|list| match list.task_mut(task) {
                        Some(parent) => {
                            let id = parent.next_error_id();
                            parent.errors.push(crate::domain::TaskError {
                                id,
                                name: text.to_string(),
                            });
                            true
                        }
                        None => false,
                    });
                    match added {
                        Some(true) => println!("📝 Documented error on task {}", task),
                        _ => println!("Task {} not found", task),
                    }
                }
                _ => println!("Usage: err <task> <text>"),
            },
            "obs" => {
                store.update(|list| list.observations = rest.to_string());
                println!("✅ Observations updated");
            }
            "save" => {
                // Re-read the store right here; the snapshot from an
                // earlier iteration may be stale
                if let Some(mut list) = store.snapshot() {
                    let outcome = list_store.save(&mut list)?;
                    store.replace(Some(list.clone()));
                    write_active(&kv, &list)?;
                    println!("✅ Saved '{}'", list.name);
                    if let Some(warning) = outcome.check.warning() {
                        println!("⚠️  {}", warning);
                    }
                    if let Some(evicted) = outcome.evicted {
                        println!("🗑️  Evicted oldest list '{}' to free space", evicted.name);
                    }
                }
            }
            "quit" | "exit" | "q" => break,
            other => println!("Unknown command '{}'. Type 'help' for commands.", other),
        }
    }

    // Persist the working copy, then tear down the listener and the
    // auto-save timer
    if let Some(list) = store.snapshot() {
        write_active(&kv, &list)?;
    }
    store.unsubscribe(subscription);
    saver.shutdown();
    println!("👋 Closed editing session.");

    Ok(())
}
