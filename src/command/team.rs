use anyhow::{bail, Context, Result};

use crate::cli::TeamAction;
use crate::state::read_active;
use crate::storage::KvStore;

use super::active_list::with_active;

pub fn run_team(data_dir: Option<String>, action: TeamAction) -> Result<()> {
    let kv = KvStore::new(data_dir)?;

    match action {
        TeamAction::Add { name } => {
            let id = with_active(&kv, |list| Ok(list.add_member(&name)))?;
            println!("✅ Added team member {}: {}", id, name);
        }
        TeamAction::Remove { id } => {
            with_active(&kv, |list| {
                if !list.remove_member(id) {
                    bail!("Team member {} not found", id);
                }
                Ok(())
            })?;
            println!("🗑️  Removed team member {} (assignments cleared)", id);
        }
        TeamAction::List => {
            let list = read_active(&kv)?.context(
                "No active list. Create one with 'listo new' or open one with 'listo open'.",
            )?;
            if list.team.is_empty() {
                println!("No team members on '{}'.", list.name);
                return Ok(());
            }
            println!("Team on '{}':", list.name);
            for member in &list.team {
                let leading = list
                    .tasks
                    .iter()
                    .filter(|t| t.leader == Some(member.id))
                    .count();
                if leading > 0 {
                    println!("  {:>3}  {} (leads {} task(s))", member.id, member.name, leading);
                } else {
                    println!("  {:>3}  {}", member.id, member.name);
                }
            }
        }
    }

    Ok(())
}
