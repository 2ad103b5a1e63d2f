use chrono::Local;

/// Default file name for a JSON backup bundle.
pub fn default_backup_filename() -> String {
    format!("listo-backup-{}.json", Local::now().format("%Y-%m-%d"))
}
