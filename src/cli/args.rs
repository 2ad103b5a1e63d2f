use clap::{Parser, Subcommand};

/// Listo CLI - checklist manager with shareable links
#[derive(Parser)]
#[command(name = "listo")]
#[command(author, version, about, long_about = None)]
pub struct Cli {
    /// Enable verbose logging
    #[arg(short, long)]
    pub verbose: bool,

    /// Directory holding the local store. Defaults to ~/.listo
    #[arg(long, env = "LISTO_DATA_DIR")]
    pub data_dir: Option<String>,

    #[command(subcommand)]
    pub command: Option<Commands>,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Create a new list and make it the active list
    New {
        /// Name of the new list
        name: String,
    },
    /// Show the active list
    Show,
    /// Task operations on the active list
    Task {
        #[command(subcommand)]
        action: TaskAction,
    },
    /// Subtask operations on the active list
    Subtask {
        #[command(subcommand)]
        action: SubtaskAction,
    },
    /// Error-note operations on the active list
    Error {
        #[command(subcommand)]
        action: ErrorAction,
    },
    /// Set the active list's observations text
    Obs {
        /// Observations text (empty string clears)
        text: String,
    },
    /// Team operations on the active list
    Team {
        #[command(subcommand)]
        action: TeamAction,
    },
    /// Save the active list to the saved lists
    Save,
    /// Show all saved lists
    Lists,
    /// Open a saved list (by id or name) as the active list
    Open {
        /// List id or name
        list: String,
    },
    /// Delete a saved list
    Delete {
        /// List id or name
        list: String,
    },
    /// Rename a saved list
    Rename {
        /// List id or name
        list: String,
        new_name: String,
    },
    /// Duplicate a saved list as an independent copy
    Duplicate {
        /// List id or name
        list: String,
    },
    /// Move a saved list to a new position in the index
    Reorder {
        /// List id or name
        list: String,
        /// Zero-based target position
        position: usize,
    },
    /// Generate a share link for a saved list (defaults to the active list)
    Share {
        /// List id or name; omit to share the active list
        list: Option<String>,

        /// Also request a short URL from the shortening service
        #[arg(long)]
        shorten: bool,

        /// Open the share URL in the browser
        #[arg(long)]
        open: bool,
    },
    /// Import a shared list from a URL
    Import {
        /// Share URL (or raw payload)
        url: String,

        /// On a name collision, overwrite the existing list without asking
        #[arg(long, conflicts_with = "copy")]
        overwrite: bool,

        /// On a name collision, import as a new list without asking
        #[arg(long)]
        copy: bool,
    },
    /// Export one list as text, or every list as a JSON backup bundle
    Export {
        /// Output format: txt | json
        #[arg(long, default_value = "txt")]
        format: String,

        /// List id or name (txt only; defaults to the active list)
        list: Option<String>,

        /// Output file; txt defaults to stdout, json to a dated file
        #[arg(short, long)]
        out: Option<String>,
    },
    /// Restore a JSON backup bundle, replacing all saved lists
    Restore {
        /// Bundle file written by `export --format json`
        file: String,

        /// Skip the confirmation prompt
        #[arg(short = 'y', long)]
        yes: bool,
    },
    /// Show storage usage against the capacity budget
    Status,
    /// Get or set the theme preference (dark | light)
    Theme {
        value: Option<String>,
    },
    /// Interactive editing session with auto-save
    Edit {
        /// Auto-save period in seconds
        #[arg(
            long,
            env = "LISTO_AUTOSAVE_SECS",
            default_value_t = crate::state::DEFAULT_AUTOSAVE_SECS
        )]
        autosave_secs: u64,
    },
}

#[derive(Subcommand)]
pub enum TaskAction {
    /// Add a task
    Add {
        name: String,

        /// Priority: low | medium | high
        #[arg(long)]
        priority: Option<String>,

        /// Due date (YYYY-MM-DD)
        #[arg(long)]
        due: Option<String>,
    },
    /// Mark a task completed (completes all its subtasks)
    Done { id: u64 },
    /// Mark a task incomplete (subtasks keep their state)
    Undo { id: u64 },
    /// Remove a task
    Remove { id: u64 },
    /// Set or clear a task's due date
    Due {
        id: u64,
        /// Due date (YYYY-MM-DD); omit to clear
        date: Option<String>,
    },
    /// Set a task's priority
    Priority {
        id: u64,
        /// low | medium | high
        value: String,
    },
    /// Assign a team member as task leader
    Lead {
        id: u64,
        /// Team member id; omit to clear
        member: Option<u64>,
    },
    /// Move a task to a new zero-based position
    Move { id: u64, position: usize },
}

#[derive(Subcommand)]
pub enum SubtaskAction {
    /// Add a subtask to a task
    Add { task: u64, name: String },
    /// Mark a subtask completed
    Done { task: u64, id: u64 },
    /// Mark a subtask incomplete (forces the parent incomplete)
    Undo { task: u64, id: u64 },
    /// Assign a team member to a subtask
    Assign {
        task: u64,
        id: u64,
        /// Team member id; omit to clear
        member: Option<u64>,
    },
}

#[derive(Subcommand)]
pub enum ErrorAction {
    /// Document a problem encountered on a task
    Add { task: u64, text: String },
    /// Remove an error note
    Remove { task: u64, id: u64 },
}

#[derive(Subcommand)]
pub enum TeamAction {
    /// Add a team member
    Add { name: String },
    /// Remove a team member (clears their assignments)
    Remove { id: u64 },
    /// Show the team
    List,
}
