mod args;
mod paths;

pub use args::{
    Cli, Commands, ErrorAction, SubtaskAction, TaskAction, TeamAction,
};
pub use paths::default_backup_filename;
