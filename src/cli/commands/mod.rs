//! Command implementations, one module per subcommand.

pub mod column;
pub mod completions;
pub mod create;
pub mod doctor;
pub mod drag;
pub mod init;
pub mod move_issue;
pub mod show;
pub mod version;
