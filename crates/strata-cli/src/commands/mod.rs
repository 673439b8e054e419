//! One module per subcommand. Each exposes `execute`.

pub mod completions;
pub mod config;
pub mod init;
pub mod new;
pub mod params;
