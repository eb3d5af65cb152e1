//! One module per subcommand.

pub mod init;
pub mod list;
pub mod retrieve;
pub mod store;
