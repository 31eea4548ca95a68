//! CLI command implementations

pub(crate) mod common;
pub(crate) mod debug;
pub(crate) mod init;
pub(crate) mod test;
