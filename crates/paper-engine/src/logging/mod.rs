//! Logger setup for binaries embedding the engine. Library code only talks to
//! the `log` facade.

mod init;

pub use init::{LoggingConfig, init_logging};
