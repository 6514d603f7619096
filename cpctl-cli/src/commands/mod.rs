pub mod enable_logging;
pub mod get;
