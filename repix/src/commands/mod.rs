/// Config command handlers
pub mod config;

/// One-shot file commands (list, upload, view, delete)
pub mod files;

/// Interactive session
pub mod shell;

/// Version command handlers
pub mod version;
