//! Tunnel configuration.

use std::path::PathBuf;

/// Database engine the tunnel forwards to.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, clap::ValueEnum)]
pub enum Engine {
    #[default]
    #[value(name = "mysql")]
    MySql,
    #[value(name = "sqlite")]
    Sqlite,
}

impl Engine {
    pub fn name(self) -> &'static str {
        match self {
            Engine::MySql => "MySQL",
            Engine::Sqlite => "SQLite",
        }
    }
}

/// Settings shared by every request handler.
#[derive(Debug, Clone)]
pub struct TunnelConfig {
    pub engine: Engine,
    /// Serve the diagnostic page for GET and for incomplete POSTs.
    pub allow_test_menu: bool,
    /// Directory SQLite database paths are resolved against.
    pub sqlite_root: PathBuf,
}

impl Default for TunnelConfig {
    fn default() -> Self {
        Self {
            engine: Engine::default(),
            allow_test_menu: true,
            sqlite_root: PathBuf::from("."),
        }
    }
}

impl TunnelConfig {
    pub fn new(engine: Engine) -> Self {
        Self {
            engine,
            ..Self::default()
        }
    }

    pub fn allow_test_menu(mut self, allow: bool) -> Self {
        self.allow_test_menu = allow;
        self
    }

    pub fn sqlite_root(mut self, root: impl Into<PathBuf>) -> Self {
        self.sqlite_root = root.into();
        self
    }
}
