use crate::error::TmapError;
use serde::{Deserialize, Serialize};
use std::{
    fs::{read_to_string, write},
    path::{Path, PathBuf},
};

pub const PLUGIN_ROOT: &str = "$:/plugins/felixhayashi/tiddlymap";
pub const TEMP_ROOT: &str = "$:/temp/felixhayashi/tiddlymap";

/// Store locations used by the plugin. No trailing slashes: titles are not normalized, so
/// `a//b` and `a/b` are different documents.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct Paths {
    pub views: String,
    pub edges: String,
    pub options: String,
    pub local_holders: String,
    pub default_view_holder: String,
}

impl Default for Paths {
    fn default() -> Self {
        Paths {
            views: format!("{PLUGIN_ROOT}/graph/views"),
            edges: format!("{PLUGIN_ROOT}/graph/edges"),
            options: format!("{PLUGIN_ROOT}/options"),
            local_holders: format!("{TEMP_ROOT}/holders"),
            default_view_holder: format!("{PLUGIN_ROOT}/misc/defaultViewHolder"),
        }
    }
}

/// Options the user may change at runtime through the options document.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct UserOptions {
    pub debug: bool,
    pub notifications: bool,
    /// Document field holding an explicit node id. Falls back to the title.
    pub field_node_id: String,
    pub unknown_edge_label: String,
    pub default_view: String,
    pub default_node_filter: String,
    pub edge_log_capacity: usize,
}

impl Default for UserOptions {
    fn default() -> Self {
        UserOptions {
            debug: false,
            notifications: true,
            field_node_id: "id".to_string(),
            unknown_edge_label: "(!noname!)".to_string(),
            default_view: "default".to_string(),
            default_node_filter: "[!is[system]]".to_string(),
            edge_log_capacity: 1024,
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct Options {
    pub paths: Paths,
    pub user: UserOptions,
}

impl Options {
    pub fn from_toml(content: &str) -> Result<Options, TmapError> {
        Ok(toml::from_str(content)?)
    }

    pub fn to_toml(&self) -> Result<String, TmapError> {
        Ok(toml::to_string(self)?)
    }

    /// Read options from a TOML file. A missing file yields the defaults.
    pub fn load<P: AsRef<Path>>(path: P) -> Result<Options, TmapError> {
        let path = path.as_ref();
        tracing::debug!("Attempting to read options from: {:?}", path);
        if !path.exists() {
            tracing::debug!("Options file not found, using defaults.");
            return Ok(Options::default());
        }
        Options::from_toml(&read_to_string(path)?)
    }

    /// Replace the runtime-adjustable part of the options. Paths are fixed for the lifetime of
    /// a [`crate::caretaker::Caretaker`], so a reload never moves existing documents.
    pub fn reload_user(&mut self, content: &str) -> Result<bool, TmapError> {
        let reloaded = Options::from_toml(content)?;
        let changed = reloaded.user != self.user;
        self.user = reloaded.user;
        Ok(changed)
    }

    pub fn default_view_root(&self) -> String {
        self.view_root(&self.user.default_view)
    }

    pub fn view_root(&self, label: &str) -> String {
        format!("{}/{}", self.paths.views, label)
    }
}

pub trait OptionsProvider {
    fn get_options(&self) -> Result<Options, TmapError>;
    fn set_options(&self, options: &Options) -> Result<(), TmapError>;
}

#[derive(Debug, Serialize, Deserialize)]
pub struct TomlOptionsProvider {
    path: PathBuf,
}

impl TomlOptionsProvider {
    pub fn new(path: PathBuf) -> Self {
        TomlOptionsProvider { path }
    }
}

impl OptionsProvider for TomlOptionsProvider {
    fn get_options(&self) -> Result<Options, TmapError> {
        Options::load(&self.path)
    }

    fn set_options(&self, options: &Options) -> Result<(), TmapError> {
        tracing::debug!("Attempting to write options to: {:?}", &self.path);
        write(&self.path, options.to_toml()?)?;
        Ok(())
    }
}
