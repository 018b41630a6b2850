//! Machine configuration - root configuration structure.

use heapless::Vec;
use serde::Deserialize;

use super::axis::AxisConfig;
use super::timing::TimingConfig;

/// Maximum number of mechanical axes a configuration may declare.
pub const MAX_AXES: usize = 16;

/// Root configuration structure from TOML.
///
/// Axes are listed in mechanical index order: the first `[[axes]]` entry
/// is axis 0.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct MachineConfig {
    /// Step pulse timing.
    #[serde(default)]
    pub timing: TimingConfig,

    /// Mechanical axes, in index order.
    pub axes: Vec<AxisConfig, MAX_AXES>,
}

impl MachineConfig {
    /// Get an axis configuration by name.
    pub fn axis(&self, name: &str) -> Option<&AxisConfig> {
        self.axes.iter().find(|a| a.name.as_str() == name)
    }

    /// Get the mechanical index of a named axis.
    pub fn axis_index(&self, name: &str) -> Option<usize> {
        self.axes.iter().position(|a| a.name.as_str() == name)
    }

    /// List all axis names in index order.
    pub fn axis_names(&self) -> impl Iterator<Item = &str> {
        self.axes.iter().map(|a| a.name.as_str())
    }

    /// Number of configured axes.
    pub fn axis_count(&self) -> usize {
        self.axes.len()
    }
}
