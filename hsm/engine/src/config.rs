//! Per-machine configuration

/// Configuration of one machine instance
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct MachineConfig {
    /// Name used in log output and the spy object dictionary
    pub name: &'static str,
    /// Spy id for trace records; 0 bypasses the local filter
    pub spy_id: u8,
}

impl MachineConfig {
    pub const DEFAULT: MachineConfig = MachineConfig {
        name: "hsm",
        spy_id: 0,
    };

    /// Create a configuration builder
    pub fn builder() -> MachineConfigBuilder {
        MachineConfigBuilder::default()
    }
}

impl Default for MachineConfig {
    fn default() -> Self {
        Self::DEFAULT
    }
}

/// Builder for [`MachineConfig`]
#[derive(Debug, Default)]
pub struct MachineConfigBuilder {
    config: MachineConfig,
}

impl MachineConfigBuilder {
    /// Set the machine name
    pub fn name(mut self, name: &'static str) -> Self {
        self.config.name = name;
        self
    }

    /// Set the spy id
    pub fn spy_id(mut self, spy_id: u8) -> Self {
        self.config.spy_id = spy_id;
        self
    }

    pub fn build(self) -> MachineConfig {
        self.config
    }
}
