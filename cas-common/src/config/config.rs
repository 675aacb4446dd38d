use std::fs::File;
use std::io::Read;
use std::sync::{Arc, RwLock};

use serde::Deserialize;
use serde::Serialize;

use crate::error::{Error, Result};

#[derive(Serialize, Deserialize, Debug, Clone, Default)]
#[serde(default)]
pub struct ClientConfig {
    app: AppConfig,
    broker: BrokerConfig,
    protocol: ProtocolConfig,
}

impl ClientConfig {
    pub fn from_str(config_str: &str) -> Result<Self> {
        Ok(toml::from_str(config_str)?)
    }

    pub fn from_file(config_file: &str) -> Result<Self> {
        let mut file = File::open(config_file)
            .map_err(|e| Error::Config(format!("unable to open {}: {}", config_file, e)))?;
        let mut config_str = String::new();
        file.read_to_string(&mut config_str)
            .map_err(|e| Error::Config(format!("unable to read {}: {}", config_file, e)))?;
        Self::from_str(&*config_str)
    }

    pub fn app(&self) -> &AppConfig {
        &self.app
    }

    pub fn broker(&self) -> &BrokerConfig {
        &self.broker
    }

    pub fn protocol(&self) -> &ProtocolConfig {
        &self.protocol
    }
}

impl ClientConfig {
    pub fn get_broker_addr() -> String {
        let current = ClientConfig::current();
        format!("{}:{}", current.broker.host, current.broker.port)
    }

    pub fn get_writer_capacity() -> usize {
        ClientConfig::current().protocol.writer_capacity
    }

    pub fn get_max_frame_length() -> usize {
        ClientConfig::current().protocol.max_frame_length
    }
}

#[derive(Serialize, Deserialize, Debug, Clone)]
#[serde(default)]
pub struct AppConfig {
    pub name: String,
    pub version: String,
    pub log_level: String,
}

impl Default for AppConfig {
    fn default() -> Self {
        AppConfig {
            name: "CAS Client".to_string(),
            version: "0.1.0".to_string(),
            log_level: "info".to_string(),
        }
    }
}

#[derive(Serialize, Deserialize, Debug, Clone)]
#[serde(default)]
pub struct BrokerConfig {
    pub host: String,
    pub port: u16,
}

impl Default for BrokerConfig {
    fn default() -> Self {
        BrokerConfig {
            host: "127.0.0.1".to_string(),
            port: 33000,
        }
    }
}

/// Sizing knobs for the wire layer.
#[derive(Serialize, Deserialize, Debug, Clone)]
#[serde(default)]
pub struct ProtocolConfig {
    /// Initial capacity of a request writer. Envelopes larger than this grow the buffer.
    pub writer_capacity: usize,
    /// Upper bound on the declared body length of a response. The length field and
    /// cas info that precede the body are not counted.
    pub max_frame_length: usize,
}

impl Default for ProtocolConfig {
    fn default() -> Self {
        ProtocolConfig {
            writer_capacity: 64,
            max_frame_length: 8 * 1024 * 1024,
        }
    }
}

impl ClientConfig {
    pub fn current() -> Arc<ClientConfig> {
        match CLIENT_CONFIG_CACHE.read() {
            Ok(config) => config.clone(),
            Err(poisoned) => poisoned.into_inner().clone(),
        }
    }

    pub fn make_current(self) {
        match CLIENT_CONFIG_CACHE.write() {
            Ok(mut config) => *config = Arc::new(self),
            Err(poisoned) => *poisoned.into_inner() = Arc::new(self),
        }
    }
}

lazy_static! {
    static ref CLIENT_CONFIG_CACHE: RwLock<Arc<ClientConfig>> = RwLock::new(Default::default());
}
