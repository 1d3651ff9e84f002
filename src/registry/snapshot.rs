use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sha2::{Digest, Sha256};

/// One ordered implementation as seen in a snapshot.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct NodeEntry {
    pub dependency: String,
    pub weight: String,
    pub same_weight_as_left: bool,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct InterfaceEntry {
    pub interface: String,
    pub implementations: Vec<NodeEntry>,
    pub excluded: Vec<String>,
}

/// Serializable view of every interface and its ordered implementations.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RegistrySnapshot {
    /// `sha256:<hex>` over the interfaces, in order. Ignores `created_at`.
    pub fingerprint: String,
    pub created_at: DateTime<Utc>, // informational only
    pub interfaces: Vec<InterfaceEntry>,
}

impl RegistrySnapshot {
    pub(crate) fn new(mut interfaces: Vec<InterfaceEntry>) -> Self {
        interfaces.sort_by(|a, b| a.interface.cmp(&b.interface));

        let mut hasher = Sha256::new();
        for entry in &interfaces {
            hasher.update(format!("interface:{}\n", entry.interface).as_bytes());
            for node in &entry.implementations {
                let line = format!(
                    "node:{}:{}:{}\n",
                    node.dependency, node.weight, node.same_weight_as_left
                );
                hasher.update(line.as_bytes());
            }
            for excluded in &entry.excluded {
                hasher.update(format!("excluded:{excluded}\n").as_bytes());
            }
        }
        let fingerprint = format!("sha256:{}", hex::encode(hasher.finalize()));

        Self {
            fingerprint,
            created_at: Utc::now(),
            interfaces,
        }
    }

    pub fn interface(&self, name: &str) -> Option<&InterfaceEntry> {
        self.interfaces.iter().find(|entry| entry.interface == name)
    }

    pub fn to_json_pretty(&self) -> Result<String, serde_json::Error> {
        serde_json::to_string_pretty(self)
    }
}
