use serde::{Deserialize, Serialize};

use crate::Command;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LogEntry {
    pub term: u64,
    pub index: u64,
    pub command: Command,
    pub is_config: bool, // cluster configuration change entry
}

impl LogEntry {
    pub fn new(index: u64, term: u64, command: Command) -> Self {
        Self {
            term,
            index,
            command,
            is_config: false,
        }
    }
}
