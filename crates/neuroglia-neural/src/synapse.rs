// Copyright 2025 Neuraville Inc.
// SPDX-License-Identifier: Apache-2.0

//! Synaptic target kinds
//!
//! A projection connects a presynaptic signal port to a postsynaptic target
//! port. The backend knows exactly two target kinds; the port name on the API
//! side is parsed into one of them here.

use serde::{Deserialize, Serialize};

use crate::error::{ParameterError, Result};

/// Which postsynaptic input a connection drives
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum SynapticTarget {
    Excitatory,
    Inhibitory,
}

impl SynapticTarget {
    /// Parse an API-level target port name. `None` selects the default
    /// excitatory target.
    pub fn from_port(port: Option<&str>) -> Result<Self> {
        match port {
            None => Ok(SynapticTarget::Excitatory),
            Some("excitatory") => Ok(SynapticTarget::Excitatory),
            Some("inhibitory") => Ok(SynapticTarget::Inhibitory),
            Some(other) => Err(ParameterError::UnknownTarget(other.to_string())),
        }
    }

    pub fn port_name(&self) -> &'static str {
        match self {
            SynapticTarget::Excitatory => "excitatory",
            SynapticTarget::Inhibitory => "inhibitory",
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_port_parsing() {
        assert_eq!(
            SynapticTarget::from_port(None).unwrap(),
            SynapticTarget::Excitatory
        );
        assert_eq!(
            SynapticTarget::from_port(Some("inhibitory")).unwrap(),
            SynapticTarget::Inhibitory
        );
        assert!(SynapticTarget::from_port(Some("modulatory")).is_err());
    }
}
