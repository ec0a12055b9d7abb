use std::fmt;
use std::str::FromStr;
use serde::{Deserialize, Serialize};
use crate::error::Error;

/// Particle kinds accepted by the generation service
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Particle {
    Electron,
    Proton,
    Kaon,
    Pion,
}

impl Particle {
    /// Identifier used on the wire
    pub fn id(&self) -> &str {
        match self {
            Self::Electron => "electron",
            Self::Proton => "proton",
            Self::Kaon => "kaon",
            Self::Pion => "pion",
        }
    }

    pub fn all() -> [Particle; 4] {
        [Self::Electron, Self::Proton, Self::Kaon, Self::Pion]
    }
}

impl fmt::Display for Particle {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.id())
    }
}

impl FromStr for Particle {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::all()
            .into_iter()
            .find(|p| p.id().eq_ignore_ascii_case(s.trim()))
            .ok_or_else(|| Error::InvalidRequest(format!("unknown particle '{s}'")))
    }
}

/// Activation function applied by the upstream network
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Activation {
    #[default]
    Tanh,
    Sigmoid,
    Relu,
    Softsign,
    Sin,
    Cos,
}

impl Activation {
    pub fn id(&self) -> &str {
        match self {
            Self::Tanh => "tanh",
            Self::Sigmoid => "sigmoid",
            Self::Relu => "relu",
            Self::Softsign => "softsign",
            Self::Sin => "sin",
            Self::Cos => "cos",
        }
    }

    pub fn all() -> [Activation; 6] {
        [Self::Tanh, Self::Sigmoid, Self::Relu, Self::Softsign, Self::Sin, Self::Cos]
    }
}

impl fmt::Display for Activation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.id())
    }
}

impl FromStr for Activation {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::all()
            .into_iter()
            .find(|a| a.id().eq_ignore_ascii_case(s.trim()))
            .ok_or_else(|| Error::InvalidRequest(format!("unknown activation '{s}'")))
    }
}
