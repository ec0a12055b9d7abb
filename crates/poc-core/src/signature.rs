use std::collections::HashSet;
use base64::Engine;
use base64::engine::general_purpose::STANDARD;
use serde::de::{self, Deserializer};
use serde::ser::Serializer;
use serde::{Deserialize, Serialize};
use crate::error::{Error, Result};
use crate::model_types::{Activation, Particle};

pub const MIN_DIMENSION: u32 = 64;
pub const MAX_DIMENSION: u32 = 2048;
pub const MIN_IMAGES: u32 = 1;
pub const MAX_IMAGES: u32 = 10;
pub const MIN_VELOCITY: f64 = 1.0;
/// Speed of light in m/s
pub const MAX_VELOCITY: f64 = 299_792_458.0;

const PNG_DATA_URI_PREFIX: &str = "data:image/png;base64,";

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct ParticleData {
    pub particle: Particle,
    pub velocity: f64,
    pub priority: u32,
}

/// Validated generation parameters, as sent to `POST /signatures/create`.
///
/// Only obtainable through [`SignatureDraft::build`], so every instance
/// satisfies the range and uniqueness rules.
#[derive(Debug, Clone, Serialize, PartialEq)]
pub struct SignatureRequest {
    width: u32,
    height: u32,
    images: u32,
    alpha: bool,
    symmetry: bool,
    trig: bool,
    noise: bool,
    activation: Activation,
    particles: Vec<ParticleData>,
    #[serde(skip_serializing_if = "Option::is_none")]
    save: Option<bool>,
}

impl SignatureRequest {
    pub fn width(&self) -> u32 {
        self.width
    }

    pub fn height(&self) -> u32 {
        self.height
    }

    pub fn images(&self) -> u32 {
        self.images
    }

    pub fn activation(&self) -> Activation {
        self.activation
    }

    pub fn particles(&self) -> &[ParticleData] {
        &self.particles
    }

    pub fn save(&self) -> Option<bool> {
        self.save
    }

    /// Smallest request the upstream accepts, not persisted. Used to keep
    /// the fallback host warm.
    pub fn warm_up() -> Self {
        Self {
            width: MIN_DIMENSION,
            height: MIN_DIMENSION,
            images: MIN_IMAGES,
            alpha: false,
            symmetry: false,
            trig: false,
            noise: false,
            activation: Activation::default(),
            particles: vec![ParticleData {
                particle: Particle::Electron,
                velocity: MIN_VELOCITY,
                priority: 1,
            }],
            save: Some(false),
        }
    }
}

/// Velocity as submitted by a form: either a JSON number or a numeric string
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(untagged)]
pub enum LooseNumber {
    Number(f64),
    Text(String),
}

impl LooseNumber {
    fn to_f64(&self) -> Option<f64> {
        match self {
            Self::Number(n) => Some(*n),
            Self::Text(s) => s.trim().parse().ok(),
        }
    }
}

impl From<f64> for LooseNumber {
    fn from(value: f64) -> Self {
        Self::Number(value)
    }
}

#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct ParticleDraft {
    pub particle: String,
    pub velocity: LooseNumber,
    #[serde(default)]
    pub priority: Option<u32>,
}

impl ParticleDraft {
    pub fn new(particle: impl Into<String>, velocity: f64) -> Self {
        Self {
            particle: particle.into(),
            velocity: velocity.into(),
            priority: None,
        }
    }

    pub fn with_priority(mut self, priority: u32) -> Self {
        self.priority = Some(priority);
        self
    }
}

/// Unvalidated user input. Out-of-range sizes and velocities are clamped the
/// way the creation form clamps them; structural problems are rejected.
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(default)]
pub struct SignatureDraft {
    pub width: u32,
    pub height: u32,
    pub images: u32,
    pub alpha: bool,
    pub symmetry: bool,
    pub trig: bool,
    pub noise: bool,
    pub activation: String,
    pub particles: Vec<ParticleDraft>,
    pub save: Option<bool>,
}

impl Default for SignatureDraft {
    fn default() -> Self {
        Self {
            width: 512,
            height: 512,
            images: 1,
            alpha: false,
            symmetry: false,
            trig: false,
            noise: false,
            activation: Activation::default().id().to_string(),
            particles: Vec::new(),
            save: None,
        }
    }
}

impl SignatureDraft {
    pub fn build(self) -> Result<SignatureRequest> {
        if self.particles.is_empty() {
            return Err(Error::InvalidRequest("at least one particle is required".into()));
        }

        let activation: Activation = self.activation.parse()?;

        let mut seen = HashSet::new();
        let mut particles = Vec::with_capacity(self.particles.len());
        for draft in self.particles {
            let particle: Particle = draft.particle.parse()?;
            if !seen.insert(particle) {
                return Err(Error::InvalidRequest(format!("particle '{particle}' listed twice")));
            }

            let velocity = draft
                .velocity
                .to_f64()
                .filter(|v| v.is_finite())
                .ok_or_else(|| Error::InvalidRequest(format!("velocity of '{particle}' is not a number")))?;

            let priority = draft.priority.unwrap_or(1);
            if priority == 0 {
                return Err(Error::InvalidRequest(format!("priority of '{particle}' must be at least 1")));
            }

            particles.push(ParticleData {
                particle,
                velocity: velocity.clamp(MIN_VELOCITY, MAX_VELOCITY),
                priority,
            });
        }

        Ok(SignatureRequest {
            width: self.width.clamp(MIN_DIMENSION, MAX_DIMENSION),
            height: self.height.clamp(MIN_DIMENSION, MAX_DIMENSION),
            images: self.images.clamp(MIN_IMAGES, MAX_IMAGES),
            alpha: self.alpha,
            symmetry: self.symmetry,
            trig: self.trig,
            noise: self.noise,
            activation,
            particles,
            save: self.save,
        })
    }
}

/// A generated image, normalized at the transport boundary
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SignatureImage {
    /// Raw PNG bytes
    Inline(Vec<u8>),
    /// Where the upstream stored the image
    Remote(String),
}

impl SignatureImage {
    fn from_wire(raw: &str) -> std::result::Result<Self, String> {
        let raw = raw.trim();
        if raw.starts_with("http://") || raw.starts_with("https://") {
            return Ok(Self::Remote(raw.to_string()));
        }

        let payload = raw.strip_prefix(PNG_DATA_URI_PREFIX).unwrap_or(raw);
        STANDARD
            .decode(payload)
            .map(Self::Inline)
            .map_err(|e| format!("image is neither a URL nor base64: {e}"))
    }

    fn to_wire(&self) -> String {
        match self {
            Self::Inline(bytes) => STANDARD.encode(bytes),
            Self::Remote(url) => url.clone(),
        }
    }

    /// Something an `<img src>` accepts
    pub fn to_src(&self) -> String {
        match self {
            Self::Inline(bytes) => format!("{PNG_DATA_URI_PREFIX}{}", STANDARD.encode(bytes)),
            Self::Remote(url) => url.clone(),
        }
    }
}

impl Serialize for SignatureImage {
    fn serialize<S: Serializer>(&self, serializer: S) -> std::result::Result<S::Ok, S::Error> {
        serializer.serialize_str(&self.to_wire())
    }
}

impl<'de> Deserialize<'de> for SignatureImage {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> std::result::Result<Self, D::Error> {
        let raw = String::deserialize(deserializer)?;
        Self::from_wire(&raw).map_err(de::Error::custom)
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Signature {
    pub image: SignatureImage,
    #[serde(deserialize_with = "seed_as_string")]
    pub seed: String,
}

/// Response of `POST /signatures/create`
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct SignatureResult {
    pub combined_velocity: f64,
    pub layer_dimensions: Vec<u32>,
    pub strategy: String,
    pub signatures: Vec<Signature>,
}

impl SignatureResult {
    pub fn from_slice(bytes: &[u8]) -> Result<Self> {
        serde_json::from_slice(bytes).map_err(|e| Error::MalformedResponse(e.to_string()))
    }
}

// Seeds come back as strings from some upstream versions and integers from others.
fn seed_as_string<'de, D: Deserializer<'de>>(deserializer: D) -> std::result::Result<String, D::Error> {
    match serde_json::Value::deserialize(deserializer)? {
        serde_json::Value::String(s) => Ok(s),
        serde_json::Value::Number(n) => Ok(n.to_string()),
        other => Err(de::Error::custom(format!("seed must be a string or number, got {other}"))),
    }
}
