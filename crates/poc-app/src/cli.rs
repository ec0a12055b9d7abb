use std::fs;
use std::path::{Path, PathBuf};
use clap::{Parser, Subcommand};
use poc_core::error::{Error, Result};
use poc_core::signature::{ParticleDraft, SignatureDraft, SignatureImage, SignatureResult};

#[derive(Parser, Debug)]
#[command(name = "poc", about = "Client for the Particles on Canvas signature service")]
pub struct Args {
    #[command(subcommand)]
    pub command: Command,
}

#[derive(Subcommand, Debug)]
pub enum Command {
    /// Resolve the active service and print system and hardware status
    Status,
    /// Request new signatures
    Create(CreateArgs),
    /// Ping the fallback service on an interval so it stays warm
    KeepAlive,
    /// Run the HTTP gateway
    Serve {
        #[arg(long)]
        port: Option<u16>,
    },
}

#[derive(clap::Args, Debug)]
pub struct CreateArgs {
    #[arg(long, default_value_t = 512)]
    pub width: u32,
    #[arg(long, default_value_t = 512)]
    pub height: u32,
    #[arg(long, default_value_t = 1)]
    pub images: u32,
    #[arg(long)]
    pub alpha: bool,
    #[arg(long)]
    pub symmetry: bool,
    #[arg(long)]
    pub trig: bool,
    #[arg(long)]
    pub noise: bool,
    #[arg(long, default_value = "tanh")]
    pub activation: String,
    #[arg(long = "particle", required = true, value_name = "NAME:VELOCITY[:PRIORITY]")]
    pub particles: Vec<String>,
    /// Directory inline images are written to
    #[arg(long, default_value = "signatures")]
    pub out: PathBuf,
}

impl CreateArgs {
    pub fn to_draft(&self) -> Result<SignatureDraft> {
        let particles = self
            .particles
            .iter()
            .map(|entry| parse_particle(entry))
            .collect::<Result<Vec<_>>>()?;

        Ok(SignatureDraft {
            width: self.width,
            height: self.height,
            images: self.images,
            alpha: self.alpha,
            symmetry: self.symmetry,
            trig: self.trig,
            noise: self.noise,
            activation: self.activation.clone(),
            particles,
            save: None,
        })
    }
}

pub fn parse_particle(entry: &str) -> Result<ParticleDraft> {
    let invalid = || Error::InvalidRequest(format!("invalid particle '{entry}': expected name:velocity[:priority]"));

    let mut parts = entry.trim().split(':');
    let name = parts.next().unwrap_or("").trim();
    let velocity = parts.next().unwrap_or("").trim();
    let priority = parts.next().map(str::trim);
    if parts.next().is_some() || name.is_empty() || velocity.is_empty() {
        return Err(invalid());
    }

    let velocity: f64 = velocity.parse().map_err(|_| invalid())?;
    let draft = ParticleDraft::new(name, velocity);

    match priority {
        Some(raw) => Ok(draft.with_priority(raw.parse().map_err(|_| invalid())?)),
        None => Ok(draft),
    }
}

/// Writes inline images as `<seed>.png` under `dir`. Returns one line per
/// signature: the written path, or the URL of a remote image.
pub fn write_signatures(dir: &Path, result: &SignatureResult) -> anyhow::Result<Vec<String>> {
    let mut lines = Vec::with_capacity(result.signatures.len());

    for signature in &result.signatures {
        match &signature.image {
            SignatureImage::Inline(bytes) => {
                fs::create_dir_all(dir)?;
                let path = dir.join(format!("{}.png", sanitize(&signature.seed)));
                fs::write(&path, bytes)?;
                lines.push(path.display().to_string());
            }
            SignatureImage::Remote(url) => lines.push(url.clone()),
        }
    }

    Ok(lines)
}

fn sanitize(seed: &str) -> String {
    seed.chars()
        .map(|c| if c.is_ascii_alphanumeric() || c == '-' || c == '_' { c } else { '_' })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use poc_core::Particle;
    use poc_core::signature::Signature;

    #[test]
    fn test_parse_particle() {
        let draft = parse_particle("kaon:250.5:3").unwrap();
        let request = SignatureDraft {
            particles: vec![draft],
            ..SignatureDraft::default()
        }
        .build()
        .unwrap();

        assert_eq!(request.particles()[0].particle, Particle::Kaon);
        assert_eq!(request.particles()[0].velocity, 250.5);
        assert_eq!(request.particles()[0].priority, 3);
    }

    #[test]
    fn test_parse_particle_rejects_garbage() {
        assert!(parse_particle("kaon").is_err());
        assert!(parse_particle("kaon:fast").is_err());
        assert!(parse_particle("kaon:1:2:3").is_err());
        assert!(parse_particle(":1").is_err());
    }

    #[test]
    fn test_create_args() {
        let args = Args::try_parse_from([
            "poc", "create", "--width", "256", "--trig", "--particle", "electron:10", "--particle", "pion:20:2",
        ])
        .unwrap();

        let Command::Create(create) = args.command else {
            panic!("expected create");
        };
        let request = create.to_draft().unwrap().build().unwrap();

        assert_eq!(request.width(), 256);
        assert_eq!(request.height(), 512);
        assert_eq!(request.particles().len(), 2);
    }

    #[test]
    fn test_create_requires_particle() {
        assert!(Args::try_parse_from(["poc", "create"]).is_err());
    }

    #[test]
    fn test_write_signatures() {
        let dir = std::env::temp_dir().join(format!("poc-cli-test-{}", std::process::id()));
        let result = SignatureResult {
            combined_velocity: 1.0,
            layer_dimensions: vec![4],
            strategy: "hsv".into(),
            signatures: vec![
                Signature { image: SignatureImage::Inline(vec![1, 2, 3]), seed: "../42".into() },
                Signature { image: SignatureImage::Remote("https://bucket.example/1.png".into()), seed: "1".into() },
            ],
        };

        let lines = write_signatures(&dir, &result).unwrap();

        let written = dir.join("___42.png");
        assert_eq!(lines, vec![written.display().to_string(), "https://bucket.example/1.png".to_string()]);
        assert_eq!(fs::read(&written).unwrap(), vec![1, 2, 3]);
        fs::remove_dir_all(&dir).unwrap();
    }
}
