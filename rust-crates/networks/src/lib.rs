//! Per-network game-configuration bounds. The platform publishes, per
//! chain, which player counts, fee tables, registration amounts and
//! draw hours a game may be created with; the wizard validates drafts
//! against these records.

use anyhow::{
    Context,
    Result,
    anyhow,
};
use serde::{
    Deserialize,
    Serialize,
};
use std::{
    fmt,
    fs,
    path::{
        Path,
        PathBuf,
    },
};

pub const NETWORKS_ROOT: &str = ".networks";
const BOUNDS_FILE: &str = "bounds.json";

#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub enum NetworkEnv {
    Local,
    Test,
    Main,
}

impl NetworkEnv {
    pub fn dir_name(self) -> &'static str {
        match self {
            NetworkEnv::Local => "local",
            NetworkEnv::Test => "test",
            NetworkEnv::Main => "main",
        }
    }
}

impl fmt::Display for NetworkEnv {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            NetworkEnv::Local => "Local",
            NetworkEnv::Test => "Testnet",
            NetworkEnv::Main => "Mainnet",
        };
        write!(f, "{name}")
    }
}

/// Authorized configuration space for new games on one network. Fees
/// are basis points; amounts are in the chain's smallest native unit.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct GameBounds {
    pub min_players: u32,
    pub max_players: u32,
    pub min_name_length: usize,
    pub max_name_length: usize,
    pub max_winners: u32,
    pub authorized_treasury_fees: Vec<u64>,
    pub authorized_creator_fees: Vec<u64>,
    pub authorized_registration_amounts: Vec<u128>,
    pub authorized_cron_hours: Vec<u8>,
}

impl Default for GameBounds {
    fn default() -> Self {
        GameBounds {
            min_players: 2,
            max_players: 100,
            min_name_length: 3,
            max_name_length: 32,
            max_winners: 10,
            authorized_treasury_fees: vec![0, 100, 300, 500, 1_000],
            authorized_creator_fees: vec![0, 100, 300, 500],
            authorized_registration_amounts: vec![
                0,
                10_000_000_000_000_000,  // 0.01
                50_000_000_000_000_000,  // 0.05
                100_000_000_000_000_000, // 0.1
            ],
            authorized_cron_hours: vec![17, 18, 19, 20, 21],
        }
    }
}

#[derive(Debug)]
pub struct BoundsStore {
    path: PathBuf,
}

impl BoundsStore {
    pub fn new(env: NetworkEnv) -> Result<Self> {
        Self::new_in(Path::new(NETWORKS_ROOT), env)
    }

    pub fn new_in(root: &Path, env: NetworkEnv) -> Result<Self> {
        let path = ensure_store(root, env)?;
        Ok(Self { path })
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    pub fn load(&self) -> Result<Option<GameBounds>> {
        let data = fs::read(&self.path).context("Failed to read network bounds")?;
        if data.is_empty() || data.iter().all(u8::is_ascii_whitespace) {
            return Ok(None);
        }
        serde_json::from_slice(&data)
            .map(Some)
            .map_err(|e| anyhow!("Failed to parse network bounds JSON: {e}"))
    }

    /// Bounds for this network, falling back to the shipped defaults
    /// when none have been published locally.
    pub fn load_or_default(&self) -> Result<GameBounds> {
        Ok(self.load()?.unwrap_or_default())
    }

    pub fn save(&self, bounds: &GameBounds) -> Result<()> {
        let json = serde_json::to_vec_pretty(bounds)
            .context("Failed to serialize network bounds")?;
        fs::write(&self.path, json).context("Failed to write network bounds")
    }
}

pub fn ensure_structure() -> Result<()> {
    for env in [NetworkEnv::Local, NetworkEnv::Test, NetworkEnv::Main] {
        let _ = ensure_store(Path::new(NETWORKS_ROOT), env)?;
    }
    Ok(())
}

fn ensure_store(root: &Path, env: NetworkEnv) -> Result<PathBuf> {
    let env_dir = root.join(env.dir_name());
    if !env_dir.exists() {
        fs::create_dir_all(&env_dir).with_context(|| {
            format!("Failed to create {} directory", env_dir.display())
        })?;
    }
    let file_path = env_dir.join(BOUNDS_FILE);
    if !file_path.exists() {
        fs::write(&file_path, b"").with_context(|| {
            format!("Failed to initialize bounds file for {env}")
        })?;
    }
    Ok(file_path)
}
