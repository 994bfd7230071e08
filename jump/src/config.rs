use anyhow::{bail, Context, Result};
use neurojump::{EvolutionConfig, Fitness};
use neurojump_nn::networks::{Structure, LAYER_SIZES};
use serde::{Deserialize, Serialize};

use std::path::Path;

/// Score past which a run is stopped.
pub const MAX_SCORE: Fitness = 95;
/// Frames after which a run is stopped.
pub const MAX_STEPS: usize = 50_000;
/// Number of leading snapshot individuals seeding a run.
pub const SEED_LIMIT: usize = 5;
/// Fresh runs start from genes drawn in
/// [-INITIAL_GENE_RANGE, INITIAL_GENE_RANGE].
pub const INITIAL_GENE_RANGE: f32 = 1.0;

/// Settings of an evolution run, loadable from a RON file.
/// Missing fields take their default values.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct JumpConfig {
    pub evolution: EvolutionConfig,
    /// Network every agent plays with. Its layers
    /// must match the genome layout.
    pub structure: Structure,
    /// A run ends once its score exceeds this.
    pub max_score: Fitness,
    /// A run ends after this many frames.
    pub max_steps: usize,
    /// Number of leading individuals kept when seeding
    /// from a snapshot, [`SEED_LIMIT`] by default.
    /// All if unset.
    pub seed_limit: Option<usize>,
    /// Bound of the random genes a run
    /// without a snapshot starts from.
    pub initial_gene_range: f32,
}

impl Default for JumpConfig {
    fn default() -> JumpConfig {
        JumpConfig {
            evolution: EvolutionConfig::default(),
            structure: Structure::jump(),
            max_score: MAX_SCORE,
            max_steps: MAX_STEPS,
            seed_limit: Some(SEED_LIMIT),
            initial_gene_range: INITIAL_GENE_RANGE,
        }
    }
}

impl JumpConfig {
    /// Reads and checks a configuration file.
    pub fn from_file(path: &Path) -> Result<JumpConfig> {
        let text = std::fs::read_to_string(path)
            .with_context(|| format!("failed to read config file {}", path.display()))?;
        let config = Self::from_ron(&text)
            .with_context(|| format!("invalid config file {}", path.display()))?;
        Ok(config)
    }

    fn from_ron(text: &str) -> Result<JumpConfig> {
        let config: JumpConfig = ron::from_str(text)?;
        config.check()?;
        Ok(config)
    }

    fn check(&self) -> Result<()> {
        if self.structure.layer_sizes() != LAYER_SIZES {
            bail!(
                "network layers {:?} do not match the genome layout {:?}",
                self.structure.layer_sizes(),
                LAYER_SIZES
            );
        }
        if self.structure.batch_size() != 1 {
            bail!("agents infer one observation at a time, batch size must be 1");
        }
        if !(self.initial_gene_range.is_finite() && self.initial_gene_range > 0.0) {
            bail!(
                "initial gene range must be positive, got {}",
                self.initial_gene_range
            );
        }
        Ok(())
    }
}
