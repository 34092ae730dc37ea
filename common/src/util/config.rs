use serde::Deserialize;

#[derive(Debug, Deserialize)]
pub struct Config {
    #[serde(default)]
    pub routing: RoutingConfig,
    #[serde(default)]
    pub output: OutputConfig,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            routing: RoutingConfig::default(),
            output: OutputConfig::default(),
        }
    }
}

#[derive(Debug, Deserialize, Clone)]
pub struct RoutingConfig {
    /// Worker threads for the re-routing sweeps.
    #[serde(default = "default_num_threads")]
    pub num_threads: usize,
    /// Number of full passes over the wire collection.
    #[serde(default = "default_sweeps")]
    pub sweeps: usize,
    /// Per-wire probability of committing a uniformly random candidate
    /// instead of the greedy minimum.
    #[serde(default = "default_sa_prob")]
    pub sa_prob: f64,
    /// Annealing inner iteration count; accepted and reported for interface
    /// compatibility, does not alter the sweep body.
    #[serde(default = "default_sa_inner_iters")]
    pub sa_inner_iters: usize,
}

impl Default for RoutingConfig {
    fn default() -> Self {
        Self {
            num_threads: default_num_threads(),
            sweeps: default_sweeps(),
            sa_prob: default_sa_prob(),
            sa_inner_iters: default_sa_inner_iters(),
        }
    }
}

#[derive(Debug, Deserialize, Clone, Default)]
pub struct OutputConfig {
    /// Destination PNG for the congestion heat map; disabled when unset.
    #[serde(default)]
    pub heatmap: Option<String>,
}

fn default_num_threads() -> usize {
    1
}

fn default_sweeps() -> usize {
    5
}

fn default_sa_prob() -> f64 {
    0.1
}

fn default_sa_inner_iters() -> usize {
    5
}
