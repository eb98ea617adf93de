use botanic_engine::rules::{HAND_SIZE, RulesConfig, STARTING_GOAL};
use botanic_engine::soil::DEFAULT_SOIL_COUNT;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::fs;

pub const CONFIG_ENV: &str = "BOTANIC_CONFIG";
pub const SEED_ENV: &str = "BOTANIC_SEED";
pub const SOILS_ENV: &str = "BOTANIC_SOILS";
pub const HAND_SIZE_ENV: &str = "BOTANIC_HAND_SIZE";
pub const SCORE_GOAL_ENV: &str = "BOTANIC_SCORE_GOAL";
pub const ANIMATE_ENV: &str = "BOTANIC_ANIMATE";

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Config {
    pub seed: Option<u64>,
    pub soils: usize,
    pub hand_size: usize,
    pub score_goal: u64,
    pub animate: bool,
    /// Seed archetype the backpack starts with
    pub starting_seed: String,
    pub starting_seeds: usize,
    pub starting_coins: u32,
    pub starting_upgrades: Vec<String>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum ValueSource {
    Default,
    File,
    Env,
}

#[derive(Debug, Clone, Copy)]
pub struct ConfigSources {
    pub seed: ValueSource,
    pub soils: ValueSource,
    pub hand_size: ValueSource,
    pub score_goal: ValueSource,
    pub animate: ValueSource,
    pub starting_seed: ValueSource,
    pub starting_seeds: ValueSource,
    pub starting_coins: ValueSource,
    pub starting_upgrades: ValueSource,
}

impl Default for ConfigSources {
    fn default() -> Self {
        Self {
            seed: ValueSource::Default,
            soils: ValueSource::Default,
            hand_size: ValueSource::Default,
            score_goal: ValueSource::Default,
            animate: ValueSource::Default,
            starting_seed: ValueSource::Default,
            starting_seeds: ValueSource::Default,
            starting_coins: ValueSource::Default,
            starting_upgrades: ValueSource::Default,
        }
    }
}

#[derive(Debug, Clone)]
pub struct ConfigResolved {
    pub config: Config,
    pub sources: ConfigSources,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            seed: None,
            soils: DEFAULT_SOIL_COUNT,
            hand_size: HAND_SIZE,
            score_goal: STARTING_GOAL,
            animate: true,
            starting_seed: "Basic Seed".into(),
            starting_seeds: 10,
            starting_coins: 100,
            starting_upgrades: vec!["Watering Can".into()],
        }
    }
}

impl Config {
    /// Round rules with this configuration's overrides applied.
    pub fn rules(&self) -> RulesConfig {
        RulesConfig {
            soil_count: self.soils,
            hand_size: self.hand_size,
            starting_goal: self.score_goal,
            animate: self.animate,
            ..RulesConfig::default()
        }
    }
}

#[derive(Debug)]
pub enum ConfigError {
    Io(std::io::Error),
    Parse(toml::de::Error),
    Invalid(String),
}

impl From<std::io::Error> for ConfigError {
    fn from(e: std::io::Error) -> Self {
        ConfigError::Io(e)
    }
}
impl From<toml::de::Error> for ConfigError {
    fn from(e: toml::de::Error) -> Self {
        ConfigError::Parse(e)
    }
}

impl fmt::Display for ConfigError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ConfigError::Io(e) => write!(f, "cannot read config file: {}", e),
            ConfigError::Parse(e) => write!(f, "cannot parse config file: {}", e),
            ConfigError::Invalid(msg) => write!(f, "{}", msg),
        }
    }
}

impl std::error::Error for ConfigError {}

/// Resolves the configuration: defaults, then the TOML file named by
/// `BOTANIC_CONFIG`, then `BOTANIC_*` environment overrides.
pub fn load_with_sources() -> Result<ConfigResolved, ConfigError> {
    let mut cfg = Config::default();
    let mut sources = ConfigSources::default();

    if let Ok(path) = std::env::var(CONFIG_ENV)
        && !path.is_empty()
    {
        let s = fs::read_to_string(path)?;
        let f: FileConfig = toml::from_str(&s)?;
        if let Some(v) = f.seed {
            cfg.seed = Some(v);
            sources.seed = ValueSource::File;
        }
        if let Some(v) = f.soils {
            cfg.soils = v;
            sources.soils = ValueSource::File;
        }
        if let Some(v) = f.hand_size {
            cfg.hand_size = v;
            sources.hand_size = ValueSource::File;
        }
        if let Some(v) = f.score_goal {
            cfg.score_goal = v;
            sources.score_goal = ValueSource::File;
        }
        if let Some(v) = f.animate {
            cfg.animate = v;
            sources.animate = ValueSource::File;
        }
        if let Some(v) = f.starting_seed {
            cfg.starting_seed = v;
            sources.starting_seed = ValueSource::File;
        }
        if let Some(v) = f.starting_seeds {
            cfg.starting_seeds = v;
            sources.starting_seeds = ValueSource::File;
        }
        if let Some(v) = f.starting_coins {
            cfg.starting_coins = v;
            sources.starting_coins = ValueSource::File;
        }
        if let Some(v) = f.starting_upgrades {
            cfg.starting_upgrades = v;
            sources.starting_upgrades = ValueSource::File;
        }
    }

    if let Some(seed) = env_value(SEED_ENV) {
        cfg.seed = Some(
            seed.parse()
                .map_err(|_| ConfigError::Invalid("Invalid seed".into()))?,
        );
        sources.seed = ValueSource::Env;
    }
    if let Some(soils) = env_value(SOILS_ENV) {
        cfg.soils = soils
            .parse()
            .map_err(|_| ConfigError::Invalid("Invalid soils".into()))?;
        sources.soils = ValueSource::Env;
    }
    if let Some(hand) = env_value(HAND_SIZE_ENV) {
        cfg.hand_size = hand
            .parse()
            .map_err(|_| ConfigError::Invalid("Invalid hand size".into()))?;
        sources.hand_size = ValueSource::Env;
    }
    if let Some(goal) = env_value(SCORE_GOAL_ENV) {
        cfg.score_goal = goal
            .parse()
            .map_err(|_| ConfigError::Invalid("Invalid score goal".into()))?;
        sources.score_goal = ValueSource::Env;
    }
    if let Some(animate) = env_value(ANIMATE_ENV) {
        cfg.animate =
            parse_bool(&animate).ok_or_else(|| ConfigError::Invalid("Invalid animate".into()))?;
        sources.animate = ValueSource::Env;
    }

    validate(&cfg)?;
    Ok(ConfigResolved {
        config: cfg,
        sources,
    })
}

fn env_value(key: &str) -> Option<String> {
    std::env::var(key).ok().filter(|v| !v.is_empty())
}

#[derive(Debug, Deserialize)]
struct FileConfig {
    #[serde(default)]
    seed: Option<u64>,
    #[serde(default)]
    soils: Option<usize>,
    #[serde(default)]
    hand_size: Option<usize>,
    #[serde(default)]
    score_goal: Option<u64>,
    #[serde(default)]
    animate: Option<bool>,
    #[serde(default)]
    starting_seed: Option<String>,
    #[serde(default)]
    starting_seeds: Option<usize>,
    #[serde(default)]
    starting_coins: Option<u32>,
    #[serde(default)]
    starting_upgrades: Option<Vec<String>>,
}

fn validate(cfg: &Config) -> Result<(), ConfigError> {
    cfg.rules()
        .validate()
        .map_err(|e| ConfigError::Invalid(format!("Invalid configuration: {}", e)))?;
    if cfg.starting_seed.trim().is_empty() {
        return Err(ConfigError::Invalid(
            "Invalid configuration: starting_seed must not be empty".into(),
        ));
    }
    Ok(())
}

fn parse_bool(s: &str) -> Option<bool> {
    match s.to_ascii_lowercase().as_str() {
        "1" | "true" | "on" | "yes" => Some(true),
        "0" | "false" | "off" | "no" => Some(false),
        _ => None,
    }
}
