use std::str::FromStr;

use crate::domain::tier::Tier;
use crate::error::AppError;

/// Which engine serves `POST /api/draw`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum DrawScheme {
    /// Two-round guaranteed-win scheme backed by draw records
    #[default]
    Rounds,
    /// Finite sign pool, display-mapped
    Pool,
}

impl FromStr for DrawScheme {
    type Err = AppError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "rounds" | "v2" => Ok(DrawScheme::Rounds),
            "pool" | "v1" => Ok(DrawScheme::Pool),
            other => Err(AppError::config(format!(
                "LUCKYDRAW_DRAW_SCHEME must be 'rounds' or 'pool', got '{other}'"
            ))),
        }
    }
}

/// Draw engine settings, read once at startup.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DrawConfig {
    pub scheme: DrawScheme,
    /// Upper bound on transactional attempts per draw (at least 1)
    pub max_attempts: u32,
    /// Round-one win chance in whole percent, 0..=100
    pub first_round_win_percent: u8,
    /// Prize assets live at `{base}/{tier-slug}.png` when set
    pub prize_image_base_url: Option<String>,
    /// Fixed seed for reproducible draws
    pub rng_seed: Option<u64>,
}

impl Default for DrawConfig {
    fn default() -> Self {
        Self {
            scheme: DrawScheme::Rounds,
            max_attempts: 2,
            first_round_win_percent: 20,
            prize_image_base_url: None,
            rng_seed: None,
        }
    }
}

fn parse_var<T: FromStr>(name: &str, raw: &str) -> Result<T, AppError> {
    raw.trim()
        .parse::<T>()
        .map_err(|_| AppError::config(format!("{name} has an invalid value: '{raw}'")))
}

impl DrawConfig {
    pub fn from_env() -> Result<Self, AppError> {
        Self::from_lookup(&|name| std::env::var(name).ok())
    }

    /// Build from an arbitrary variable source; unset or blank values keep defaults.
    pub fn from_lookup(lookup: &dyn Fn(&str) -> Option<String>) -> Result<Self, AppError> {
        let get = |name: &str| lookup(name).filter(|v| !v.trim().is_empty());
        let mut cfg = Self::default();

        if let Some(raw) = get("LUCKYDRAW_DRAW_SCHEME") {
            cfg.scheme = raw.parse()?;
        }
        if let Some(raw) = get("LUCKYDRAW_DRAW_MAX_ATTEMPTS") {
            cfg.max_attempts = parse_var("LUCKYDRAW_DRAW_MAX_ATTEMPTS", &raw)?;
            if cfg.max_attempts == 0 {
                return Err(AppError::config(
                    "LUCKYDRAW_DRAW_MAX_ATTEMPTS must be at least 1",
                ));
            }
        }
        if let Some(raw) = get("LUCKYDRAW_FIRST_ROUND_WIN_PERCENT") {
            cfg.first_round_win_percent = parse_var("LUCKYDRAW_FIRST_ROUND_WIN_PERCENT", &raw)?;
            if cfg.first_round_win_percent > 100 {
                return Err(AppError::config(
                    "LUCKYDRAW_FIRST_ROUND_WIN_PERCENT must be between 0 and 100",
                ));
            }
        }
        if let Some(raw) = get("LUCKYDRAW_PRIZE_IMAGE_BASE_URL") {
            cfg.prize_image_base_url = Some(raw.trim().trim_end_matches('/').to_string());
        }
        if let Some(raw) = get("LUCKYDRAW_RNG_SEED") {
            cfg.rng_seed = Some(parse_var("LUCKYDRAW_RNG_SEED", &raw)?);
        }

        Ok(cfg)
    }

    /// Prize asset for a won tier, or `None` without a configured base.
    pub fn prize_image_url(&self, tier: Tier) -> Option<String> {
        self.prize_image_base_url
            .as_deref()
            .map(|base| format!("{base}/{}.png", tier.slug()))
    }
}
