use std::time::{Duration, SystemTime, UNIX_EPOCH};

use engine::{LoopConfig, Scene};
use platformer::{Tuning, TuningError};
use tracing::{info, warn};
use tracing_subscriber::EnvFilter;

use super::scene::PlatformerScene;

const SEED_ENV_VAR: &str = "PLATFORMER_SEED";

pub(crate) struct AppWiring {
    pub(crate) config: LoopConfig,
    pub(crate) scene: Box<dyn Scene>,
}

pub(crate) fn build_app() -> Result<AppWiring, TuningError> {
    init_tracing();
    info!("=== Platformer Startup ===");

    let tuning = Tuning::from_env()?;
    let seed = resolve_seed(std::env::var(SEED_ENV_VAR).ok().as_deref());
    info!(seed, "rng_seeded");

    let config = LoopConfig {
        max_frame_delta: Duration::from_secs_f32(tuning.max_step_seconds),
        ..LoopConfig::default()
    };

    Ok(AppWiring {
        config,
        scene: Box::new(PlatformerScene::new(tuning, seed)),
    })
}

fn init_tracing() {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .with_thread_names(true)
        .compact()
        .init();
}

fn resolve_seed(raw: Option<&str>) -> u64 {
    if let Some(raw) = raw {
        match raw.trim().parse::<u64>() {
            Ok(seed) => return seed,
            Err(_) => warn!(
                var = SEED_ENV_VAR,
                value = raw,
                "invalid seed; falling back to clock"
            ),
        }
    }
    SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .unwrap_or_default()
        .as_nanos() as u64
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn explicit_seed_is_used_verbatim() {
        assert_eq!(resolve_seed(Some("1234")), 1234);
        assert_eq!(resolve_seed(Some(" 99 ")), 99);
    }
}
