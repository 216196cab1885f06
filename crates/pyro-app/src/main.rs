use tracing::{info, warn, Level};
use tracing_subscriber::FmtSubscriber;

use pyro_core::SceneConfig;
use pyro_ui::run_ui;

const CONFIG_ENV: &str = "PYRO_CONFIG";

fn main() {
    // Init logging
    let subscriber = FmtSubscriber::builder()
        .with_max_level(Level::INFO)
        .with_env_filter("info")
        .finish();
    let _ = tracing::subscriber::set_global_default(subscriber);

    info!("Pyro starting");
    let config = match std::env::var_os(CONFIG_ENV) {
        Some(path) => match SceneConfig::load(&path) {
            Ok(config) => config,
            Err(e) => {
                warn!("{e}; falling back to defaults");
                SceneConfig::default()
            }
        },
        None => SceneConfig::default(),
    };
    if let Err(e) = run_ui(config) {
        eprintln!("Pyro error: {e}");
    }
}
