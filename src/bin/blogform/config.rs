use std::env;
use std::path::PathBuf;

use blogform::config::{locate_config, read_config, Config};
use blogform::logger::default_log_location;

pub(crate) fn open_config(cfg_path: Option<PathBuf>) -> Result<Config, String> {
    let config_path = match cfg_path.or_else(locate_config) {
        None => return Err("Could not find blogform configuration".to_string()),
        Some(x) => x,
    };

    if let Ok(cur_dir) = env::current_dir() {
        println!("Current dir: {}", cur_dir.display());
    }
    println!("Reading config from {}", config_path.display());
    let mut config = match read_config(&config_path) {
        Ok(config) => config,
        Err(e) => return Err(e.to_string()),
    };

    if let Some(mut log) = config.log {
        let location = log.location.unwrap_or_else(default_log_location);
        println!("Log enabled. Files will be written in {}", location.display());
        log.location = Some(location);
        config.log = Some(log);
    } else {
        println!("Log disabled. Using stdout");
    }

    if config.storage.persist_draft {
        println!("Draft is persisted in slot {}", config.storage.draft_key);
    } else {
        println!("Draft persistence disabled.");
    }

    Ok(config)
}
