/*
 * Licensed to the Apache Software Foundation (ASF) under one or more
 * contributor license agreements.  See the NOTICE file distributed with
 * this work for additional information regarding copyright ownership.
 * The ASF licenses this file to You under the Apache License, Version 2.0
 * (the "License"); you may not use this file except in compliance with
 * the License.  You may obtain a copy of the License at
 *
 *     http://www.apache.org/licenses/LICENSE-2.0
 *
 * Unless required by applicable law or agreed to in writing, software
 * distributed under the License is distributed on an "AS IS" BASIS,
 * WITHOUT WARRANTIES OR CONDITIONS OF ANY KIND, either express or implied.
 * See the License for the specific language governing permissions and
 * limitations under the License.
 */

use std::path::Path;

use dubbo_utils::{env_util::get_env_value, path_util::app_root_dir, yaml_util::yaml_key_reader};

use crate::{level::LevelWrapper, Level};

pub const LOG_LEVEL_ENV: &str = "DUBBO_LOG_LEVEL";

const LOG_LEVEL_KEY: &str = "dubbo.logging.level";
const CONFIG_FILE: &str = "dubbo.yaml";

pub(crate) fn default() {
    let max_level = match configured() {
        Some(true) => parse_from_config(),
        // enable everything
        _ => Level::TRACE,
    };
    // another subscriber may already be installed, e.g. by a test harness
    let _ = tracing_subscriber::fmt()
        .compact()
        .with_max_level(max_level)
        .with_thread_names(false)
        .with_line_number(true)
        // sets this to be the default, global collector for this application.
        .try_init();
}

/// `DUBBO_LOG_LEVEL` wins over `dubbo.logging.level` of the app's dubbo.yaml.
pub(crate) fn parse_from_config() -> Level {
    configured_level(&app_root_dir().join(CONFIG_FILE))
        .map(|level| LevelWrapper::from(level).inner)
        .unwrap_or(Level::INFO)
}

pub(crate) fn configured() -> Option<bool> {
    configured_level(&app_root_dir().join(CONFIG_FILE)).map(|_| true)
}

fn configured_level(config_file: &Path) -> Option<String> {
    get_env_value(LOG_LEVEL_ENV).or_else(|| {
        yaml_key_reader(config_file.to_path_buf(), LOG_LEVEL_KEY)
            .ok()
            .flatten()
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_level_from_env_and_yaml() {
        let path = std::env::temp_dir().join(format!("dubbo-logger-{}.yaml", std::process::id()));
        std::fs::write(&path, "dubbo:\n  logging:\n    level: debug\n").unwrap();

        std::env::set_var(LOG_LEVEL_ENV, "warn");
        assert_eq!(configured_level(&path), Some("warn".to_string()));
        std::env::remove_var(LOG_LEVEL_ENV);
        assert_eq!(configured_level(&path), Some("debug".to_string()));

        let absent = path.with_file_name("dubbo-logger-absent.yaml");
        assert_eq!(configured_level(&absent), None);
        std::fs::remove_file(&path).unwrap();
    }
}
