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

use std::{collections::HashMap, path::PathBuf};

use anyhow::Error;
use dubbo_base::constants::DUBBO_KEY;
use dubbo_logger::tracing;
use dubbo_utils::yaml_util::yaml_file_parser;
use once_cell::sync::OnceCell;
use serde::{Deserialize, Serialize};

use crate::{consumer::ConsumerConfig, location::get_config_location};

static GLOBAL_ROOT_CONFIG: OnceCell<RootConfig> = OnceCell::new();

/// used to storage all structed config, from some source: cmd, file..;
#[derive(Debug, Default, Serialize, Deserialize, Clone)]
pub struct RootConfig {
    #[serde(skip)]
    pub location: PathBuf,

    #[serde(default)]
    pub consumer: ConsumerConfig,
}

/// Loads `dubbo.yaml` once and caches it for the lifetime of the process.
pub fn get_global_config() -> Result<&'static RootConfig, Error> {
    GLOBAL_ROOT_CONFIG.get_or_try_init(RootConfig::load)
}

impl RootConfig {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_consumer(mut self, consumer: ConsumerConfig) -> Self {
        self.consumer = consumer;
        self
    }

    pub fn load() -> Result<Self, Error> {
        Self::load_from(get_config_location())
    }

    pub fn load_from(path: PathBuf) -> Result<Self, Error> {
        tracing::info!("load config from: {:?}", path);
        let mut conf: HashMap<String, RootConfig> = yaml_file_parser(path.clone())?;
        let mut root_config = conf
            .remove(DUBBO_KEY)
            .ok_or_else(|| anyhow::anyhow!("missing `{}` root key in {:?}", DUBBO_KEY, path))?;
        root_config.location = path;
        root_config.validate()?;
        tracing::debug!("origin config: {:?}", root_config);
        Ok(root_config)
    }
}

pub trait ConfigValidator {
    fn validate(&self) -> Result<(), Error>;
}

impl ConfigValidator for RootConfig {
    fn validate(&self) -> Result<(), Error> {
        self.consumer.validate()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::consumer::ReferenceConfig;

    #[test]
    fn test_write_and_load_yaml() {
        let consumer = ConsumerConfig::default().with_reference(
            "echo",
            ReferenceConfig::default()
                .interface("org.apache.dubbo.demo.Echo".to_string())
                .version("1.0.0".to_string()),
        );
        let root = RootConfig::new().with_consumer(consumer);
        let mut doc = HashMap::new();
        doc.insert(DUBBO_KEY.to_string(), root);
        let yaml = serde_yaml::to_string(&doc).unwrap();

        let path = std::env::temp_dir().join(format!("dubbo-config-{}.yaml", std::process::id()));
        std::fs::write(&path, yaml).unwrap();
        let loaded = RootConfig::load_from(path.clone()).unwrap();
        std::fs::remove_file(&path).unwrap();

        assert_eq!(loaded.location, path);
        let reference = loaded.consumer.get_reference("org.apache.dubbo.demo.Echo").unwrap();
        assert_eq!(reference.version, "1.0.0");
    }

    #[test]
    fn test_missing_root_key() {
        let path = std::env::temp_dir().join(format!("dubbo-no-root-{}.yaml", std::process::id()));
        std::fs::write(&path, "other:\n  consumer: {}\n").unwrap();
        let loaded = RootConfig::load_from(path.clone());
        std::fs::remove_file(&path).unwrap();
        assert!(loaded.is_err());
    }
}
