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

use std::{collections::HashMap, time::Duration};

use anyhow::Error;
use dubbo_base::constants::DEFAULT_DUBBO_PROTOCOL_VERSION;
use serde::{Deserialize, Serialize};

use crate::config::ConfigValidator;

pub const DEFAULT_REQUEST_TIMEOUT_MS: u64 = 5000;

fn default_request_timeout() -> u64 {
    DEFAULT_REQUEST_TIMEOUT_MS
}

fn default_dubbo_version() -> String {
    DEFAULT_DUBBO_PROTOCOL_VERSION.to_string()
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ConsumerConfig {
    // milliseconds a caller waits for a response
    #[serde(default = "default_request_timeout")]
    pub request_timeout: u64,
    // protocol version used when neither caller nor provider url specify one
    #[serde(default = "default_dubbo_version")]
    pub dubbo_version: String,
    #[serde(default)]
    pub references: HashMap<String, ReferenceConfig>,
}

impl Default for ConsumerConfig {
    fn default() -> Self {
        ConsumerConfig {
            request_timeout: default_request_timeout(),
            dubbo_version: default_dubbo_version(),
            references: HashMap::new(),
        }
    }
}

impl ConsumerConfig {
    pub fn with_request_timeout(mut self, request_timeout: u64) -> Self {
        self.request_timeout = request_timeout;
        self
    }

    pub fn with_dubbo_version(mut self, dubbo_version: String) -> Self {
        self.dubbo_version = dubbo_version;
        self
    }

    pub fn with_reference(mut self, name: &str, reference: ReferenceConfig) -> Self {
        self.references.insert(name.to_string(), reference);
        self
    }

    pub fn request_timeout(&self) -> Duration {
        Duration::from_millis(self.request_timeout)
    }

    pub fn get_reference(&self, interface: &str) -> Option<&ReferenceConfig> {
        self.references
            .values()
            .find(|reference| reference.interface == interface)
    }

    /// Provider urls configured directly on references, keyed by interface.
    pub fn static_services(&self) -> HashMap<String, Vec<String>> {
        let mut services: HashMap<String, Vec<String>> = HashMap::new();
        for reference in self.references.values().filter(|r| !r.urls.is_empty()) {
            services
                .entry(reference.interface.clone())
                .or_default()
                .extend(reference.urls.iter().cloned());
        }
        services
    }
}

impl ConfigValidator for ConsumerConfig {
    fn validate(&self) -> Result<(), Error> {
        if self.request_timeout == 0 {
            return Err(anyhow::anyhow!("consumer.request_timeout must be positive"));
        }
        for (name, reference) in self.references.iter() {
            if reference.interface.is_empty() {
                return Err(anyhow::anyhow!("reference {} has no interface", name));
            }
        }
        Ok(())
    }
}

#[derive(Debug, Default, Clone, Serialize, Deserialize)]
pub struct ReferenceConfig {
    #[serde(default)]
    pub interface: String,
    // empty or "*" matches providers of any version
    #[serde(default)]
    pub version: String,
    #[serde(default)]
    pub group: String,
    // direct provider urls, bypassing the registry
    #[serde(default)]
    pub urls: Vec<String>,
}

impl ReferenceConfig {
    pub fn interface(self, interface: String) -> Self {
        Self { interface, ..self }
    }

    pub fn version(self, version: String) -> Self {
        Self { version, ..self }
    }

    pub fn group(self, group: String) -> Self {
        Self { group, ..self }
    }

    pub fn add_url(mut self, url: String) -> Self {
        self.urls.push(url);
        self
    }
}
