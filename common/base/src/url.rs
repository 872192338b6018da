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

use std::{
    collections::HashMap,
    fmt::{Display, Formatter},
    str::FromStr,
};

use http::Uri;
use thiserror::Error;

use crate::{
    constants::{
        DEFAULT_GROUP_KEY, DEFAULT_VERSION_KEY, DUBBO_VERSION_KEY, GROUP_KEY, VERSION_KEY,
    },
    Host,
};

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum UrlParseError {
    #[error("invalid provider url({url}): {reason}")]
    InvalidUri { url: String, reason: String },
    #[error("provider url({0}) has no scheme")]
    MissingScheme(String),
    #[error("provider url({0}) has no host")]
    MissingHost(String),
    #[error("provider url({0}) has no port")]
    MissingPort(String),
}

/// One provider endpoint as published by the registry, e.g.
/// `dubbo://10.0.0.1:20880/com.foo.Echo?group=g&version=1.0.0&dubbo=2.0.2`.
///
/// Immutable once parsed. `hostname:port` identifies the endpoint.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ServiceUrl {
    raw_url_string: String,
    // value of scheme is different to protocol name, eg. triple -> tri://
    scheme: String,
    hostname: String,
    port: u16,
    // same to interfaceName in most registries
    path: String,
    group: String,
    version: String,
    dubbo_version: String,
    params: HashMap<String, String>,
}

impl ServiceUrl {
    pub fn from_url(url: &str) -> Result<Self, UrlParseError> {
        // registries such as zookeeper keep the whole provider url percent-encoded
        let url = if url.contains("://") {
            url.to_string()
        } else {
            urlencoding::decode(url)
                .map(|decoded| decoded.into_owned())
                .unwrap_or_else(|_| url.to_string())
        };

        let uri = url.parse::<Uri>().map_err(|err| UrlParseError::InvalidUri {
            url: url.clone(),
            reason: err.to_string(),
        })?;

        let scheme = uri
            .scheme_str()
            .ok_or_else(|| UrlParseError::MissingScheme(url.clone()))?
            .to_string();
        let authority = uri
            .authority()
            .ok_or_else(|| UrlParseError::MissingHost(url.clone()))?;
        let hostname = authority.host().to_string();
        if hostname.is_empty() {
            return Err(UrlParseError::MissingHost(url));
        }
        let port = authority
            .port_u16()
            .ok_or_else(|| UrlParseError::MissingPort(url.clone()))?;
        let params = uri.query().map(Self::decode).unwrap_or_default();

        let group = Self::param_or_default(&params, GROUP_KEY, DEFAULT_GROUP_KEY);
        let version = Self::param_or_default(&params, VERSION_KEY, DEFAULT_VERSION_KEY);
        let dubbo_version = params.get(DUBBO_VERSION_KEY).cloned().unwrap_or_default();

        Ok(Self {
            path: uri.path().trim_start_matches('/').to_string(),
            raw_url_string: url,
            scheme,
            hostname,
            port,
            group,
            version,
            dubbo_version,
            params,
        })
    }

    fn param_or_default(params: &HashMap<String, String>, key: &str, default_key: &str) -> String {
        params
            .get(key)
            .filter(|v| !v.is_empty())
            .or_else(|| params.get(default_key))
            .cloned()
            .unwrap_or_default()
    }

    fn decode(raw_query_string: &str) -> HashMap<String, String> {
        let mut params = HashMap::new();
        for pair in raw_query_string.split('&') {
            let Some((key, value)) = pair.split_once('=') else {
                continue;
            };
            let key = key.trim();
            if key.is_empty() {
                continue;
            }
            let value = urlencoding::decode(value.trim())
                .map(|v| v.into_owned())
                .unwrap_or_else(|_| value.trim().to_string());
            params.insert(key.to_string(), value);
        }
        params
    }

    pub fn hostname(&self) -> &str {
        &self.hostname
    }

    pub fn port(&self) -> u16 {
        self.port
    }

    pub fn host(&self) -> Host {
        format!("{}:{}", self.hostname, self.port)
    }

    pub fn is_host(&self, host: &str) -> bool {
        host.rsplit_once(':')
            .map(|(hostname, port)| {
                hostname == self.hostname && port.parse::<u16>().ok() == Some(self.port)
            })
            .unwrap_or(false)
    }

    pub fn path(&self) -> &str {
        &self.path
    }

    pub fn group(&self) -> &str {
        &self.group
    }

    pub fn version(&self) -> &str {
        &self.version
    }

    pub fn dubbo_version(&self) -> &str {
        &self.dubbo_version
    }

    pub fn protocol(&self) -> &str {
        &self.scheme
    }

    pub fn get_param(&self, key: &str) -> Option<String> {
        self.params.get(key).cloned()
    }

    pub fn params_count(&self) -> usize {
        self.params.len()
    }

    pub fn raw_url_string(&self) -> &str {
        &self.raw_url_string
    }

    pub fn encoded_raw_url_string(&self) -> String {
        urlencoding::encode(self.raw_url_string.as_str()).to_string()
    }

    // short_url omits the query string
    pub fn short_url(&self) -> String {
        format!(
            "{}://{}:{}/{}",
            self.scheme, self.hostname, self.port, self.path
        )
    }
}

impl Display for ServiceUrl {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.raw_url_string())
    }
}

impl FromStr for ServiceUrl {
    type Err = UrlParseError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        ServiceUrl::from_url(s)
    }
}
