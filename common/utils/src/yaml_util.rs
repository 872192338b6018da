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
use std::{collections::HashMap, fs, path::PathBuf, sync::Mutex};

use anyhow::Error;
use once_cell::sync::Lazy;
use serde_yaml::{from_slice, Value};

static YAML_VALUE_CACHE_MAP: Lazy<Mutex<HashMap<PathBuf, Value>>> =
    Lazy::new(|| Mutex::new(HashMap::new()));

// parse yaml file to structs
pub fn yaml_file_parser<T>(path: PathBuf) -> Result<T, Error>
where
    T: serde::de::DeserializeOwned + std::fmt::Debug,
{
    if !path.is_file() {
        return Err(anyhow::anyhow!("path is not a file: {:?}", path));
    }
    let data = fs::read(path.as_path())?;
    Ok(from_slice(&data)?)
}

// read value by a key like: logging.level
pub fn yaml_key_reader(path: PathBuf, key: &str) -> Result<Option<String>, Error> {
    if !path.is_file() {
        return Err(anyhow::anyhow!("path is not a file: {:?}", path));
    }
    let mut cache_map = YAML_VALUE_CACHE_MAP
        .lock()
        .map_err(|_| anyhow::anyhow!("yaml cache lock poisoned"))?;
    let mut value = match cache_map.get(path.as_path()) {
        Some(value) => value.clone(),
        None => {
            let data = fs::read(path.as_path())?;
            let value: Value = from_slice(&data)?;
            cache_map.insert(path.clone(), value.clone());
            value
        }
    };
    for segment in key.split('.') {
        value = value[segment].clone();
    }
    match value {
        Value::Null => Ok(None),
        Value::String(s) => Ok(Some(s)),
        Value::Number(n) => Ok(Some(n.to_string())),
        Value::Bool(b) => Ok(Some(b.to_string())),
        other => Err(anyhow::anyhow!("key {} is not a scalar: {:?}", key, other)),
    }
}

#[cfg(test)]
mod tests {
    use serde_yaml::Value;
    use std::{collections::HashMap, path::PathBuf};

    use crate::yaml_util::{yaml_file_parser, yaml_key_reader};

    fn fixture() -> PathBuf {
        PathBuf::from(env!("CARGO_MANIFEST_DIR"))
            .join("tests")
            .join("application.yaml")
    }

    #[test]
    fn test_yaml_file_parser() {
        let config = yaml_file_parser::<HashMap<String, Value>>(fixture()).unwrap();
        assert!(config.contains_key("logging"));
    }

    #[test]
    fn test_yaml_key_reader() {
        let config = yaml_key_reader(fixture(), "logging.level").unwrap();
        assert_eq!(config, Some("INFO".to_string()));
        let config = yaml_key_reader(fixture(), "logging.file.path").unwrap();
        assert_eq!(config, Some("/tmp/test.log".to_string()));
        let config = yaml_key_reader(fixture(), "logging.missing").unwrap();
        assert_eq!(config, None);
    }

    #[test]
    fn test_missing_file() {
        let missing = fixture().with_file_name("absent.yaml");
        assert!(yaml_file_parser::<HashMap<String, Value>>(missing).is_err());
    }
}
