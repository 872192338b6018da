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

use std::str::FromStr;

use crate::Level;

/// Log level parsed leniently from configuration, INFO when unrecognized.
pub(crate) struct LevelWrapper {
    pub(crate) inner: Level,
}

impl From<String> for LevelWrapper {
    fn from(s: String) -> Self {
        let inner = Level::from_str(s.trim()).unwrap_or(Level::INFO);
        LevelWrapper { inner }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_level_parse() {
        assert_eq!(LevelWrapper::from(" DEBUG ".to_string()).inner, Level::DEBUG);
        assert_eq!(LevelWrapper::from("error".to_string()).inner, Level::ERROR);
        assert_eq!(LevelWrapper::from("verbose".to_string()).inner, Level::INFO);
    }
}
