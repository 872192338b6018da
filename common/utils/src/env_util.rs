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
use std::env;

pub fn get_env_value(env_key: &str) -> Option<String> {
    env::var(env_key).ok()
}

#[cfg(test)]
mod tests {
    use crate::env_util::get_env_value;
    use std::env;

    #[test]
    fn test_get_env_value() {
        env::set_var("TEST_ENV", "testxxx1");
        assert_eq!(get_env_value("TEST_ENV"), Some("testxxx1".to_string()));
        assert!(get_env_value("TEST_ENV2").is_none());
    }
}
