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

#[cfg(test)]
mod tests_config {
    use anyhow::Error;
    use std::sync::Once;

    use ctor::ctor;

    use dubbo_base::constants::DEFAULT_DUBBO_PROTOCOL_VERSION;
    use dubbo_config::{get_config_location, get_global_config, set_config_file_path};

    static INIT: Once = Once::new();

    #[ctor]
    fn setup() {
        INIT.call_once(|| {
            set_config_file_path(format!("{}/{}", env!("CARGO_MANIFEST_DIR"), "tests"));
        });
    }

    #[test]
    fn test_config_location_from_env() {
        let location = get_config_location();
        assert!(location.ends_with("tests/dubbo.yaml"));
    }

    #[test]
    fn test_consumer_config() -> Result<(), Error> {
        let root_config = get_global_config()?;
        let consumer = &root_config.consumer;
        assert_eq!(consumer.request_timeout, 3000);
        assert_eq!(consumer.dubbo_version, DEFAULT_DUBBO_PROTOCOL_VERSION);
        assert_eq!(consumer.references.len(), 2);
        Ok(())
    }

    #[test]
    fn test_reference_config() -> Result<(), Error> {
        let consumer = &get_global_config()?.consumer;
        let echo = consumer
            .get_reference("org.apache.dubbo.demo.EchoService")
            .expect("echo reference");
        assert_eq!(echo.version, "1.0.0");
        assert_eq!(echo.group, "demo");
        assert_eq!(echo.urls.len(), 1);

        let greeter = consumer
            .get_reference("org.apache.dubbo.demo.GreeterService")
            .expect("greeter reference");
        assert_eq!(greeter.version, "*");
        assert!(greeter.urls.is_empty());

        let services = consumer.static_services();
        assert_eq!(services.len(), 1);
        assert!(services.contains_key("org.apache.dubbo.demo.EchoService"));
        Ok(())
    }
}
