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

// URL key
pub const DUBBO_KEY: &str = "dubbo";
pub const VERSION_KEY: &str = "version";
pub const GROUP_KEY: &str = "group";
pub const DEFAULT_VERSION_KEY: &str = "default.version";
pub const DEFAULT_GROUP_KEY: &str = "default.group";
// protocol version of the provider, e.g. dubbo=2.0.2
pub const DUBBO_VERSION_KEY: &str = "dubbo";
pub const ANYHOST_KEY: &str = "anyhost";

// "*" refer to default wildcard in dubbo
pub const ANY_VERSION: &str = "*";
pub const DEFAULT_DUBBO_PROTOCOL_VERSION: &str = "2.0.2";

// config location
pub const ENV_DUBBO_CONFIG_PATH: &str = "DUBBO_CONFIG_PATH";
pub const ENV_DUBBO_CONFIG_FILE: &str = "DUBBO_CONFIG_FILE";
pub const DEFAULT_CONFIG_FILE: &str = "dubbo.yaml";
