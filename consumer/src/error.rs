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

use std::time::Duration;

use thiserror::Error;

use crate::context::RequestId;

/// Terminal failure of one call, delivered through the call queue.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum DubboError {
    #[error("registry occur fatal error")]
    RegistryFatal,

    #[error("no provider for {interface}")]
    NoProvider { interface: String },

    #[error("no available connection for {interface} (group: {group:?}, version: {version:?})")]
    NoAvailableConnection {
        interface: String,
        version: String,
        group: String,
    },

    // error reported by the provider
    #[error("{0}")]
    Remote(String),

    #[error("request {request_id} timed out after {timeout:?}")]
    Timeout {
        request_id: RequestId,
        timeout: Duration,
    },

    #[error("scheduler was closed")]
    SchedulerClosed,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_message() {
        let err = DubboError::NoProvider {
            interface: "Echo".to_string(),
        };
        assert_eq!(err.to_string(), "no provider for Echo");
        assert_eq!(
            DubboError::RegistryFatal.to_string(),
            "registry occur fatal error"
        );
        let err = DubboError::NoAvailableConnection {
            interface: "Echo".to_string(),
            version: "1.0.0".to_string(),
            group: String::new(),
        };
        assert_eq!(
            err.to_string(),
            "no available connection for Echo (group: \"\", version: \"1.0.0\")"
        );
    }
}
