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
    sync::atomic::{AtomicU64, Ordering},
};

use bytes::Bytes;
use dubbo_base::Host;

pub type RequestId = u64;

static REQUEST_ID: AtomicU64 = AtomicU64::new(1);

/// Allocates a process-unique, monotonically increasing request id.
pub fn next_request_id() -> RequestId {
    REQUEST_ID.fetch_add(1, Ordering::Relaxed)
}

/// What the caller wants to invoke. Arguments are already encoded by the
/// caller's codec.
#[derive(Debug, Clone, Default)]
pub struct Invocation {
    interface: String,
    method_name: String,
    version: String,
    group: String,
    dubbo_version: String,
    args: Bytes,
    attachments: HashMap<String, String>,
}

impl Invocation {
    pub fn new(interface: impl Into<String>, method_name: impl Into<String>) -> Self {
        Invocation {
            interface: interface.into(),
            method_name: method_name.into(),
            ..Default::default()
        }
    }

    pub fn with_version(mut self, version: impl Into<String>) -> Self {
        self.version = version.into();
        self
    }

    pub fn with_group(mut self, group: impl Into<String>) -> Self {
        self.group = group.into();
        self
    }

    pub fn with_dubbo_version(mut self, dubbo_version: impl Into<String>) -> Self {
        self.dubbo_version = dubbo_version.into();
        self
    }

    pub fn with_args(mut self, args: impl Into<Bytes>) -> Self {
        self.args = args.into();
        self
    }

    pub fn with_attachment(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.attachments.insert(key.into(), value.into());
        self
    }

    pub fn interface(&self) -> &str {
        &self.interface
    }

    pub fn method_name(&self) -> &str {
        &self.method_name
    }

    pub fn version(&self) -> &str {
        &self.version
    }

    pub fn group(&self) -> &str {
        &self.group
    }
}

/// The payload handed to a transport. `dubbo_version` and `path` are stamped
/// at every dispatch.
#[derive(Debug, Clone, PartialEq)]
pub struct DubboRequest {
    pub request_id: RequestId,
    pub dubbo_version: String,
    pub path: String,
    pub dubbo_interface: String,
    pub method_name: String,
    pub version: String,
    pub group: String,
    pub args: Bytes,
    pub attachments: HashMap<String, String>,
}

/// One pending call as tracked by the queue.
#[derive(Debug, Clone)]
pub struct Context {
    request: DubboRequest,
    caller_dubbo_version: String,
    was_invoked: bool,
    invoked_by_host: Option<Host>,
}

impl Context {
    pub fn new(request_id: RequestId, invocation: Invocation) -> Self {
        let Invocation {
            interface,
            method_name,
            version,
            group,
            dubbo_version,
            args,
            attachments,
        } = invocation;
        Context {
            request: DubboRequest {
                request_id,
                dubbo_version: dubbo_version.clone(),
                path: String::new(),
                dubbo_interface: interface,
                method_name,
                version,
                group,
                args,
                attachments,
            },
            caller_dubbo_version: dubbo_version,
            was_invoked: false,
            invoked_by_host: None,
        }
    }

    pub fn request_id(&self) -> RequestId {
        self.request.request_id
    }

    pub fn dubbo_interface(&self) -> &str {
        &self.request.dubbo_interface
    }

    /// `None` when the caller left the version unset.
    pub fn version(&self) -> Option<&str> {
        non_empty(&self.request.version)
    }

    pub fn group(&self) -> Option<&str> {
        non_empty(&self.request.group)
    }

    /// Protocol version requested by the caller, empty when unset.
    pub fn caller_dubbo_version(&self) -> &str {
        &self.caller_dubbo_version
    }

    pub fn request(&self) -> &DubboRequest {
        &self.request
    }

    pub fn was_invoked(&self) -> bool {
        self.was_invoked
    }

    /// The last host this call was handed to.
    pub fn invoked_by_host(&self) -> Option<&str> {
        self.invoked_by_host.as_deref()
    }

    pub(crate) fn mark_invoked(&mut self, host: Host, path: String, dubbo_version: String) {
        self.request.path = path;
        self.request.dubbo_version = dubbo_version;
        self.was_invoked = true;
        self.invoked_by_host = Some(host);
    }
}

fn non_empty(value: &str) -> Option<&str> {
    if value.is_empty() {
        None
    } else {
        Some(value)
    }
}
