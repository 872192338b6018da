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

use std::{collections::HashMap, fmt::Debug, sync::Arc};

use bytes::Bytes;
use dubbo_base::Host;

use crate::{
    cluster::ClusterNotifyListener,
    context::{DubboRequest, RequestId},
};

/// A decoded provider response.
#[derive(Debug, Clone, Default)]
pub struct DubboResponse {
    pub request_id: RequestId,
    pub res: Option<Bytes>,
    pub err: Option<String>,
    pub attachments: HashMap<String, String>,
}

/// One connection to a provider host. Implementations report lifecycle and
/// responses through the listener they were created with.
pub trait Transport: Debug + Send + Sync {
    /// `hostname:port`
    fn host(&self) -> &str;

    fn is_available(&self) -> bool;

    /// Fire-and-forget. A failed write surfaces later as a close of this host.
    fn write(&self, request: DubboRequest);

    fn close(&self);
}

pub type BoxTransport = Arc<dyn Transport>;

/// Creates transports. `connect` must return immediately; the transport
/// announces itself through `listener` once the connection is established.
pub trait Connector: Send + Sync {
    fn connect(&self, host: &Host, listener: ClusterNotifyListener) -> BoxTransport;
}
