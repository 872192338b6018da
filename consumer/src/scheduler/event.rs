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

use dubbo_base::{Host, StdError};
use dubbo_logger::tracing::debug;
use tokio::sync::{mpsc, oneshot};

use crate::{
    cluster::ClusterListener,
    context::{Context, RequestId},
    queue::Responder,
    registry::{NotifyListener, ServiceSnapshot},
    scheduler::Status,
    transport::DubboResponse,
};

/// Everything the scheduler reacts to. Each event is handled to completion
/// before the next one is taken.
#[derive(Debug)]
pub enum SchedulerEvent {
    Request {
        ctx: Context,
        responder: Responder,
    },
    // caller stopped waiting
    Cancel(RequestId),
    RegistryChange(ServiceSnapshot),
    RegistryError(StdError),
    Connect(Host),
    Data(DubboResponse),
    Close(Host),
    Status(oneshot::Sender<Status>),
    Shutdown,
}

/// Feeds the scheduler. Registered as both registry and cluster listener.
#[derive(Debug, Clone)]
pub struct SchedulerEventSender {
    sender: mpsc::UnboundedSender<SchedulerEvent>,
}

impl SchedulerEventSender {
    pub fn new(sender: mpsc::UnboundedSender<SchedulerEvent>) -> Self {
        SchedulerEventSender { sender }
    }

    /// Returns false when the scheduler is gone.
    pub fn send(&self, event: SchedulerEvent) -> bool {
        match self.sender.send(event) {
            Ok(_) => true,
            Err(err) => {
                debug!("scheduler was closed, drop {:?}", err.0);
                false
            }
        }
    }
}

impl NotifyListener for SchedulerEventSender {
    fn notify(&self, snapshot: ServiceSnapshot) {
        self.send(SchedulerEvent::RegistryChange(snapshot));
    }

    fn on_error(&self, err: StdError) {
        self.send(SchedulerEvent::RegistryError(err));
    }
}

impl ClusterListener for SchedulerEventSender {
    fn on_connect(&self, host: Host) {
        self.send(SchedulerEvent::Connect(host));
    }

    fn on_data(&self, response: DubboResponse) {
        self.send(SchedulerEvent::Data(response));
    }

    fn on_close(&self, host: Host) {
        self.send(SchedulerEvent::Close(host));
    }
}
