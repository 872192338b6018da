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

mod event;

use std::collections::{HashMap, HashSet};

use dubbo_base::{constants::ANY_VERSION, Host, HostName, InterfaceName, ServiceUrl, StdError};
use dubbo_logger::tracing::{debug, error, info, warn};
use itertools::Itertools;
use tokio::sync::mpsc;

use crate::{
    cluster::Cluster,
    context::{Context, RequestId},
    error::DubboError,
    queue::{Queue, QueueMessage, Responder},
    registry::ServiceSnapshot,
    transport::{BoxTransport, DubboResponse},
};

pub use event::{SchedulerEvent, SchedulerEventSender};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Status {
    /// No connection has been established yet. Calls are held.
    Pending,
    Ready,
    /// The registry failed before any connection was established.
    Failed,
}

/// Routes calls to provider connections. Owns the pending calls, the
/// routing table and the connection pool; all of them are mutated only from
/// the event handlers below.
pub struct Scheduler<C> {
    status: Status,
    queue: Queue,
    cluster: C,
    dubbo_service_url_mapper: HashMap<InterfaceName, Vec<ServiceUrl>>,
    default_dubbo_version: String,
}

impl<C: Cluster> Scheduler<C> {
    pub fn new(cluster: C, default_dubbo_version: impl Into<String>) -> Self {
        Scheduler {
            status: Status::Pending,
            queue: Queue::new(),
            cluster,
            dubbo_service_url_mapper: HashMap::new(),
            default_dubbo_version: default_dubbo_version.into(),
        }
    }

    pub fn status(&self) -> Status {
        self.status
    }

    pub fn queue(&self) -> &Queue {
        &self.queue
    }

    pub fn cluster(&self) -> &C {
        &self.cluster
    }

    pub fn service_urls(&self, interface: &str) -> Option<&[ServiceUrl]> {
        self.dubbo_service_url_mapper
            .get(interface)
            .map(Vec::as_slice)
    }

    /// Drives the scheduler until a `Shutdown` event arrives. The pool and
    /// the registry hold senders of their own, so the loop does not end when
    /// the consumer handle goes away; `Dubbo` sends `Shutdown` on drop.
    pub async fn run(mut self, mut rx: mpsc::UnboundedReceiver<SchedulerEvent>) {
        info!("scheduler started");
        while let Some(event) = rx.recv().await {
            if let SchedulerEvent::Shutdown = event {
                self.shutdown();
                break;
            }
            self.handle(event);
        }
        info!("scheduler stopped");
    }

    pub fn handle(&mut self, event: SchedulerEvent) {
        match event {
            SchedulerEvent::Request { ctx, responder } => self.handle_request(ctx, responder),
            SchedulerEvent::Cancel(request_id) => {
                if self.queue.remove(request_id).is_some() {
                    debug!("request {} was cancelled by its caller", request_id);
                }
            }
            SchedulerEvent::RegistryChange(snapshot) => {
                self.handle_registry_service_change(snapshot)
            }
            SchedulerEvent::RegistryError(err) => self.handle_registry_error(err),
            SchedulerEvent::Connect(host) => self.handle_dubbo_cluster_connect(host),
            SchedulerEvent::Data(response) => self.handle_transport_data(response),
            SchedulerEvent::Close(host) => self.handle_transport_close(host),
            SchedulerEvent::Status(reply) => {
                let _ = reply.send(self.status);
            }
            SchedulerEvent::Shutdown => self.shutdown(),
        }
    }

    fn handle_request(&mut self, ctx: Context, responder: Responder) {
        let request_id = ctx.request_id();
        self.queue.push(ctx, responder);
        self.handle_queue_message(request_id);
    }

    fn handle_queue_message(&mut self, request_id: RequestId) {
        debug!(
            "handle request {}, current status: {:?}",
            request_id, self.status
        );
        match self.status {
            Status::Ready => self.handle_dubbo_invoke(request_id),
            Status::Pending => {
                debug!("scheduler is pending, request {} waits for a connection", request_id)
            }
            Status::Failed => self.fail(request_id, DubboError::RegistryFatal),
        }
    }

    fn handle_registry_service_change(&mut self, snapshot: ServiceSnapshot) {
        debug!("registry service change: {:?}", snapshot);
        for (dubbo_interface, dubbo_urls) in snapshot {
            let urls: Vec<ServiceUrl> = dubbo_urls
                .iter()
                .filter_map(|raw| match ServiceUrl::from_url(raw) {
                    Ok(url) => Some(url),
                    Err(err) => {
                        error!("skip provider url {} of {}: {}", raw, dubbo_interface, err);
                        None
                    }
                })
                .collect();

            let cached = self
                .dubbo_service_url_mapper
                .get(&dubbo_interface)
                .map_or(false, |cached| !cached.is_empty());
            if urls.is_empty() && cached {
                warn!(
                    "registry pushed no provider for {}, keep the cached ones",
                    dubbo_interface
                );
                continue;
            }
            self.dubbo_service_url_mapper.insert(dubbo_interface, urls);
        }

        let transports = self.dubbo_cluster_transports();
        self.cluster.set_dubbo_cluster_transport(transports);
    }

    fn handle_registry_error(&mut self, err: StdError) {
        error!("registry occur fatal error: {}", err);
        if self.status == Status::Ready {
            return;
        }
        self.status = Status::Failed;
        for request_id in self.queue.request_ids() {
            let was_invoked = self.queue.get(request_id).map_or(true, Context::was_invoked);
            if !was_invoked {
                self.fail(request_id, DubboError::RegistryFatal);
            }
        }
    }

    fn handle_dubbo_cluster_connect(&mut self, host: Host) {
        info!("dubbo transport {} connected", host);
        if self.status != Status::Ready {
            info!("scheduler status {:?} -> Ready", self.status);
            self.status = Status::Ready;
        }

        let hostname = hostname_of(&host);
        let request_ids: Vec<RequestId> = self
            .queue
            .iter()
            .filter(|ctx| {
                ctx.was_invoked() && self.find_dubbo_cluster_by_service(ctx).contains(hostname)
            })
            .map(Context::request_id)
            .sorted()
            .collect();
        for request_id in request_ids {
            self.handle_dubbo_invoke(request_id);
        }
    }

    fn handle_transport_data(&mut self, response: DubboResponse) {
        debug!("receive response of request {}", response.request_id);
        self.queue.consume(response.into());
    }

    fn handle_transport_close(&mut self, host: Host) {
        info!("dubbo transport {} closed", host);
        self.cluster.remove_dubbo_transport(&host);
        let request_ids: Vec<RequestId> = self
            .queue
            .iter()
            .filter(|ctx| ctx.invoked_by_host() == Some(host.as_str()))
            .map(Context::request_id)
            .sorted()
            .collect();
        for request_id in request_ids {
            info!("redispatch request {} after {} closed", request_id, host);
            self.handle_dubbo_invoke(request_id);
        }
    }

    fn handle_dubbo_invoke(&mut self, request_id: RequestId) {
        let Some(ctx) = self.queue.get(request_id) else {
            return;
        };
        let hostnames = self.find_dubbo_cluster_by_service(ctx);
        if hostnames.is_empty() {
            let interface = ctx.dubbo_interface().to_string();
            warn!("could not find any provider for {}", interface);
            self.fail(request_id, DubboError::NoProvider { interface });
            return;
        }

        match self.cluster.get_available_dubbo_transport(&hostnames) {
            Some(transport) => self.send_request(request_id, transport),
            None => {
                let err = DubboError::NoAvailableConnection {
                    interface: ctx.dubbo_interface().to_string(),
                    version: ctx.version().unwrap_or_default().to_string(),
                    group: ctx.group().unwrap_or_default().to_string(),
                };
                warn!("request {}: {}", request_id, err);
                self.fail(request_id, err);
            }
        }
    }

    fn send_request(&mut self, request_id: RequestId, transport: BoxTransport) {
        let host = transport.host().to_string();
        let Some(ctx) = self.queue.get_mut(request_id) else {
            return;
        };
        let Some((path, url_dubbo_version)) = self
            .dubbo_service_url_mapper
            .get(ctx.dubbo_interface())
            .and_then(|urls| urls.iter().find(|url| url.is_host(&host)))
            .map(|url| (url.path().to_string(), url.dubbo_version().to_string()))
        else {
            let interface = ctx.dubbo_interface().to_string();
            warn!("no provider url of {} matches host {}", interface, host);
            self.fail(request_id, DubboError::NoProvider { interface });
            return;
        };

        let dubbo_version = [
            ctx.caller_dubbo_version(),
            url_dubbo_version.as_str(),
            self.default_dubbo_version.as_str(),
        ]
        .into_iter()
        .find(|v| !v.is_empty())
        .unwrap_or_default()
        .to_string();

        ctx.mark_invoked(host.clone(), path, dubbo_version);
        debug!("send request {} to {}", request_id, host);
        transport.write(ctx.request().clone());
    }

    /// Hostnames able to serve `ctx` according to the routing table.
    fn find_dubbo_cluster_by_service(&self, ctx: &Context) -> HashSet<HostName> {
        let Some(urls) = self.dubbo_service_url_mapper.get(ctx.dubbo_interface()) else {
            return HashSet::new();
        };
        urls.iter()
            .filter(|url| {
                let is_same_version = ctx
                    .version()
                    .map_or(true, |v| v == ANY_VERSION || v == url.version());
                let is_same_group = ctx.group().map_or(true, |g| g == url.group());
                is_same_version && is_same_group
            })
            .map(|url| url.hostname().to_string())
            .collect()
    }

    fn dubbo_cluster_transports(&self) -> HashMap<HostName, HashSet<Host>> {
        let mut transports: HashMap<HostName, HashSet<Host>> = HashMap::new();
        for url in self.dubbo_service_url_mapper.values().flatten() {
            transports
                .entry(url.hostname().to_string())
                .or_default()
                .insert(url.host());
        }
        transports
    }

    fn fail(&mut self, request_id: RequestId, err: DubboError) {
        self.queue.consume(QueueMessage::error(request_id, err));
    }

    fn shutdown(&mut self) {
        info!("scheduler shutdown, {} requests pending", self.queue.len());
        for request_id in self.queue.request_ids() {
            self.fail(request_id, DubboError::SchedulerClosed);
        }
        self.cluster.close();
    }
}

fn hostname_of(host: &str) -> &str {
    host.rsplit_once(':').map_or(host, |(hostname, _)| hostname)
}
