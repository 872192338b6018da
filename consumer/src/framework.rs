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

use std::sync::Arc;

use dubbo_base::StdError;
use tokio::sync::{mpsc, oneshot};

use crate::{
    cluster::{BoxLoadBalance, DubboCluster},
    config::{get_global_config, ConfigValidator, ConsumerConfig},
    context::{next_request_id, Context, Invocation},
    error::DubboError,
    logger::tracing::{debug, info},
    queue::CallResult,
    registry::{BoxRegistry, MemoryRegistry, RegistryNotifyListener},
    scheduler::{Scheduler, SchedulerEvent, SchedulerEventSender, Status},
    transport::Connector,
};

#[derive(Debug, Default)]
pub struct DubboBuilder {
    config: Option<ConsumerConfig>,
    registry: Option<BoxRegistry>,
    load_balance: Option<BoxLoadBalance>,
}

impl DubboBuilder {
    /// Without a config the global `dubbo.yaml` is used.
    pub fn with_config(mut self, config: ConsumerConfig) -> Self {
        self.config = Some(config);
        self
    }

    /// Without a registry the consumer connects to the urls configured on
    /// its references.
    pub fn with_registry(mut self, registry: BoxRegistry) -> Self {
        self.registry = Some(registry);
        self
    }

    pub fn with_load_balance(mut self, load_balance: BoxLoadBalance) -> Self {
        self.load_balance = Some(load_balance);
        self
    }

    /// Spawns the scheduler on the current tokio runtime and subscribes it
    /// to the registry.
    pub async fn build<C>(self, connector: C) -> Result<Dubbo, StdError>
    where
        C: Connector + 'static,
    {
        let config = match self.config {
            Some(config) => config,
            None => get_global_config()?.consumer.clone(),
        };
        config.validate()?;

        let (tx, rx) = mpsc::unbounded_channel();
        let sender = SchedulerEventSender::new(tx);

        let mut cluster = DubboCluster::new(connector, Arc::new(sender.clone()));
        if let Some(load_balance) = self.load_balance {
            cluster = cluster.with_load_balance(load_balance);
        }
        let scheduler = Scheduler::new(cluster, config.dubbo_version.clone());
        tokio::spawn(scheduler.run(rx));

        let registry = match self.registry {
            Some(registry) => registry,
            None => {
                info!("no registry configured, use the reference urls");
                Box::new(MemoryRegistry::with_services(config.static_services()))
            }
        };
        let listener: RegistryNotifyListener = Arc::new(sender.clone());
        registry.subscribe(listener.clone()).await?;

        Ok(Dubbo {
            sender,
            config,
            registry,
            listener,
        })
    }
}

/// Consumer handle. Calls are submitted to the scheduler task and awaited
/// under the configured request timeout.
pub struct Dubbo {
    sender: SchedulerEventSender,
    config: ConsumerConfig,
    registry: BoxRegistry,
    listener: RegistryNotifyListener,
}

impl Dubbo {
    pub fn builder() -> DubboBuilder {
        DubboBuilder::default()
    }

    pub fn config(&self) -> &ConsumerConfig {
        &self.config
    }

    pub async fn invoke(&self, invocation: Invocation) -> CallResult {
        let invocation = self.with_reference_defaults(invocation);
        let request_id = next_request_id();
        let (responder, rx) = oneshot::channel();
        let ctx = Context::new(request_id, invocation);
        if !self.sender.send(SchedulerEvent::Request { ctx, responder }) {
            return Err(DubboError::SchedulerClosed);
        }

        let timeout = self.config.request_timeout();
        match tokio::time::timeout(timeout, rx).await {
            Ok(Ok(result)) => result,
            Ok(Err(_)) => Err(DubboError::SchedulerClosed),
            Err(_) => {
                debug!("request {} timed out after {:?}", request_id, timeout);
                self.sender.send(SchedulerEvent::Cancel(request_id));
                Err(DubboError::Timeout {
                    request_id,
                    timeout,
                })
            }
        }
    }

    pub async fn status(&self) -> Result<Status, DubboError> {
        let (reply, rx) = oneshot::channel();
        if !self.sender.send(SchedulerEvent::Status(reply)) {
            return Err(DubboError::SchedulerClosed);
        }
        rx.await.map_err(|_| DubboError::SchedulerClosed)
    }

    /// Fails every pending call, closes all transports and stops the
    /// scheduler.
    pub async fn close(&self) -> Result<(), StdError> {
        self.sender.send(SchedulerEvent::Shutdown);
        self.registry.unsubscribe(self.listener.clone()).await
    }

    fn with_reference_defaults(&self, mut invocation: Invocation) -> Invocation {
        let Some(reference) = self.config.get_reference(invocation.interface()) else {
            return invocation;
        };
        if invocation.version().is_empty() && !reference.version.is_empty() {
            invocation = invocation.with_version(reference.version.clone());
        }
        if invocation.group().is_empty() && !reference.group.is_empty() {
            invocation = invocation.with_group(reference.group.clone());
        }
        invocation
    }
}

impl Drop for Dubbo {
    fn drop(&mut self) {
        // no-op when `close` already stopped the scheduler
        self.sender.send(SchedulerEvent::Shutdown);
    }
}
