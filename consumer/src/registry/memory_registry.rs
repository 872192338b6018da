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
    sync::{Arc, PoisonError, RwLock},
};

use async_trait::async_trait;
use dubbo_base::StdError;
use dubbo_logger::tracing::{debug, info};

use super::{Registry, RegistryNotifyListener, ServiceSnapshot};

#[derive(Default)]
struct Inner {
    services: ServiceSnapshot,
    listeners: Vec<RegistryNotifyListener>,
}

/// In-process registry, also used for direct connections to statically
/// configured provider urls.
#[derive(Clone, Default)]
pub struct MemoryRegistry {
    inner: Arc<RwLock<Inner>>,
}

impl MemoryRegistry {
    pub fn new() -> MemoryRegistry {
        MemoryRegistry::default()
    }

    pub fn with_services(services: ServiceSnapshot) -> MemoryRegistry {
        MemoryRegistry {
            inner: Arc::new(RwLock::new(Inner {
                services,
                listeners: Vec::new(),
            })),
        }
    }

    pub fn register(&self, interface: &str, url: &str) {
        self.update(interface, |urls| {
            if !urls.iter().any(|u| u == url) {
                urls.push(url.to_string());
            }
        });
    }

    pub fn unregister(&self, interface: &str, url: &str) {
        self.update(interface, |urls| urls.retain(|u| u != url));
    }

    /// Replaces all urls of `interface`.
    pub fn set_services(&self, interface: &str, urls: Vec<String>) {
        self.update(interface, move |current| *current = urls);
    }

    /// Reports a fatal registry error to every listener.
    pub fn fail(&self, reason: &str) {
        info!("memory registry failed: {}", reason);
        for listener in self.listeners() {
            listener.on_error(reason.to_string().into());
        }
    }

    pub fn services(&self) -> ServiceSnapshot {
        self.inner
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .services
            .clone()
    }

    fn update(&self, interface: &str, f: impl FnOnce(&mut Vec<String>)) {
        let (urls, listeners) = {
            let mut inner = self.inner.write().unwrap_or_else(PoisonError::into_inner);
            let urls = inner.services.entry(interface.to_string()).or_default();
            f(urls);
            let urls = urls.clone();
            (urls, inner.listeners.clone())
        };
        debug!("memory registry {} changed: {:?}", interface, urls);
        let snapshot: ServiceSnapshot = HashMap::from([(interface.to_string(), urls)]);
        for listener in listeners {
            listener.notify(snapshot.clone());
        }
    }

    fn listeners(&self) -> Vec<RegistryNotifyListener> {
        self.inner
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .listeners
            .clone()
    }
}

#[async_trait]
impl Registry for MemoryRegistry {
    async fn subscribe(&self, listener: RegistryNotifyListener) -> Result<(), StdError> {
        let snapshot = {
            let mut inner = self.inner.write().unwrap_or_else(PoisonError::into_inner);
            inner.listeners.push(listener.clone());
            inner.services.clone()
        };
        listener.notify(snapshot);
        Ok(())
    }

    async fn unsubscribe(&self, listener: RegistryNotifyListener) -> Result<(), StdError> {
        self.inner
            .write()
            .unwrap_or_else(PoisonError::into_inner)
            .listeners
            .retain(|l| !Arc::ptr_eq(l, &listener));
        Ok(())
    }
}
