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

pub mod memory_registry;

use std::{
    collections::HashMap,
    fmt::{Debug, Formatter},
    sync::Arc,
};

use async_trait::async_trait;
use dubbo_base::{InterfaceName, StdError};

pub use memory_registry::MemoryRegistry;

/// Raw provider urls per interface. A snapshot may cover only the
/// interfaces that changed.
pub type ServiceSnapshot = HashMap<InterfaceName, Vec<String>>;

pub type RegistryNotifyListener = Arc<dyn NotifyListener + Send + Sync + 'static>;

#[async_trait]
pub trait Registry {
    /// Subscribes `listener` and pushes the current snapshot to it.
    async fn subscribe(&self, listener: RegistryNotifyListener) -> Result<(), StdError>;

    async fn unsubscribe(&self, listener: RegistryNotifyListener) -> Result<(), StdError>;
}

pub trait NotifyListener {
    fn notify(&self, snapshot: ServiceSnapshot);

    /// The registry hit an error it cannot recover from.
    fn on_error(&self, err: StdError);
}

pub type BoxRegistry = Box<dyn Registry + Send + Sync>;

impl Debug for BoxRegistry {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        f.write_str("BoxRegistry")
    }
}
