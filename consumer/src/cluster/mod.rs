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
    collections::{HashMap, HashSet},
    sync::Arc,
};

use dubbo_base::{Host, HostName};

use crate::transport::{BoxTransport, DubboResponse};

pub mod dubbo_cluster;
pub mod loadbalance;

pub use dubbo_cluster::DubboCluster;
pub use loadbalance::{BoxLoadBalance, LoadBalance, RandomLoadBalance, RoundRobinLoadBalance};

/// Receives connection lifecycle events from transports.
pub trait ClusterListener: Send + Sync {
    fn on_connect(&self, host: Host);

    fn on_data(&self, response: DubboResponse);

    fn on_close(&self, host: Host);
}

pub type ClusterNotifyListener = Arc<dyn ClusterListener>;

/// The connection pool as seen by the scheduler.
pub trait Cluster {
    /// Converge the pool to exactly the given hosts.
    fn set_dubbo_cluster_transport(&mut self, transports: HashMap<HostName, HashSet<Host>>);

    /// Forgets the transport of `host` once it is closed, so the next
    /// convergence reconnects it.
    fn remove_dubbo_transport(&mut self, host: &str);

    fn get_available_dubbo_transport(
        &mut self,
        hostnames: &HashSet<HostName>,
    ) -> Option<BoxTransport>;

    /// Closes every transport.
    fn close(&mut self) {
        self.set_dubbo_cluster_transport(HashMap::new());
    }
}
