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

use std::collections::{HashMap, HashSet};

use dubbo_base::{Host, HostName};
use dubbo_logger::tracing::{debug, info};

use crate::{
    cluster::{
        loadbalance::{BoxLoadBalance, RandomLoadBalance},
        Cluster, ClusterNotifyListener,
    },
    transport::{BoxTransport, Connector},
};

/// Connection pool grouped by hostname. Owns every transport it created.
pub struct DubboCluster<C> {
    connector: C,
    listener: ClusterNotifyListener,
    load_balance: BoxLoadBalance,
    dubbo_cluster_ready: HashMap<HostName, HashMap<Host, BoxTransport>>,
}

impl<C: Connector> DubboCluster<C> {
    pub fn new(connector: C, listener: ClusterNotifyListener) -> Self {
        DubboCluster {
            connector,
            listener,
            load_balance: Box::new(RandomLoadBalance),
            dubbo_cluster_ready: HashMap::new(),
        }
    }

    pub fn with_load_balance(mut self, load_balance: BoxLoadBalance) -> Self {
        self.load_balance = load_balance;
        self
    }

    pub fn hosts(&self) -> HashSet<Host> {
        self.dubbo_cluster_ready
            .values()
            .flat_map(|transports| transports.keys().cloned())
            .collect()
    }

    pub fn get_transport(&self, host: &str) -> Option<&BoxTransport> {
        self.dubbo_cluster_ready
            .values()
            .find_map(|transports| transports.get(host))
    }
}

impl<C: Connector> Cluster for DubboCluster<C> {
    fn set_dubbo_cluster_transport(&mut self, transports: HashMap<HostName, HashSet<Host>>) {
        self.dubbo_cluster_ready.retain(|hostname, ready| {
            let wanted = transports.get(hostname);
            ready.retain(|host, transport| {
                let keep = wanted.map_or(false, |hosts| hosts.contains(host));
                if !keep {
                    info!("close dubbo transport {}", host);
                    transport.close();
                }
                keep
            });
            !ready.is_empty()
        });

        for (hostname, hosts) in transports {
            if hosts.is_empty() {
                continue;
            }
            let ready = self.dubbo_cluster_ready.entry(hostname).or_default();
            for host in hosts {
                if ready.contains_key(&host) {
                    continue;
                }
                info!("connect dubbo transport {}", host);
                let transport = self.connector.connect(&host, self.listener.clone());
                ready.insert(host, transport);
            }
        }
    }

    fn remove_dubbo_transport(&mut self, host: &str) {
        self.dubbo_cluster_ready.retain(|_, ready| {
            // a reconnected transport of the same host stays
            if ready.get(host).map_or(false, |t| !t.is_available()) {
                info!("drop closed dubbo transport {}", host);
                ready.remove(host);
            }
            !ready.is_empty()
        });
    }

    fn get_available_dubbo_transport(
        &mut self,
        hostnames: &HashSet<HostName>,
    ) -> Option<BoxTransport> {
        let mut candidates: Vec<BoxTransport> = hostnames
            .iter()
            .filter_map(|hostname| self.dubbo_cluster_ready.get(hostname))
            .flat_map(|ready| ready.values())
            .filter(|transport| transport.is_available())
            .cloned()
            .collect();
        candidates.sort_by(|a, b| a.host().cmp(b.host()));
        debug!(
            "{} available transports for {:?}",
            candidates.len(),
            hostnames
        );
        self.load_balance.select(&candidates)
    }
}

#[cfg(test)]
mod tests {
    use std::sync::{
        atomic::{AtomicBool, Ordering},
        Arc, Mutex,
    };

    use super::*;
    use crate::{
        cluster::{ClusterListener, LoadBalance},
        context::DubboRequest,
        transport::{DubboResponse, Transport},
    };

    #[derive(Debug)]
    struct MockTransport {
        host: Host,
        available: AtomicBool,
        closed: AtomicBool,
    }

    impl Transport for MockTransport {
        fn host(&self) -> &str {
            &self.host
        }

        fn is_available(&self) -> bool {
            self.available.load(Ordering::SeqCst)
        }

        fn write(&self, _request: DubboRequest) {}

        fn close(&self) {
            self.available.store(false, Ordering::SeqCst);
            self.closed.store(true, Ordering::SeqCst);
        }
    }

    #[derive(Clone, Default)]
    struct MockConnector {
        created: Arc<Mutex<Vec<Arc<MockTransport>>>>,
    }

    impl MockConnector {
        fn created(&self, host: &str) -> Vec<Arc<MockTransport>> {
            self.created
                .lock()
                .unwrap()
                .iter()
                .filter(|t| t.host == host)
                .cloned()
                .collect()
        }
    }

    impl Connector for MockConnector {
        fn connect(&self, host: &Host, _listener: ClusterNotifyListener) -> BoxTransport {
            let transport = Arc::new(MockTransport {
                host: host.clone(),
                available: AtomicBool::new(true),
                closed: AtomicBool::new(false),
            });
            self.created.lock().unwrap().push(transport.clone());
            transport
        }
    }

    struct NoopListener;

    impl ClusterListener for NoopListener {
        fn on_connect(&self, _host: Host) {}

        fn on_data(&self, _response: DubboResponse) {}

        fn on_close(&self, _host: Host) {}
    }

    #[derive(Debug)]
    struct FirstLoadBalance;

    impl LoadBalance for FirstLoadBalance {
        fn select(&self, transports: &[BoxTransport]) -> Option<BoxTransport> {
            transports.first().cloned()
        }
    }

    fn transport_map(entries: &[(&str, &[&str])]) -> HashMap<HostName, HashSet<Host>> {
        entries
            .iter()
            .map(|(hostname, hosts)| {
                (
                    hostname.to_string(),
                    hosts.iter().map(|h| h.to_string()).collect(),
                )
            })
            .collect()
    }

    fn new_cluster(connector: MockConnector) -> DubboCluster<MockConnector> {
        DubboCluster::new(connector, Arc::new(NoopListener))
            .with_load_balance(Box::new(FirstLoadBalance))
    }

    #[test]
    fn test_reconcile_is_idempotent() {
        let connector = MockConnector::default();
        let mut cluster = new_cluster(connector.clone());
        let wanted = transport_map(&[("10.0.0.1", &["10.0.0.1:20880", "10.0.0.1:20881"])]);

        cluster.set_dubbo_cluster_transport(wanted.clone());
        cluster.set_dubbo_cluster_transport(wanted);

        assert_eq!(cluster.hosts().len(), 2);
        assert_eq!(connector.created("10.0.0.1:20880").len(), 1);
        assert_eq!(connector.created("10.0.0.1:20881").len(), 1);
    }

    #[test]
    fn test_reconcile_closes_removed_hosts() {
        let connector = MockConnector::default();
        let mut cluster = new_cluster(connector.clone());
        cluster.set_dubbo_cluster_transport(transport_map(&[
            ("10.0.0.1", &["10.0.0.1:20880"]),
            ("10.0.0.2", &["10.0.0.2:20880"]),
        ]));
        cluster.set_dubbo_cluster_transport(transport_map(&[("10.0.0.2", &["10.0.0.2:20880"])]));

        let removed = &connector.created("10.0.0.1:20880")[0];
        assert!(removed.closed.load(Ordering::SeqCst));
        assert!(!connector.created("10.0.0.2:20880")[0]
            .closed
            .load(Ordering::SeqCst));
        assert_eq!(
            cluster.hosts(),
            HashSet::from(["10.0.0.2:20880".to_string()])
        );
        assert!(cluster.get_transport("10.0.0.1:20880").is_none());

        cluster.close();
        assert!(cluster.hosts().is_empty());
    }

    #[test]
    fn test_closed_transport_is_reconnected() {
        let connector = MockConnector::default();
        let mut cluster = new_cluster(connector.clone());
        let wanted = transport_map(&[("10.0.0.1", &["10.0.0.1:20880"])]);
        cluster.set_dubbo_cluster_transport(wanted.clone());

        let first = connector.created("10.0.0.1:20880")[0].clone();
        first.close();
        cluster.remove_dubbo_transport("10.0.0.1:20880");
        assert!(cluster.get_transport("10.0.0.1:20880").is_none());

        cluster.set_dubbo_cluster_transport(wanted);
        let created = connector.created("10.0.0.1:20880");
        assert_eq!(created.len(), 2);
        let hostnames = HashSet::from(["10.0.0.1".to_string()]);
        let selected = cluster.get_available_dubbo_transport(&hostnames).unwrap();
        assert_eq!(selected.host(), "10.0.0.1:20880");
        assert!(created[1].is_available());
    }

    #[test]
    fn test_live_transport_is_not_removed() {
        let connector = MockConnector::default();
        let mut cluster = new_cluster(connector.clone());
        cluster.set_dubbo_cluster_transport(transport_map(&[("10.0.0.1", &["10.0.0.1:20880"])]));

        cluster.remove_dubbo_transport("10.0.0.1:20880");
        assert!(cluster.get_transport("10.0.0.1:20880").is_some());
    }

    #[test]
    fn test_available_transport_by_hostname() {
        let connector = MockConnector::default();
        let mut cluster = new_cluster(connector.clone());
        cluster.set_dubbo_cluster_transport(transport_map(&[
            ("10.0.0.1", &["10.0.0.1:20880"]),
            ("10.0.0.2", &["10.0.0.2:20880"]),
        ]));

        let only_second = HashSet::from(["10.0.0.2".to_string()]);
        let selected = cluster.get_available_dubbo_transport(&only_second).unwrap();
        assert_eq!(selected.host(), "10.0.0.2:20880");

        let both = HashSet::from(["10.0.0.1".to_string(), "10.0.0.2".to_string()]);
        connector.created("10.0.0.1:20880")[0]
            .available
            .store(false, Ordering::SeqCst);
        let selected = cluster.get_available_dubbo_transport(&both).unwrap();
        assert_eq!(selected.host(), "10.0.0.2:20880");

        connector.created("10.0.0.2:20880")[0]
            .available
            .store(false, Ordering::SeqCst);
        assert!(cluster.get_available_dubbo_transport(&both).is_none());

        let unknown = HashSet::from(["10.0.0.9".to_string()]);
        assert!(cluster.get_available_dubbo_transport(&unknown).is_none());
    }
}
