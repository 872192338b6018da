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
    fmt::Debug,
    sync::atomic::{AtomicUsize, Ordering},
};

use rand::Rng;

use crate::transport::BoxTransport;

pub type BoxLoadBalance = Box<dyn LoadBalance + Send + Sync>;

/// Picks one transport out of the available candidates.
pub trait LoadBalance: Debug {
    fn select(&self, transports: &[BoxTransport]) -> Option<BoxTransport>;
}

#[derive(Debug, Default)]
pub struct RandomLoadBalance;

impl LoadBalance for RandomLoadBalance {
    fn select(&self, transports: &[BoxTransport]) -> Option<BoxTransport> {
        if transports.is_empty() {
            return None;
        }
        let index = rand::thread_rng().gen_range(0..transports.len());
        transports.get(index).cloned()
    }
}

#[derive(Debug, Default)]
pub struct RoundRobinLoadBalance {
    next: AtomicUsize,
}

impl LoadBalance for RoundRobinLoadBalance {
    fn select(&self, transports: &[BoxTransport]) -> Option<BoxTransport> {
        if transports.is_empty() {
            return None;
        }
        let index = self.next.fetch_add(1, Ordering::Relaxed) % transports.len();
        transports.get(index).cloned()
    }
}

#[cfg(test)]
mod tests {
    use std::sync::Arc;

    use super::*;
    use crate::{context::DubboRequest, transport::Transport};

    #[derive(Debug)]
    struct FixedTransport(&'static str);

    impl Transport for FixedTransport {
        fn host(&self) -> &str {
            self.0
        }

        fn is_available(&self) -> bool {
            true
        }

        fn write(&self, _request: DubboRequest) {}

        fn close(&self) {}
    }

    fn transports() -> Vec<BoxTransport> {
        vec![
            Arc::new(FixedTransport("10.0.0.1:20880")),
            Arc::new(FixedTransport("10.0.0.2:20880")),
            Arc::new(FixedTransport("10.0.0.3:20880")),
        ]
    }

    #[test]
    fn test_empty_candidates() {
        assert!(RandomLoadBalance.select(&[]).is_none());
        assert!(RoundRobinLoadBalance::default().select(&[]).is_none());
    }

    #[test]
    fn test_random_select() {
        let transports = transports();
        for _ in 0..20 {
            let selected = RandomLoadBalance.select(&transports).unwrap();
            assert!(transports.iter().any(|t| t.host() == selected.host()));
        }
    }

    #[test]
    fn test_round_robin_select() {
        let transports = transports();
        let lb = RoundRobinLoadBalance::default();
        let hosts: Vec<String> = (0..4)
            .map(|_| lb.select(&transports).unwrap().host().to_string())
            .collect();
        assert_eq!(
            hosts,
            vec![
                "10.0.0.1:20880",
                "10.0.0.2:20880",
                "10.0.0.3:20880",
                "10.0.0.1:20880"
            ]
        );
    }
}
