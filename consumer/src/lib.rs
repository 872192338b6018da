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

pub mod cluster;
pub mod context;
pub mod error;
pub mod framework;
pub mod queue;
pub mod registry;
pub mod scheduler;
pub mod transport;

pub use dubbo_base::{Host, HostName, InterfaceName, ServiceUrl, StdError};
pub use dubbo_config as config;
pub use dubbo_logger as logger;

pub use context::{Context, Invocation, RequestId};
pub use error::DubboError;
pub use framework::{Dubbo, DubboBuilder};
pub use queue::{CallResult, RpcOutput};
pub use scheduler::{Scheduler, Status};
