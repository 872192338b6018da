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

use std::collections::HashMap;

use bytes::Bytes;
use dubbo_logger::tracing::{debug, warn};
use itertools::Itertools;
use tokio::sync::oneshot;

use crate::{
    context::{Context, RequestId},
    error::DubboError,
    transport::DubboResponse,
};

#[derive(Debug, Clone, Default, PartialEq)]
pub struct RpcOutput {
    pub value: Option<Bytes>,
    pub attachments: HashMap<String, String>,
}

pub type CallResult = Result<RpcOutput, DubboError>;

/// Completion sink of one call.
pub type Responder = oneshot::Sender<CallResult>;

/// Terminal outcome of one call.
#[derive(Debug)]
pub struct QueueMessage {
    pub request_id: RequestId,
    pub result: CallResult,
}

impl QueueMessage {
    pub fn error(request_id: RequestId, err: DubboError) -> Self {
        QueueMessage {
            request_id,
            result: Err(err),
        }
    }
}

impl From<DubboResponse> for QueueMessage {
    fn from(response: DubboResponse) -> Self {
        let result = match response.err {
            Some(err) => Err(DubboError::Remote(err)),
            None => Ok(RpcOutput {
                value: response.res,
                attachments: response.attachments,
            }),
        };
        QueueMessage {
            request_id: response.request_id,
            result,
        }
    }
}

#[derive(Debug)]
struct PendingCall {
    ctx: Context,
    responder: Responder,
}

/// Pending calls keyed by request id. A call leaves the queue when it is
/// consumed or removed, never otherwise.
#[derive(Debug, Default)]
pub struct Queue {
    request_queue: HashMap<RequestId, PendingCall>,
}

impl Queue {
    pub fn new() -> Self {
        Queue::default()
    }

    pub fn push(&mut self, ctx: Context, responder: Responder) {
        let request_id = ctx.request_id();
        if let Some(old) = self
            .request_queue
            .insert(request_id, PendingCall { ctx, responder })
        {
            warn!("request id {} was reused, drop the older call", old.ctx.request_id());
        }
    }

    pub fn get(&self, request_id: RequestId) -> Option<&Context> {
        self.request_queue.get(&request_id).map(|call| &call.ctx)
    }

    pub fn get_mut(&mut self, request_id: RequestId) -> Option<&mut Context> {
        self.request_queue.get_mut(&request_id).map(|call| &mut call.ctx)
    }

    pub fn contains(&self, request_id: RequestId) -> bool {
        self.request_queue.contains_key(&request_id)
    }

    /// Ids of all pending calls in submission order.
    pub fn request_ids(&self) -> Vec<RequestId> {
        self.request_queue.keys().copied().sorted().collect()
    }

    pub fn iter(&self) -> impl Iterator<Item = &Context> {
        self.request_queue.values().map(|call| &call.ctx)
    }

    pub fn len(&self) -> usize {
        self.request_queue.len()
    }

    pub fn is_empty(&self) -> bool {
        self.request_queue.is_empty()
    }

    /// Delivers the outcome and removes the call. Returns false when the id
    /// is unknown, e.g. the caller already gave up.
    pub fn consume(&mut self, message: QueueMessage) -> bool {
        let QueueMessage { request_id, result } = message;
        let Some(call) = self.request_queue.remove(&request_id) else {
            debug!("request {} is not pending anymore, drop its result", request_id);
            return false;
        };
        if call.responder.send(result).is_err() {
            debug!("caller of request {} is gone", request_id);
        }
        true
    }

    /// Drops a call without completing it.
    pub fn remove(&mut self, request_id: RequestId) -> Option<Context> {
        self.request_queue.remove(&request_id).map(|call| call.ctx)
    }
}
