#![allow(missing_docs)]
//! Spatial anchor request/reply correlation.
//!
//! The server side ([`AnchorRequests`]) issues monotonic [`RequestToken`]s and
//! remembers which operation each outstanding token asked for. The client side
//! ([`AnchorResponder`]) queues incoming tokens per operation and stamps each
//! response with the oldest token of its operation, so several in-flight
//! requests of one kind complete in the order they were asked.

use std::collections::{HashMap, VecDeque};

use remoting_abi::{AnchorOp, AnchorReply, AnchorRequest, Error, Packet, RequestToken, Result};

/// Server-side ledger of requests awaiting a reply.
#[derive(Debug)]
pub struct AnchorRequests {
    next: u64,
    outstanding: HashMap<RequestToken, AnchorOp>,
}

impl Default for AnchorRequests {
    fn default() -> Self {
        Self::new()
    }
}

impl AnchorRequests {
    pub fn new() -> Self {
        Self {
            next: 1,
            outstanding: HashMap::new(),
        }
    }

    /// Stamps `request` with a fresh token and returns the packet to send.
    ///
    /// The token is only recorded once [`AnchorRequests::commit`] confirms the
    /// packet left; a failed send leaves nothing outstanding.
    pub fn issue(&mut self, request: AnchorRequest) -> (RequestToken, Packet) {
        let token = RequestToken(self.next);
        self.next += 1;
        (token, Packet::AnchorRequest(token, request))
    }

    pub fn commit(&mut self, token: RequestToken, op: AnchorOp) {
        log::debug!("anchor {op:?} outstanding as {token}");
        self.outstanding.insert(token, op);
    }

    /// Matches a reply against the outstanding requests.
    ///
    /// Notifications pass through untouched. A reply whose token is unknown or
    /// answers a different operation is discarded and yields `None`.
    pub fn complete(&mut self, token: RequestToken, reply: &AnchorReply) -> Option<RequestToken> {
        let Some(op) = reply.answers() else {
            if !token.is_notification() {
                log::warn!("anchor notification {:?} carried {token}", reply.kind());
            }
            return Some(RequestToken::NOTIFICATION);
        };
        match self.outstanding.get(&token) {
            Some(expected) if *expected == op => {
                self.outstanding.remove(&token);
                Some(token)
            }
            Some(expected) => {
                log::warn!("anchor reply {op:?} for {token} expected {expected:?}; discarded");
                None
            }
            None => {
                log::warn!("anchor reply {op:?} for unknown {token}; discarded");
                None
            }
        }
    }

    pub fn outstanding(&self) -> usize {
        self.outstanding.len()
    }

    pub fn is_outstanding(&self, token: RequestToken) -> bool {
        self.outstanding.contains_key(&token)
    }

    /// Forgets every outstanding request; replies to them will be discarded.
    pub fn clear(&mut self) {
        if !self.outstanding.is_empty() {
            log::debug!("dropping {} outstanding anchor requests", self.outstanding.len());
        }
        self.outstanding.clear();
    }
}

/// Client-side queue of requests waiting for an answer.
#[derive(Debug, Default)]
pub struct AnchorResponder {
    pending: HashMap<AnchorOp, VecDeque<RequestToken>>,
}

impl AnchorResponder {
    pub fn new() -> Self {
        Self::default()
    }

    /// Records an incoming request so a later response can answer it.
    pub fn on_request(&mut self, token: RequestToken, request: &AnchorRequest) {
        self.pending.entry(request.op()).or_default().push_back(token);
    }

    /// Builds the packet answering the oldest outstanding request `reply`
    /// completes; notifications go out with the notification token.
    pub fn respond(&mut self, reply: AnchorReply) -> Result<Packet> {
        let token = match reply.answers() {
            None => RequestToken::NOTIFICATION,
            Some(op) => self.take_oldest(op).ok_or_else(|| {
                log::warn!("no outstanding anchor {op:?} request to answer");
                Error::InvalidArgument
            })?,
        };
        Ok(Packet::AnchorReply(token, reply))
    }

    /// Returns a token taken by a response whose packet could not be sent.
    pub fn restore(&mut self, token: RequestToken, op: AnchorOp) {
        if !token.is_notification() {
            self.pending.entry(op).or_default().push_front(token);
        }
    }

    pub fn pending(&self, op: AnchorOp) -> usize {
        self.pending.get(&op).map_or(0, VecDeque::len)
    }

    pub fn clear(&mut self) {
        self.pending.clear();
    }

    fn take_oldest(&mut self, op: AnchorOp) -> Option<RequestToken> {
        self.pending.get_mut(&op)?.pop_front()
    }
}
