// Path: crates/ledger-client-core/src/mirror/subscription.rs
//! Topic Subscription: a long-lived consumer of a per-topic stream.
//!
//! The primary transport is the Mirror node's `subscribeTopic`
//! server-streaming RPC ([`subscribe_topic`]), running the
//! Start/Connect/Receive/Terminate state machine from the design: each
//! data frame advances `next_start` past the delivered message's consensus
//! timestamp, and a terminated or failed stream reconnects from that
//! cursor with doubling backoff capped at 5s. [`subscribe_topic_rest`] is
//! the REST-polling fallback mode for environments without a gRPC-capable
//! Mirror endpoint, advancing the same cursor over paginated `/messages`
//! reads instead of a stream.

use super::rest::MirrorRestClient;
use crate::model::{EntityId, Timestamp, TopicMessage};
use crate::query::{decode_topic_message_frame, encode_topic_subscribe_query};
use crate::transport::{double_capped, full_jitter, server_stream};
use reqwest::Client;
use std::time::Duration;
use tokio::sync::mpsc;
use tokio::task::JoinHandle;

const MAX_RECONNECT_BACKOFF: Duration = Duration::from_secs(5);
const INITIAL_RECONNECT_BACKOFF: Duration = Duration::from_millis(500);
/// Clean end (status 0, server closed) with no messages delivered this
/// session sleeps this long before reconnecting, to avoid a hot loop
/// against a topic with no new messages.
const CLEAN_END_IDLE_DELAY: Duration = Duration::from_secs(2);
/// The REST fallback mode's idle poll interval when a page's cursor comes
/// back empty.
const REST_IDLE_POLL_INTERVAL: Duration = Duration::from_secs(5);
const SUBSCRIBE_TOPIC_METHOD: &str = "/com.hedera.mirror.api.proto.ConsensusService/subscribeTopic";

/// The subscription's internal lifecycle, driving logging and reconnect
/// decisions; not exposed to callers beyond the channel of messages.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum State {
    Start,
    Connect,
    Receive,
    Terminate,
}

/// A running topic subscription. Dropping this handle (or its matching
/// receiver) stops the background task at its next poll boundary.
pub struct TopicSubscription {
    handle: JoinHandle<()>,
}

impl TopicSubscription {
    /// Stops the subscription and waits for the background task to exit.
    pub async fn shutdown(self) {
        self.handle.abort();
        let _ = self.handle.await;
    }
}

/// Starts a topic subscription against `topic_id` over the Mirror node's
/// `subscribeTopic` server-streaming RPC — the primary transport per the
/// design. `grpc_base_url` is the Mirror gRPC-web endpoint (e.g.
/// `https://mainnet-public.mirrornode.hedera.com:443`). Delivered messages
/// are sent on the returned channel's paired receiver until the
/// subscription is shut down or the receiver is dropped.
pub fn subscribe_topic(
    client: Client,
    grpc_base_url: String,
    topic_id: EntityId,
    start_time: Option<Timestamp>,
    buffer: usize,
) -> (TopicSubscription, mpsc::Receiver<TopicMessage>) {
    let (tx, rx) = mpsc::channel(buffer.max(1));
    let handle = tokio::spawn(run_rpc(client, grpc_base_url, topic_id, start_time, tx));
    (TopicSubscription { handle }, rx)
}

/// Starts a topic subscription over the Mirror REST API's paginated
/// `/topics/{id}/messages` reads, for deployments without a gRPC-capable
/// Mirror endpoint. Same delivery contract as [`subscribe_topic`].
pub fn subscribe_topic_rest(
    client: MirrorRestClient,
    topic_id: EntityId,
    start_time: Option<Timestamp>,
    buffer: usize,
) -> (TopicSubscription, mpsc::Receiver<TopicMessage>) {
    let (tx, rx) = mpsc::channel(buffer.max(1));
    let handle = tokio::spawn(run_rest(client, topic_id, start_time, tx));
    (TopicSubscription { handle }, rx)
}

/// Drives the Start/Connect/Receive/Terminate state machine over the
/// streaming RPC: each data frame is decoded, delivered, and advances
/// `next_start`; a non-zero trailer status or transport failure reconnects
/// with doubling backoff; a clean end with no messages delivered this
/// session waits [`CLEAN_END_IDLE_DELAY`] before reconnecting to avoid a
/// hot loop against a quiet topic.
async fn run_rpc(
    client: Client,
    grpc_base_url: String,
    topic_id: EntityId,
    start_time: Option<Timestamp>,
    tx: mpsc::Sender<TopicMessage>,
) {
    let mut next_start = start_time;
    let mut reconnect_delay = INITIAL_RECONNECT_BACKOFF;

    loop {
        let request = encode_topic_subscribe_query(topic_id, next_start, None, None);

        // `server_stream`'s frame handler is synchronous, so it can't await
        // the caller's bounded channel directly; relay decoded messages
        // through an unbounded channel and forward them to `tx` from this
        // async frame, which can await backpressure without blocking the
        // handler.
        let (relay_tx, mut relay_rx) = mpsc::unbounded_channel::<TopicMessage>();
        let stream_fut = server_stream(&client, &grpc_base_url, SUBSCRIBE_TOPIC_METHOD, &request, move |frame| {
            match decode_topic_message_frame(&frame) {
                Ok(message) => {
                    let _ = relay_tx.send(message);
                }
                Err(error) => {
                    tracing::warn!(
                        target: "ledger_client::mirror::subscription",
                        %error,
                        "failed to decode a topic message frame, skipping it"
                    );
                }
            }
        });
        tokio::pin!(stream_fut);

        let mut delivered_any = false;
        let result = loop {
            tokio::select! {
                res = &mut stream_fut => break res,
                maybe_message = relay_rx.recv() => {
                    let Some(message) = maybe_message else { continue };
                    if let Some(ts) = message.consensus_timestamp {
                        next_start = Some(ts.advance());
                    }
                    delivered_any = true;
                    if tx.send(message).await.is_err() {
                        return;
                    }
                }
            }
        };

        // Deliver any messages the relay buffered but the stream future's
        // completion raced ahead of.
        while let Ok(message) = relay_rx.try_recv() {
            if let Some(ts) = message.consensus_timestamp {
                next_start = Some(ts.advance());
            }
            delivered_any = true;
            if tx.send(message).await.is_err() {
                return;
            }
        }

        match result {
            Ok(status) if status.grpc_status == 0 => {
                // Clean end: the server closed the stream without error.
                if !delivered_any {
                    tokio::time::sleep(CLEAN_END_IDLE_DELAY).await;
                }
                reconnect_delay = INITIAL_RECONNECT_BACKOFF;
            }
            Ok(status) => {
                tracing::debug!(
                    target: "ledger_client::mirror::subscription",
                    grpc_status = status.grpc_status,
                    message = status.grpc_message.as_deref().unwrap_or(""),
                    "topic stream terminated with a non-zero status, reconnecting"
                );
                tokio::time::sleep(reconnect_delay).await;
                reconnect_delay = double_capped(reconnect_delay, MAX_RECONNECT_BACKOFF);
            }
            Err(error) => {
                tracing::debug!(
                    target: "ledger_client::mirror::subscription",
                    %error,
                    "topic stream transport failure, reconnecting"
                );
                tokio::time::sleep(reconnect_delay).await;
                reconnect_delay = double_capped(reconnect_delay, MAX_RECONNECT_BACKOFF);
            }
        }
    }
}

async fn run_rest(
    client: MirrorRestClient,
    topic_id: EntityId,
    start_time: Option<Timestamp>,
    tx: mpsc::Sender<TopicMessage>,
) {
    let mut state = State::Start;
    let mut cursor_url: Option<String> = None;
    let mut last_timestamp = start_time;
    let mut reconnect_backoff = INITIAL_RECONNECT_BACKOFF;

    loop {
        match state {
            State::Start => {
                state = State::Connect;
            }
            State::Connect => {
                state = State::Receive;
            }
            State::Receive => {
                match fetch_page(&client, topic_id, cursor_url.as_deref(), last_timestamp).await {
                    Ok(page) => {
                        reconnect_backoff = INITIAL_RECONNECT_BACKOFF;
                        let mut delivered_any = false;
                        for message in page.items {
                            last_timestamp = message.consensus_timestamp.or(last_timestamp);
                            delivered_any = true;
                            if tx.send(message).await.is_err() {
                                state = State::Terminate;
                                break;
                            }
                        }
                        if state == State::Terminate {
                            continue;
                        }
                        if page.next.is_some() {
                            cursor_url = page.next;
                        } else {
                            cursor_url = None;
                            if !delivered_any {
                                tokio::time::sleep(REST_IDLE_POLL_INTERVAL).await;
                            }
                        }
                    }
                    Err(_) => {
                        let delay = full_jitter(reconnect_backoff);
                        reconnect_backoff = double_capped(reconnect_backoff, MAX_RECONNECT_BACKOFF);
                        tokio::time::sleep(delay).await;
                        cursor_url = None;
                        state = State::Connect;
                        continue;
                    }
                }
            }
            State::Terminate => break,
        }
    }
}

async fn fetch_page(
    client: &MirrorRestClient,
    topic_id: EntityId,
    cursor_url: Option<&str>,
    last_timestamp: Option<Timestamp>,
) -> Result<super::rest::Page<TopicMessage>, crate::error::MirrorError> {
    if let Some(url) = cursor_url {
        return client.list_topic_messages(topic_id, Some(url)).await;
    }
    match last_timestamp {
        Some(ts) => client.list_topic_messages_after(topic_id, ts).await,
        None => client.list_topic_messages(topic_id, None).await,
    }
}
