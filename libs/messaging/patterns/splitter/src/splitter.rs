//! The splitting endpoint
//!
//! One `handle` call runs produce → normalize → stamp → dispatch for a single
//! inbound message. The whole group is built and stamped before the first
//! send, so a producer failure never leaves a partial group behind. Dispatch
//! awaits each send in turn; a full bounded sink suspends the splitter.

use crate::{
    Producer, ProducerCandidates, ProductionError, SequencePolicy, SplitError, SplitItem,
    SplitOutput, SplitterConfig,
};
use async_trait::async_trait;
use message::{keys, Message, MessageBuilder, MessageId, Value};
use message_sink::{MessageSink, SendContext, SinkError, SinkMetadata};
use std::fmt;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;

/// Fans one inbound message into an ordered, correlated group
pub struct Splitter<I, O> {
    config: SplitterConfig,
    producer: Producer<I, O>,
    output: Arc<dyn MessageSink<O>>,
    messages_handled: AtomicU64,
    messages_failed: AtomicU64,
}

impl<I, O> Splitter<I, O>
where
    I: Send + Sync + 'static,
    O: Send + Sync + 'static,
{
    pub fn new(producer: Producer<I, O>, output: Arc<dyn MessageSink<O>>) -> Self {
        Self {
            config: SplitterConfig::default(),
            producer,
            output,
            messages_handled: AtomicU64::new(0),
            messages_failed: AtomicU64::new(0),
        }
    }

    /// Resolve the producer among `candidates` and build the splitter.
    /// Resolution errors surface here, never from `handle`.
    pub fn from_candidates(
        candidates: ProducerCandidates<I, O>,
        output: Arc<dyn MessageSink<O>>,
        config: SplitterConfig,
    ) -> Result<Self, SplitError> {
        config.validate()?;
        let producer = candidates.resolve()?;
        Ok(Self::new(producer, output).with_config(config))
    }

    pub fn with_config(mut self, config: SplitterConfig) -> Self {
        self.config = config;
        self
    }

    pub fn name(&self) -> &str {
        &self.config.name
    }

    pub fn config(&self) -> &SplitterConfig {
        &self.config
    }

    pub fn producer(&self) -> &Producer<I, O> {
        &self.producer
    }

    /// Split `inbound` and dispatch the group in sequence order.
    ///
    /// Returns the number of messages dispatched; 0 when the producer yields
    /// nothing.
    pub async fn handle(&self, inbound: &Message<I>) -> Result<usize, SplitError> {
        let output = self.producer.produce(inbound).map_err(|e| {
            self.messages_failed.fetch_add(1, Ordering::Relaxed);
            tracing::warn!(
                "Splitter '{}' producer '{}' failed for message {}: {}",
                self.config.name,
                self.producer.name(),
                inbound.id(),
                e
            );
            SplitError::ProductionFailed(e)
        })?;

        if output.is_empty() {
            tracing::debug!(
                "Splitter '{}' produced no results for message {}, nothing dispatched",
                self.config.name,
                inbound.id()
            );
            self.messages_handled.fetch_add(1, Ordering::Relaxed);
            return Ok(0);
        }

        let group = self.stamp(inbound, output)?;
        let sequence_size = group.len() as u32;
        let correlation_id = inbound.id();

        for (index, message) in group.into_iter().enumerate() {
            let sequence_number = index as u32 + 1;
            let outbound_id = message.id();
            if let Err(source) = self.output.send(message).await {
                self.messages_failed.fetch_add(1, Ordering::Relaxed);
                tracing::warn!(
                    "Splitter '{}' dispatch of {}/{} for message {} failed: {}",
                    self.config.name,
                    sequence_number,
                    sequence_size,
                    correlation_id,
                    source
                );
                return Err(SplitError::DispatchFailed {
                    sequence_number,
                    sequence_size,
                    correlation_id,
                    source,
                });
            }
            tracing::debug!(
                "Splitter '{}' dispatched {} as {}/{} of {}",
                self.config.name,
                outbound_id,
                sequence_number,
                sequence_size,
                correlation_id
            );
        }

        self.messages_handled.fetch_add(1, Ordering::Relaxed);
        Ok(sequence_size as usize)
    }

    /// Turn produced items into outbound messages carrying group metadata
    fn stamp(
        &self,
        inbound: &Message<I>,
        output: SplitOutput<O>,
    ) -> Result<Vec<Message<O>>, SplitError> {
        let size = u32::try_from(output.len()).map_err(|_| {
            ProductionError::Failed(anyhow::anyhow!(
                "{} results exceed the sequence number range",
                output.len()
            ))
        })?;
        let correlation_id = inbound.id();
        let inherited: Vec<(String, Value)> = if self.config.copy_inbound_headers {
            inbound
                .headers()
                .user_entries()
                .into_iter()
                .filter(|(k, _)| !keys::is_reserved(k))
                .collect()
        } else {
            Vec::new()
        };

        let mut group = Vec::with_capacity(output.len());
        for (index, item) in output.into_iter().enumerate() {
            let builder = match item {
                SplitItem::Payload(payload) => MessageBuilder::with_payload(payload),
                SplitItem::Message(message) => MessageBuilder::from_message(&message),
            };
            let builder = builder.copy_headers_if_absent(inherited.iter().cloned());
            let builder = stamp_sequence(
                builder,
                self.config.sequence_policy,
                correlation_id,
                index as u32 + 1,
                size,
            );
            group.push(
                builder
                    .build()
                    .map_err(|e| SplitError::ProductionFailed(e.into()))?,
            );
        }
        Ok(group)
    }
}

fn stamp_sequence<O>(
    builder: MessageBuilder<O>,
    policy: SequencePolicy,
    correlation_id: MessageId,
    sequence_number: u32,
    sequence_size: u32,
) -> MessageBuilder<O> {
    match policy {
        SequencePolicy::EngineAssigned => builder
            .correlation_id(correlation_id)
            .sequence_number(sequence_number)
            .sequence_size(sequence_size),
        SequencePolicy::PreserveProducer => builder
            .set_header_if_absent(keys::CORRELATION_ID, correlation_id)
            .set_header_if_absent(keys::SEQUENCE_NUMBER, sequence_number)
            .set_header_if_absent(keys::SEQUENCE_SIZE, sequence_size),
    }
}

impl<I, O> fmt::Debug for Splitter<I, O> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Splitter")
            .field("config", &self.config)
            .field("producer", &self.producer)
            .field("output", &self.output)
            .finish()
    }
}

/// A splitter accepts messages like any other endpoint, so splitters chain
#[async_trait]
impl<I, O> MessageSink<I> for Splitter<I, O>
where
    I: Send + Sync + 'static,
    O: Send + Sync + 'static,
{
    async fn send(&self, message: Message<I>) -> Result<(), SinkError> {
        match self.handle(&message).await {
            Ok(_) => Ok(()),
            Err(e) => {
                let context = SendContext::for_message(&message).with_target(self.config.name.clone());
                Err(SinkError::send_failed_with_context(e.to_string(), context))
            }
        }
    }

    fn metadata(&self) -> SinkMetadata {
        SinkMetadata::new(self.config.name.clone(), "splitter").with_counts(
            self.messages_handled.load(Ordering::Relaxed),
            self.messages_failed.load(Ordering::Relaxed),
        )
    }
}
