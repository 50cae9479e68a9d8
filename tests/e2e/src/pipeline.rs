//! Converter → splitter → queue → reassembler

use crate::GroupReassembler;
use anyhow::{Context, Result};
use header_mapping::{HeaderMappingConverter, Utf8Converter, WireMessage};
use integration_config::IntegrationConfig;
use message::{Message, MessageId};
use message_sink::{QueueReceiver, QueueSink};
use message_store::BoundedMessageStore;
use splitter::{Producer, SplitError, Splitter};
use std::sync::Arc;
use std::time::Duration;
use tracing::{debug, info};

/// Header that overrides the pipeline's default delimiter per message
pub const DELIMITER_HEADER: &str = "delimiter";

/// How long a dispatch waits on a full output queue. The queue is drained
/// only between ingests, so a line with more parts than the queue holds is
/// rejected after this delay.
pub const QUEUE_SEND_TIMEOUT: Duration = Duration::from_millis(50);

pub struct Pipeline {
    converter: HeaderMappingConverter<Utf8Converter>,
    splitter: Splitter<String, String>,
    receiver: QueueReceiver<String>,
    reassembler: GroupReassembler<String>,
    /// Groups completed while clearing out a rejected line
    ready: Vec<Vec<Message<String>>>,
}

impl Pipeline {
    pub fn from_config(
        config: &IntegrationConfig,
        default_delimiter: &str,
        queue_capacity: usize,
    ) -> Result<Self> {
        let (queue, receiver) = QueueSink::<String>::bounded(queue_capacity)
            .context("Failed to create output queue")?;
        let queue = queue
            .with_name(format!("{}-out", config.splitter.name))
            .with_send_timeout(QUEUE_SEND_TIMEOUT);

        let store = BoundedMessageStore::from_config(&config.store)
            .context("Failed to create reassembly store")?;

        let splitter = Splitter::new(delimited_producer(default_delimiter), Arc::new(queue))
            .with_config(config.splitter.clone());

        info!(
            "Pipeline '{}' ready: queue capacity {}, store capacity {}",
            config.splitter.name, queue_capacity, config.store.capacity
        );

        Ok(Self {
            converter: HeaderMappingConverter::with_default_mapper(Utf8Converter),
            splitter,
            receiver,
            reassembler: GroupReassembler::new(store),
            ready: Vec::new(),
        })
    }

    /// Convert and split one wire message; returns the number of parts queued.
    ///
    /// When dispatch fails partway, the parts of that line already queued are
    /// discarded so no incomplete group reaches the reassembler.
    pub async fn ingest(&mut self, wire: &WireMessage) -> Result<usize> {
        let message: Message<String> = self
            .converter
            .from_wire(wire)
            .context("Failed to convert wire message")?;
        match self.splitter.handle(&message).await {
            Ok(parts) => Ok(parts),
            Err(e) => {
                if let SplitError::DispatchFailed { correlation_id, .. } = &e {
                    self.discard_group(*correlation_id)?;
                }
                Err(e.into())
            }
        }
    }

    /// Feed every queued part to the reassembler, returning completed groups
    pub fn collect_groups(&mut self) -> Result<Vec<Vec<Message<String>>>> {
        let mut groups = std::mem::take(&mut self.ready);
        for message in self.receiver.drain() {
            if let Some(group) = self.reassembler.accept(message)? {
                groups.push(group);
            }
        }
        Ok(groups)
    }

    fn discard_group(&mut self, correlation_id: MessageId) -> Result<()> {
        let mut dropped = 0;
        for message in self.receiver.drain() {
            if message.headers().correlation_id() == Some(correlation_id) {
                dropped += 1;
                continue;
            }
            if let Some(group) = self.reassembler.accept(message)? {
                self.ready.push(group);
            }
        }
        debug!("Discarded {} queued parts of rejected group {}", dropped, correlation_id);
        Ok(())
    }

    /// Turn a completed group back into wire messages
    pub fn to_wire(&self, group: &[Message<String>]) -> Result<Vec<WireMessage>> {
        group
            .iter()
            .map(|m| -> Result<WireMessage> { Ok(self.converter.to_wire(m)?) })
            .collect()
    }

    pub fn splitter(&self) -> &Splitter<String, String> {
        &self.splitter
    }

    pub fn reassembler(&self) -> &GroupReassembler<String> {
        &self.reassembler
    }

    /// Parts queued but not yet collected
    pub fn receiver_mut(&mut self) -> &mut QueueReceiver<String> {
        &mut self.receiver
    }
}

fn delimited_producer(default_delimiter: &str) -> Producer<String, String> {
    let default_delimiter = default_delimiter.to_string();
    Producer::from_message(move |message: &Message<String>| {
        let delimiter: Option<String> = message.headers().get_as(DELIMITER_HEADER)?;
        let delimiter = delimiter.unwrap_or_else(|| default_delimiter.clone());
        Ok(message
            .payload()
            .split(delimiter.as_str())
            .filter(|part| !part.is_empty())
            .map(str::to_string)
            .collect())
    })
    .with_name("delimited")
}
