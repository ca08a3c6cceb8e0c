use crate::application::ports::MarketplaceReader;
use crate::domain::{errors::DomainError, marketplace::MarketplaceEvent};
use metrics::counter;
use std::sync::Arc;
use std::time::Duration;
use tokio_util::sync::CancellationToken;
use tracing::{error, info};

/// Widest block span requested from the node in one `eth_getLogs` query.
pub const DEFAULT_MAX_BLOCK_RANGE: u64 = 1_000;

/// Polls the marketplace for new events, visiting each block once.
///
/// Each poll covers at most `max_block_range` blocks, so a watcher that fell
/// behind catches up in chunks instead of asking for one oversized range.
pub struct EventWatcher {
    reader: Arc<dyn MarketplaceReader>,
    poll_interval: Duration,
    max_block_range: u64,
    next_block: u64,
    last_head: u64,
}

impl EventWatcher {
    pub fn new(reader: Arc<dyn MarketplaceReader>, poll_interval: Duration, start_block: u64) -> Self {
        Self {
            reader,
            poll_interval,
            max_block_range: DEFAULT_MAX_BLOCK_RANGE,
            next_block: start_block,
            last_head: 0,
        }
    }

    pub fn with_max_block_range(mut self, span: u64) -> Self {
        self.max_block_range = span.max(1);
        self
    }

    /// Starts `lookback` blocks behind the current head.
    pub async fn from_lookback(
        reader: Arc<dyn MarketplaceReader>,
        poll_interval: Duration,
        lookback: u64,
    ) -> Result<Self, DomainError> {
        let head = reader.block_number().await?;
        let start = head.saturating_sub(lookback);
        info!("Starting from block {}", start);
        Ok(Self::new(reader, poll_interval, start))
    }

    pub fn next_block(&self) -> u64 {
        self.next_block
    }

    /// True once every block up to the last observed head has been read.
    pub fn is_caught_up(&self) -> bool {
        self.next_block > self.last_head
    }

    pub async fn poll_once(&mut self) -> Result<Vec<MarketplaceEvent>, DomainError> {
        let head = self.reader.block_number().await?;
        self.last_head = head;
        if head < self.next_block {
            return Ok(Vec::new());
        }

        let to_block = head.min(self.next_block.saturating_add(self.max_block_range - 1));
        let events = self.reader.events(self.next_block, to_block).await?;
        info!(
            "Checked blocks {} to {}: {} event(s)",
            self.next_block,
            to_block,
            events.len()
        );
        self.next_block = to_block + 1;

        for event in &events {
            counter!("marketplace_events_total", "kind" => event.kind()).increment(1);
            log_event(event);
        }
        Ok(events)
    }

    pub async fn run(&mut self, cancel: CancellationToken) {
        info!("Event watcher started");
        loop {
            match self.poll_once().await {
                Ok(_) if !self.is_caught_up() => {
                    if cancel.is_cancelled() {
                        info!("Event watcher stopped");
                        return;
                    }
                    continue;
                }
                Ok(_) => {}
                Err(e) => error!("Error monitoring events: {}", e),
            }
            tokio::select! {
                _ = cancel.cancelled() => {
                    info!("Event watcher stopped");
                    return;
                }
                _ = tokio::time::sleep(self.poll_interval) => {}
            }
        }
    }
}

fn log_event(event: &MarketplaceEvent) {
    match event {
        MarketplaceEvent::NewDataCreated {
            data_index, record, ..
        } => {
            info!(
                data_index,
                user = ?record.user,
                "New data created: {}", record.description
            );
        }
        MarketplaceEvent::AiAgentResponded {
            data_index,
            record,
            ai_agent,
            is_valid,
            ..
        } => {
            info!(
                data_index,
                ai_agent = ?ai_agent,
                is_valid,
                "AI agent responded to: {}", record.description
            );
        }
    }
}
