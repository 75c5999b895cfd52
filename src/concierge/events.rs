//! Progress event channel for one concierge request
//!
//! Bounded publisher/subscriber pair over tokio mpsc. Emission awaits
//! channel capacity, so subscribers always receive every event in the
//! order it was published; a `Completed` or `Error` event is last.

use crate::types::ConciergeProgress;
use tokio::sync::mpsc;

/// Default event channel capacity
const CHANNEL_CAPACITY: usize = 100;

/// Publisher half of a progress event channel
pub struct ProgressBus {
    sender: mpsc::Sender<ConciergeProgress>,
}

impl ProgressBus {
    /// Create a bus with its paired receiver
    pub fn new() -> (Self, mpsc::Receiver<ConciergeProgress>) {
        let (sender, receiver) = mpsc::channel(CHANNEL_CAPACITY);
        (ProgressBus { sender }, receiver)
    }

    /// Publish one event, waiting for channel capacity
    ///
    /// A dropped receiver is not an error; the pipeline keeps running
    /// and later emissions are silently discarded.
    pub async fn emit(&self, event: ConciergeProgress) {
        let _ = self.sender.send(event).await;
    }
}

impl Clone for ProgressBus {
    fn clone(&self) -> Self {
        ProgressBus {
            sender: self.sender.clone(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::ConciergeStage;
    use tokio::time::{timeout, Duration};

    #[tokio::test]
    async fn test_events_arrive_in_emission_order() {
        let (bus, mut receiver) = ProgressBus::new();

        bus.emit(ConciergeProgress::at(ConciergeStage::QuestionAnalysis, 5, "분석")).await;
        bus.emit(ConciergeProgress::at(ConciergeStage::NewsSearch, 45, "검색")).await;
        bus.emit(ConciergeProgress::at(ConciergeStage::Completed, 100, "완료")).await;

        let stages: Vec<ConciergeStage> = [
            receiver.recv().await.unwrap(),
            receiver.recv().await.unwrap(),
            receiver.recv().await.unwrap(),
        ]
        .iter()
        .map(|e| e.stage)
        .collect();

        assert_eq!(
            stages,
            vec![
                ConciergeStage::QuestionAnalysis,
                ConciergeStage::NewsSearch,
                ConciergeStage::Completed
            ]
        );
    }

    #[tokio::test]
    async fn test_emit_survives_dropped_receiver() {
        let (bus, receiver) = ProgressBus::new();
        drop(receiver);

        let done = timeout(
            Duration::from_millis(100),
            bus.emit(ConciergeProgress::at(ConciergeStage::NewsSearch, 45, "검색")),
        )
        .await;
        assert!(done.is_ok());
    }
}
