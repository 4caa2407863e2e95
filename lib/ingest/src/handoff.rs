//! The single-slot exchange between the parser of a work unit and its consumer.

use crate::IngestError;
use hexaplex_model::Quad;
use tokio::sync::mpsc;

#[derive(Debug)]
enum HandoffItem {
    Statement(Quad),
    Failed(IngestError),
}

/// Creates a handoff with room for exactly one statement.
///
/// The producer blocks while a statement waits to be taken and the consumer waits while the slot
/// is empty. Dropping the sender marks the end of the stream, dropping the receiver cancels the
/// producer.
pub fn handoff() -> (HandoffSender, HandoffReceiver) {
    let (sender, receiver) = mpsc::channel(1);
    (HandoffSender { sender }, HandoffReceiver { receiver })
}

/// The producing end of a [handoff]. Must only be used outside of the async runtime.
#[derive(Debug)]
pub struct HandoffSender {
    sender: mpsc::Sender<HandoffItem>,
}

impl HandoffSender {
    /// Hands a statement over, blocking until the slot is free.
    pub fn send(&self, quad: Quad) -> Result<(), IngestError> {
        self.sender
            .blocking_send(HandoffItem::Statement(quad))
            .map_err(|_| IngestError::Cancelled)
    }

    /// Hands over an error that is raised by the consumer's next [HandoffReceiver::recv].
    pub fn fail(&self, error: IngestError) -> Result<(), IngestError> {
        self.sender
            .blocking_send(HandoffItem::Failed(error))
            .map_err(|_| IngestError::Cancelled)
    }

    /// Returns the number of handed over items that were not yet taken.
    pub fn buffered(&self) -> usize {
        self.sender.max_capacity() - self.sender.capacity()
    }
}

/// The consuming end of a [handoff].
#[derive(Debug)]
pub struct HandoffReceiver {
    receiver: mpsc::Receiver<HandoffItem>,
}

impl HandoffReceiver {
    /// Takes the next statement. Returns [None] once the producer is done.
    pub async fn recv(&mut self) -> Option<Result<Quad, IngestError>> {
        Some(match self.receiver.recv().await? {
            HandoffItem::Statement(quad) => Ok(quad),
            HandoffItem::Failed(error) => Err(error),
        })
    }
}
