use std::{future::Future, sync::Arc};

use serde::{Deserialize, Serialize};
use tracing::{debug, info};

use crate::{coordinate::Coordinate, device_instruction::DeviceInstruction, error::NavigationError};

/// Low-bandwidth channel to the cane, which only ever receives the next actionable step.
pub trait StepPublisher: Send + Sync {
    fn publish_step(
        &self,
        instruction: &DeviceInstruction,
    ) -> impl Future<Output = Result<(), NavigationError>> + Send;
}

/// Channel to richer clients such as the caregiver map.
///
/// Delivery is best effort per listener and never fails as a whole. Returns the number of
/// listeners reached.
pub trait NavigationBroadcaster: Send + Sync {
    fn broadcast(&self, message: &BroadcastMessage) -> usize;
}

impl<T: NavigationBroadcaster + ?Sized> NavigationBroadcaster for Arc<T> {
    fn broadcast(&self, message: &BroadcastMessage) -> usize {
        (**self).broadcast(message)
    }
}

#[derive(Deserialize, Serialize, Debug, Clone, PartialEq)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum BroadcastMessage {
    #[serde(rename_all = "camelCase")]
    Navigation {
        instructions: Vec<DeviceInstruction>,
        raw_location: Coordinate,
    },
}

pub struct FanOutDispatcher<P, B> {
    publisher: P,
    broadcaster: B,
}

impl<P: StepPublisher, B: NavigationBroadcaster> FanOutDispatcher<P, B> {
    pub fn new(publisher: P, broadcaster: B) -> Self {
        Self {
            publisher,
            broadcaster,
        }
    }

    pub fn publisher(&self) -> &P {
        &self.publisher
    }

    pub fn broadcaster(&self) -> &B {
        &self.broadcaster
    }

    /// Publishes the first instruction to the cane and broadcasts the whole sequence with the
    /// raw location. Nothing is sent for an empty sequence.
    ///
    /// The broadcast happens even if publishing fails; the publish error is returned afterwards.
    pub async fn dispatch(
        &self,
        instructions: &[DeviceInstruction],
        raw_location: Coordinate,
    ) -> Result<(), NavigationError> {
        let Some(next_step) = instructions.first() else {
            debug!("No instructions to dispatch");
            return Ok(());
        };

        let published = self.publisher.publish_step(next_step).await;
        if published.is_ok() {
            info!(
                "Instruction sent: {:?} {} steps {:?} ({})",
                next_step.action, next_step.steps, next_step.turn, next_step.text
            );
        }

        let reached = self.broadcaster.broadcast(&BroadcastMessage::Navigation {
            instructions: instructions.to_vec(),
            raw_location,
        });
        debug!(
            "Broadcast {} instructions to {} listeners",
            instructions.len(),
            reached
        );

        published
    }
}
