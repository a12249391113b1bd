use tracing::{debug, info};

use crate::{
    coordinate::Coordinate,
    device_instruction::DeviceInstruction,
    dispatcher::{FanOutDispatcher, NavigationBroadcaster, StepPublisher},
    error::NavigationError,
    events::{parse_destination_event, parse_location_event},
    instruction_pipeline::InstructionPipeline,
    route_provider::RouteProvider,
};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LocationOutcome {
    /// No destination has been set yet
    Ignored,
    /// The provider answered without a usable path
    NoRoute,
    Dispatched { instructions: usize },
}

/// Entry point for inbound navigation events and on-demand queries.
pub struct NavigationService<R, P, B> {
    pipeline: InstructionPipeline<R>,
    dispatcher: FanOutDispatcher<P, B>,
}

impl<R, P, B> NavigationService<R, P, B>
where
    R: RouteProvider,
    P: StepPublisher,
    B: NavigationBroadcaster,
{
    pub fn new(pipeline: InstructionPipeline<R>, dispatcher: FanOutDispatcher<P, B>) -> Self {
        Self {
            pipeline,
            dispatcher,
        }
    }

    pub fn pipeline(&self) -> &InstructionPipeline<R> {
        &self.pipeline
    }

    /// Replaces the live destination with the one carried by `payload`.
    pub fn handle_destination_event(&self, payload: &[u8]) -> Result<(), NavigationError> {
        let destination = parse_destination_event(payload)?;

        info!(
            "Destination set: {:?} via {} points",
            destination.location(),
            destination.via().len()
        );
        self.pipeline.state().set_destination(destination);

        Ok(())
    }

    pub async fn handle_location_event(
        &self,
        payload: &[u8],
    ) -> Result<LocationOutcome, NavigationError> {
        let location = parse_location_event(payload)?;
        self.handle_location(location).await
    }

    /// Computes guidance for `location` and fans it out. Locations received before any
    /// destination are ignored.
    pub async fn handle_location(
        &self,
        location: Coordinate,
    ) -> Result<LocationOutcome, NavigationError> {
        if !self.pipeline.state().has_destination() {
            debug!("Location {:?} ignored, no destination set", location);
            return Ok(LocationOutcome::Ignored);
        }

        info!("Location: {:?}", location);

        let instructions = self.pipeline.compute_instructions(location).await?;
        if instructions.is_empty() {
            return Ok(LocationOutcome::NoRoute);
        }

        self.dispatcher.dispatch(&instructions, location).await?;

        Ok(LocationOutcome::Dispatched {
            instructions: instructions.len(),
        })
    }

    /// On-demand route for an explicit itinerary. Nothing is dispatched.
    pub async fn query(
        &self,
        from: Coordinate,
        via: &[Coordinate],
        to: Coordinate,
    ) -> Result<Vec<DeviceInstruction>, NavigationError> {
        self.pipeline.instructions_between(from, via, to).await
    }
}
