use std::sync::Arc;

use tracing::debug;

use crate::{
    coordinate::{Coordinate, Destination},
    device_instruction::DeviceInstruction,
    error::NavigationError,
    navigation_state::NavigationStateStore,
    route_provider::RouteProvider,
    step_translator::translate,
};

pub struct InstructionPipeline<R> {
    state: Arc<NavigationStateStore>,
    route_provider: R,
}

impl<R: RouteProvider> InstructionPipeline<R> {
    pub fn new(state: Arc<NavigationStateStore>, route_provider: R) -> Self {
        Self {
            state,
            route_provider,
        }
    }

    pub fn state(&self) -> &Arc<NavigationStateStore> {
        &self.state
    }

    pub fn route_provider(&self) -> &R {
        &self.route_provider
    }

    /// Instructions from `current_location` to the live destination. Empty when no destination
    /// is set or when the provider found no route.
    pub async fn compute_instructions(
        &self,
        current_location: Coordinate,
    ) -> Result<Vec<DeviceInstruction>, NavigationError> {
        let Some(destination) = self.state.current() else {
            debug!("No destination set, nothing to navigate to");
            return Ok(vec![]);
        };

        let waypoints = destination.waypoints_from(current_location);
        self.instructions_through(&waypoints).await
    }

    /// Same translation as [`Self::compute_instructions`] but for an explicit itinerary, leaving
    /// the shared navigation state untouched.
    pub async fn instructions_between(
        &self,
        from: Coordinate,
        via: &[Coordinate],
        to: Coordinate,
    ) -> Result<Vec<DeviceInstruction>, NavigationError> {
        let waypoints = Destination::new(to, via.to_vec()).waypoints_from(from);
        self.instructions_through(&waypoints).await
    }

    async fn instructions_through(
        &self,
        waypoints: &[Coordinate],
    ) -> Result<Vec<DeviceInstruction>, NavigationError> {
        let turn_instructions = self.route_provider.fetch_route(waypoints).await?;

        if turn_instructions.is_empty() {
            debug!("No route found through {} waypoints", waypoints.len());
        }

        Ok(turn_instructions.iter().map(translate).collect())
    }
}
