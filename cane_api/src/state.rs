use std::sync::Arc;

use cane_graphhopper::graphhopper_api::GraphHopperRouteClient;
use cane_navigation::{
    broadcast_hub::BroadcastHub, dispatcher::FanOutDispatcher,
    instruction_pipeline::InstructionPipeline, navigation_service::NavigationService,
    navigation_state::NavigationStateStore,
};

use crate::mqtt::MqttStepPublisher;

pub type CaneNavigationService =
    NavigationService<GraphHopperRouteClient, MqttStepPublisher, Arc<BroadcastHub>>;

pub struct AppState {
    pub navigation: CaneNavigationService,
    pub broadcast_hub: Arc<BroadcastHub>,
}

impl AppState {
    pub fn new(route_client: GraphHopperRouteClient, publisher: MqttStepPublisher) -> Self {
        let broadcast_hub = Arc::new(BroadcastHub::new());
        let pipeline = InstructionPipeline::new(Arc::new(NavigationStateStore::new()), route_client);
        let dispatcher = FanOutDispatcher::new(publisher, Arc::clone(&broadcast_hub));

        Self {
            navigation: NavigationService::new(pipeline, dispatcher),
            broadcast_hub,
        }
    }
}
