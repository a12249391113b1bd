use std::collections::VecDeque;

use cane_graphhopper::route_response::TurnInstruction;
use parking_lot::Mutex;

use crate::{
    coordinate::Coordinate,
    device_instruction::DeviceInstruction,
    dispatcher::{BroadcastMessage, NavigationBroadcaster, StepPublisher},
    error::NavigationError,
    route_provider::RouteProvider,
};

#[derive(Clone)]
pub enum FakeAnswer {
    Route(Vec<TurnInstruction>),
    Unavailable(String),
}

/// Answers with queued responses in order; the last one keeps being repeated.
#[derive(Default)]
pub struct FakeRouteProvider {
    answers: Mutex<VecDeque<FakeAnswer>>,
    requests: Mutex<Vec<Vec<Coordinate>>>,
}

impl FakeRouteProvider {
    pub fn new(answers: Vec<FakeAnswer>) -> Self {
        Self {
            answers: Mutex::new(answers.into()),
            requests: Mutex::default(),
        }
    }

    pub fn with_route(route: Vec<TurnInstruction>) -> Self {
        Self::new(vec![FakeAnswer::Route(route)])
    }

    pub fn unavailable(reason: &str) -> Self {
        Self::new(vec![FakeAnswer::Unavailable(reason.to_string())])
    }

    pub fn requests(&self) -> Vec<Vec<Coordinate>> {
        self.requests.lock().clone()
    }

    fn next_answer(&self) -> Option<FakeAnswer> {
        let mut answers = self.answers.lock();
        if answers.len() > 1 {
            answers.pop_front()
        } else {
            answers.front().cloned()
        }
    }
}

impl RouteProvider for FakeRouteProvider {
    async fn fetch_route(
        &self,
        waypoints: &[Coordinate],
    ) -> Result<Vec<TurnInstruction>, NavigationError> {
        self.requests.lock().push(waypoints.to_vec());

        match self.next_answer() {
            Some(FakeAnswer::Route(route)) => Ok(route),
            Some(FakeAnswer::Unavailable(reason)) => Err(NavigationError::RoutingUnavailable(reason)),
            None => Ok(vec![]),
        }
    }
}

#[derive(Default)]
pub struct RecordingPublisher {
    pub published: Mutex<Vec<DeviceInstruction>>,
    pub fail: bool,
}

impl RecordingPublisher {
    pub fn failing() -> Self {
        Self {
            published: Mutex::default(),
            fail: true,
        }
    }
}

impl StepPublisher for RecordingPublisher {
    async fn publish_step(&self, instruction: &DeviceInstruction) -> Result<(), NavigationError> {
        if self.fail {
            return Err(NavigationError::PublishFailed(String::from("broker offline")));
        }

        self.published.lock().push(instruction.clone());
        Ok(())
    }
}

#[derive(Default)]
pub struct RecordingBroadcaster {
    pub messages: Mutex<Vec<BroadcastMessage>>,
}

impl NavigationBroadcaster for RecordingBroadcaster {
    fn broadcast(&self, message: &BroadcastMessage) -> usize {
        self.messages.lock().push(message.clone());
        1
    }
}
