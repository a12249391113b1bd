pub mod broadcast_hub;
pub mod coordinate;
pub mod device_instruction;
pub mod dispatcher;
pub mod error;
pub mod events;
pub mod instruction_pipeline;
pub mod navigation_service;
pub mod navigation_state;
pub mod route_provider;
pub mod step_translator;

#[cfg(test)]
pub(crate) mod test_utils;
