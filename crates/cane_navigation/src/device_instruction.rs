use serde::{Deserialize, Serialize};

#[derive(Deserialize, Serialize, Debug, Copy, Clone, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum Action {
    Forward,
    Turn,
}

#[derive(Deserialize, Serialize, Debug, Copy, Clone, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum TurnDirection {
    Left,
    Right,
}

/// Instruction as consumed by the cane.
///
/// `turn` is always serialized, as `null` when the direction is unspecified, so the device can
/// rely on the field being present.
#[derive(Deserialize, Serialize, Debug, Clone, PartialEq)]
pub struct DeviceInstruction {
    pub action: Action,
    pub steps: u32,
    pub turn: Option<TurnDirection>,
    pub text: String,

    /// Meters, as given by the routing provider
    pub distance: f64,

    /// Milliseconds, as given by the routing provider
    pub time: u64,
}
