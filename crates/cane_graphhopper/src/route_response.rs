use serde::{Deserialize, Serialize};

/// Body of a GraphHopper `/route` answer. Only the parts the navigation engine reads are kept.
#[derive(Deserialize, Serialize, Debug, Clone, Default)]
pub struct GraphHopperRouteResponse {
    #[serde(default)]
    pub paths: Vec<GraphHopperPath>,
}

#[derive(Deserialize, Serialize, Debug, Clone, Default)]
pub struct GraphHopperPath {
    #[serde(default)]
    pub instructions: Vec<TurnInstruction>,
}

/// A single turn-by-turn step as returned by GraphHopper.
#[derive(Deserialize, Serialize, Debug, Clone, PartialEq)]
pub struct TurnInstruction {
    pub sign: i32,

    #[serde(default)]
    pub text: String,

    /// Distance in meters until the next instruction
    pub distance: f64,

    /// Travel time in milliseconds until the next instruction
    pub time: u64,
}

impl TurnInstruction {
    pub const TURN_LEFT: i32 = -2;
    pub const CONTINUE_ON_STREET: i32 = 0;
    pub const TURN_RIGHT: i32 = 2;
    pub const FINISH: i32 = 4;

    pub fn new(sign: i32, text: impl Into<String>, distance: f64, time: u64) -> Self {
        Self {
            sign,
            text: text.into(),
            distance,
            time,
        }
    }
}

impl GraphHopperRouteResponse {
    /// Instructions of the best path. A response without paths yields no instructions.
    pub fn into_first_instructions(self) -> Vec<TurnInstruction> {
        self.paths
            .into_iter()
            .next()
            .map(|path| path.instructions)
            .unwrap_or_default()
    }
}
