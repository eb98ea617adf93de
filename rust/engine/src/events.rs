use serde::{Deserialize, Serialize};

/// Top-level screens the engine may ask the presentation layer to show.
/// The engine requests these; it does not own them.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Screen {
    Playing,
    Shop,
    RoundWon,
    Lose,
    Inventory,
}

/// Fire-and-forget cues for audio, particles and HUD updates.
///
/// The engine buffers these and never waits on them; collaborators drain the
/// buffer once per tick.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "event", rename_all = "snake_case")]
pub enum GameEvent {
    Planted {
        soil: usize,
        seed: String,
    },
    /// Clover soil spat the seed back into the hand
    CloverReturned {
        soil: usize,
    },
    /// Clover soil spat the seed back and paid out
    CloverBonus {
        soil: usize,
        coins: u32,
    },
    UpgradeApplied {
        soil: usize,
        upgrade: String,
    },
    UpgradeRemoved {
        soil: usize,
    },
    /// One animation beat; `retrigger` counts from 0 up to `of - 1`
    HarvestBeat {
        soil: usize,
        retrigger: u32,
        of: u32,
    },
    Harvested {
        soil: usize,
        seed: String,
        value: f64,
        synergy: f64,
    },
    /// Evil soil lost its multiplier
    EvilWithered {
        soil: usize,
    },
    SeedDuplicated {
        seed: String,
        dropped: bool,
    },
    RoundStarted {
        round: u32,
        hand_size: usize,
    },
    RoundWon {
        round: u32,
        score: f64,
        coins: u32,
    },
    RoundFailed {
        round: u32,
        score: f64,
    },
    TransitionRequested {
        screen: Screen,
    },
}
