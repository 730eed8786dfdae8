/// Rotary direction; any input delta collapses to one step.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Direction {
    Forward,
    Backward,
}

impl Direction {
    /// Zero counts as forward.
    pub fn from_delta(delta: i64) -> Self {
        if delta >= 0 {
            Self::Forward
        } else {
            Self::Backward
        }
    }

    pub fn step(self) -> i64 {
        match self {
            Self::Forward => 1,
            Self::Backward => -1,
        }
    }
}

/// Closed set of inputs the reducer accepts.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Event {
    Rotate(Direction),
    Click,
    /// Opens the voice listening overlay.
    LongPress,
    Back,
    /// Periodic tick carrying the current time in Unix milliseconds. The only
    /// entry point for time-driven behavior.
    Tick(u64),
    /// Manual memo scroll while the kitchen left panel is focused.
    MemoDelta(Direction),
}

impl Event {
    pub fn rotate(delta: i64) -> Self {
        Self::Rotate(Direction::from_delta(delta))
    }

    pub fn memo(delta: i64) -> Self {
        Self::MemoDelta(Direction::from_delta(delta))
    }

    pub fn is_tick(&self) -> bool {
        matches!(self, Self::Tick(_))
    }

    pub fn label(&self) -> &'static str {
        match self {
            Self::Rotate(_) => "rotate",
            Self::Click => "click",
            Self::LongPress => "long-press",
            Self::Back => "back",
            Self::Tick(_) => "tick",
            Self::MemoDelta(_) => "memo",
        }
    }
}
