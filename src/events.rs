use sparselife::Coord;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Event {
    EngineEvent(EngineEvent),
    AppEvent(AppEvent),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EngineEvent {
    /// Advance the world state by `n`
    Advance(u64),

    /// Stop or resume stepping on every tick
    TogglePause,

    /// Go back to the seed pattern, generation 0
    Reset,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AppEvent {
    CameraEvent(CameraEvent),

    /// The terminal changed size
    Resize { cols: u16, rows: u16 },

    /// Exit the application
    Exit,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CameraEvent {
    Move { dx: Coord, dy: Coord },

    /// Center the view on the living cells
    Recenter,
}
