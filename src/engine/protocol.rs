use crate::model::notice::Notice;
use crate::model::session::{GameMode, InteractionSnapshot};

pub enum EngineCommand {
    GenerateActivity,
    SetMode(GameMode),
    IncrementPlayers,
    DecrementPlayers,
    CopyToClipboard,
}

pub enum EngineResponse {
    Snapshot(InteractionSnapshot),
    /// State after a `GenerateActivity` command finished.
    Generated(InteractionSnapshot),
    Notice(Notice),
}
