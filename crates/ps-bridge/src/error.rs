use thiserror::Error;

use ps_engine::EngineError;

#[derive(Debug, Error)]
pub enum BridgeError {
    #[error("engine error: {0}")]
    Engine(#[from] EngineError),

    #[error("failed to spawn step worker: {0}")]
    Spawn(#[source] std::io::Error),

    #[error("step worker panicked outside a step")]
    WorkerPanicked,

    #[error("engine has no crossing to assign as exit")]
    NoExit,

    #[error("no exit crossing is reachable from the position of agent {0:?}")]
    Unreachable(String),
}

pub type BridgeResult<T> = Result<T, BridgeError>;
