use thiserror::Error;

use mog_protocol::Fault;
use mog_registry::RegistryError;

#[derive(Debug, Error)]
pub enum ServerError {
    #[error(transparent)]
    Registry(#[from] RegistryError),

    #[error("handler directory error: {0}")]
    Handler(#[from] mog_handlers::HandlerError),

    #[error("protocol error: {0}")]
    Protocol(#[from] mog_protocol::ProtocolError),

    #[error("invalid value: {0}")]
    Type(#[from] mog_types::TypeError),

    #[error("configuration error: {0}")]
    Config(String),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("internal error: {0}")]
    Internal(String),
}

impl ServerError {
    /// Map onto the fault taxonomy clients see.
    pub fn to_fault(&self) -> Fault {
        match self {
            Self::Registry(RegistryError::HandlerNotFound(handler_id)) => {
                Fault::HandlerNotFound { handler_id: *handler_id }
            }
            Self::Registry(RegistryError::MediaObjectNotFound(id)) => {
                Fault::MediaObjectNotFound { id: *id }
            }
            Self::Registry(RegistryError::NoParent(id)) => Fault::NoParent { id: *id },
            other => Fault::MediaServer { message: other.to_string() },
        }
    }
}

pub type ServerResult<T> = Result<T, ServerError>;
