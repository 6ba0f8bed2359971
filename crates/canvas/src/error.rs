use surface::SurfaceId;
use thiserror::Error;

pub type Result<T> = std::result::Result<T, Error>;

#[derive(Debug, Error)]
pub enum Error {
    /// The container id did not resolve to a surface.
    #[error("Element with id {0} not found")]
    ContainerNotFound(String),

    /// The container resolved to a text or comment node.
    #[error("surface {0} is not an element and cannot host a canvas")]
    NotAnElement(SurfaceId),

    #[error("malformed persisted position {text:?}")]
    MalformedPosition {
        text: String,
        #[source]
        source: serde_json::Error,
    },

    #[error("invalid canvas options")]
    Options(#[from] serde_json::Error),
}
