//! Error types for scene construction, listeners, and path parsing.

use thiserror::Error;

/// Errors surfaced by scene-graph operations that indicate programmer error.
///
/// Operations racing with destruction (picking, bbox queries, drawing,
/// removing a non-child, destroying twice) are no-ops and never produce one
/// of these.
#[derive(Debug, Error)]
pub enum SceneError {
    #[error("no shape capability registered for type '{0}'")]
    MissingCapability(String),

    #[error("invalid event listener: {0}")]
    InvalidListener(String),

    #[error("cannot attach to a destroyed node")]
    DestroyedParent,

    #[error("node is a shape and cannot hold children")]
    NotAContainer,

    #[error("cannot attach a node to itself or one of its descendants")]
    Cycle,

    #[error("the canvas root cannot be moved or removed")]
    CanvasRoot,

    #[error("surface error: {0}")]
    Surface(#[from] cairo::Error),

    #[error("failed to write surface: {0}")]
    Export(String),

    #[error(transparent)]
    Path(#[from] PathError),
}

/// Errors produced while parsing SVG-style path data.
#[derive(Debug, Error, PartialEq)]
pub enum PathError {
    #[error("unexpected character '{found}' at offset {offset}")]
    UnexpectedChar { found: char, offset: usize },

    #[error("command '{command}' expects {expected} parameters, found {found}")]
    MissingParams {
        command: char,
        expected: usize,
        found: usize,
    },

    #[error("path must start with a moveto command")]
    MissingMoveTo,
}
