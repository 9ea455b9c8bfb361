/// Errors returned by the board extractor.
#[derive(thiserror::Error, Debug)]
pub enum ExtractError {
    /// No foreground contour exists; the grid could not be located at all.
    #[error("board not found: no foreground contour")]
    BoardNotFound,
    /// The corner geometry collapsed: the canonical side resolved to a
    /// non-positive length, or the four corners admit no projective
    /// transform.
    #[error("invalid board geometry (canonical side {side})")]
    InvalidGeometry { side: i64 },
}
