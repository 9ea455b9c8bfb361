use serde::{Deserialize, Serialize};

use crate::gridlines::LineFilterParams;

/// Tunables for the binarization stage.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct PreprocessParams {
    /// Gaussian blur kernel size.
    pub blur_kernel: usize,
    /// Adaptive threshold block size.
    pub thresh_block: usize,
    /// Adaptive threshold offset, subtracted from the local mean.
    pub thresh_offset: i32,
    /// Structuring element size for the speckle opening and the
    /// stroke-reconnecting dilation.
    pub morph_kernel: usize,
}

impl Default for PreprocessParams {
    fn default() -> Self {
        Self {
            blur_kernel: 9,
            thresh_block: 11,
            thresh_offset: 2,
            morph_kernel: 2,
        }
    }
}

/// Configuration for the board extractor.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct BoardParams {
    /// Longest-side cap applied before any processing; 0 disables it.
    pub max_side: usize,
    /// Binarization tunables.
    pub preprocess: PreprocessParams,
    /// Grid line suppression tunables.
    pub lines: LineFilterParams,
}

impl Default for BoardParams {
    fn default() -> Self {
        Self {
            max_side: 800,
            preprocess: PreprocessParams::default(),
            lines: LineFilterParams::default(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn params_round_trip_through_json() {
        let params = BoardParams::default();
        let json = serde_json::to_string(&params).expect("serialize");
        let back: BoardParams = serde_json::from_str(&json).expect("deserialize");
        assert_eq!(back.max_side, 800);
        assert_eq!(back.preprocess.blur_kernel, params.preprocess.blur_kernel);
        assert_eq!(back.lines.vote_threshold, params.lines.vote_threshold);
    }
}
