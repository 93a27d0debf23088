//! Sample prediction in the lossless process (ITU-T T.81, Table H.1).

use crate::error::{FormatError, Result, bail};

/// A predictor selected by the scan header.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) struct Predictor(u8);

impl Predictor {
    pub(crate) fn new(selection: u8) -> Result<Self> {
        if !(1..=7).contains(&selection) {
            bail!(FormatError::InvalidPredictor);
        }

        Ok(Self(selection))
    }

    /// Predict a sample from its left (`ra`), upper (`rb`) and upper-left
    /// (`rc`) neighbors.
    #[inline]
    pub(crate) fn predict(self, ra: i32, rb: i32, rc: i32) -> i32 {
        match self.0 {
            1 => ra,
            2 => rb,
            3 => rc,
            4 => ra + rb - rc,
            5 => ra + ((rb - rc) >> 1),
            6 => rb + ((ra - rc) >> 1),
            _ => (ra + rb) >> 1,
        }
    }
}
