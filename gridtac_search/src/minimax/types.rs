use gridtac::prelude::{Eval, SearchError};

#[derive(Debug, Clone, Copy)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct MinimaxConfig {
    /// Plies to look ahead. The floor is 1: score each candidate's
    /// resulting position statically.
    pub depth: u8,
    /// Upper bound on candidates examined at any single node; each of the
    /// two ordering lists keeps at most half of it.
    pub branch_factor: usize,
    /// Print a per-selection counter summary.
    pub debug: bool,
}

impl Default for MinimaxConfig {
    fn default() -> Self {
        Self {
            depth: 5,
            branch_factor: 20,
            debug: false,
        }
    }
}

impl MinimaxConfig {
    /// Misconfiguration is reported up front, never silently clamped.
    pub fn validate(&self) -> Result<(), SearchError> {
        if self.depth == 0 {
            return Err(SearchError::InvalidDepth(self.depth));
        }
        if self.branch_factor == 0 {
            return Err(SearchError::InvalidBranchFactor(self.branch_factor));
        }
        Ok(())
    }
}

/// Tightest known worst-case outcome for each side along the current line:
/// the best score the maximizer can already force (`max_worst`) and the
/// symmetric bound for the minimizer (`min_worst`).
#[derive(Debug, Clone, Copy)]
pub(crate) struct Bounds {
    pub max_worst: Eval,
    pub min_worst: Eval,
}

impl Bounds {
    pub const OPEN: Bounds = Bounds {
        max_worst: Eval::MIN,
        min_worst: Eval::MAX,
    };
}

#[cfg(test)]
mod test {
    use super::*;

    #[test]
    fn rejects_non_positive_settings() {
        let bad_depth = MinimaxConfig {
            depth: 0,
            ..Default::default()
        };
        assert_eq!(Err(SearchError::InvalidDepth(0)), bad_depth.validate());

        let bad_branch = MinimaxConfig {
            branch_factor: 0,
            ..Default::default()
        };
        assert_eq!(
            Err(SearchError::InvalidBranchFactor(0)),
            bad_branch.validate()
        );

        assert!(MinimaxConfig::default().validate().is_ok());
    }
}
