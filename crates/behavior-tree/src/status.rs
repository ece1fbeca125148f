//! Status returned by behavior nodes.

/// Outcome of ticking a node.
///
/// Every node completes within the tick that evaluates it; a turn-structured
/// game has no use for a Running state.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Status {
    /// Condition held, or the action took effect.
    Success,
    /// Condition did not hold, or the action could not be carried out.
    Failure,
}

impl Status {
    /// Maps a boolean outcome onto a status.
    #[inline]
    pub fn from_bool(ok: bool) -> Self {
        if ok { Status::Success } else { Status::Failure }
    }

    #[inline]
    pub fn is_success(self) -> bool {
        matches!(self, Status::Success)
    }

    #[inline]
    pub fn is_failure(self) -> bool {
        matches!(self, Status::Failure)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn from_bool_maps_both_ways() {
        assert_eq!(Status::from_bool(true), Status::Success);
        assert_eq!(Status::from_bool(false), Status::Failure);
        assert!(Status::Success.is_success());
        assert!(Status::Failure.is_failure());
    }
}
