use super::types::PositionFix;

/// Progress of one acquisition: attempts made so far and the best reading seen.
///
/// Values are advanced with [`AcquisitionSession::record`] and never mutated in place.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct AcquisitionSession {
    attempts: u32,
    best: Option<PositionFix>,
}

impl AcquisitionSession {
    pub fn new() -> Self {
        Self::default()
    }

    /// Counts one successful reading and keeps whichever fix is more accurate.
    /// The first reading is kept even without an accuracy value.
    pub fn record(self, fix: PositionFix) -> Self {
        let best = match self.best {
            Some(current) if !fix.is_more_accurate_than(&current) => current,
            _ => fix,
        };
        Self {
            attempts: self.attempts + 1,
            best: Some(best),
        }
    }

    pub fn attempts(&self) -> u32 {
        self.attempts
    }

    pub fn best(&self) -> Option<&PositionFix> {
        self.best.as_ref()
    }

    pub fn into_best(self) -> Option<PositionFix> {
        self.best
    }
}
