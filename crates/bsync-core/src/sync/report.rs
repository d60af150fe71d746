//! Pass reports

use serde::{Deserialize, Serialize};

/// Outcome of one sync pass
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct PassReport {
    /// Number of changes the diff produced
    pub changes: usize,
    /// Bridge actions that succeeded
    pub actions: Vec<String>,
    /// Bridge actions that failed; they are retried only if the path changes again
    pub errors: Vec<String>,
}

impl PassReport {
    /// True if the pass found nothing to do.
    pub fn is_idle(&self) -> bool {
        self.changes == 0
    }

    /// True if every action succeeded.
    pub fn is_clean(&self) -> bool {
        self.errors.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_report_is_idle_and_clean() {
        let report = PassReport::default();
        assert!(report.is_idle());
        assert!(report.is_clean());
    }
}
