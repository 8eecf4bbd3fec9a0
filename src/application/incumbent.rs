// Best integral solution found so far
// The only state written by more than one worker; improvements are a single check-and-set

use parking_lot::Mutex;

/// An integral assignment and its objective value (maximization sense).
#[derive(Debug, Clone, PartialEq)]
pub struct IncumbentSolution {
    pub value: f64,
    pub values: Vec<f64>,
    pub node_id: u64,
}

#[derive(Debug, Default)]
pub struct Incumbent {
    best: Mutex<Option<IncumbentSolution>>,
}

impl Incumbent {
    pub fn new() -> Self {
        Self::default()
    }

    /// Current value, negative infinity before the first integral solution.
    pub fn value(&self) -> f64 {
        self.best
            .lock()
            .as_ref()
            .map_or(f64::NEG_INFINITY, |best| best.value)
    }

    /// Whether a subtree bounded by `bound` can still improve by more than `tolerance`.
    pub fn can_prune(&self, bound: f64, tolerance: f64) -> bool {
        bound <= self.value() + tolerance
    }

    /// Replace the incumbent if `candidate` is better by more than `tolerance`.
    pub fn try_improve(&self, candidate: IncumbentSolution, tolerance: f64) -> bool {
        let mut best = self.best.lock();
        let current = best.as_ref().map_or(f64::NEG_INFINITY, |b| b.value);
        if candidate.value > current + tolerance {
            *best = Some(candidate);
            true
        } else {
            false
        }
    }

    pub fn snapshot(&self) -> Option<IncumbentSolution> {
        self.best.lock().clone()
    }
}
