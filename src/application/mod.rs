// Application layer: the branch-and-bound search and its bookkeeping

pub mod branch_and_bound;
pub mod frontier;
pub mod incumbent;
pub mod parallel;
pub mod search;
pub mod subproblem;

pub use branch_and_bound::BranchAndBound;
pub use frontier::Frontier;
pub use incumbent::{Incumbent, IncumbentSolution};
pub use parallel::ParallelBranchAndBound;
pub use search::{NodeVerdict, StopHandle};
pub use subproblem::{NodeState, RelaxedSubproblem, SearchModel, Subproblem};
