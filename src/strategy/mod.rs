pub mod hybrid;
pub mod ordering;
pub mod simulator;

pub use hybrid::{HybridComposer, HybridPartition};
pub use ordering::{OrderingPolicy, Ranked};
pub use simulator::{SimulationRun, StrategySimulator, WorkingDebt};
