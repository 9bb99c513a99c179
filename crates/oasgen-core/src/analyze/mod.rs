pub mod reachability;

pub use reachability::{ReachableSet, reachable};
