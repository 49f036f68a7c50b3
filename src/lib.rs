//! Rapidly-exploring Random Trees over named-axis configuration spaces.
//!
//! Three planners share one growth step (sample, nearest node, fixed-length
//! projection, validity check):
//! - basic RRT ([`Planner::plan_basic`]),
//! - goal-biased best-of-n sampling ([`Planner::plan_multi`]),
//! - bidirectional RRT-connect ([`Planner::plan_connect`]).

pub mod error;
pub mod geometry;
pub mod rrt;

pub use error::{RrtError, RrtResult};
pub use geometry::{Point, Space};
pub use rrt::{plan_basic, plan_connect, plan_multi};
pub use rrt::{ConnectResult, Forest, NodeId, PlanResult, Planner, PlannerConfig, TreeId};
