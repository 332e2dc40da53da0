//! Batch Assignment Planner.
//!
//! Turns a trigger selection (stocks or topics) and a KOL roster into the
//! ordered list of post tasks handed to the batch worker.
//!
//! # Usage
//!
//! ```ignore
//! use kol_insight::planner::{AssignmentPlanner, AssignmentStrategy, PlanRequest};
//!
//! let request = PlanRequest::stocks(session_id, codes, names, kols, AssignmentStrategy::Mixed);
//! let tasks = AssignmentPlanner::from_global().plan(&request)?;
//! ```

pub mod assignment;
pub mod strategy;

pub use assignment::AssignmentPlanner;
pub use strategy::{AssignmentStrategy, PlanRequest, TriggerSelection};
