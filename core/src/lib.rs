//! `hardlinkable-core`: the offline link planner.
//!
//! Consumes a stream of `(pathname, stat, xattr)` triples (the walker
//! contract, §6), groups files that are equal under a [`MatchingPolicy`],
//! and produces a [`planner::LinkPlan`] that consolidates each group onto
//! one inode via hard links — without ever touching the filesystem itself.
//! Execution is a separate, optional step driven through [`driver::LinkExecutor`].

pub mod digest;
pub mod driver;
pub mod engine;
pub mod error;
pub mod index;
pub mod linkmax;
pub mod oracle;
pub mod planner;
pub mod policy;
pub mod registry;
pub mod stat;
pub mod stats;
pub mod unionfind;
pub mod walker;

pub use digest::{Digest, DigestCache};
pub use driver::LinkExecutor;
pub use engine::{run_scan, run_scan_cancellable, CancelToken, ScanOutput};
pub use error::{ExecError, ScanError};
pub use linkmax::{LinkMaxTable, DEFAULT_LINK_MAX};
pub use planner::{LinkOp, LinkPlan, LinkPlanner};
pub use policy::{EquivalenceKey, MatchingPolicy};
pub use registry::{AdmitVerdict, InodeRecord, InodeRegistry};
pub use stat::{InodeId, StatSnapshot, XattrFingerprint};
pub use stats::Stats;
pub use walker::{WalkEntry, WalkSource};
