// SPDX-License-Identifier: MIT
// SPDX-FileCopyrightText: 2026 ® John Hauger Mitander <john@oxidity.com>

pub mod client;
pub mod orchestrator;
pub mod quote;
pub mod registry;
pub mod snapshot;
pub mod sync;

pub use client::AmmClient;
pub use orchestrator::TransactionOrchestrator;
pub use registry::{PoolRegistry, PoolScan};
pub use snapshot::SnapshotStore;
pub use sync::{BalanceSynchronizer, RefreshScope};
