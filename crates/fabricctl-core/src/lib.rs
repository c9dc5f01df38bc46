//! Declarative fabric model and reconciler between the YAML tree and `fabricctl-api`.
//!
//! - **[`ConfigLoader`]**: reads `network_configs/` and `resources/`, merges
//!   corp defaults and field mappings, and yields the strongly-typed records
//!   in [`model`]. Files are parsed once and cached by path.
//!
//! - **[`payload`]**: pure builders from canonical records to the exact
//!   request bodies the controller accepts.
//!
//! - **[`reconcile`]**: generic desired-vs-observed diff applied in
//!   delete, update, create order with per-identity failure isolation.
//!
//! - **[`derive`]**: infers VRF and network attachments from the interface
//!   policies declared on each switch.
//!
//! - **Managers** ([`manager`]): one per entity kind, generic over the
//!   [`Controller`] seam so tests run against a recording fake.
//!
//! - **[`BuildPipeline`]**: the end-to-end bring-up, which stops at
//!   `pending.txt` and never deploys.

pub mod controller;
pub mod derive;
pub mod error;
pub mod loader;
pub mod manager;
pub mod model;
pub mod payload;
pub mod pending;
pub mod pipeline;
pub mod range;
pub mod reconcile;

// ── Primary re-exports ──────────────────────────────────────────────
pub use controller::Controller;
pub use error::CoreError;
pub use loader::{ConfigLoader, ProjectLayout};
pub use manager::{
    FabricManager, FabricStage, InterfaceManager, InterfaceUpdate, NetworkManager, PolicyManager,
    SwitchManager, VpcManager, VrfManager,
};
pub use model::{EntityKind, FabricType, SwitchRole};
pub use pipeline::{BuildOptions, BuildPipeline, BuildStage, BuildSummary};
pub use reconcile::{Phase, SyncPlan, SyncReport};
