//! Device tree and view model for hexanode.
//!
//! - **[`DeviceTree`]**: the root model. Holds every known [`Device`] keyed
//!   by address and the registry of user-defined [`View`]s. Views are created,
//!   updated and removed here; saving is a separate, explicit step
//!   ([`DeviceTree::save`]) so callers can batch or defer persistence.
//!
//! - **Candidate selection** ([`DeviceTree::candidates`],
//!   [`DeviceTree::edit_view`]): per-device lists of the endpoints a view may
//!   include. Infrastructure endpoints are left out and the rest are ordered
//!   by descending eid.
//!
//! - **Persistence** ([`persist`]): views as one JSON object keyed by view id.
//!   A missing state file, an unreadable one and a malformed one are distinct
//!   [`CoreError`] variants.
//!
//! - **Device dumps** ([`discovery`]): import of the JSON device descriptions
//!   produced by discovery tooling.
//!
//! - **[`SharedDeviceTree`]**: async lock around one tree for hosts that
//!   serve concurrent callers.

pub mod candidates;
pub mod discovery;
pub mod error;
pub mod model;
pub mod persist;
pub mod shared;
pub mod tree;

// ── Primary re-exports ──────────────────────────────────────────────
pub use candidates::{Candidate, ViewEditor};
pub use error::CoreError;
pub use model::{Device, DeviceSelection, Endpoint, EndpointFunction, View, ViewId};
pub use shared::SharedDeviceTree;
pub use tree::DeviceTree;
