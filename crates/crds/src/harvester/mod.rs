//! Harvester resources (`harvesterhci.io/v1beta1`)

pub mod backup;
pub mod setting;
pub mod template;

pub use backup::*;
pub use setting::*;
pub use template::*;

/// API group shared by all Harvester resources
pub const HARVESTER_API_GROUP: &str = "harvesterhci.io";

/// API version of the Harvester resources used here
pub const HARVESTER_API_VERSION: &str = "v1beta1";
