//! Model types for group-store

mod app_store;
mod device;
mod group;
mod id_types;
mod settings;

pub use app_store::{AppStore, STORE_VERSION};
pub use device::{AudioDevice, GroupDevice};
pub use group::{DeviceGroup, GroupUpdate, NewGroup};
pub use id_types::{DeviceId, GroupId};
pub use settings::AppSettings;
