pub mod client;
pub mod data_service;
pub mod protocol;

pub use self::client::{DataServiceError, DataServiceHandle};
pub use self::data_service::{DataService, DataServiceOptions};
