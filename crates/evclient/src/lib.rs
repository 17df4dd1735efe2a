// evclient: Async Rust client for the NODA EnergyView REST API
//
// One `EvClient` per domain. It resolves credentials through
// `evclient-config`, sends one request per call and hands back typed
// results or a status-specific `Error`.

pub mod client;
pub mod error;
pub mod models;
pub mod params;
pub mod resources;
pub mod response;
pub mod timestamp;
pub mod transport;

pub use client::EvClient;
pub use error::{ConfigError, Error};
pub use evclient_config::{ClientArgs, ClientConfig};
pub use models::{
    Aggregate, CsvImportIntegration, DataPoint, Dataset, DatasetFormat, DatasetUpdate, Device,
    NewDataset, Node, Resolution, Selection, SettingsType, StoredDataPoint, Tag, TimeseriesGroup,
    TimeseriesQuery,
};
pub use response::ApiResponse;
pub use timestamp::Timestamp;
pub use transport::TransportConfig;
