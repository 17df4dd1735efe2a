// EnergyView resource endpoints
//
// Each module adds inherent methods to `EvClient` for one URL sub-path under
// `{endpoint}/{domain}/api/v1`. Bodies are reshaped here (wrapper keys
// stripped, timestamps parsed) so callers get typed values.

pub mod csv_import;
pub mod dataset;
pub mod nodes;
pub mod settings;
pub mod tags;
pub mod timeseries;
