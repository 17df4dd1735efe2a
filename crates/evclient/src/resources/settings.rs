// Settings / metadata endpoints
//
// Settings are a free-form tree per resource. Paths use `.` as separator
// (`coco.default.hello`). Results stay as `serde_json::Value` because their
// shape depends entirely on what was stored.

use serde_json::Value;
use tracing::debug;

use crate::client::EvClient;
use crate::error::Error;
use crate::models::SettingsType;
use crate::params::Params;
use crate::response::ApiResponse;

fn settings_path(settings_type: SettingsType, settings_id: i64) -> String {
    format!("settings/{settings_type}/{settings_id}")
}

fn into_settings_value(resp: ApiResponse) -> Result<Value, Error> {
    match resp {
        ApiResponse::Empty => Ok(Value::Null),
        other => other.decode(),
    }
}

impl EvClient {
    /// Fetch the settings tree of a resource.
    ///
    /// `GET settings/{type}/{id}?path=..&extract=1|0`
    ///
    /// With `extract == false` the result keeps the full nesting down to
    /// `path` (`{"coco": {"default": {...}}}`); with `extract == true` only
    /// the subtree (or scalar) at `path` is returned.
    pub async fn get_settings(
        &self,
        settings_type: SettingsType,
        settings_id: i64,
        path: Option<&str>,
        extract: bool,
    ) -> Result<Value, Error> {
        debug!(%settings_type, settings_id, ?path, extract, "fetching settings");
        let params = Params::new()
            .set_opt("path", path)
            .toggle("extract", extract);
        let resp = self
            .get(&settings_path(settings_type, settings_id), params)
            .await?;
        into_settings_value(resp)
    }

    /// Store one value at `path`.
    ///
    /// `PUT settings/{type}/{id}` with form `path`, `value` and `force=1`
    /// when `force` is set. Without `force` the server refuses to change
    /// the type of an existing value. Returns the echoed `{"value": ..}`.
    pub async fn store_settings(
        &self,
        settings_type: SettingsType,
        settings_id: i64,
        path: &str,
        value: &str,
        force: bool,
    ) -> Result<Value, Error> {
        debug!(%settings_type, settings_id, path, value, force, "storing setting");
        let params = Params::new()
            .set("path", path)
            .set("value", value)
            .flag("force", force, "1");
        let resp = self
            .put_form(&settings_path(settings_type, settings_id), params)
            .await?;
        into_settings_value(resp)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn path_uses_lowercase_type() {
        assert_eq!(settings_path(SettingsType::Node, 1), "settings/node/1");
        assert_eq!(settings_path(SettingsType::Netmgr, 42), "settings/netmgr/42");
    }
}
