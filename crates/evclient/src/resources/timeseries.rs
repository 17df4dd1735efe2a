// Timeseries endpoints
//
// Reads go out as query parameters, writes as form bodies. Multi-series
// writes embed the whole payload as one JSON-encoded form field.

use tracing::debug;

use crate::client::EvClient;
use crate::error::Error;
use crate::models::{Selection, StoredDataPoint, TimeseriesGroup, TimeseriesQuery};
use crate::params::Params;
use crate::response::ApiResponse;
use crate::timestamp::Timestamp;

const TIMESERIES_PATH: &str = "timeseries";

/// Query string for `GET timeseries`, in the order the API documents it.
fn query_params(query: &TimeseriesQuery) -> Result<Params, Error> {
    let params = match &query.nodes {
        Some(Selection::One(id)) => Params::new().set("node_id", id),
        Some(Selection::Many(ids)) => Params::new().json_list("node_ids", ids)?,
        None => Params::new(),
    };
    let params = match &query.tags {
        Some(Selection::One(tag)) => params.set("tag", tag),
        Some(Selection::Many(tags)) => params.json_list("tags", tags)?,
        None => params,
    };

    Ok(params
        .set_opt("start", query.start)
        .set_opt("end", query.end)
        .set_opt("resolution", query.resolution)
        .set_opt("aggregate", query.aggregate)
        .flag("epoch", query.epoch, "1"))
}

impl EvClient {
    /// Fetch timeseries matching `query`.
    ///
    /// `GET timeseries`, unwrapped from `{"timeseries": [...]}`. Each point's
    /// `ts` is decoded whether the server sent RFC 3339 text or, with
    /// `epoch` set, Unix seconds.
    pub async fn get_timeseries_data(
        &self,
        query: &TimeseriesQuery,
    ) -> Result<Vec<TimeseriesGroup>, Error> {
        debug!(?query, "fetching timeseries");
        let params = query_params(query)?;
        self.get(TIMESERIES_PATH, params)
            .await?
            .unwrap_list("timeseries")
    }

    /// Store a single data point.
    ///
    /// `POST timeseries` with form `node_id`, `tag`, `val`, `ts`. A `ts`
    /// without offset is taken in the domain's timezone. With `silent` the
    /// server only acknowledges and `None` is returned; otherwise the stored
    /// point is echoed back.
    pub async fn store_timeseries_data(
        &self,
        node_id: i64,
        tag: &str,
        value: f64,
        ts: impl Into<Timestamp>,
        silent: bool,
    ) -> Result<Option<StoredDataPoint>, Error> {
        let ts = ts.into();
        debug!(node_id, tag, value, %ts, silent, "storing data point");
        let params = Params::new()
            .set("node_id", node_id)
            .set("tag", tag)
            .set("val", value)
            .set("ts", ts)
            .flag("silent", silent, "true");

        let resp = self.post_form(TIMESERIES_PATH, params).await?;
        if silent || resp.is_empty() {
            return Ok(None);
        }
        resp.decode().map(Some)
    }

    /// Store data points across several node/tag series in one call.
    ///
    /// `POST timeseries` with form `timeseries=<json>`. `overwrite` sends
    /// `overwrite=replace_window`: for each series the server first deletes
    /// every point between the lowest and highest submitted `ts`, then
    /// inserts. `silent` behaves as in
    /// [`store_timeseries_data`](Self::store_timeseries_data).
    pub async fn store_multiple_timeseries_data(
        &self,
        groups: &[TimeseriesGroup],
        overwrite: bool,
        silent: bool,
    ) -> Result<Option<Vec<TimeseriesGroup>>, Error> {
        debug!(
            series = groups.len(),
            points = groups.iter().map(|g| g.data.len()).sum::<usize>(),
            overwrite,
            silent,
            "storing timeseries"
        );
        let params = Params::new()
            .set("timeseries", serde_json::to_string(groups)?)
            .flag("overwrite", overwrite, "replace_window")
            .flag("silent", silent, "true");

        let resp = self.post_form(TIMESERIES_PATH, params).await?;
        if silent {
            return Ok(None);
        }
        match resp {
            ApiResponse::Empty => Ok(None),
            other => other.unwrap_list("timeseries").map(Some),
        }
    }
}
