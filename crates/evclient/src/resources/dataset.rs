// Dataset endpoints
//
// Datasets are named blobs (CSV, YAML, JSON, ...) optionally bound to a
// node. Content is sent base64-encoded and read back raw through
// `dataset/{uuid}/raw`, where the response content type follows the
// dataset's format.

use tracing::debug;
use uuid::Uuid;

use crate::client::EvClient;
use crate::error::Error;
use crate::models::{Dataset, DatasetUpdate, NewDataset};
use crate::params::{Params, json_body};
use crate::response::ApiResponse;

const DATASET_PATH: &str = "dataset";

fn dataset_path(uuid: &Uuid) -> String {
    format!("{DATASET_PATH}/{uuid}")
}

impl EvClient {
    /// List datasets, one page at a time.
    ///
    /// `GET dataset?offset=..&limit=..`. `offset` starts at 0 and `limit`
    /// is capped at 100 by the server; unset values are not sent.
    pub async fn get_datasets(
        &self,
        offset: Option<u32>,
        limit: Option<u32>,
    ) -> Result<Vec<Dataset>, Error> {
        debug!(?offset, ?limit, "listing datasets");
        let params = Params::new()
            .set_opt("offset", offset)
            .set_opt("limit", limit);
        match self.get(DATASET_PATH, params).await? {
            ApiResponse::Empty => Ok(Vec::new()),
            other => other.decode(),
        }
    }

    /// Create a dataset.
    ///
    /// `POST dataset` with a JSON body; unset optional fields are left out.
    pub async fn create_dataset(&self, dataset: &NewDataset) -> Result<Dataset, Error> {
        debug!(name = dataset.name.as_str(), format = %dataset.format, "creating dataset");
        let body = json_body(dataset)?;
        self.post_json(DATASET_PATH, &body).await?.decode()
    }

    /// `GET dataset/{uuid}`
    pub async fn get_dataset(&self, uuid: &Uuid) -> Result<Dataset, Error> {
        debug!(%uuid, "fetching dataset");
        self.get(&dataset_path(uuid), Params::new()).await?.decode()
    }

    /// Fetch the decoded content of a dataset.
    ///
    /// `GET dataset/{uuid}/raw`. JSON and YAML datasets come back
    /// [`Parsed`](ApiResponse::Parsed); everything else (CSV, INI, XML, ...)
    /// comes back [`Raw`](ApiResponse::Raw).
    pub async fn get_dataset_content(&self, uuid: &Uuid) -> Result<ApiResponse, Error> {
        debug!(%uuid, "fetching dataset content");
        self.get(&format!("{}/raw", dataset_path(uuid)), Params::new())
            .await
    }

    /// Update a dataset; only the fields set in `update` are sent.
    ///
    /// `PUT dataset/{uuid}`
    pub async fn update_dataset(&self, uuid: &Uuid, update: &DatasetUpdate) -> Result<(), Error> {
        debug!(%uuid, "updating dataset");
        let body = json_body(update)?;
        self.put_json(&dataset_path(uuid), &body).await?;
        Ok(())
    }

    /// `DELETE dataset/{uuid}`
    pub async fn delete_dataset(&self, uuid: &Uuid) -> Result<(), Error> {
        debug!(%uuid, "deleting dataset");
        self.delete(&dataset_path(uuid)).await?;
        Ok(())
    }
}
