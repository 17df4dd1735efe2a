// CSV import endpoints

use reqwest::multipart::{Form, Part};
use tracing::debug;
use uuid::Uuid;

use crate::client::EvClient;
use crate::error::Error;
use crate::models::CsvImportIntegration;
use crate::params::Params;
use crate::response::ApiResponse;

const CSV_MIME: &str = "text/csv";

impl EvClient {
    /// List the CSV import integrations configured in the domain.
    ///
    /// `GET csvimport`, unwrapped from `{"integrations": [...]}`
    pub async fn get_csv_imports(&self) -> Result<Vec<CsvImportIntegration>, Error> {
        debug!("listing csv import integrations");
        self.get("csvimport", Params::new())
            .await?
            .unwrap_list("integrations")
    }

    /// Upload a CSV file to an import integration.
    ///
    /// `POST csvimport/{uuid}` as `multipart/form-data` with a single `file`
    /// part. The import runs server side; whatever the server answers is
    /// returned unchanged (usually [`ApiResponse::Empty`]).
    pub async fn upload_csv_file(
        &self,
        import_uuid: &Uuid,
        file_name: &str,
        contents: impl Into<Vec<u8>>,
    ) -> Result<ApiResponse, Error> {
        let contents = contents.into();
        debug!(%import_uuid, file_name, size = contents.len(), "uploading csv file");

        let part = Part::bytes(contents)
            .file_name(file_name.to_owned())
            .mime_str(CSV_MIME)?;
        let form = Form::new().part("file", part);

        self.post_multipart(&format!("csvimport/{import_uuid}"), form)
            .await
    }
}
