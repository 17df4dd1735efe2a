// Tag endpoints
//
// The server calls tags "sensors" in its response wrapper.

use tracing::debug;

use crate::client::EvClient;
use crate::error::Error;
use crate::models::Tag;
use crate::params::Params;

impl EvClient {
    /// List every tag declared in the domain.
    ///
    /// `GET tags`, unwrapped from `{"sensors": [...]}`
    pub async fn get_tags(&self) -> Result<Vec<Tag>, Error> {
        debug!("listing tags");
        self.get("tags", Params::new()).await?.unwrap_list("sensors")
    }
}
