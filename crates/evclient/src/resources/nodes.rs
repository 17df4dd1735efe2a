// Node endpoints

use tracing::debug;

use crate::client::EvClient;
use crate::error::Error;
use crate::models::Node;
use crate::params::Params;

impl EvClient {
    /// List every node visible to the API key.
    ///
    /// `GET nodes`, unwrapped from `{"nodes": [...]}`
    pub async fn get_nodes(&self) -> Result<Vec<Node>, Error> {
        debug!("listing nodes");
        self.get("nodes", Params::new()).await?.unwrap_list("nodes")
    }
}
