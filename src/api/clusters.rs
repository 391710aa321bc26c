use super::{super::error::*, client::*, models::*};

use {
    bytes::*,
    http::{request::*, response::*},
    std::result::Result,
    tower::*,
};

/// Clusters resource.
pub const CLUSTERS: &str = "/dashboard/clusters";

impl<ServiceT> ApiClient<ServiceT>
where
    ServiceT: Service<Request<Bytes>, Response = Response<Bytes>, Error = PipelineError> + Clone,
{
    /// Add a cluster.
    pub async fn add_cluster(&self, cluster: &Cluster) -> Result<Acknowledgement, ApiError> {
        let acknowledgement = self.post(CLUSTERS, cluster).await?;
        self.invalidate_clusters();
        Ok(acknowledgement)
    }

    /// Edit a cluster.
    pub async fn edit_cluster(&self, cluster: &Cluster) -> Result<Acknowledgement, ApiError> {
        let acknowledgement = self.patch(&format!("{}/{}", CLUSTERS, cluster.id), cluster).await?;
        self.invalidate_clusters();
        Ok(acknowledgement)
    }

    /// Delete a cluster.
    pub async fn delete_cluster(&self, id: &str) -> Result<Acknowledgement, ApiError> {
        let acknowledgement = self.delete(&format!("{}/{}", CLUSTERS, id)).await?;
        self.invalidate_clusters();
        Ok(acknowledgement)
    }

    /// Clusters created by the current user.
    pub async fn owned_clusters(&self) -> Result<Vec<Cluster>, ApiError> {
        let response: ClustersResponse = self.get(&format!("{}/owned", CLUSTERS)).await?;
        Ok(response.clusters)
    }

    /// Get a cluster.
    pub async fn cluster(&self, id: &str) -> Result<Cluster, ApiError> {
        let response: ClusterResponse = self.get(&format!("{}/{}", CLUSTERS, id)).await?;
        Ok(response.cluster)
    }

    // Teamspaces list their clusters and environments are listed by cluster.
    fn invalidate_clusters(&self) {
        self.invalidate(&[CLUSTERS, super::TEAMSPACES, super::ENVIRONMENTS]);
    }
}
