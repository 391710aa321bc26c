use super::{super::error::*, client::*, models::*};

use {
    bytes::*,
    http::{request::*, response::*},
    std::result::Result,
    tower::*,
};

/// Environments resource.
pub const ENVIRONMENTS: &str = "/dashboard/environments";

impl<ServiceT> ApiClient<ServiceT>
where
    ServiceT: Service<Request<Bytes>, Response = Response<Bytes>, Error = PipelineError> + Clone,
{
    /// Create an environment.
    pub async fn create_environment(&self, environment: &Environment) -> Result<Acknowledgement, ApiError> {
        let acknowledgement = self.post(ENVIRONMENTS, environment).await?;
        self.invalidate(&[ENVIRONMENTS]);
        Ok(acknowledgement)
    }

    /// Update an environment.
    pub async fn update_environment(&self, environment: &Environment) -> Result<Acknowledgement, ApiError> {
        let acknowledgement = self.patch(&format!("{}/{}", ENVIRONMENTS, environment.id), environment).await?;
        self.invalidate(&[ENVIRONMENTS]);
        Ok(acknowledgement)
    }

    /// Delete an environment.
    pub async fn delete_environment(&self, id: &str) -> Result<Acknowledgement, ApiError> {
        let acknowledgement = self.delete(&format!("{}/{}", ENVIRONMENTS, id)).await?;
        self.invalidate(&[ENVIRONMENTS]);
        Ok(acknowledgement)
    }

    /// Environments of the current user's clusters.
    pub async fn environments_by_cluster(&self) -> Result<Vec<Environment>, ApiError> {
        let response: EnvironmentsResponse = self.get(&format!("{}/ByCluster", ENVIRONMENTS)).await?;
        Ok(response.environments)
    }

    /// Environments of a project.
    pub async fn project_environments(&self, project_id: &str) -> Result<Vec<Environment>, ApiError> {
        let response: ProjectEnvironmentsResponse =
            self.get(&format!("{}/projects/{}", ENVIRONMENTS, project_id)).await?;
        Ok(response.environments)
    }

    /// Get an environment.
    pub async fn environment(&self, id: &str) -> Result<Environment, ApiError> {
        let response: EnvironmentResponse = self.get(&format!("{}/{}", ENVIRONMENTS, id)).await?;
        Ok(response.environment)
    }

    /// Microservices deployed in an environment.
    pub async fn microservices(&self, environment_id: &str) -> Result<Vec<Microservice>, ApiError> {
        let response: MicroservicesResponse =
            self.get(&format!("{}/{}/microservices", ENVIRONMENTS, environment_id)).await?;
        Ok(response.microservices)
    }

    /// Get a microservice.
    pub async fn microservice(&self, environment_id: &str, microservice_id: &str) -> Result<Microservice, ApiError> {
        let response: MicroserviceResponse =
            self.get(&format!("{}/{}/microservices/{}", ENVIRONMENTS, environment_id, microservice_id)).await?;
        Ok(response.microservice)
    }

    /// Update a microservice deployment.
    pub async fn update_microservice(
        &self,
        environment_id: &str,
        microservice_id: &str,
        update: &MicroserviceUpdate,
    ) -> Result<Acknowledgement, ApiError> {
        let acknowledgement = self
            .patch(&format!("{}/{}/microservices/{}", ENVIRONMENTS, environment_id, microservice_id), update)
            .await?;
        self.invalidate(&[ENVIRONMENTS]);
        Ok(acknowledgement)
    }
}
