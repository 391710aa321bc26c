use super::{super::error::*, client::*, models::*};

use {
    bytes::*,
    http::{request::*, response::*},
    std::result::Result,
    tower::*,
};

/// Projects resource.
pub const PROJECTS: &str = "/dashboard/projects";

impl<ServiceT> ApiClient<ServiceT>
where
    ServiceT: Service<Request<Bytes>, Response = Response<Bytes>, Error = PipelineError> + Clone,
{
    /// Create a project.
    pub async fn create_project(&self, project: &Project) -> Result<Acknowledgement, ApiError> {
        let acknowledgement = self.post(PROJECTS, project).await?;
        self.invalidate_projects();
        Ok(acknowledgement)
    }

    /// Update a project.
    pub async fn update_project(&self, project: &Project) -> Result<Acknowledgement, ApiError> {
        let acknowledgement = self.patch(&format!("{}/{}", PROJECTS, project.id), project).await?;
        self.invalidate_projects();
        Ok(acknowledgement)
    }

    /// Delete a project.
    pub async fn delete_project(&self, id: &str) -> Result<Acknowledgement, ApiError> {
        let acknowledgement = self.delete(&format!("{}/{}", PROJECTS, id)).await?;
        self.invalidate_projects();
        Ok(acknowledgement)
    }

    /// Projects created by the current user.
    pub async fn owned_projects(&self) -> Result<Vec<Project>, ApiError> {
        let response: ProjectsResponse = self.get(&format!("{}/owned", PROJECTS)).await?;
        Ok(response.projects)
    }

    /// Projects of all the teamspaces the current user is a member of.
    pub async fn joined_teamspace_projects(&self) -> Result<Vec<Project>, ApiError> {
        let response: ProjectsResponse = self.get(&format!("{}/joinedTeamspaces", PROJECTS)).await?;
        Ok(response.projects)
    }

    /// Get a project.
    pub async fn project(&self, id: &str) -> Result<Project, ApiError> {
        let response: ProjectResponse = self.get(&format!("{}/{}", PROJECTS, id)).await?;
        Ok(response.project)
    }

    // Teamspaces list their projects and environments are listed by project.
    fn invalidate_projects(&self) {
        self.invalidate(&[PROJECTS, super::TEAMSPACES, super::ENVIRONMENTS]);
    }
}
