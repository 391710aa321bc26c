use super::{super::error::*, client::*, models::*};

use {
    bytes::*,
    http::{request::*, response::*},
    std::result::Result,
    tower::*,
};

/// Teamspaces resource.
pub const TEAMSPACES: &str = "/dashboard/teamspaces";

impl<ServiceT> ApiClient<ServiceT>
where
    ServiceT: Service<Request<Bytes>, Response = Response<Bytes>, Error = PipelineError> + Clone,
{
    /// Create a teamspace.
    pub async fn create_teamspace(&self, teamspace: &Teamspace) -> Result<Acknowledgement, ApiError> {
        let acknowledgement = self.post(TEAMSPACES, teamspace).await?;
        self.invalidate(&[TEAMSPACES]);
        Ok(acknowledgement)
    }

    /// Teamspaces created by the current user.
    pub async fn owned_teamspaces(&self) -> Result<Vec<Teamspace>, ApiError> {
        let response: TeamspacesResponse = self.get(&format!("{}/owned", TEAMSPACES)).await?;
        Ok(response.teamspaces)
    }

    /// Teamspaces the current user is a member of.
    pub async fn joined_teamspaces(&self) -> Result<Vec<Teamspace>, ApiError> {
        let response: TeamspacesResponse = self.get(&format!("{}/joined", TEAMSPACES)).await?;
        Ok(response.teamspaces)
    }

    /// Get a teamspace, with its members.
    pub async fn teamspace(&self, id: &str) -> Result<Teamspace, ApiError> {
        let response: TeamspaceResponse = self.get(&format!("{}/{}", TEAMSPACES, id)).await?;
        Ok(response.teamspace)
    }

    /// Add a member to a teamspace.
    pub async fn add_member(&self, teamspace_id: &str, email: &str, profile: &str) -> Result<Acknowledgement, ApiError> {
        let acknowledgement =
            self.patch(&format!("{}/{}/members", TEAMSPACES, teamspace_id), &NewMember { email, profile }).await?;
        self.invalidate_membership();
        Ok(acknowledgement)
    }

    /// Change a member's profile.
    pub async fn update_member(
        &self,
        teamspace_id: &str,
        member_id: &str,
        profile: &str,
    ) -> Result<Acknowledgement, ApiError> {
        let acknowledgement = self
            .patch(&format!("{}/{}/members/{}", TEAMSPACES, teamspace_id, member_id), &MemberProfile { profile })
            .await?;
        self.invalidate_membership();
        Ok(acknowledgement)
    }

    /// Remove a member from a teamspace.
    pub async fn remove_member(&self, teamspace_id: &str, member_id: &str) -> Result<Acknowledgement, ApiError> {
        let acknowledgement = self.delete(&format!("{}/{}/members/{}", TEAMSPACES, teamspace_id, member_id)).await?;
        self.invalidate_membership();
        Ok(acknowledgement)
    }

    /// Projects of a teamspace.
    pub async fn teamspace_projects(&self, teamspace_id: &str) -> Result<Vec<Project>, ApiError> {
        let response: TeamspaceProjectsResponse = self.get(&format!("{}/{}/projects", TEAMSPACES, teamspace_id)).await?;
        Ok(response.projects)
    }

    /// Clusters shared with a teamspace.
    pub async fn teamspace_clusters(&self, teamspace_id: &str) -> Result<Vec<Cluster>, ApiError> {
        let response: ClustersResponse = self.get(&format!("{}/{}/clusters", TEAMSPACES, teamspace_id)).await?;
        Ok(response.clusters)
    }

    // Membership changes what members can see and notifies them.
    fn invalidate_membership(&self) {
        self.invalidate(&[TEAMSPACES, super::PROJECTS, super::USERS]);
    }
}
