use {serde::*, std::collections::*};

// Field names follow the API's JSON, which is PascalCase with upper-case "ID".

//
// Cluster
//

/// Kubernetes or OpenShift cluster.
#[derive(Clone, Debug, Default, Deserialize, PartialEq, Serialize)]
#[serde(default)]
pub struct Cluster {
    /// ID.
    #[serde(rename = "ID", skip_serializing_if = "String::is_empty")]
    pub id: String,

    /// Name.
    #[serde(rename = "Name")]
    pub name: String,

    /// Description.
    #[serde(rename = "Description", skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,

    /// Type ("local", "openshift", "eks", ...).
    #[serde(rename = "Type", skip_serializing_if = "Option::is_none")]
    pub kind: Option<String>,

    /// API server address.
    #[serde(rename = "Address")]
    pub address: String,

    /// API server port.
    #[serde(rename = "Port", skip_serializing_if = "Option::is_none")]
    pub port: Option<String>,

    /// Access token.
    #[serde(rename = "Token")]
    pub token: String,

    /// Token expiry date.
    #[serde(rename = "ExpiryDate", skip_serializing_if = "Option::is_none")]
    pub expiry_date: Option<String>,

    /// Creator user ID.
    #[serde(rename = "CreatorID", skip_serializing_if = "Option::is_none")]
    pub creator_id: Option<String>,

    /// IDs of the teamspaces that may use the cluster.
    #[serde(rename = "Teamspaces", deserialize_with = "nullable", skip_serializing_if = "Vec::is_empty")]
    pub teamspaces: Vec<String>,
}

//
// Teamspace
//

/// Team workspace.
#[derive(Clone, Debug, Default, Deserialize, PartialEq, Serialize)]
#[serde(default)]
pub struct Teamspace {
    /// ID.
    #[serde(rename = "ID", skip_serializing_if = "String::is_empty")]
    pub id: String,

    /// Name.
    #[serde(rename = "Name")]
    pub name: String,

    /// Description.
    #[serde(rename = "Description", skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,

    /// Creation time.
    #[serde(rename = "CreatedAt", skip_serializing_if = "Option::is_none")]
    pub created_at: Option<String>,

    /// Creator user ID.
    #[serde(rename = "CreatorID", skip_serializing_if = "String::is_empty")]
    pub creator_id: String,

    /// Members.
    #[serde(rename = "Members", deserialize_with = "nullable", skip_serializing_if = "Vec::is_empty")]
    pub members: Vec<Member>,

    /// IDs of the clusters shared with the teamspace.
    #[serde(rename = "Clusters", deserialize_with = "nullable", skip_serializing_if = "Vec::is_empty")]
    pub clusters: Vec<String>,
}

/// Teamspace member.
#[derive(Clone, Debug, Default, Deserialize, PartialEq, Serialize)]
#[serde(default)]
pub struct Member {
    /// User ID.
    #[serde(rename = "UserID")]
    pub user_id: String,

    /// User name.
    #[serde(rename = "Name")]
    pub name: String,

    /// User email.
    #[serde(rename = "Email")]
    pub email: String,

    /// Profile name.
    #[serde(rename = "ProfileName")]
    pub profile_name: String,

    /// Join time.
    #[serde(rename = "JoinDate", skip_serializing_if = "Option::is_none")]
    pub join_date: Option<String>,
}

/// Body for adding a member.
#[derive(Clone, Debug, Serialize)]
pub struct NewMember<'own> {
    /// User email.
    pub email: &'own str,

    /// Profile ID.
    pub profile: &'own str,
}

/// Body for changing a member's profile.
#[derive(Clone, Debug, Serialize)]
pub struct MemberProfile<'own> {
    /// Profile ID.
    pub profile: &'own str,
}

//
// Project
//

/// Project within a teamspace.
#[derive(Clone, Debug, Default, Deserialize, PartialEq, Serialize)]
#[serde(default)]
pub struct Project {
    /// ID.
    #[serde(rename = "ID", skip_serializing_if = "String::is_empty")]
    pub id: String,

    /// Name.
    #[serde(rename = "Name")]
    pub name: String,

    /// Description.
    #[serde(rename = "Description")]
    pub description: String,

    /// Creation time.
    #[serde(rename = "CreatedAt", skip_serializing_if = "Option::is_none")]
    pub created_at: Option<String>,

    /// Creator user ID.
    #[serde(rename = "CreatorID", skip_serializing_if = "String::is_empty")]
    pub creator_id: String,

    /// Teamspace ID.
    #[serde(rename = "TeamspaceID")]
    pub teamspace_id: String,

    /// Owner name.
    #[serde(rename = "Owner", skip_serializing_if = "Option::is_none")]
    pub owner: Option<String>,
}

//
// Environment
//

/// Deployment environment: a project on a cluster.
#[derive(Clone, Debug, Default, Deserialize, PartialEq, Serialize)]
#[serde(default)]
pub struct Environment {
    /// ID.
    #[serde(rename = "ID", skip_serializing_if = "String::is_empty")]
    pub id: String,

    /// Name.
    #[serde(rename = "Name")]
    pub name: String,

    /// Description.
    #[serde(rename = "Description")]
    pub description: String,

    /// Project ID.
    #[serde(rename = "ProjectID")]
    pub project_id: String,

    /// Cluster ID.
    #[serde(rename = "ClusterID")]
    pub cluster_id: String,
}

//
// Microservice
//

/// Deployed microservice.
#[derive(Clone, Debug, Default, Deserialize, PartialEq, Serialize)]
#[serde(default)]
pub struct Microservice {
    /// ID.
    #[serde(rename = "ID", skip_serializing_if = "String::is_empty")]
    pub id: String,

    /// Name.
    #[serde(rename = "Name")]
    pub name: String,

    /// Namespace ID.
    #[serde(rename = "namespace")]
    pub namespace_id: String,

    /// Replica count.
    #[serde(rename = "Replicas")]
    pub replicas: i32,

    /// Labels.
    #[serde(rename = "Labels", deserialize_with = "nullable")]
    pub labels: BTreeMap<String, String>,

    /// Selectors.
    #[serde(rename = "Selectors", deserialize_with = "nullable")]
    pub selectors: BTreeMap<String, String>,

    /// Deployment strategy.
    #[serde(rename = "Strategy")]
    pub strategy: String,

    /// Containers.
    #[serde(rename = "Containers", deserialize_with = "nullable")]
    pub containers: Vec<Container>,

    /// Conditions.
    #[serde(rename = "Conditions", deserialize_with = "nullable")]
    pub conditions: Vec<Condition>,

    /// Environment ID.
    #[serde(rename = "EnvironmentID")]
    pub environment_id: String,

    /// Creator user ID.
    #[serde(rename = "CreatorID")]
    pub creator_id: String,

    /// Deployment time.
    #[serde(rename = "DeployedAt", skip_serializing_if = "Option::is_none")]
    pub deployed_at: Option<String>,
}

/// Microservice container.
#[derive(Clone, Debug, Default, Deserialize, PartialEq, Serialize)]
#[serde(default)]
pub struct Container {
    /// ID.
    #[serde(rename = "ID")]
    pub id: String,

    /// Name.
    #[serde(rename = "Name")]
    pub name: String,

    /// Image.
    #[serde(rename = "Image")]
    pub image: String,

    /// Container ID.
    #[serde(rename = "ContainerID")]
    pub container_id: String,

    /// Port.
    #[serde(rename = "Port")]
    pub port: i32,
}

/// Microservice condition.
#[derive(Clone, Debug, Default, Deserialize, PartialEq, Serialize)]
#[serde(default)]
pub struct Condition {
    /// Type.
    #[serde(rename = "type")]
    pub kind: String,

    /// Message.
    pub message: String,

    /// Reason.
    pub reason: String,
}

/// Body for updating a microservice deployment.
#[derive(Clone, Debug, Default, Deserialize, PartialEq, Serialize)]
#[serde(default, rename_all = "camelCase")]
pub struct MicroserviceUpdate {
    /// Name.
    pub name: String,

    /// Namespace.
    pub namespace: String,

    /// Update strategy.
    pub strategy: String,

    /// Container to update.
    pub container: String,

    /// New image.
    pub image: String,

    /// Replica count.
    pub replicas: i32,

    /// Rolling update: pods that may be unavailable.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub max_unavailable: Option<String>,

    /// Rolling update: pods that may be scheduled above the replica count.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub max_surge: Option<String>,
}

//
// User
//

/// User account.
#[derive(Clone, Debug, Default, Deserialize, PartialEq, Serialize)]
#[serde(default)]
pub struct User {
    /// ID.
    #[serde(rename = "ID", skip_serializing_if = "String::is_empty")]
    pub id: String,

    /// Name.
    #[serde(rename = "Name")]
    pub name: String,

    /// Email.
    #[serde(rename = "Email")]
    pub email: String,

    /// Password (only ever sent).
    #[serde(rename = "Password", skip_serializing_if = "String::is_empty")]
    pub password: String,

    /// IDs of the teamspaces the user joined.
    #[serde(rename = "JoinedTeamspaceIDs", deserialize_with = "nullable", skip_serializing_if = "Vec::is_empty")]
    pub joined_teamspace_ids: Vec<String>,

    /// How the user signs in.
    #[serde(rename = "SignWith", skip_serializing_if = "String::is_empty")]
    pub sign_with: String,
}

//
// Notification
//

/// Notification addressed to the current user.
#[derive(Clone, Debug, Default, Deserialize, PartialEq, Serialize)]
#[serde(default)]
pub struct Notification {
    /// Sender user ID.
    #[serde(rename = "SenderID")]
    pub sender_id: String,

    /// Teamspace ID.
    #[serde(rename = "TeamspaceID")]
    pub teamspace_id: String,

    /// Content.
    #[serde(rename = "Content")]
    pub content: String,

    /// Creation time.
    #[serde(rename = "CreatedAt")]
    pub created_at: String,

    /// Whether it was read.
    #[serde(rename = "WasRead")]
    pub was_read: bool,
}

//
// Profile
//

/// Member profile: a named set of roles.
#[derive(Clone, Debug, Default, Deserialize, PartialEq, Serialize)]
#[serde(default)]
pub struct Profile {
    /// ID.
    #[serde(rename = "ID")]
    pub id: String,

    /// Name.
    #[serde(rename = "Name")]
    pub name: String,

    /// Roles.
    #[serde(rename = "Roles", deserialize_with = "nullable")]
    pub roles: Vec<String>,
}

//
// Envelopes
//

/// List of clusters.
#[derive(Clone, Debug, Default, Deserialize)]
#[serde(default)]
pub struct ClustersResponse {
    /// Clusters.
    #[serde(deserialize_with = "nullable")]
    pub clusters: Vec<Cluster>,
}

/// One cluster.
#[derive(Clone, Debug, Deserialize)]
pub struct ClusterResponse {
    /// Cluster.
    pub cluster: Cluster,
}

/// List of teamspaces.
#[derive(Clone, Debug, Default, Deserialize)]
#[serde(default)]
pub struct TeamspacesResponse {
    /// Teamspaces.
    #[serde(deserialize_with = "nullable")]
    pub teamspaces: Vec<Teamspace>,
}

/// One teamspace.
#[derive(Clone, Debug, Deserialize)]
pub struct TeamspaceResponse {
    /// Teamspace.
    pub teamspace: Teamspace,
}

/// A teamspace's projects.
#[derive(Clone, Debug, Deserialize)]
pub struct TeamspaceProjectsResponse {
    /// Teamspace.
    pub teamspace: Teamspace,

    /// Projects.
    #[serde(default, deserialize_with = "nullable")]
    pub projects: Vec<Project>,
}

/// List of projects.
#[derive(Clone, Debug, Default, Deserialize)]
#[serde(default)]
pub struct ProjectsResponse {
    /// Projects.
    #[serde(deserialize_with = "nullable")]
    pub projects: Vec<Project>,
}

/// One project.
#[derive(Clone, Debug, Deserialize)]
pub struct ProjectResponse {
    /// Project.
    pub project: Project,
}

/// List of environments.
#[derive(Clone, Debug, Default, Deserialize)]
#[serde(default)]
pub struct EnvironmentsResponse {
    /// Environments.
    #[serde(deserialize_with = "nullable")]
    pub environments: Vec<Environment>,
}

/// A project's environments.
#[derive(Clone, Debug, Deserialize)]
pub struct ProjectEnvironmentsResponse {
    /// Project.
    pub project: Project,

    /// Environments.
    #[serde(default, deserialize_with = "nullable")]
    pub environments: Vec<Environment>,
}

/// One environment.
#[derive(Clone, Debug, Deserialize)]
pub struct EnvironmentResponse {
    /// Environment.
    pub environment: Environment,
}

/// List of microservices.
#[derive(Clone, Debug, Default, Deserialize)]
#[serde(default)]
pub struct MicroservicesResponse {
    /// Microservices.
    #[serde(deserialize_with = "nullable")]
    pub microservices: Vec<Microservice>,
}

/// One microservice.
#[derive(Clone, Debug, Deserialize)]
pub struct MicroserviceResponse {
    /// Microservice.
    pub microservice: Microservice,
}

/// One user.
#[derive(Clone, Debug, Deserialize)]
pub struct UserResponse {
    /// User.
    pub user: User,
}

/// List of notifications.
#[derive(Clone, Debug, Default, Deserialize)]
#[serde(default)]
pub struct NotificationsResponse {
    /// Notifications.
    #[serde(deserialize_with = "nullable")]
    pub notifications: Vec<Notification>,
}

/// List of profiles.
#[derive(Clone, Debug, Default, Deserialize)]
#[serde(default)]
pub struct ProfilesResponse {
    /// Profiles.
    #[serde(deserialize_with = "nullable")]
    pub profiles: Vec<Profile>,
}

/// Namespace name.
#[derive(Clone, Debug, Deserialize)]
pub struct NamespaceResponse {
    /// Name.
    pub namespace: String,
}

/// Login result.
#[derive(Clone, Debug, Default, Deserialize)]
#[serde(default)]
pub struct LoginResponse {
    /// Message.
    pub message: Option<String>,

    /// Bearer token.
    pub token: String,
}

/// Acknowledgement of a mutation.
///
/// Mutation responses vary; only the message is common to them.
#[derive(Clone, Debug, Default, Deserialize)]
#[serde(default)]
pub struct Acknowledgement {
    /// Message.
    pub message: Option<String>,
}

// Null as default.
fn nullable<'de, DeserializerT, ValueT>(deserializer: DeserializerT) -> Result<ValueT, DeserializerT::Error>
where
    DeserializerT: Deserializer<'de>,
    ValueT: Default + Deserialize<'de>,
{
    Ok(Option::<ValueT>::deserialize(deserializer)?.unwrap_or_default())
}
