use super::error::RemoteError;
use super::types::*;

/// Capabilities of the remote face service, one method per operation.
///
/// `RekognitionClient` talks to AWS; tests script a fake.
pub trait FaceApi: Send + Sync {
    fn detect_faces(&self, request: &DetectFacesRequest) -> Result<DetectFacesResponse, RemoteError>;

    fn index_faces(&self, request: &IndexFacesRequest) -> Result<IndexFacesResponse, RemoteError>;

    fn associate_faces(
        &self,
        request: &AssociateFacesRequest,
    ) -> Result<AssociateFacesResponse, RemoteError>;

    fn disassociate_faces(
        &self,
        request: &DisassociateFacesRequest,
    ) -> Result<DisassociateFacesResponse, RemoteError>;

    fn delete_faces(&self, request: &DeleteFacesRequest) -> Result<DeleteFacesResponse, RemoteError>;

    fn create_collection(
        &self,
        request: &CreateCollectionRequest,
    ) -> Result<CreateCollectionResponse, RemoteError>;

    fn create_user(&self, request: &CreateUserRequest) -> Result<CreateUserResponse, RemoteError>;

    fn delete_user(&self, request: &DeleteUserRequest) -> Result<DeleteUserResponse, RemoteError>;

    fn list_users(&self, request: &ListUsersRequest) -> Result<ListUsersResponse, RemoteError>;

    fn list_faces(&self, request: &ListFacesRequest) -> Result<ListFacesResponse, RemoteError>;

    fn search_users_by_image(
        &self,
        request: &SearchUsersByImageRequest,
    ) -> Result<SearchUsersByImageResponse, RemoteError>;

    fn compare_faces(&self, request: &CompareFacesRequest) -> Result<CompareFacesResponse, RemoteError>;

    fn create_face_liveness_session(
        &self,
        request: &CreateFaceLivenessSessionRequest,
    ) -> Result<CreateFaceLivenessSessionResponse, RemoteError>;

    fn get_face_liveness_session_results(
        &self,
        request: &GetFaceLivenessSessionResultsRequest,
    ) -> Result<GetFaceLivenessSessionResultsResponse, RemoteError>;
}
