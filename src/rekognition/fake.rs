//! Scripted `FaceApi` for service tests.

use serde::Serialize;
use std::collections::VecDeque;
use std::sync::Mutex;

use super::api::FaceApi;
use super::error::RemoteError;
use super::types::*;

type Script<T> = Mutex<VecDeque<Result<T, RemoteError>>>;

#[derive(Default)]
pub struct FakeFaceApi {
    calls: Mutex<Vec<(&'static str, serde_json::Value)>>,
    pub detect_faces: Script<DetectFacesResponse>,
    pub index_faces: Script<IndexFacesResponse>,
    pub associate_faces: Script<AssociateFacesResponse>,
    pub disassociate_faces: Script<DisassociateFacesResponse>,
    pub delete_faces: Script<DeleteFacesResponse>,
    pub create_collection: Script<CreateCollectionResponse>,
    pub create_user: Script<CreateUserResponse>,
    pub delete_user: Script<DeleteUserResponse>,
    pub list_users: Script<ListUsersResponse>,
    pub list_faces: Script<ListFacesResponse>,
    pub search_users_by_image: Script<SearchUsersByImageResponse>,
    pub compare_faces: Script<CompareFacesResponse>,
    pub create_face_liveness_session: Script<CreateFaceLivenessSessionResponse>,
    pub get_face_liveness_session_results: Script<GetFaceLivenessSessionResultsResponse>,
}

/// Queue a response for the next call to an operation.
pub fn push<T>(script: &Script<T>, response: Result<T, RemoteError>) {
    script.lock().unwrap().push_back(response);
}

pub fn service_error(operation: &str, code: &str) -> RemoteError {
    RemoteError::Service {
        operation: operation.to_string(),
        status: 400,
        code: code.to_string(),
        message: "scripted failure".to_string(),
    }
}

impl FakeFaceApi {
    pub fn new() -> Self {
        Self::default()
    }

    /// Operation names in call order.
    pub fn operations(&self) -> Vec<&'static str> {
        self.calls.lock().unwrap().iter().map(|(op, _)| *op).collect()
    }

    /// Serialized request of the n-th call to `operation`.
    pub fn request(&self, operation: &str, n: usize) -> serde_json::Value {
        self.calls
            .lock()
            .unwrap()
            .iter()
            .filter(|(op, _)| *op == operation)
            .nth(n)
            .map(|(_, body)| body.clone())
            .unwrap_or_else(|| panic!("no call #{} to {}", n, operation))
    }

    fn answer<Req: Serialize, T>(
        &self,
        operation: &'static str,
        request: &Req,
        script: &Script<T>,
    ) -> Result<T, RemoteError> {
        let body = serde_json::to_value(request).unwrap();
        self.calls.lock().unwrap().push((operation, body));
        script
            .lock()
            .unwrap()
            .pop_front()
            .unwrap_or_else(|| Err(service_error(operation, "UnscriptedCall")))
    }
}

impl FaceApi for FakeFaceApi {
    fn detect_faces(&self, request: &DetectFacesRequest) -> Result<DetectFacesResponse, RemoteError> {
        self.answer("DetectFaces", request, &self.detect_faces)
    }

    fn index_faces(&self, request: &IndexFacesRequest) -> Result<IndexFacesResponse, RemoteError> {
        self.answer("IndexFaces", request, &self.index_faces)
    }

    fn associate_faces(
        &self,
        request: &AssociateFacesRequest,
    ) -> Result<AssociateFacesResponse, RemoteError> {
        self.answer("AssociateFaces", request, &self.associate_faces)
    }

    fn disassociate_faces(
        &self,
        request: &DisassociateFacesRequest,
    ) -> Result<DisassociateFacesResponse, RemoteError> {
        self.answer("DisassociateFaces", request, &self.disassociate_faces)
    }

    fn delete_faces(&self, request: &DeleteFacesRequest) -> Result<DeleteFacesResponse, RemoteError> {
        self.answer("DeleteFaces", request, &self.delete_faces)
    }

    fn create_collection(
        &self,
        request: &CreateCollectionRequest,
    ) -> Result<CreateCollectionResponse, RemoteError> {
        self.answer("CreateCollection", request, &self.create_collection)
    }

    fn create_user(&self, request: &CreateUserRequest) -> Result<CreateUserResponse, RemoteError> {
        self.answer("CreateUser", request, &self.create_user)
    }

    fn delete_user(&self, request: &DeleteUserRequest) -> Result<DeleteUserResponse, RemoteError> {
        self.answer("DeleteUser", request, &self.delete_user)
    }

    fn list_users(&self, request: &ListUsersRequest) -> Result<ListUsersResponse, RemoteError> {
        self.answer("ListUsers", request, &self.list_users)
    }

    fn list_faces(&self, request: &ListFacesRequest) -> Result<ListFacesResponse, RemoteError> {
        self.answer("ListFaces", request, &self.list_faces)
    }

    fn search_users_by_image(
        &self,
        request: &SearchUsersByImageRequest,
    ) -> Result<SearchUsersByImageResponse, RemoteError> {
        self.answer("SearchUsersByImage", request, &self.search_users_by_image)
    }

    fn compare_faces(&self, request: &CompareFacesRequest) -> Result<CompareFacesResponse, RemoteError> {
        self.answer("CompareFaces", request, &self.compare_faces)
    }

    fn create_face_liveness_session(
        &self,
        request: &CreateFaceLivenessSessionRequest,
    ) -> Result<CreateFaceLivenessSessionResponse, RemoteError> {
        self.answer(
            "CreateFaceLivenessSession",
            request,
            &self.create_face_liveness_session,
        )
    }

    fn get_face_liveness_session_results(
        &self,
        request: &GetFaceLivenessSessionResultsRequest,
    ) -> Result<GetFaceLivenessSessionResultsResponse, RemoteError> {
        self.answer(
            "GetFaceLivenessSessionResults",
            request,
            &self.get_face_liveness_session_results,
        )
    }
}
