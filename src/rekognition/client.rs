use anyhow::{Context, Result};
use aws_config::meta::region::RegionProviderChain;
use aws_config::profile::profile_file::{ProfileFileKind, ProfileFiles};
use aws_config::timeout::TimeoutConfig;
use aws_config::{BehaviorVersion, SdkConfig};
use aws_sdk_rekognition::config::{Credentials, Region};
use aws_sdk_rekognition::types as sdk;
use std::future::Future;
use std::time::Duration;
use tokio::runtime::Runtime;

use super::api::FaceApi;
use super::convert;
use super::error::RemoteError;
use super::types::*;
use crate::config::AwsConfig;

const DEFAULT_REGION: &str = "us-east-1";

/// Rekognition through the AWS SDK.
///
/// The SDK is async; calls are driven to completion on a private
/// current-thread runtime so the services stay synchronous.
pub struct RekognitionClient {
    runtime: Runtime,
    sdk_config: SdkConfig,
    client: aws_sdk_rekognition::Client,
}

impl RekognitionClient {
    /// Load the shared AWS configuration and build a client.
    ///
    /// Region: `aws.region`, then the SDK's default chain (AWS_REGION,
    /// profile, instance metadata), then us-east-1. Credentials: static keys
    /// from `aws` when both are present, else the SDK's default chain.
    pub fn from_config(config: &AwsConfig) -> Result<Self> {
        let runtime = tokio::runtime::Builder::new_current_thread()
            .enable_all()
            .build()
            .context("Failed to start the AWS runtime")?;

        let sdk_config = runtime.block_on(load_sdk_config(config));
        let client = aws_sdk_rekognition::Client::new(&sdk_config);

        Ok(Self {
            runtime,
            sdk_config,
            client,
        })
    }

    pub fn region(&self) -> Option<&str> {
        self.sdk_config.region().map(|r| r.as_ref())
    }

    pub fn endpoint(&self) -> Option<&str> {
        self.sdk_config.endpoint_url()
    }

    fn run<T, E, F>(&self, operation: &str, call: F) -> Result<T, RemoteError>
    where
        F: Future<Output = Result<T, aws_sdk_rekognition::error::SdkError<E>>>,
        E: aws_sdk_rekognition::error::ProvideErrorMetadata + std::error::Error + 'static,
    {
        tracing::debug!(operation, "Calling Rekognition");

        self.runtime.block_on(call).map_err(|err| {
            let error = RemoteError::from_sdk(operation, err);
            tracing::warn!(operation, error = %error, "Rekognition call failed");
            error
        })
    }
}

async fn load_sdk_config(config: &AwsConfig) -> SdkConfig {
    let region = RegionProviderChain::first_try(config.region.clone().map(Region::new))
        .or_default_provider()
        .or_else(Region::new(DEFAULT_REGION));

    let mut loader = aws_config::defaults(BehaviorVersion::latest())
        .region(region)
        .timeout_config(
            TimeoutConfig::builder()
                .operation_timeout(Duration::from_secs(config.timeout_secs))
                .build(),
        );

    if let Some(profile) = &config.profile {
        loader = loader.profile_name(profile);
    }

    if let Some(path) = &config.credentials_file {
        loader = loader.profile_files(
            ProfileFiles::builder()
                .include_default_config_file(true)
                .include_default_credentials_file(true)
                .with_file(ProfileFileKind::Credentials, path)
                .build(),
        );
    }

    if let (Some(access_key_id), Some(secret_access_key)) =
        (&config.access_key_id, &config.secret_access_key)
    {
        loader = loader.credentials_provider(Credentials::new(
            access_key_id,
            secret_access_key,
            config.session_token.clone(),
            None,
            "facegate-config",
        ));
    }

    if let Some(endpoint) = &config.endpoint {
        loader = loader.endpoint_url(endpoint);
    }

    loader.load().await
}

fn liveness_settings(
    settings: &LivenessSettings,
) -> Result<sdk::CreateFaceLivenessSessionRequestSettings, RemoteError> {
    let output_config = settings
        .output_config
        .as_ref()
        .map(|output| {
            sdk::LivenessOutputConfig::builder()
                .s3_bucket(&output.s3_bucket)
                .set_s3_key_prefix(output.s3_key_prefix.clone())
                .build()
                .map_err(|e| RemoteError::Request {
                    operation: "CreateFaceLivenessSession".to_string(),
                    message: e.to_string(),
                })
        })
        .transpose()?;

    Ok(sdk::CreateFaceLivenessSessionRequestSettings::builder()
        .set_output_config(output_config)
        .audit_images_limit(convert::count(settings.audit_images_limit))
        .build())
}

impl FaceApi for RekognitionClient {
    fn detect_faces(&self, request: &DetectFacesRequest) -> Result<DetectFacesResponse, RemoteError> {
        let call = self
            .client
            .detect_faces()
            .image(convert::image(&request.image))
            .set_attributes(Some(
                request.attributes.iter().copied().map(convert::attribute).collect(),
            ))
            .send();
        self.run("DetectFaces", call).map(Into::into)
    }

    fn index_faces(&self, request: &IndexFacesRequest) -> Result<IndexFacesResponse, RemoteError> {
        let call = self
            .client
            .index_faces()
            .collection_id(&request.collection_id)
            .image(convert::image(&request.image))
            .set_external_image_id(request.external_image_id.clone())
            .set_detection_attributes(Some(
                request
                    .detection_attributes
                    .iter()
                    .copied()
                    .map(convert::attribute)
                    .collect(),
            ))
            .max_faces(convert::count(request.max_faces))
            .quality_filter(convert::quality_filter(request.quality_filter))
            .send();
        self.run("IndexFaces", call).map(Into::into)
    }

    fn associate_faces(
        &self,
        request: &AssociateFacesRequest,
    ) -> Result<AssociateFacesResponse, RemoteError> {
        let call = self
            .client
            .associate_faces()
            .collection_id(&request.collection_id)
            .user_id(&request.user_id)
            .set_face_ids(Some(request.face_ids.clone()))
            .user_match_threshold(request.user_match_threshold)
            .client_request_token(&request.client_request_token)
            .send();
        self.run("AssociateFaces", call).map(Into::into)
    }

    fn disassociate_faces(
        &self,
        request: &DisassociateFacesRequest,
    ) -> Result<DisassociateFacesResponse, RemoteError> {
        let call = self
            .client
            .disassociate_faces()
            .collection_id(&request.collection_id)
            .user_id(&request.user_id)
            .set_face_ids(Some(request.face_ids.clone()))
            .client_request_token(&request.client_request_token)
            .send();
        self.run("DisassociateFaces", call).map(Into::into)
    }

    fn delete_faces(&self, request: &DeleteFacesRequest) -> Result<DeleteFacesResponse, RemoteError> {
        let call = self
            .client
            .delete_faces()
            .collection_id(&request.collection_id)
            .set_face_ids(Some(request.face_ids.clone()))
            .send();
        self.run("DeleteFaces", call).map(Into::into)
    }

    fn create_collection(
        &self,
        request: &CreateCollectionRequest,
    ) -> Result<CreateCollectionResponse, RemoteError> {
        let call = self
            .client
            .create_collection()
            .collection_id(&request.collection_id)
            .send();
        self.run("CreateCollection", call).map(Into::into)
    }

    fn create_user(&self, request: &CreateUserRequest) -> Result<CreateUserResponse, RemoteError> {
        let call = self
            .client
            .create_user()
            .collection_id(&request.collection_id)
            .user_id(&request.user_id)
            .client_request_token(&request.client_request_token)
            .send();
        self.run("CreateUser", call).map(|_| CreateUserResponse {})
    }

    fn delete_user(&self, request: &DeleteUserRequest) -> Result<DeleteUserResponse, RemoteError> {
        let call = self
            .client
            .delete_user()
            .collection_id(&request.collection_id)
            .user_id(&request.user_id)
            .client_request_token(&request.client_request_token)
            .send();
        self.run("DeleteUser", call).map(|_| DeleteUserResponse {})
    }

    fn list_users(&self, request: &ListUsersRequest) -> Result<ListUsersResponse, RemoteError> {
        let call = self
            .client
            .list_users()
            .collection_id(&request.collection_id)
            .set_max_results(request.max_results.map(convert::count))
            .set_next_token(request.next_token.clone())
            .send();
        self.run("ListUsers", call).map(Into::into)
    }

    fn list_faces(&self, request: &ListFacesRequest) -> Result<ListFacesResponse, RemoteError> {
        let call = self
            .client
            .list_faces()
            .collection_id(&request.collection_id)
            .set_user_id(request.user_id.clone())
            .set_max_results(request.max_results.map(convert::count))
            .set_next_token(request.next_token.clone())
            .send();
        self.run("ListFaces", call).map(Into::into)
    }

    fn search_users_by_image(
        &self,
        request: &SearchUsersByImageRequest,
    ) -> Result<SearchUsersByImageResponse, RemoteError> {
        let call = self
            .client
            .search_users_by_image()
            .collection_id(&request.collection_id)
            .image(convert::image(&request.image))
            .max_users(convert::count(request.max_users))
            .user_match_threshold(request.user_match_threshold)
            .quality_filter(convert::quality_filter(request.quality_filter))
            .send();
        self.run("SearchUsersByImage", call).map(Into::into)
    }

    fn compare_faces(&self, request: &CompareFacesRequest) -> Result<CompareFacesResponse, RemoteError> {
        let call = self
            .client
            .compare_faces()
            .source_image(convert::image(&request.source_image))
            .target_image(convert::image(&request.target_image))
            .similarity_threshold(request.similarity_threshold)
            .quality_filter(convert::quality_filter(request.quality_filter))
            .send();
        self.run("CompareFaces", call).map(Into::into)
    }

    fn create_face_liveness_session(
        &self,
        request: &CreateFaceLivenessSessionRequest,
    ) -> Result<CreateFaceLivenessSessionResponse, RemoteError> {
        let call = self
            .client
            .create_face_liveness_session()
            .settings(liveness_settings(&request.settings)?)
            .client_request_token(&request.client_request_token)
            .send();
        self.run("CreateFaceLivenessSession", call).map(Into::into)
    }

    fn get_face_liveness_session_results(
        &self,
        request: &GetFaceLivenessSessionResultsRequest,
    ) -> Result<GetFaceLivenessSessionResultsResponse, RemoteError> {
        let call = self
            .client
            .get_face_liveness_session_results()
            .session_id(&request.session_id)
            .send();
        self.run("GetFaceLivenessSessionResults", call).map(Into::into)
    }
}
