//! gRPC client for `mailing_list.MailingListService`.

use tonic::codec::ProstCodec;
use tonic::codegen::http::uri::PathAndQuery;
use tonic::transport::{Channel, Endpoint};
use tonic::{IntoRequest, Request, Response, Status};

use super::proto::{
    CreateEmailRequest, DeleteEmailRequest, EmailResponse, GetEmailBatchRequest,
    GetEmailBatchResponse, GetEmailRequest, UpdateEmailRequest,
};
use super::server::{
    CREATE_EMAIL_PATH, DELETE_EMAIL_PATH, GET_EMAIL_BATCH_PATH, GET_EMAIL_PATH, UPDATE_EMAIL_PATH,
};
use crate::{MailError, Result};

/// Client over a single HTTP/2 channel. Cloning shares the channel.
#[derive(Debug, Clone)]
pub struct MailingListClient {
    inner: tonic::client::Grpc<Channel>,
}

impl MailingListClient {
    /// Connect to a server, e.g. `http://127.0.0.1:8081`.
    pub async fn connect(dst: impl Into<String>) -> Result<Self> {
        let channel = Endpoint::from_shared(dst.into())
            .map_err(|e| MailError::Transport(e.to_string()))?
            .connect()
            .await
            .map_err(|e| MailError::Transport(e.to_string()))?;

        Ok(Self::new(channel))
    }

    /// Create a client over an existing channel.
    pub fn new(channel: Channel) -> Self {
        Self {
            inner: tonic::client::Grpc::new(channel),
        }
    }

    /// Look up an address; an empty response means not found.
    pub async fn get_email(
        &mut self,
        request: impl IntoRequest<GetEmailRequest>,
    ) -> std::result::Result<Response<EmailResponse>, Status> {
        self.unary(request.into_request(), GET_EMAIL_PATH).await
    }

    pub async fn get_email_batch(
        &mut self,
        request: impl IntoRequest<GetEmailBatchRequest>,
    ) -> std::result::Result<Response<GetEmailBatchResponse>, Status> {
        self.unary(request.into_request(), GET_EMAIL_BATCH_PATH).await
    }

    pub async fn create_email(
        &mut self,
        request: impl IntoRequest<CreateEmailRequest>,
    ) -> std::result::Result<Response<EmailResponse>, Status> {
        self.unary(request.into_request(), CREATE_EMAIL_PATH).await
    }

    pub async fn update_email(
        &mut self,
        request: impl IntoRequest<UpdateEmailRequest>,
    ) -> std::result::Result<Response<EmailResponse>, Status> {
        self.unary(request.into_request(), UPDATE_EMAIL_PATH).await
    }

    pub async fn delete_email(
        &mut self,
        request: impl IntoRequest<DeleteEmailRequest>,
    ) -> std::result::Result<Response<EmailResponse>, Status> {
        self.unary(request.into_request(), DELETE_EMAIL_PATH).await
    }

    /// Wait for the channel, then issue one unary call on `path`.
    async fn unary<Req, Resp>(
        &mut self,
        request: Request<Req>,
        path: &'static str,
    ) -> std::result::Result<Response<Resp>, Status>
    where
        Req: prost::Message + Send + Sync + 'static,
        Resp: prost::Message + Default + Send + Sync + 'static,
    {
        self.inner
            .ready()
            .await
            .map_err(|e| Status::unknown(format!("Service was not ready: {e}")))?;

        let codec = ProstCodec::<Req, Resp>::default();
        self.inner
            .unary(request, PathAndQuery::from_static(path), codec)
            .await
    }
}
