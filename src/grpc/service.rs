//! Service trait and its registry-backed implementation.

use tonic::{Request, Response, Status};

use super::proto::{
    self, CreateEmailRequest, DeleteEmailRequest, EmailResponse, GetEmailBatchRequest,
    GetEmailBatchResponse, GetEmailRequest, UpdateEmailRequest,
};
use crate::db::{EmailEntry, EmailUpdate};
use crate::{ErrorKind, MailError, MailingList};

/// Server-side contract of `mailing_list.MailingListService`.
#[tonic::async_trait]
pub trait MailingListService: Send + Sync + 'static {
    async fn get_email(
        &self,
        request: Request<GetEmailRequest>,
    ) -> Result<Response<EmailResponse>, Status>;

    async fn get_email_batch(
        &self,
        request: Request<GetEmailBatchRequest>,
    ) -> Result<Response<GetEmailBatchResponse>, Status>;

    async fn create_email(
        &self,
        request: Request<CreateEmailRequest>,
    ) -> Result<Response<EmailResponse>, Status>;

    async fn update_email(
        &self,
        request: Request<UpdateEmailRequest>,
    ) -> Result<Response<EmailResponse>, Status>;

    async fn delete_email(
        &self,
        request: Request<DeleteEmailRequest>,
    ) -> Result<Response<EmailResponse>, Status>;
}

/// `MailingListService` over the shared registry.
#[derive(Debug, Clone)]
pub struct MailServer {
    registry: MailingList,
}

impl MailServer {
    /// Create a service over the given registry.
    pub fn new(registry: MailingList) -> Self {
        Self { registry }
    }
}

#[tonic::async_trait]
impl MailingListService for MailServer {
    async fn get_email(
        &self,
        request: Request<GetEmailRequest>,
    ) -> Result<Response<EmailResponse>, Status> {
        let req = request.into_inner();
        tracing::info!(email = %req.email_addr, "gRPC GetEmail");

        let entry = self
            .registry
            .get(&req.email_addr)
            .await
            .map_err(status_from_error)?;
        Ok(Response::new(email_response(entry)))
    }

    async fn get_email_batch(
        &self,
        request: Request<GetEmailBatchRequest>,
    ) -> Result<Response<GetEmailBatchResponse>, Status> {
        let req = request.into_inner();
        tracing::info!(page = req.page, count = req.count, "gRPC GetEmailBatch");

        let entries = self
            .registry
            .batch(i64::from(req.page), i64::from(req.count))
            .await
            .map_err(status_from_error)?;

        Ok(Response::new(GetEmailBatchResponse {
            email_entries: entries.into_iter().map(entry_to_proto).collect(),
        }))
    }

    async fn create_email(
        &self,
        request: Request<CreateEmailRequest>,
    ) -> Result<Response<EmailResponse>, Status> {
        let req = request.into_inner();
        tracing::info!(email = %req.email_addr, "gRPC CreateEmail");

        let entry = self
            .registry
            .create(&req.email_addr)
            .await
            .map_err(status_from_error)?;
        Ok(Response::new(email_response(entry)))
    }

    async fn update_email(
        &self,
        request: Request<UpdateEmailRequest>,
    ) -> Result<Response<EmailResponse>, Status> {
        let entry = request
            .into_inner()
            .email_entry
            .ok_or_else(|| Status::invalid_argument("email_entry is required"))?;
        tracing::info!(email = %entry.email, "gRPC UpdateEmail");

        let update = update_from_proto(entry);
        let entry = self
            .registry
            .update(&update)
            .await
            .map_err(status_from_error)?;
        Ok(Response::new(email_response(entry)))
    }

    async fn delete_email(
        &self,
        request: Request<DeleteEmailRequest>,
    ) -> Result<Response<EmailResponse>, Status> {
        let req = request.into_inner();
        tracing::info!(email = %req.email_addr, "gRPC DeleteEmail");

        let entry = self
            .registry
            .delete(&req.email_addr)
            .await
            .map_err(status_from_error)?;
        Ok(Response::new(email_response(entry)))
    }
}

fn email_response(entry: Option<EmailEntry>) -> EmailResponse {
    EmailResponse {
        email_entry: entry.map(entry_to_proto),
    }
}

/// Storage entry to wire entry.
pub fn entry_to_proto(entry: EmailEntry) -> proto::EmailEntry {
    proto::EmailEntry {
        id: entry.id,
        email: entry.email,
        confirmed_at: entry.confirmed_at,
        opt_out: entry.opt_out,
    }
}

/// Wire entry to upsert payload. The wire `id` is ignored.
pub fn update_from_proto(entry: proto::EmailEntry) -> EmailUpdate {
    EmailUpdate {
        email: entry.email,
        confirmed_at: entry.confirmed_at,
        opt_out: entry.opt_out,
    }
}

/// Render a registry failure as a gRPC status.
pub fn status_from_error(err: MailError) -> Status {
    match err.kind() {
        ErrorKind::Validation => Status::invalid_argument(err.to_string()),
        ErrorKind::Conflict => Status::already_exists(err.to_string()),
        ErrorKind::NotFound => Status::not_found(err.to_string()),
        ErrorKind::Storage => {
            tracing::error!("Internal error: {}", err);
            Status::internal("An internal error occurred")
        }
    }
}
