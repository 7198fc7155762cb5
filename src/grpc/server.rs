//! gRPC server: tower service wiring and the listener.
//!
//! The service is routed by hand on the request path and each method is
//! dispatched through `tonic::server::Grpc` with the prost codec, so no
//! build-time code generation is needed.

use std::convert::Infallible;
use std::net::SocketAddr;
use std::sync::Arc;
use std::task::{Context, Poll};

use tokio::net::TcpListener;
use tokio_stream::wrappers::TcpListenerStream;
use tonic::body::BoxBody;
use tonic::codec::ProstCodec;
use tonic::codegen::{empty_body, http, Body, BoxFuture, Service, StdError};
use tonic::server::{NamedService, UnaryService};
use tonic::transport::Server;
use tonic::{Request, Response, Status};

use super::service::{MailServer, MailingListService};
use crate::config::GrpcConfig;
use crate::{MailError, MailingList, Result};

/// Fully qualified service name.
pub const SERVICE_NAME: &str = "mailing_list.MailingListService";

pub(crate) const GET_EMAIL_PATH: &str = "/mailing_list.MailingListService/GetEmail";
pub(crate) const GET_EMAIL_BATCH_PATH: &str = "/mailing_list.MailingListService/GetEmailBatch";
pub(crate) const CREATE_EMAIL_PATH: &str = "/mailing_list.MailingListService/CreateEmail";
pub(crate) const UPDATE_EMAIL_PATH: &str = "/mailing_list.MailingListService/UpdateEmail";
pub(crate) const DELETE_EMAIL_PATH: &str = "/mailing_list.MailingListService/DeleteEmail";

/// Tower service exposing a `MailingListService` implementation over gRPC.
#[derive(Debug)]
pub struct MailingListServiceServer<T> {
    inner: Arc<T>,
}

impl<T: MailingListService> MailingListServiceServer<T> {
    /// Wrap a service implementation.
    pub fn new(inner: T) -> Self {
        Self {
            inner: Arc::new(inner),
        }
    }
}

impl<T> Clone for MailingListServiceServer<T> {
    fn clone(&self) -> Self {
        Self {
            inner: Arc::clone(&self.inner),
        }
    }
}

impl<T> NamedService for MailingListServiceServer<T> {
    const NAME: &'static str = SERVICE_NAME;
}

impl<T, B> Service<http::Request<B>> for MailingListServiceServer<T>
where
    T: MailingListService,
    B: Body + Send + 'static,
    B::Error: Into<StdError> + Send + 'static,
{
    type Response = http::Response<BoxBody>;
    type Error = Infallible;
    type Future = BoxFuture<Self::Response, Self::Error>;

    fn poll_ready(&mut self, _cx: &mut Context<'_>) -> Poll<std::result::Result<(), Self::Error>> {
        Poll::Ready(Ok(()))
    }

    fn call(&mut self, req: http::Request<B>) -> Self::Future {
        let inner = Arc::clone(&self.inner);

        match req.uri().path() {
            GET_EMAIL_PATH => unary(inner, req, call_get_email::<T>),
            GET_EMAIL_BATCH_PATH => unary(inner, req, call_get_email_batch::<T>),
            CREATE_EMAIL_PATH => unary(inner, req, call_create_email::<T>),
            UPDATE_EMAIL_PATH => unary(inner, req, call_update_email::<T>),
            DELETE_EMAIL_PATH => unary(inner, req, call_delete_email::<T>),
            path => {
                tracing::debug!(path, "gRPC method not implemented");
                Box::pin(async move { Ok(unimplemented_response()) })
            }
        }
    }
}

type UnaryMethod<T, Req, Resp> =
    fn(Arc<T>, Request<Req>) -> BoxFuture<Response<Resp>, Status>;

/// One unary method bound to the service implementation.
struct Unary<T, Req, Resp> {
    inner: Arc<T>,
    method: UnaryMethod<T, Req, Resp>,
}

impl<T, Req, Resp> UnaryService<Req> for Unary<T, Req, Resp>
where
    T: MailingListService,
{
    type Response = Resp;
    type Future = BoxFuture<Response<Resp>, Status>;

    fn call(&mut self, request: Request<Req>) -> Self::Future {
        (self.method)(Arc::clone(&self.inner), request)
    }
}

/// Decode, dispatch and encode one unary call.
fn unary<T, B, Req, Resp>(
    inner: Arc<T>,
    req: http::Request<B>,
    method: UnaryMethod<T, Req, Resp>,
) -> BoxFuture<http::Response<BoxBody>, Infallible>
where
    T: MailingListService,
    B: Body + Send + 'static,
    B::Error: Into<StdError> + Send + 'static,
    Req: prost::Message + Default + Send + 'static,
    Resp: prost::Message + Send + 'static,
{
    Box::pin(async move {
        let codec = ProstCodec::<Resp, Req>::default();
        let mut grpc = tonic::server::Grpc::new(codec);
        Ok(grpc.unary(Unary { inner, method }, req).await)
    })
}

fn call_get_email<T: MailingListService>(
    svc: Arc<T>,
    request: Request<super::GetEmailRequest>,
) -> BoxFuture<Response<super::EmailResponse>, Status> {
    Box::pin(async move { svc.get_email(request).await })
}

fn call_get_email_batch<T: MailingListService>(
    svc: Arc<T>,
    request: Request<super::GetEmailBatchRequest>,
) -> BoxFuture<Response<super::GetEmailBatchResponse>, Status> {
    Box::pin(async move { svc.get_email_batch(request).await })
}

fn call_create_email<T: MailingListService>(
    svc: Arc<T>,
    request: Request<super::CreateEmailRequest>,
) -> BoxFuture<Response<super::EmailResponse>, Status> {
    Box::pin(async move { svc.create_email(request).await })
}

fn call_update_email<T: MailingListService>(
    svc: Arc<T>,
    request: Request<super::UpdateEmailRequest>,
) -> BoxFuture<Response<super::EmailResponse>, Status> {
    Box::pin(async move { svc.update_email(request).await })
}

fn call_delete_email<T: MailingListService>(
    svc: Arc<T>,
    request: Request<super::DeleteEmailRequest>,
) -> BoxFuture<Response<super::EmailResponse>, Status> {
    Box::pin(async move { svc.delete_email(request).await })
}

fn unimplemented_response() -> http::Response<BoxBody> {
    let mut response = http::Response::new(empty_body());
    let headers = response.headers_mut();
    headers.insert(
        http::header::HeaderName::from_static("grpc-status"),
        (tonic::Code::Unimplemented as i32).into(),
    );
    headers.insert(
        http::header::CONTENT_TYPE,
        tonic::metadata::GRPC_CONTENT_TYPE,
    );
    response
}

/// gRPC server for the mailing list.
pub struct GrpcServer {
    /// Server address.
    addr: SocketAddr,
    /// Service implementation.
    service: MailServer,
}

impl GrpcServer {
    /// Create a new gRPC server.
    ///
    /// Fails when the configured bind address does not parse.
    pub fn new(config: &GrpcConfig, registry: MailingList) -> Result<Self> {
        let addr = config.socket_addr()?;

        Ok(Self {
            addr,
            service: MailServer::new(registry),
        })
    }

    /// Get the server address.
    pub fn addr(&self) -> SocketAddr {
        self.addr
    }

    /// Run the server until the transport fails.
    pub async fn run(self) -> Result<()> {
        let listener = TcpListener::bind(self.addr).await?;
        let local_addr = listener.local_addr()?;

        tracing::info!("gRPC API server listening on {}", local_addr);

        serve(listener, self.service).await
    }

    /// Run the server and return the actual bound address.
    ///
    /// This is useful for testing when binding to port 0.
    pub async fn run_with_addr(self) -> Result<SocketAddr> {
        let listener = TcpListener::bind(self.addr).await?;
        let local_addr = listener.local_addr()?;

        tracing::info!("gRPC API server listening on {}", local_addr);

        tokio::spawn(async move {
            if let Err(e) = serve(listener, self.service).await {
                tracing::error!("gRPC API server error: {}", e);
            }
        });

        Ok(local_addr)
    }
}

async fn serve(listener: TcpListener, service: MailServer) -> Result<()> {
    Server::builder()
        .add_service(MailingListServiceServer::new(service))
        .serve_with_incoming(TcpListenerStream::new(listener))
        .await
        .map_err(|e| MailError::Transport(e.to_string()))
}
