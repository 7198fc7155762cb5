//! Demo client: walks one address through create, update, list and delete
//! against a running gRPC API.

use std::process::ExitCode;
use std::time::Duration;

use clap::Parser;
use tonic::{Request, Status};
use tracing::{error, info};

use mailing_list::grpc::{
    CreateEmailRequest, DeleteEmailRequest, EmailEntry, EmailResponse, GetEmailBatchRequest,
    UpdateEmailRequest,
};
use mailing_list::MailingListClient;

const CALL_TIMEOUT: Duration = Duration::from_secs(1);
const BATCH_TIMEOUT: Duration = Duration::from_secs(5);

#[derive(Parser, Debug)]
#[command(name = "mailing-list-client", version, about = "Exercise the mailing list gRPC API")]
struct Args {
    /// gRPC server address.
    #[arg(long, env = "MAILINGLIST_GRPC_ADDR", default_value = "http://127.0.0.1:8081")]
    grpc_addr: String,

    /// Address to create, update and delete.
    #[arg(long, default_value = "subscriber@example.com")]
    email: String,
}

fn with_timeout<T>(message: T, timeout: Duration) -> Request<T> {
    let mut request = Request::new(message);
    request.set_timeout(timeout);
    request
}

/// Log a single-entry response and return the entry, if any.
fn log_response(
    result: Result<tonic::Response<EmailResponse>, Status>,
) -> Result<Option<EmailEntry>, Status> {
    let entry = result?.into_inner().email_entry;
    match &entry {
        Some(entry) => info!(?entry, "Response"),
        None => info!("Email not found"),
    }
    Ok(entry)
}

async fn get_batch(client: &mut MailingListClient, page: i32, count: i32) -> Result<(), Status> {
    info!(page, count, "Get email batch");
    let response = client
        .get_email_batch(with_timeout(
            GetEmailBatchRequest { page, count },
            BATCH_TIMEOUT,
        ))
        .await?;

    for (index, entry) in response.into_inner().email_entries.iter().enumerate() {
        info!(index, ?entry, "Batch item");
    }
    Ok(())
}

async fn run(client: &mut MailingListClient, email: &str) -> Result<(), Status> {
    info!(email, "Create email");
    let created = log_response(
        client
            .create_email(with_timeout(
                CreateEmailRequest {
                    email_addr: email.to_string(),
                },
                CALL_TIMEOUT,
            ))
            .await,
    )?
    .ok_or_else(|| Status::not_found("created entry was not returned"))?;

    info!(email, "Update email");
    let confirmed = EmailEntry {
        confirmed_at: 15_081_998,
        ..created
    };
    log_response(
        client
            .update_email(with_timeout(
                UpdateEmailRequest {
                    email_entry: Some(confirmed),
                },
                CALL_TIMEOUT,
            ))
            .await,
    )?;

    get_batch(client, 1, 2).await?;

    info!(email, "Delete email");
    log_response(
        client
            .delete_email(with_timeout(
                DeleteEmailRequest {
                    email_addr: email.to_string(),
                },
                CALL_TIMEOUT,
            ))
            .await,
    )?;

    get_batch(client, 1, 2).await
}

#[tokio::main]
async fn main() -> ExitCode {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info")),
        )
        .init();

    let args = Args::parse();

    let mut client = match MailingListClient::connect(args.grpc_addr.clone()).await {
        Ok(client) => client,
        Err(e) => {
            error!("Failed to connect to {}: {}", args.grpc_addr, e);
            return ExitCode::FAILURE;
        }
    };

    match run(&mut client, &args.email).await {
        Ok(()) => ExitCode::SUCCESS,
        Err(status) => {
            error!(code = ?status.code(), message = status.message(), "Request failed");
            ExitCode::FAILURE
        }
    }
}
