//! Wire messages of `mailing_list.MailingListService`.
//!
//! Kept in sync by hand with `proto/mailing_list.proto`.

/// A subscriber entry. `confirmed_at` is epoch seconds, 0 when unconfirmed.
#[derive(Clone, PartialEq, ::prost::Message)]
pub struct EmailEntry {
    #[prost(int64, tag = "1")]
    pub id: i64,
    #[prost(string, tag = "2")]
    pub email: ::prost::alloc::string::String,
    #[prost(int64, tag = "3")]
    pub confirmed_at: i64,
    #[prost(bool, tag = "4")]
    pub opt_out: bool,
}

#[derive(Clone, PartialEq, ::prost::Message)]
pub struct GetEmailRequest {
    #[prost(string, tag = "1")]
    pub email_addr: ::prost::alloc::string::String,
}

#[derive(Clone, PartialEq, ::prost::Message)]
pub struct CreateEmailRequest {
    #[prost(string, tag = "1")]
    pub email_addr: ::prost::alloc::string::String,
}

#[derive(Clone, PartialEq, ::prost::Message)]
pub struct DeleteEmailRequest {
    #[prost(string, tag = "1")]
    pub email_addr: ::prost::alloc::string::String,
}

#[derive(Clone, PartialEq, ::prost::Message)]
pub struct UpdateEmailRequest {
    #[prost(message, optional, tag = "1")]
    pub email_entry: ::core::option::Option<EmailEntry>,
}

#[derive(Clone, PartialEq, ::prost::Message)]
pub struct GetEmailBatchRequest {
    #[prost(int32, tag = "1")]
    pub page: i32,
    #[prost(int32, tag = "2")]
    pub count: i32,
}

/// Single-entry response. An absent entry means "not found".
#[derive(Clone, PartialEq, ::prost::Message)]
pub struct EmailResponse {
    #[prost(message, optional, tag = "1")]
    pub email_entry: ::core::option::Option<EmailEntry>,
}

#[derive(Clone, PartialEq, ::prost::Message)]
pub struct GetEmailBatchResponse {
    #[prost(message, repeated, tag = "1")]
    pub email_entries: ::prost::alloc::vec::Vec<EmailEntry>,
}
