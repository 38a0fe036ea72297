// @generated
// This file is @generated by prost-build.
/// A single todo item
#[derive(Clone, PartialEq, ::prost::Message)]
pub struct ToDo {
    /// Unique integer identifier of the todo task
    #[prost(int64, tag = "1")]
    pub id: i64,
    /// Title of the task
    #[prost(string, tag = "2")]
    pub title: ::prost::alloc::string::String,
    /// Free-form description, may be blank
    #[prost(string, tag = "3")]
    pub description: ::prost::alloc::string::String,
    /// Optional reminder, stored in UTC
    #[prost(message, optional, tag = "4")]
    pub reminder: ::core::option::Option<::prost_types::Timestamp>,
}
/// Request data to create new todo task
#[derive(Clone, PartialEq, ::prost::Message)]
pub struct CreateRequest {
    /// API version tag, must equal "v1"
    #[prost(string, tag = "1")]
    pub api: ::prost::alloc::string::String,
    /// Task entity to add
    #[prost(message, optional, tag = "2")]
    pub to_do: ::core::option::Option<ToDo>,
}
/// Identifier assigned to the created task
#[derive(Clone, PartialEq, ::prost::Message)]
pub struct CreateResponse {
    #[prost(string, tag = "1")]
    pub api: ::prost::alloc::string::String,
    /// ID of created task
    #[prost(int64, tag = "2")]
    pub id: i64,
}
/// Request data to read todo task
#[derive(Clone, PartialEq, ::prost::Message)]
pub struct ReadRequest {
    #[prost(string, tag = "1")]
    pub api: ::prost::alloc::string::String,
    /// Unique integer identifier of the todo task
    #[prost(int64, tag = "2")]
    pub id: i64,
}
/// Todo task matching the requested ID
#[derive(Clone, PartialEq, ::prost::Message)]
pub struct ReadResponse {
    #[prost(string, tag = "1")]
    pub api: ::prost::alloc::string::String,
    #[prost(message, optional, tag = "2")]
    pub to_do: ::core::option::Option<ToDo>,
}
/// Request data to update todo task
#[derive(Clone, PartialEq, ::prost::Message)]
pub struct UpdateRequest {
    #[prost(string, tag = "1")]
    pub api: ::prost::alloc::string::String,
    /// Task entity to update, all fields replaced
    #[prost(message, optional, tag = "2")]
    pub to_do: ::core::option::Option<ToDo>,
}
/// Result of an update
#[derive(Clone, PartialEq, ::prost::Message)]
pub struct UpdateResponse {
    #[prost(string, tag = "1")]
    pub api: ::prost::alloc::string::String,
    /// Number of rows replaced, 1 on success
    #[prost(int64, tag = "2")]
    pub updated: i64,
}
/// Request data to delete todo task
#[derive(Clone, PartialEq, ::prost::Message)]
pub struct DeleteRequest {
    #[prost(string, tag = "1")]
    pub api: ::prost::alloc::string::String,
    #[prost(int64, tag = "2")]
    pub id: i64,
}
/// Empty payload: success is the absence of an error status
#[derive(Clone, PartialEq, ::prost::Message)]
pub struct DeleteResponse {
    #[prost(string, tag = "1")]
    pub api: ::prost::alloc::string::String,
}
/// Request data to read all todo task
#[derive(Clone, PartialEq, ::prost::Message)]
pub struct ReadAllRequest {
    #[prost(string, tag = "1")]
    pub api: ::prost::alloc::string::String,
}
/// Every stored todo task
#[derive(Clone, PartialEq, ::prost::Message)]
pub struct ReadAllResponse {
    #[prost(string, tag = "1")]
    pub api: ::prost::alloc::string::String,
    #[prost(message, repeated, tag = "2")]
    pub to_dos: ::prost::alloc::vec::Vec<ToDo>,
}
include!("todo.v1.tonic.rs");
// @@protoc_insertion_point(module)
