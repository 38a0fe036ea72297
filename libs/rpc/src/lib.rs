//! Wire schema for the ToDo service.
//!
//! The `generated/` tree is produced by `buf generate` from `proto/` (see
//! `buf.gen.yaml`) and checked in so builds do not need `protoc`.

pub mod todo {
    pub mod v1 {
        include!("generated/todo/v1/todo.v1.rs");

        /// API version tag carried by every request and response envelope.
        pub const API_VERSION: &str = "v1";
    }
}
