//! ToDo gRPC service implementation
//!
//! Handlers stay thin: record the call's `api` and `todo.id` on the span the
//! logging layer opened, reject a foreign API version before looking at the
//! payload, then hand off to the domain service. Proto ↔ domain conversion
//! goes through the `From`/`TryFrom` impls in `domain_todo::conversions`.

use std::sync::Arc;

use core_grpc::{ToTonicOption, ToTonicResult};
use domain_todo::{NewTodo, Todo, TodoRepository, TodoService};
use rpc::todo::v1::{
    API_VERSION, CreateRequest, CreateResponse, DeleteRequest, DeleteResponse, ReadAllRequest,
    ReadAllResponse, ReadRequest, ReadResponse, ToDo, UpdateRequest, UpdateResponse,
    to_do_service_server::ToDoService,
};
use tonic::{Request, Response, Status};
use tracing::{Span, info};

/// gRPC service implementation for todos
///
/// Generic over the repository type for testability.
pub struct TodoServiceImpl<R>
where
    R: TodoRepository + 'static,
{
    service: Arc<TodoService<R>>,
}

impl<R> TodoServiceImpl<R>
where
    R: TodoRepository + 'static,
{
    pub fn new(service: TodoService<R>) -> Self {
        Self {
            service: Arc::new(service),
        }
    }
}

fn record_api(api: &str) {
    Span::current().record("api", api);
}

fn record_id(id: i64) {
    Span::current().record("todo.id", id);
}

#[tonic::async_trait]
impl<R> ToDoService for TodoServiceImpl<R>
where
    R: TodoRepository + 'static,
{
    async fn create(
        &self,
        request: Request<CreateRequest>,
    ) -> Result<Response<CreateResponse>, Status> {
        let req = request.into_inner();
        record_api(&req.api);
        TodoService::<R>::check_api(&req.api)?;

        let input: NewTodo = req
            .to_do
            .ok_or_invalid("to_do is required")?
            .try_into()
            .to_tonic()?;

        let id = self.service.create(&req.api, input).await?;
        record_id(id);
        info!(id, "Created todo");

        Ok(Response::new(CreateResponse {
            api: API_VERSION.to_string(),
            id,
        }))
    }

    async fn read(&self, request: Request<ReadRequest>) -> Result<Response<ReadResponse>, Status> {
        let req = request.into_inner();
        record_api(&req.api);
        record_id(req.id);

        let todo = self.service.read(&req.api, req.id).await?;

        Ok(Response::new(ReadResponse {
            api: API_VERSION.to_string(),
            to_do: Some(todo.into()),
        }))
    }

    async fn update(
        &self,
        request: Request<UpdateRequest>,
    ) -> Result<Response<UpdateResponse>, Status> {
        let req = request.into_inner();
        record_api(&req.api);
        TodoService::<R>::check_api(&req.api)?;

        let todo: Todo = req
            .to_do
            .ok_or_invalid("to_do is required")?
            .try_into()
            .to_tonic()?;
        record_id(todo.id);

        let updated = self.service.update(&req.api, todo).await?;

        Ok(Response::new(UpdateResponse {
            api: API_VERSION.to_string(),
            updated: i64::try_from(updated).unwrap_or(i64::MAX),
        }))
    }

    async fn delete(
        &self,
        request: Request<DeleteRequest>,
    ) -> Result<Response<DeleteResponse>, Status> {
        let req = request.into_inner();
        record_api(&req.api);
        record_id(req.id);

        self.service.delete(&req.api, req.id).await?;
        info!(id = req.id, "Deleted todo");

        Ok(Response::new(DeleteResponse {
            api: API_VERSION.to_string(),
        }))
    }

    async fn read_all(
        &self,
        request: Request<ReadAllRequest>,
    ) -> Result<Response<ReadAllResponse>, Status> {
        let req = request.into_inner();
        record_api(&req.api);

        let to_dos = self
            .service
            .read_all(&req.api)
            .await?
            .into_iter()
            .map(ToDo::from)
            .collect();

        Ok(Response::new(ReadAllResponse {
            api: API_VERSION.to_string(),
            to_dos,
        }))
    }
}
