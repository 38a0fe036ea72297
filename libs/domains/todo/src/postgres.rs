use async_trait::async_trait;
use sea_orm::{ColumnTrait, DatabaseConnection, EntityTrait, QueryFilter, QueryOrder};

use crate::{
    entity,
    error::TodoResult,
    models::{NewTodo, Todo},
    repository::TodoRepository,
};

/// PostgreSQL-backed [`TodoRepository`]
///
/// Statements run on pooled connections; a connection goes back to the pool
/// when the call returns, on success and error alike.
#[derive(Clone)]
pub struct PgTodoRepository {
    db: DatabaseConnection,
}

impl PgTodoRepository {
    pub fn new(db: DatabaseConnection) -> Self {
        Self { db }
    }
}

#[async_trait]
impl TodoRepository for PgTodoRepository {
    async fn insert(&self, input: NewTodo) -> TodoResult<i64> {
        let active_model: entity::ActiveModel = input.into();

        let id = entity::Entity::insert(active_model)
            .exec(&self.db)
            .await?
            .last_insert_id;

        tracing::debug!(todo.id = id, "Inserted todo");
        Ok(id)
    }

    async fn select_by_id(&self, id: i64) -> TodoResult<Vec<Todo>> {
        let models = entity::Entity::find()
            .filter(entity::Column::Id.eq(id))
            .all(&self.db)
            .await?;

        Ok(models.into_iter().map(Into::into).collect())
    }

    async fn update(&self, todo: Todo) -> TodoResult<u64> {
        let id = todo.id;
        let active_model: entity::ActiveModel = todo.into();

        let result = entity::Entity::update_many()
            .set(active_model)
            .filter(entity::Column::Id.eq(id))
            .exec(&self.db)
            .await?;

        tracing::debug!(todo.id = id, rows = result.rows_affected, "Updated todo");
        Ok(result.rows_affected)
    }

    async fn delete(&self, id: i64) -> TodoResult<u64> {
        let result = entity::Entity::delete_by_id(id).exec(&self.db).await?;

        tracing::debug!(todo.id = id, rows = result.rows_affected, "Deleted todo");
        Ok(result.rows_affected)
    }

    async fn select_all(&self) -> TodoResult<Vec<Todo>> {
        let models = entity::Entity::find()
            .order_by_asc(entity::Column::Id)
            .all(&self.db)
            .await?;

        Ok(models.into_iter().map(Into::into).collect())
    }
}
