use chrono::{DateTime, Utc};
use sea_orm::ActiveValue::{NotSet, Set};
use sea_orm::entity::prelude::*;

/// Sea-ORM Entity for the todo table
#[derive(Clone, Debug, PartialEq, Eq, DeriveEntityModel)]
#[sea_orm(table_name = "todo")]
pub struct Model {
    #[sea_orm(primary_key)]
    pub id: i64,
    #[sea_orm(column_type = "Text")]
    pub title: String,
    #[sea_orm(column_type = "Text")]
    pub description: String,
    pub reminder: Option<DateTimeWithTimeZone>,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {}

impl ActiveModelBehavior for ActiveModel {}

// Conversion from Sea-ORM Model to domain Todo
impl From<Model> for crate::models::Todo {
    fn from(model: Model) -> Self {
        Self {
            id: model.id,
            title: model.title,
            description: model.description,
            reminder: model.reminder.map(|dt| dt.with_timezone(&Utc)),
        }
    }
}

// Insert leaves the id to the BIGSERIAL default
impl From<crate::models::NewTodo> for ActiveModel {
    fn from(input: crate::models::NewTodo) -> Self {
        ActiveModel {
            id: NotSet,
            title: Set(input.title),
            description: Set(input.description),
            reminder: Set(to_column(input.reminder)),
        }
    }
}

// Full replacement of the mutable columns; the id only appears in the filter
impl From<crate::models::Todo> for ActiveModel {
    fn from(todo: crate::models::Todo) -> Self {
        ActiveModel {
            id: NotSet,
            title: Set(todo.title),
            description: Set(todo.description),
            reminder: Set(to_column(todo.reminder)),
        }
    }
}

fn to_column(reminder: Option<DateTime<Utc>>) -> Option<DateTimeWithTimeZone> {
    reminder.map(|dt| dt.fixed_offset())
}
