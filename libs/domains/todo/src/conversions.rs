//! Todo-specific proto ↔ domain conversions
//!
//! Timestamp handling (microsecond truncation, range checks) comes from
//! `core_grpc::conversions` and is shared with any other service.

use rpc::todo::v1::ToDo;

use crate::models::{NewTodo, Todo};

pub use core_grpc::conversions::*;

impl From<Todo> for ToDo {
    fn from(todo: Todo) -> Self {
        Self {
            id: todo.id,
            title: todo.title,
            description: todo.description,
            reminder: opt_datetime_to_timestamp(todo.reminder),
        }
    }
}

/// The wire `id` is ignored on create
impl TryFrom<ToDo> for NewTodo {
    type Error = String;

    fn try_from(proto: ToDo) -> Result<Self, Self::Error> {
        Ok(Self {
            reminder: opt_timestamp_to_datetime(proto.reminder.as_ref())?,
            title: proto.title,
            description: proto.description,
        })
    }
}

impl TryFrom<ToDo> for Todo {
    type Error = String;

    fn try_from(proto: ToDo) -> Result<Self, Self::Error> {
        let id = proto.id;
        NewTodo::try_from(proto).map(|input| input.with_id(id))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{TimeZone, Utc};
    use prost_types::Timestamp;

    fn proto(id: i64, reminder: Option<Timestamp>) -> ToDo {
        ToDo {
            id,
            title: "t1".to_string(),
            description: "d1".to_string(),
            reminder,
        }
    }

    #[test]
    fn test_new_todo_from_proto_ignores_id() {
        let input = NewTodo::try_from(proto(
            99,
            Some(Timestamp {
                seconds: 1_704_067_200,
                nanos: 0,
            }),
        ))
        .unwrap();

        assert_eq!(input.title, "t1");
        assert_eq!(
            input.reminder,
            Some(Utc.with_ymd_and_hms(2024, 1, 1, 0, 0, 0).unwrap())
        );
    }

    #[test]
    fn test_todo_from_proto_keeps_id() {
        let todo = Todo::try_from(proto(42, None)).unwrap();
        assert_eq!(todo.id, 42);
        assert_eq!(todo.reminder, None);
    }

    #[test]
    fn test_invalid_reminder_is_rejected() {
        let result = Todo::try_from(proto(
            1,
            Some(Timestamp {
                seconds: 0,
                nanos: -5,
            }),
        ));
        assert!(result.is_err());
    }

    #[test]
    fn test_todo_to_proto() {
        let reminder = Utc.with_ymd_and_hms(2024, 1, 1, 0, 0, 0).unwrap();
        let proto: ToDo = NewTodo::new("t1", "d1", Some(reminder)).with_id(42).into();

        assert_eq!(proto.id, 42);
        assert_eq!(proto.description, "d1");
        assert_eq!(
            proto.reminder,
            Some(Timestamp {
                seconds: 1_704_067_200,
                nanos: 0
            })
        );
    }
}
