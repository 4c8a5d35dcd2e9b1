//! Todo models for request and response payloads

use common::validation::{FormFields, FormSchema, JsonFields, Schema, ValidationErrors};
use serde::Serialize;
use serde_json::Value;
use utoipa::ToSchema;

/// Todo entity; the id is absent until the store assigns one
#[derive(Debug, Clone, PartialEq, Serialize, ToSchema)]
#[schema(example = json!({
    "id": 1,
    "item": "Todo item"
}))]
pub struct Todo {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub id: Option<i64>,
    pub item: String,
}

impl Schema for Todo {
    fn from_json(value: &Value) -> Result<Self, ValidationErrors> {
        let mut fields = JsonFields::new(value);
        let id = fields.optional_integer("id");
        let item = fields.non_empty_string("item");
        let todo = id.zip(item).map(|(id, item)| Todo { id, item });
        fields.conclude(todo)
    }
}

impl FormSchema for Todo {
    fn from_form(form: &FormFields) -> Result<Self, ValidationErrors> {
        let mut reader = form.reader();
        let item = reader.non_empty_string("item");
        reader.conclude(item.map(|item| Todo { id: None, item }))
    }
}

/// Write-only projection of a todo
#[derive(Debug, Clone, PartialEq, Serialize, ToSchema)]
#[schema(example = json!({
    "item": "Todo item"
}))]
pub struct TodoItem {
    pub item: String,
}

impl Schema for TodoItem {
    fn from_json(value: &Value) -> Result<Self, ValidationErrors> {
        let mut fields = JsonFields::new(value);
        let item = fields.non_empty_string("item");
        fields.conclude(item.map(|item| TodoItem { item }))
    }
}

impl From<Todo> for TodoItem {
    fn from(todo: Todo) -> Self {
        TodoItem { item: todo.item }
    }
}

/// Envelope for todo listings
#[derive(Debug, Clone, PartialEq, Serialize, ToSchema)]
#[schema(example = json!({
    "todos": [
        {
            "id": 1,
            "item": "Todo item 1"
        },
        {
            "id": 2,
            "item": "Todo item 2"
        }
    ]
}))]
pub struct TodoItems {
    pub todos: Vec<Todo>,
}

impl Schema for TodoItems {
    fn from_json(value: &Value) -> Result<Self, ValidationErrors> {
        let mut fields = JsonFields::new(value);
        let todos = fields.optional_list::<Todo>("todos");
        fields.conclude(todos.map(|todos| TodoItems { todos }))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use common::validation::ErrorKind;
    use serde_json::json;

    #[test]
    fn test_todo_round_trip() {
        for payload in [json!({"item": "Buy milk"}), json!({"id": 4, "item": "Buy milk"})] {
            let todo = Todo::from_json(&payload).unwrap();
            assert_eq!(serde_json::to_value(&todo).unwrap(), payload);
        }
    }

    #[test]
    fn test_empty_item_is_invalid() {
        let errors = Todo::from_json(&json!({"item": ""})).unwrap_err();
        assert_eq!(errors.kind_of("item"), Some(ErrorKind::InvalidFormat));

        let errors = TodoItem::from_json(&json!({"item": "   "})).unwrap_err();
        assert_eq!(errors.kind_of("item"), Some(ErrorKind::InvalidFormat));
    }

    #[test]
    fn test_todo_reports_id_and_item_together() {
        let errors = Todo::from_json(&json!({"id": "one"})).unwrap_err();
        assert_eq!(errors.len(), 2);
        assert_eq!(errors.kind_of("id"), Some(ErrorKind::TypeMismatch));
        assert_eq!(errors.kind_of("item"), Some(ErrorKind::MissingField));
    }

    #[test]
    fn test_todo_from_form() {
        let form: FormFields = [("item", "Buy milk")].into_iter().collect();
        assert_eq!(
            Todo::from_form(&form).unwrap(),
            Todo {
                id: None,
                item: "Buy milk".to_string()
            }
        );

        let errors = Todo::from_form(&FormFields::default()).unwrap_err();
        assert_eq!(errors.kind_of("item"), Some(ErrorKind::MissingField));
    }

    #[test]
    fn test_todo_item_drops_id() {
        let todo = Todo::from_json(&json!({"id": 9, "item": "Buy milk"})).unwrap();
        let item = TodoItem::from(todo);
        assert_eq!(serde_json::to_value(&item).unwrap(), json!({"item": "Buy milk"}));
    }

    #[test]
    fn test_todo_items_envelope() {
        let payload = json!({
            "todos": [{"id": 1, "item": "Todo item 1"}, {"id": 2, "item": "Todo item 2"}]
        });
        let items = TodoItems::from_json(&payload).unwrap();
        assert_eq!(items.todos.len(), 2);
        assert_eq!(serde_json::to_value(&items).unwrap(), payload);

        let errors = TodoItems::from_json(&json!({"todos": [{"item": ""}]})).unwrap_err();
        assert_eq!(errors.kind_of("todos[0].item"), Some(ErrorKind::InvalidFormat));
    }
}
