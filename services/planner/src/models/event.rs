//! Event model and related functionality

use common::validation::{JsonFields, Schema, ValidationErrors};
use serde::Serialize;
use serde_json::Value;
use utoipa::ToSchema;

/// Event fields without a store identity; the payload for creating an event
#[derive(Debug, Clone, PartialEq, Serialize, ToSchema)]
#[schema(example = json!({
    "title": "FastAPI Book Launch",
    "image": "https://linktomyimage.com/image.png",
    "description": "We will be discussing the contents of the FastAPI book in this event. Ensure to come with your own copy to win gifts!",
    "tags": ["python", "fastapi", "book", "launch"],
    "location": "Google Meet"
}))]
pub struct EventDetails {
    pub title: String,
    /// Link to the event banner
    pub image: String,
    pub description: String,
    /// Tags in submission order
    pub tags: Vec<String>,
    pub location: String,
}

impl EventDetails {
    pub(crate) fn read(fields: &mut JsonFields<'_>) -> Option<Self> {
        let title = fields.string("title");
        let image = fields.string("image");
        let description = fields.string("description");
        let tags = fields.string_list("tags");
        let location = fields.string("location");

        Some(Self {
            title: title?,
            image: image?,
            description: description?,
            tags: tags?,
            location: location?,
        })
    }
}

impl Schema for EventDetails {
    fn from_json(value: &Value) -> Result<Self, ValidationErrors> {
        let mut fields = JsonFields::new(value);
        let details = Self::read(&mut fields);
        fields.conclude(details)
    }
}

/// Event entity
#[derive(Debug, Clone, PartialEq, Serialize, ToSchema)]
#[schema(example = json!({
    "id": 1,
    "title": "FastAPI Book Launch",
    "image": "https://linktomyimage.com/image.png",
    "description": "We will be discussing the contents of the FastAPI book in this event. Ensure to come with your own copy to win gifts!",
    "tags": ["python", "fastapi", "book", "launch"],
    "location": "Google Meet"
}))]
pub struct Event {
    /// Identifier assigned by the store
    pub id: i64,
    #[serde(flatten)]
    pub details: EventDetails,
}

impl Schema for Event {
    fn from_json(value: &Value) -> Result<Self, ValidationErrors> {
        let mut fields = JsonFields::new(value);
        let id = fields.integer("id");
        let details = EventDetails::read(&mut fields);
        let event = id.zip(details).map(|(id, details)| Event { id, details });
        fields.conclude(event)
    }
}
