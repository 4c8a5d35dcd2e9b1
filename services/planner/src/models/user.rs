//! User model and related functionality
//!
//! Signup and signin payloads are built by composition: [`NewUser`] is a
//! [`User`] plus a password, [`StoredUser`] is a [`User`] plus its store id.

use common::validation::{
    Email, FormFields, FormSchema, JsonFields, Schema, ValidationErrors,
};
use serde::Serialize;
use serde_json::Value;
use utoipa::ToSchema;

use super::event::Event;

/// User entity
#[derive(Debug, Clone, PartialEq, Serialize, ToSchema)]
#[schema(example = json!({
    "email": "fastapi@packt.com",
    "username": "fastapipackt001",
    "events": []
}))]
pub struct User {
    #[schema(value_type = String)]
    pub email: Email,
    pub username: String,
    /// Snapshot of the events the user registered for
    pub events: Vec<Event>,
}

impl User {
    pub(crate) fn read(fields: &mut JsonFields<'_>) -> Option<Self> {
        let email = fields.email("email");
        let username = fields.string("username");
        let events = fields.optional_list::<Event>("events");

        Some(Self {
            email: email?,
            username: username?,
            events: events?,
        })
    }
}

impl Schema for User {
    fn from_json(value: &Value) -> Result<Self, ValidationErrors> {
        let mut fields = JsonFields::new(value);
        let user = Self::read(&mut fields);
        fields.conclude(user)
    }
}

impl FormSchema for User {
    fn from_form(form: &FormFields) -> Result<Self, ValidationErrors> {
        let mut reader = form.reader();
        let email = reader.email("email");
        let username = reader.string("username");
        let user = email.zip(username).map(|(email, username)| User {
            email,
            username,
            events: Vec::new(),
        });
        reader.conclude(user)
    }
}

/// User with the identifier assigned by the store
#[derive(Debug, Clone, PartialEq, Serialize, ToSchema)]
#[schema(example = json!({
    "id": 1,
    "email": "fastapi@packt.com",
    "username": "fastapipackt001",
    "events": []
}))]
pub struct StoredUser {
    pub id: i64,
    #[serde(flatten)]
    pub user: User,
}

/// New user creation payload
#[derive(Debug, Clone, PartialEq, Serialize, ToSchema)]
#[schema(example = json!({
    "email": "fastapi@packt.com",
    "password": "Stro0ng!",
    "username": "FastPackt"
}))]
pub struct NewUser {
    #[serde(flatten)]
    pub user: User,
    pub password: String,
}

impl Schema for NewUser {
    fn from_json(value: &Value) -> Result<Self, ValidationErrors> {
        let mut fields = JsonFields::new(value);
        let user = User::read(&mut fields);
        let password = fields.string("password");
        let new_user = user
            .zip(password)
            .map(|(user, password)| NewUser { user, password });
        fields.conclude(new_user)
    }
}

impl FormSchema for NewUser {
    fn from_form(form: &FormFields) -> Result<Self, ValidationErrors> {
        UserSignUp::from_form(form).map(NewUser::from)
    }
}

/// Flat signup form
#[derive(Debug, Clone, PartialEq, Serialize, ToSchema)]
#[schema(example = json!({
    "email": "fastapi@packt.com",
    "username": "FastPackt",
    "password": "Stro0ng!"
}))]
pub struct UserSignUp {
    #[schema(value_type = String)]
    pub email: Email,
    pub username: String,
    pub password: String,
}

impl Schema for UserSignUp {
    fn from_json(value: &Value) -> Result<Self, ValidationErrors> {
        let mut fields = JsonFields::new(value);
        let email = fields.email("email");
        let username = fields.string("username");
        let password = fields.string("password");
        let signup = match (email, username, password) {
            (Some(email), Some(username), Some(password)) => Some(UserSignUp {
                email,
                username,
                password,
            }),
            _ => None,
        };
        fields.conclude(signup)
    }
}

impl FormSchema for UserSignUp {
    fn from_form(form: &FormFields) -> Result<Self, ValidationErrors> {
        let mut reader = form.reader();
        let email = reader.email("email");
        let username = reader.string("username");
        let password = reader.string("password");
        let signup = match (email, username, password) {
            (Some(email), Some(username), Some(password)) => Some(UserSignUp {
                email,
                username,
                password,
            }),
            _ => None,
        };
        reader.conclude(signup)
    }
}

impl From<UserSignUp> for NewUser {
    fn from(signup: UserSignUp) -> Self {
        NewUser {
            user: User {
                email: signup.email,
                username: signup.username,
                events: Vec::new(),
            },
            password: signup.password,
        }
    }
}

/// User signin credentials
#[derive(Debug, Clone, PartialEq, Serialize, ToSchema)]
#[schema(example = json!({
    "email": "fastapi@packt.com",
    "password": "Stro0ng!"
}))]
pub struct UserSignIn {
    #[schema(value_type = String)]
    pub email: Email,
    pub password: String,
}

impl Schema for UserSignIn {
    fn from_json(value: &Value) -> Result<Self, ValidationErrors> {
        let mut fields = JsonFields::new(value);
        let email = fields.email("email");
        let password = fields.string("password");
        let signin = email
            .zip(password)
            .map(|(email, password)| UserSignIn { email, password });
        fields.conclude(signin)
    }
}

impl FormSchema for UserSignIn {
    fn from_form(form: &FormFields) -> Result<Self, ValidationErrors> {
        let mut reader = form.reader();
        let email = reader.email("email");
        let password = reader.string("password");
        let signin = email
            .zip(password)
            .map(|(email, password)| UserSignIn { email, password });
        reader.conclude(signin)
    }
}
