use diesel::prelude::*;
use serde::Deserialize;

// No route creates or edits users; rows are seeded out of band.
#[derive(Debug, Queryable, Selectable)]
#[diesel(table_name = crate::schema::users)]
#[diesel(check_for_backend(diesel::sqlite::Sqlite))]
pub struct User {
    pub id: i32,
    pub username: String,
    pub password: String,
}

// the input to the sign-in handler
#[derive(Deserialize)]
pub struct Credentials {
    pub username: String,
    pub password: String,
}
