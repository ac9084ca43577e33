use diesel::prelude::*;
use serde::{Deserialize, Serialize};

// the input to the create-post handler
#[derive(Deserialize, Insertable)]
#[diesel(table_name = crate::schema::posts)]
#[diesel(check_for_backend(diesel::sqlite::Sqlite))]
pub struct NewPost {
    pub title: String,
    pub body: String,
}

// only the mutable fields; updates never touch id or user_id
#[derive(Deserialize, AsChangeset)]
#[diesel(table_name = crate::schema::posts)]
pub struct UpdatePost {
    pub title: String,
    pub body: String,
}

#[derive(Serialize, Debug, Queryable, Selectable)]
#[diesel(table_name = crate::schema::posts)]
#[diesel(check_for_backend(diesel::sqlite::Sqlite))]
pub struct Post {
    pub id: i32,
    pub title: String,
    pub body: String,
    pub user_id: Option<i32>,
}
