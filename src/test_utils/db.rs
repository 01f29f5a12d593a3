use rusqlite::Connection;

use crate::{
    auth::{PasswordHash, User, create_user},
    category::{Category, CategoryName, create_category},
    db::initialize,
};

pub(crate) fn get_test_connection() -> Connection {
    let connection = Connection::open_in_memory().expect("Could not open in-memory database");
    initialize(&connection).expect("Could not initialize database");
    connection
}

pub(crate) fn create_test_user(username: &str, connection: &Connection) -> User {
    create_user(
        username,
        &format!("{username}@example.com"),
        PasswordHash::new_unchecked("hunter2"),
        connection,
    )
    .expect("Could not create test user")
}

pub(crate) fn create_test_category(name: &str, connection: &Connection) -> Category {
    create_category(CategoryName::new_unchecked(name), connection)
        .expect("Could not create test category")
}
