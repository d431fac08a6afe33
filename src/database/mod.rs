pub mod manager;
pub mod models;
pub mod notes;
pub mod users;

pub use manager::{Database, DatabaseError};
pub use notes::NoteRepository;
pub use users::UserRepository;
