pub mod note;
pub mod user;

pub use note::{Note, NoteFields};
pub use user::User;
