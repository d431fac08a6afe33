// handlers/public/auth/mod.rs - Public authentication handlers
//
// Token acquisition endpoints that do not require authentication.

pub mod login;  // POST /api/auth/Login - authenticate and get a bearer token
pub mod signup; // POST /api/auth/Signup - create new account

pub use login::login;
pub use signup::signup;
