//! Repository layer.
//!
//! Each repository is a zero-sized struct providing async CRUD methods
//! that accept `&PgPool` as the first argument.

pub mod angle_repo;
pub mod product_repo;
pub mod project_repo;
pub mod script_repo;

pub use angle_repo::AngleRepo;
pub use product_repo::ProductRepo;
pub use project_repo::ProjectRepo;
pub use script_repo::ScriptRepo;
