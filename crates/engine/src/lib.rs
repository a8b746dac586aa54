pub use categories::{Category, CategoryInput, CategoryType};
pub use currency::Currency;
pub use error::EngineError;
pub use ops::{Categories, CategoryLookup, Currencies, Engine, EngineBuilder, ProjectLookup};
pub use project::{PROJECT_EXPANSION, Project, ProjectField, Ref, Referenced};
pub use project_members::MemberRole;
pub use users::User;
pub use validation::{FindById, is_valid_and_exist, is_valid_id};

mod categories;
mod currency;
mod error;
mod ops;
mod project;
mod project_currencies;
mod project_members;
mod user_projects;
mod users;
mod util;
mod validation;

type ResultEngine<T> = Result<T, EngineError>;
