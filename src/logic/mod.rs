pub mod calculations;
pub mod field_details;
pub mod filters;
pub mod seeding;

pub use field_details::{FieldDetails, FieldDetailsService};
pub use seeding::{SeedPlan, SeedSummary, Seeder};
