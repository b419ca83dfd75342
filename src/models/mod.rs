pub mod answer;
pub mod filters;
pub mod run_config;

pub use answer::Answer;
pub use filters::{ExperienceLevel, JobType, SortMode, TimePosted, WorkplaceType};
pub use run_config::{FilterSelection, RunConfig, UserInputs};
