pub mod education;
pub mod experience;
pub mod handlers;
pub mod ingest;
pub mod normalize;
pub mod personal;
pub mod primary;
pub mod projects;
pub mod prompts;
pub mod reconcile;
pub mod sanitize;
pub mod scoring;
pub mod sections;
pub mod skills;
pub mod validation;
