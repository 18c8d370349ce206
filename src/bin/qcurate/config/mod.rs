mod curate;

pub use curate::build_curate_config;
