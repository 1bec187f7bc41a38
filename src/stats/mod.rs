pub mod cache;
pub mod convert;
pub mod dataset;
pub mod types;

pub use cache::CacheConfig;
pub use dataset::{default_data_path, load_dataset, DataSource, Dataset};
pub use types::{PlayerSeason, Position, ScoredPlayerSeason};
