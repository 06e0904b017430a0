pub mod aggregation;
pub mod chart;
pub mod config;
pub mod data_store;
pub mod filter;
pub mod layout;
pub mod processor;
pub mod semantic_model;
pub mod time_bucket;
pub mod utils;

pub use aggregation::{aggregate, Aggregator, DataPoint};
pub use chart::{ChartConfig, ChartSlot, VisualType};
pub use processor::{ChartRender, DashboardProcessor};
