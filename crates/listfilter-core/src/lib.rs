pub mod app_config;
pub mod config;
pub mod control_spec;
pub mod error;
pub mod memtree;
pub mod node;
pub mod page;
mod selector;

pub use app_config::{AppConfig, Environment};
pub use config::{load_app_config, load_app_config_from_env};
pub use control_spec::RawControl;
pub use error::ConfigError;
pub use memtree::{MemNode, NodeSpec};
pub use node::NodeQuery;
pub use page::{load_page, parse_page, PageFile};
