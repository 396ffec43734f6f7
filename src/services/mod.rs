pub mod backup_service;
pub mod executor;
pub mod health_service;
pub mod registry;
pub mod workspace;

pub use backup_service::{BackupService, BackupTarget};
pub use executor::CommandExecutor;
pub use health_service::HealthService;
pub use registry::CommandRegistry;
pub use workspace::Workspace;
