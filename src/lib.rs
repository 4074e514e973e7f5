pub mod browser;
pub mod cli;
pub mod config;
pub mod data;
pub mod error;
pub mod export;
pub mod pages;
pub mod session;
pub mod steps;
pub mod wait;

//  Re-export commonly used items
pub use browser::chrome::{ChromeDriver, ConnectionMode};
pub use browser::element::{Element, Selector};
pub use cli::{Cli, CliOutput, CliRunner};
pub use config::E2eConfig;
pub use data::{DiskData, FileData, OrganizationData, ProjectData, SecretData, UserData};
pub use error::{E2eError, Result};
pub use export::AppExport;
pub use pages::manager::PageManager;
pub use pages::{PageContext, PageObject};
pub use session::TestSession;
pub use steps::StepsManager;
