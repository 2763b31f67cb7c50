pub mod importer;
pub mod init;
pub mod repo;

pub use importer::{GitCli, Importer};
pub use init::{InitDirective, InitScript};
pub use repo::GitRepo;
