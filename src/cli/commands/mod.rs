mod deploy;
mod destroy;
mod group;
pub mod helpers;
mod init;
mod status;

pub use deploy::execute_deploy;
pub use destroy::execute_destroy;
pub use group::execute_group;
pub use init::execute_init;
pub use status::execute_status;
