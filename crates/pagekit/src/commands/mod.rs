pub mod build_all;
pub mod init;
pub mod layout;
pub mod new;
