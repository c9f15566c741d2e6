pub mod init;
pub mod list;
pub mod prune;
pub mod scan;
pub mod source;
pub mod view;
