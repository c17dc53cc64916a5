pub mod init;
pub mod run;
pub mod trace;
