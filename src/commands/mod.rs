pub mod build;
pub mod identity;
pub mod init;
pub mod keygen;
pub mod publish;
