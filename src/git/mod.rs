pub mod blame;
pub mod porcelain;
pub mod process;
pub mod repository;

pub use blame::{fetch_blame, BlameSource};
pub use process::{ProcessCommand, ProcessOutput, ProcessRunner, SystemRunner};
pub use repository::GitRepository;
