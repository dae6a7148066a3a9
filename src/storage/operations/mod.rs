// Storage operation traits and implementations
pub mod container;
pub mod delete;
pub mod download;
pub mod list;
pub mod upload;

pub use container::ContainerCreator;
pub use delete::Deleter;
pub use download::Downloader;
pub use list::Lister;
pub use upload::Uploader;
