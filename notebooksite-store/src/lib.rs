pub mod convert;
pub mod error;
pub mod model;
mod process;
pub mod render;
pub mod repository;
pub mod update;

pub use convert::{Converter, NbConvert};
pub use error::{Result, StoreError};
pub use model::{NotebookEntry, NotebookIndex};
pub use render::RenderCache;
pub use repository::NotebookRepository;
pub use update::{Git, UpdateTrigger, VersionControl};
