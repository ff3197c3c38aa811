pub mod index;
pub mod resolver;
pub mod sync;

pub use index::{AssetIndex, IMAGE_EXTENSIONS};
pub use resolver::{
    DEFAULT_FUZZY_THRESHOLD, DEFAULT_PREFIX, Reconciler, ReconcilerConfig, similarity_ratio,
};
pub use sync::{SyncReport, Unresolved, sync_images};
