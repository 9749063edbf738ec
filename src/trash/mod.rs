//! Safe deletion: every destructive path goes through the trash.

mod actions;
mod store;

pub use actions::{
    recover_selected, trash_by_extension, trash_file, trash_group, trash_large, RecoveryBatch,
    TrashBatch,
};
pub use store::{
    CollisionPolicy, SweepReport, TrashEntry, TrashFailure, TrashStore, DEFAULT_RETENTION_DAYS,
    DEFAULT_TRASH_DIR_NAME,
};
