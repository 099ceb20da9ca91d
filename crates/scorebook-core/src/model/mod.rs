pub mod record;
pub mod snapshot;
pub mod study;

pub use record::{PersistedPage, ScoreRecord, SnapshotRow};
pub use snapshot::{
    EncodedImageSection, ImageSource, ScorePageSnapshot, ScoreSnapshot, Snapshot, IMAGE_ENCODING,
    SNAPSHOT_FORMAT,
};
pub use study::{ApiConfig, PdfAttachment, VocabPage, WordItem};
