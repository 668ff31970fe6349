mod metadata;

pub use metadata::{ExtractedMetadata, MetadataRequest};
