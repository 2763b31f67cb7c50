//! Fast-import stream synthesis: marks, the accumulating activity log, noon-anchored
//! timestamps and the byte-exact record framing, plus a reader that checks a stream
//! before it is handed to the importer.

pub mod activity;
pub mod encoder;
pub mod marks;
pub mod reader;
pub mod record;
pub mod timestamp;

pub use activity::ActivityLog;
pub use encoder::{EncodedStream, EncoderConfig, StreamEncoder, DEFAULT_BRANCH};
pub use marks::{Mark, MarkAllocator};
pub use reader::{check_stream, parse_stream, StreamSummary};
pub use record::{Blob, Commit, FileModify, Signature, StreamRecord, REGULAR_FILE_MODE};
pub use timestamp::{format_offset, parse_offset, Timestamp, TimestampSynthesizer, MAX_UNITS_PER_DAY};
