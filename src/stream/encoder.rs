use super::activity::ActivityLog;
use super::marks::{Mark, MarkAllocator};
use super::record::{Blob, Commit, FileModify, Signature, StreamRecord};
use super::timestamp::TimestampSynthesizer;
use crate::calendar::Calendar;
use crate::config::Identity;
use crate::error::Result;
use crate::layout::{RepoLayout, ACTIVITY_LOG_FILE, STATIC_FILE};
use crate::util::parse_day;
use std::borrow::Cow;
use tracing::debug;

pub const DEFAULT_BRANCH: &str = "refs/heads/main";

/// Everything a session needs besides the calendar itself.
#[derive(Debug, Clone)]
pub struct EncoderConfig {
    pub branch: String,
    pub identity: Identity,
    pub static_path: String,
    pub static_content: String,
    pub log_path: String,
    pub clock: TimestampSynthesizer,
}

impl EncoderConfig {
    pub fn new(identity: Identity, static_content: impl Into<String>) -> Self {
        Self {
            branch: DEFAULT_BRANCH.to_string(),
            identity,
            static_path: STATIC_FILE.to_string(),
            static_content: static_content.into(),
            log_path: ACTIVITY_LOG_FILE.to_string(),
            clock: TimestampSynthesizer::utc(),
        }
    }

    /// README content and both file paths taken from the repository layout.
    pub fn for_layout(layout: &RepoLayout, identity: Identity) -> Self {
        Self {
            static_path: layout.static_file().to_string(),
            log_path: layout.log_file().to_string(),
            ..Self::new(identity, layout.readme())
        }
    }

    pub fn with_branch(mut self, branch: impl Into<String>) -> Self {
        self.branch = branch.into();
        self
    }

    pub fn with_clock(mut self, clock: TimestampSynthesizer) -> Self {
        self.clock = clock;
        self
    }
}

/// A complete, `done`-terminated stream plus what went into it.
#[derive(Debug, Clone)]
pub struct EncodedStream {
    pub bytes: Vec<u8>,
    pub commit_count: usize,
    pub blob_count: usize,
    pub last_mark: Mark,
}

pub struct StreamEncoder {
    config: EncoderConfig,
}

impl StreamEncoder {
    pub fn new(config: EncoderConfig) -> Self {
        Self { config }
    }

    pub fn config(&self) -> &EncoderConfig {
        &self.config
    }

    /// Build the whole stream in memory. On error nothing is returned, so no
    /// partial stream can reach the importer.
    pub fn encode(&self, calendar: &Calendar) -> Result<EncodedStream> {
        let mut session = EncodeSession::new(&self.config);
        let static_mark = session.static_blob()?;

        for day in calendar.days() {
            let anchor = parse_day(&day.date)?;
            for i in 0..day.count {
                let index = i + 1;
                let log_mark = session.log_blob(&day.date, index)?;
                let when = self.config.clock.at(anchor, i)?;
                let signature = Signature {
                    name: self.config.identity.name.clone(),
                    email: self.config.identity.email.clone(),
                    when,
                };
                let commit = Commit {
                    branch: self.config.branch.clone(),
                    author: signature.clone(),
                    committer: signature,
                    message: format!("Contribution on {} ({}/{})", day.date, index, day.count),
                    file_ops: vec![
                        FileModify::regular(static_mark, self.config.static_path.as_str()),
                        FileModify::regular(log_mark, self.config.log_path.as_str()),
                    ],
                };
                session.emit(&StreamRecord::Commit(commit))?;
            }
        }

        Ok(session.finish()?)
    }
}

/// Per-call state. Dropped when the encode returns, so sessions never share marks or log content.
struct EncodeSession<'c> {
    config: &'c EncoderConfig,
    marks: MarkAllocator,
    log: ActivityLog,
    out: Vec<u8>,
    commits: usize,
    blobs: usize,
}

impl<'c> EncodeSession<'c> {
    fn new(config: &'c EncoderConfig) -> Self {
        Self {
            config,
            marks: MarkAllocator::new(),
            log: ActivityLog::new(),
            out: Vec::new(),
            commits: 0,
            blobs: 0,
        }
    }

    fn static_blob(&mut self) -> std::io::Result<Mark> {
        let config = self.config;
        let mark = self.marks.allocate();
        let record = StreamRecord::Blob(Blob {
            mark,
            data: Cow::Borrowed(config.static_content.as_bytes()),
        });
        self.emit(&record)?;
        Ok(mark)
    }

    fn log_blob(&mut self, date: &str, index: u32) -> std::io::Result<Mark> {
        self.log.append(&ActivityLog::entry(date, index));
        let mark = self.marks.allocate();
        let record = StreamRecord::Blob(Blob {
            mark,
            data: Cow::Borrowed(self.log.snapshot()),
        });
        record.write_to(&mut self.out)?;
        self.blobs += 1;
        Ok(mark)
    }

    fn emit(&mut self, record: &StreamRecord<'_>) -> std::io::Result<()> {
        record.write_to(&mut self.out)?;
        match record {
            StreamRecord::Blob(_) => self.blobs += 1,
            StreamRecord::Commit(_) => self.commits += 1,
            StreamRecord::Done => {}
        }
        Ok(())
    }

    fn finish(mut self) -> std::io::Result<EncodedStream> {
        self.emit(&StreamRecord::Done)?;
        debug!(
            commits = self.commits,
            blobs = self.blobs,
            log_lines = self.log.lines(),
            bytes = self.out.len(),
            "encoded fast-import stream"
        );
        Ok(EncodedStream {
            bytes: self.out,
            commit_count: self.commits,
            blob_count: self.blobs,
            last_mark: Mark::from(self.marks.issued()),
        })
    }
}
