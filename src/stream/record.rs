use super::marks::Mark;
use super::timestamp::Timestamp;
use std::borrow::Cow;
use std::io::{self, Write};

pub const REGULAR_FILE_MODE: &str = "100644";

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Signature {
    pub name: String,
    pub email: String,
    pub when: Timestamp,
}

/// `M <mode> <mark> <path>`
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FileModify {
    pub mode: String,
    pub mark: Mark,
    pub path: String,
}

impl FileModify {
    pub fn regular(mark: Mark, path: impl Into<String>) -> Self {
        Self {
            mode: REGULAR_FILE_MODE.to_string(),
            mark,
            path: path.into(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Blob<'a> {
    pub mark: Mark,
    pub data: Cow<'a, [u8]>,
}

impl Blob<'_> {
    pub fn content_length(&self) -> usize {
        self.data.len()
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Commit {
    pub branch: String,
    pub author: Signature,
    pub committer: Signature,
    pub message: String,
    pub file_ops: Vec<FileModify>,
}

impl Commit {
    pub fn message_length(&self) -> usize {
        self.message.len()
    }
}

/// One record of a fast-import stream.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum StreamRecord<'a> {
    Blob(Blob<'a>),
    Commit(Commit),
    Done,
}

impl StreamRecord<'_> {
    /// Write the record in its exact wire form. Length prefixes count bytes.
    pub fn write_to<W: Write>(&self, out: &mut W) -> io::Result<()> {
        match self {
            StreamRecord::Blob(blob) => {
                writeln!(out, "blob\nmark {}\ndata {}", blob.mark, blob.content_length())?;
                out.write_all(&blob.data)?;
                out.write_all(b"\n")
            }
            StreamRecord::Commit(commit) => {
                writeln!(out, "commit {}", commit.branch)?;
                write_signature(out, "author", &commit.author)?;
                write_signature(out, "committer", &commit.committer)?;
                writeln!(out, "data {}", commit.message_length())?;
                out.write_all(commit.message.as_bytes())?;
                out.write_all(b"\n")?;
                for op in &commit.file_ops {
                    writeln!(out, "M {} {} {}", op.mode, op.mark, op.path)?;
                }
                Ok(())
            }
            StreamRecord::Done => out.write_all(b"done\n"),
        }
    }
}

fn write_signature<W: Write>(out: &mut W, role: &str, sig: &Signature) -> io::Result<()> {
    writeln!(out, "{} {} <{}> {}", role, sig.name, sig.email, sig.when)
}
