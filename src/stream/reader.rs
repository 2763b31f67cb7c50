use super::marks::Mark;
use super::record::{Blob, Commit, FileModify, Signature, StreamRecord};
use super::timestamp::{parse_offset, Timestamp};
use crate::error::{GreenwallError, Result};
use serde::Serialize;
use std::borrow::Cow;
use std::collections::HashSet;

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct StreamSummary {
    pub blobs: usize,
    pub commits: usize,
    pub file_ops: usize,
    pub highest_mark: u32,
    pub bytes: usize,
}

/// Structural check of a stream: byte-exact `data` prefixes, marks defined
/// exactly once before use, a single trailing `done`.
pub fn check_stream(input: &[u8]) -> Result<StreamSummary> {
    let records = parse_stream(input)?;
    let mut summary = StreamSummary {
        bytes: input.len(),
        ..StreamSummary::default()
    };
    for record in &records {
        match record {
            StreamRecord::Blob(blob) => {
                summary.blobs += 1;
                summary.highest_mark = summary.highest_mark.max(blob.mark.get());
            }
            StreamRecord::Commit(commit) => {
                summary.commits += 1;
                summary.file_ops += commit.file_ops.len();
            }
            StreamRecord::Done => {}
        }
    }
    Ok(summary)
}

/// Read a stream back into records that borrow blob data from `input`.
pub fn parse_stream(input: &[u8]) -> Result<Vec<StreamRecord<'_>>> {
    let mut cursor = Cursor { input, pos: 0 };
    let mut defined: HashSet<Mark> = HashSet::new();
    let mut records = Vec::new();

    loop {
        if cursor.at_end() {
            return Err(GreenwallError::malformed(cursor.pos, "stream ended without 'done'"));
        }
        let start = cursor.pos;
        let line = cursor.line()?;

        if line == "blob" {
            let mark_pos = cursor.pos;
            let mark_line = cursor.line()?;
            let mark = mark_line
                .strip_prefix("mark ")
                .ok_or_else(|| GreenwallError::malformed(mark_pos, "blob without mark"))
                .and_then(|m| parse_mark(m, mark_pos))?;
            if !defined.insert(mark) {
                return Err(GreenwallError::malformed(mark_pos, format!("mark {mark} redefined")));
            }
            let data = cursor.data()?;
            records.push(StreamRecord::Blob(Blob {
                mark,
                data: Cow::Borrowed(data),
            }));
        } else if let Some(branch) = line.strip_prefix("commit ") {
            let commit = parse_commit(&mut cursor, branch, &defined)?;
            records.push(StreamRecord::Commit(commit));
        } else if line == "done" {
            if !cursor.at_end() {
                return Err(GreenwallError::malformed(cursor.pos, "bytes after 'done'"));
            }
            records.push(StreamRecord::Done);
            return Ok(records);
        } else {
            return Err(GreenwallError::malformed(start, format!("unexpected command '{line}'")));
        }
    }
}

fn parse_commit(cursor: &mut Cursor<'_>, branch: &str, defined: &HashSet<Mark>) -> Result<Commit> {
    let author_pos = cursor.pos;
    let author = parse_signature(cursor.line()?, "author ", author_pos)?;
    let committer_pos = cursor.pos;
    let committer = parse_signature(cursor.line()?, "committer ", committer_pos)?;
    let message_pos = cursor.pos;
    let message = std::str::from_utf8(cursor.data()?)
        .map_err(|_| GreenwallError::malformed(message_pos, "commit message is not UTF-8"))?
        .to_string();

    let mut file_ops = Vec::new();
    while cursor.peek_starts_with(b"M ") {
        let op_pos = cursor.pos;
        let op = parse_file_modify(cursor.line()?, op_pos)?;
        if !defined.contains(&op.mark) {
            return Err(GreenwallError::malformed(
                op_pos,
                format!("mark {} used before definition", op.mark),
            ));
        }
        file_ops.push(op);
    }

    Ok(Commit {
        branch: branch.to_string(),
        author,
        committer,
        message,
        file_ops,
    })
}

fn parse_signature(line: &str, role: &str, pos: usize) -> Result<Signature> {
    let bad = |what: &str| GreenwallError::malformed(pos, format!("bad {}line: {what}", role));
    let rest = line.strip_prefix(role).ok_or_else(|| bad("missing role"))?;
    let open = rest.find('<').ok_or_else(|| bad("missing '<'"))?;
    let close = rest[open..].find('>').map(|i| open + i).ok_or_else(|| bad("missing '>'"))?;
    let name = rest[..open].trim_end().to_string();
    let email = rest[open + 1..close].to_string();

    let mut when = rest[close + 1..].split_whitespace();
    let seconds = when
        .next()
        .and_then(|s| s.parse::<i64>().ok())
        .ok_or_else(|| bad("bad timestamp"))?;
    let offset = when
        .next()
        .ok_or_else(|| bad("missing offset"))
        .and_then(|o| parse_offset(o).map_err(|_| bad("bad offset")))?;
    if when.next().is_some() {
        return Err(bad("trailing fields"));
    }

    Ok(Signature {
        name,
        email,
        when: Timestamp { seconds, offset },
    })
}

fn parse_file_modify(line: &str, pos: usize) -> Result<FileModify> {
    let mut parts = line.splitn(4, ' ');
    let (mode, mark, path) = match (parts.next(), parts.next(), parts.next(), parts.next()) {
        (Some("M"), Some(mode), Some(mark), Some(path)) if !path.is_empty() => (mode, mark, path),
        _ => return Err(GreenwallError::malformed(pos, format!("bad file operation '{line}'"))),
    };
    Ok(FileModify {
        mode: mode.to_string(),
        mark: parse_mark(mark, pos)?,
        path: path.to_string(),
    })
}

fn parse_mark(token: &str, pos: usize) -> Result<Mark> {
    token
        .strip_prefix(':')
        .and_then(|n| n.parse::<u32>().ok())
        .filter(|n| *n > 0)
        .map(Mark::from)
        .ok_or_else(|| GreenwallError::malformed(pos, format!("bad mark '{token}'")))
}

struct Cursor<'a> {
    input: &'a [u8],
    pos: usize,
}

impl<'a> Cursor<'a> {
    fn at_end(&self) -> bool {
        self.pos >= self.input.len()
    }

    fn peek_starts_with(&self, prefix: &[u8]) -> bool {
        self.input[self.pos..].starts_with(prefix)
    }

    fn line(&mut self) -> Result<&'a str> {
        let input = self.input;
        let rest = &input[self.pos..];
        let end = rest
            .iter()
            .position(|&b| b == b'\n')
            .ok_or_else(|| GreenwallError::malformed(self.pos, "unterminated line"))?;
        let line = std::str::from_utf8(&rest[..end])
            .map_err(|_| GreenwallError::malformed(self.pos, "command line is not UTF-8"))?;
        self.pos += end + 1;
        Ok(line)
    }

    /// `data <n>\n` followed by exactly n bytes and an optional LF.
    fn data(&mut self) -> Result<&'a [u8]> {
        let pos = self.pos;
        let header = self.line()?;
        let len = header
            .strip_prefix("data ")
            .filter(|n| !n.is_empty() && n.bytes().all(|b| b.is_ascii_digit()))
            .and_then(|n| n.parse::<usize>().ok())
            .ok_or_else(|| GreenwallError::malformed(pos, format!("expected 'data <n>', got '{header}'")))?;
        let available = self.input.len() - self.pos;
        if len > available {
            return Err(GreenwallError::malformed(
                self.pos,
                format!("data declares {len} bytes but only {available} remain"),
            ));
        }
        let input = self.input;
        let data = &input[self.pos..self.pos + len];
        self.pos += len;
        if self.peek_starts_with(b"\n") {
            self.pos += 1;
        }
        Ok(data)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_data_length_must_be_plain_digits() {
        for header in ["data +2", "data -2", "data ", "data 2 "] {
            let stream = format!("blob\nmark :1\n{header}\nhi\ndone\n");
            let err = parse_stream(stream.as_bytes()).unwrap_err();
            assert!(
                matches!(err, GreenwallError::MalformedStream { .. }),
                "{header:?} was accepted"
            );
        }
        assert!(parse_stream(b"blob\nmark :1\ndata 2\nhi\ndone\n").is_ok());
    }

    #[test]
    fn test_rejects_short_data() {
        let err = parse_stream(b"blob\nmark :1\ndata 10\nabc\ndone\n").unwrap_err();
        assert!(matches!(err, GreenwallError::MalformedStream { .. }));
    }

    #[test]
    fn test_rejects_forward_reference() {
        let stream = b"commit refs/heads/main\n\
author a <a@x> 0 +0000\n\
committer a <a@x> 0 +0000\n\
data 2\nhi\n\
M 100644 :1 README.md\n\
done\n";
        let err = parse_stream(stream).unwrap_err();
        assert!(err.to_string().contains("used before definition"));
    }

    #[test]
    fn test_requires_done_and_nothing_after() {
        assert!(parse_stream(b"blob\nmark :1\ndata 0\n\n").is_err());
        assert!(parse_stream(b"done\nblob\n").is_err());
        assert_eq!(parse_stream(b"done\n").unwrap(), vec![StreamRecord::Done]);
    }

    #[test]
    fn test_counts_multibyte_content_in_bytes() {
        // "é" is two bytes
        let summary = check_stream("blob\nmark :1\ndata 2\né\ndone\n".as_bytes()).unwrap();
        assert_eq!(summary.blobs, 1);
        assert_eq!(summary.highest_mark, 1);
    }
}
