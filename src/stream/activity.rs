/// Append-only text that every commit snapshots in full.
///
/// One line per commit, `"<date> commit <index>\n"`, so the final blob doubles as
/// an audit trail of the whole history.
#[derive(Debug, Default)]
pub struct ActivityLog {
    buf: Vec<u8>,
    lines: usize,
}

impl ActivityLog {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn entry(date: &str, index: u32) -> String {
        format!("{date} commit {index}")
    }

    pub fn append(&mut self, line: &str) {
        self.buf.extend_from_slice(line.as_bytes());
        self.buf.push(b'\n');
        self.lines += 1;
    }

    /// Current content. The borrow keeps the log frozen while the snapshot is alive.
    pub fn snapshot(&self) -> &[u8] {
        &self.buf
    }

    pub fn lines(&self) -> usize {
        self.lines
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_append_accumulates_lines() {
        let mut log = ActivityLog::new();
        assert!(log.snapshot().is_empty());

        log.append(&ActivityLog::entry("2024-01-01", 1));
        assert_eq!(log.snapshot(), b"2024-01-01 commit 1\n");

        log.append(&ActivityLog::entry("2024-01-01", 2));
        assert_eq!(log.snapshot(), b"2024-01-01 commit 1\n2024-01-01 commit 2\n");
        assert_eq!(log.lines(), 2);
        assert_eq!(log.snapshot().len(), 40);
    }
}
