//! Output sinks: URL/regex/email logs and the mirrored download tree, each
//! serialized under its own mutex so lines never interleave across workers.

use std::fs::{self, File, OpenOptions};
use std::io::Write;
use std::path::{Path, PathBuf};
use std::sync::Mutex;

use url::Url;

use crate::config::Config;
use crate::error::SpiderError;

/// A line-oriented sink: url log, regex log, email log. Falls back to stdout
/// when no file path was configured.
enum LineTarget {
    File(File),
    Stdout,
}

pub struct LineWriter {
    target: Mutex<LineTarget>,
}

impl LineWriter {
    pub fn new(path: Option<&Path>) -> Result<Self, SpiderError> {
        let target = match path {
            Some(p) => LineTarget::File(OpenOptions::new().create(true).append(true).open(p)?),
            None => LineTarget::Stdout,
        };
        Ok(LineWriter {
            target: Mutex::new(target),
        })
    }

    pub fn append(&self, line: &str) -> Result<(), SpiderError> {
        let mut target = self.target.lock().unwrap();
        match &mut *target {
            LineTarget::File(f) => writeln!(f, "{line}")?,
            LineTarget::Stdout => println!("{line}"),
        }
        Ok(())
    }
}

/// The mirrored-download sink rooted at `out_dir`.
pub struct BlobWriter {
    root: PathBuf,
    lock: Mutex<()>,
}

impl BlobWriter {
    pub fn new(root: PathBuf) -> Self {
        BlobWriter {
            root,
            lock: Mutex::new(()),
        }
    }

    /// Writes `body` at the computed path for `url`, creating intermediate
    /// directories as needed and suffixing `/directory_content` if the
    /// computed path already names an existing directory.
    pub fn write(&self, url: &Url, body: &[u8]) -> Result<(), SpiderError> {
        let _guard = self.lock.lock().unwrap();
        let mut path = self.root.join(download_path(url));
        if path.is_dir() {
            path = path.join("directory_content");
        }
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent)?;
        }
        fs::write(path, body)?;
        Ok(())
    }
}

/// `<host>/<path_dirs>/<last_segment>[;params][?query][#fragment]`.
fn download_path(url: &Url) -> PathBuf {
    let host = url.host_str().unwrap_or("unknown-host");
    let mut path = PathBuf::from(host);

    let segments: Vec<&str> = url
        .path()
        .split('/')
        .filter(|s| !s.is_empty())
        .collect();
    for dir in segments.iter().take(segments.len().saturating_sub(1)) {
        path.push(dir);
    }

    let mut last = segments.last().copied().unwrap_or("index").to_string();
    if let Some(query) = url.query() {
        last.push('?');
        last.push_str(query);
    }
    if let Some(fragment) = url.fragment() {
        last.push('#');
        last.push_str(fragment);
    }
    path.push(last);
    path
}

/// Whether a URL qualifies for download under the configured rules:
/// everything qualifies if no rule is set, else any matching rule admits it.
pub fn qualifies_for_download(config: &Config, url: &Url) -> bool {
    if !config.selective_download() {
        return true;
    }
    let path = url.path();

    let ext_match = crate::binary_ext::path_extension(path)
        .is_some_and(|ext| config.download_extensions.iter().any(|e| e == &ext));

    let regex_match = config.download_regexes.iter().any(|re| {
        re.find(&path.to_ascii_lowercase())
            .is_some_and(|m| m.start() == 0)
    });

    let within_match = config
        .download_within
        .iter()
        .any(|prefix| path.trim_start_matches('/').starts_with(prefix.trim_start_matches('/')));

    ext_match || regex_match || within_match
}

pub fn format_regex_record(url: &Url, line_number: usize, matched: &str) -> String {
    format!("{url}:{line_number}: {matched}")
}

pub fn format_email_record(address: &str, name: Option<&str>) -> String {
    match name {
        Some(name) => format!("{name} <{address}>"),
        None => address.to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn download_path_uses_host_and_segments() {
        let url = Url::parse("http://a.test/dir/file.txt").unwrap();
        assert_eq!(download_path(&url), PathBuf::from("a.test/dir/file.txt"));
    }

    #[test]
    fn download_path_appends_query_and_fragment() {
        let url = Url::parse("http://a.test/f?x=1#y").unwrap();
        assert_eq!(download_path(&url), PathBuf::from("a.test/f?x=1#y"));
    }

    #[test]
    fn email_record_without_name_is_bare_address() {
        assert_eq!(format_email_record("a@b.test", None), "a@b.test");
    }

    #[test]
    fn email_record_with_name_wraps_address_in_brackets() {
        assert_eq!(
            format_email_record("jane@x.test", Some("Jane Roe")),
            "Jane Roe <jane@x.test>"
        );
    }

    #[test]
    fn blob_writer_creates_intermediate_dirs_and_writes_file() {
        let dir = tempfile::tempdir().unwrap();
        let writer = BlobWriter::new(dir.path().to_path_buf());
        let url = Url::parse("http://a.test/deep/path/file.txt").unwrap();
        writer.write(&url, b"hello").unwrap();
        let written = fs::read(dir.path().join("a.test/deep/path/file.txt")).unwrap();
        assert_eq!(written, b"hello");
    }
}
