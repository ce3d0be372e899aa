//! The fixed binary-extension skip list, preserved verbatim.
//!
//! Used by the fetcher to short-circuit a GET when downloading is enabled
//! *selectively* and a candidate URL both fails every download rule and ends
//! in one of these extensions.

use once_cell::sync::Lazy;
use std::collections::HashSet;

const EXTENSIONS: &[&str] = &[
    "3dm", "3ds", "3g2", "3gp", "7z", "a", "aac", "adp", "ai", "aif", "aiff", "alz", "ape", "apk",
    "ar", "arj", "asf", "au", "avi", "bak", "baml", "bh", "bin", "bk", "bmp", "btif", "bz2",
    "bzip2", "cab", "caf", "cgm", "class", "cmx", "cpio", "cr2", "cur", "dat", "dcm", "deb", "dex",
    "djvu", "dll", "dmg", "dng", "doc", "docm", "docx", "dot", "dotm", "dra", "DS_Store", "dsk",
    "dts", "dtshd", "dvb", "dwg", "dxf", "ecelp4800", "ecelp7470", "ecelp9600", "egg", "eol",
    "eot", "epub", "exe", "f4v", "fbs", "fh", "fla", "flac", "fli", "flv", "fpx", "fst", "fvt",
    "g3", "gh", "gif", "graffle", "gz", "gzip", "h261", "h263", "h264", "icns", "ico", "ief",
    "img", "ipa", "iso", "jar", "jpeg", "jpg", "jpgv", "jpm", "jxr", "key", "ktx", "lha", "lib",
    "lvp", "lz", "lzh", "lzma", "lzo", "m3u", "m4a", "m4v", "mar", "mdi", "mht", "mid", "midi",
    "mj2", "mka", "mkv", "mmr", "mng", "mobi", "mov", "movie", "mp3", "mp4", "mp4a", "mpeg", "mpg",
    "mpga", "mxu", "nef", "npx", "numbers", "nupkg", "o", "oga", "ogg", "ogv", "otf", "pages",
    "pbm", "pcx", "pdb", "pdf", "pea", "pgm", "pic", "png", "pnm", "pot", "potm", "potx", "ppa",
    "ppam", "ppm", "pps", "ppsm", "ppsx", "ppt", "pptm", "pptx", "psd", "pya", "pyc", "pyo", "pyv",
    "qt", "rar", "ras", "raw", "resources", "rgb", "rip", "rlc", "rmf", "rmvb", "rtf", "rz", "s3m",
    "s7z", "scpt", "sgi", "shar", "sil", "sketch", "slk", "smv", "snk", "so", "stl", "suo", "sub",
    "swf", "tar", "tbz", "tbz2", "tga", "tgz", "thmx", "tif", "tiff", "tlz", "ttc", "ttf", "txz",
    "udf", "uvh", "uvi", "uvm", "uvp", "uvs", "uvu", "viv", "vob", "war", "wav", "wax", "wbmp",
    "wdp", "weba", "webm", "webp", "whl", "wim", "wm", "wma", "wmv", "wmx", "woff", "woff2", "wrm",
    "wvx", "xbm", "xif", "xla", "xlam", "xls", "xlsb", "xlsm", "xlsx", "xlt", "xltm", "xltx", "xm",
    "xmind", "xpi", "xpm", "xwd", "xz", "z", "zip", "zipx",
];

// Stored lowercased so lookups (which lowercase the candidate extension) can
// actually match members like "DS_Store" whose canonical spelling is mixed-case.
pub static BINARY_EXTENSIONS: Lazy<HashSet<String>> =
    Lazy::new(|| EXTENSIONS.iter().map(|e| e.to_ascii_lowercase()).collect());

/// Returns the lowercase extension of a URL path's final segment, if any.
pub fn path_extension(path: &str) -> Option<String> {
    let last_segment = path.rsplit('/').next().unwrap_or(path);
    last_segment
        .rsplit_once('.')
        .map(|(_, ext)| ext.to_ascii_lowercase())
}

pub fn is_binary_extension(path: &str) -> bool {
    match path_extension(path) {
        Some(ext) => BINARY_EXTENSIONS.contains(&ext),
        None => false,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn recognizes_known_binary_extensions() {
        assert!(is_binary_extension("/archive/file.zip"));
        assert!(is_binary_extension("/music/song.mp3"));
        assert!(is_binary_extension("/doc.PDF"));
    }

    #[test]
    fn recognizes_mixed_case_ds_store_entry() {
        assert!(is_binary_extension("/some/dir/.DS_Store"));
        assert!(is_binary_extension("/some/dir/.ds_store"));
    }

    #[test]
    fn rejects_non_binary_or_missing_extensions() {
        assert!(!is_binary_extension("/index.html"));
        assert!(!is_binary_extension("/no-extension"));
        assert!(!is_binary_extension("/a.b/no-ext"));
    }

    #[test]
    fn exact_count_matches_extension_table() {
        assert_eq!(BINARY_EXTENSIONS.len(), EXTENSIONS.len());
    }
}
