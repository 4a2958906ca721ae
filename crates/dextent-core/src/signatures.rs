//! Curated magic-number table.
//!
//! Each entry pins a byte pattern at a fixed offset to the extension that
//! format conventionally carries. The table is deliberately compact: it
//! covers the formats that show up in triage work, and it collapses
//! container formats that cannot be told apart without parsing their
//! internals (every OOXML document is represented by the `.docx` entry).

/// A byte pattern anchored at a fixed offset.
#[derive(Debug, Clone, Copy)]
pub(crate) struct Signature {
    pub(crate) magic: &'static [u8],
    pub(crate) offset: usize,
    pub(crate) extension: &'static str,
    pub(crate) description: &'static str,
}

impl Signature {
    /// Whether `data` carries this pattern at the expected offset.
    pub(crate) fn matches(&self, data: &[u8]) -> bool {
        let Some(end) = self.offset.checked_add(self.magic.len()) else {
            return false;
        };
        data.len() >= end && &data[self.offset..end] == self.magic
    }
}

macro_rules! sig {
    ($magic:expr, $offset:expr, $extension:expr, $description:expr) => {
        Signature {
            magic: $magic,
            offset: $offset,
            extension: $extension,
            description: $description,
        }
    };
}

pub(crate) const SIGNATURES: &[Signature] = &[
    // Images
    sig!(b"\x89PNG\r\n\x1a\n", 0, ".png", "PNG image"),
    sig!(b"GIF87a", 0, ".gif", "GIF image (87a)"),
    sig!(b"GIF89a", 0, ".gif", "GIF image (89a)"),
    sig!(b"\xff\xd8\xff\xe0", 0, ".jpg", "JPEG image (JFIF)"),
    sig!(b"\xff\xd8\xff\xe1", 0, ".jpg", "JPEG image (Exif)"),
    sig!(b"\xff\xd8\xff", 0, ".jpg", "JPEG image"),
    sig!(b"BM", 0, ".bmp", "BMP bitmap"),
    sig!(b"II*\x00", 0, ".tif", "TIFF image (little-endian)"),
    sig!(b"MM\x00*", 0, ".tif", "TIFF image (big-endian)"),
    sig!(b"\x00\x00\x01\x00", 0, ".ico", "Windows icon"),
    sig!(b"8BPS", 0, ".psd", "Photoshop document"),
    sig!(b"WEBP", 8, ".webp", "WebP image"),
    // Audio / video
    sig!(b"WAVE", 8, ".wav", "WAV audio"),
    sig!(b"AVI ", 8, ".avi", "AVI video"),
    sig!(b"AIFF", 8, ".aiff", "AIFF audio"),
    sig!(b"fLaC", 0, ".flac", "FLAC audio"),
    sig!(b"OggS", 0, ".ogg", "Ogg container"),
    sig!(b"ID3", 0, ".mp3", "MP3 audio (ID3 tag)"),
    sig!(b"MThd", 0, ".mid", "MIDI sequence"),
    sig!(b"\x1a\x45\xdf\xa3", 0, ".mkv", "Matroska video"),
    sig!(b"ftypisom", 4, ".mp4", "MP4 video (isom)"),
    sig!(b"ftypmp42", 4, ".mp4", "MP4 video (mp42)"),
    sig!(b"ftypM4A ", 4, ".m4a", "M4A audio"),
    sig!(b"ftypqt  ", 4, ".mov", "QuickTime video"),
    // Documents
    sig!(b"%PDF-", 0, ".pdf", "PDF document"),
    sig!(b"{\\rtf1", 0, ".rtf", "Rich Text document"),
    sig!(b"%!PS", 0, ".ps", "PostScript document"),
    sig!(
        b"PK\x03\x04\x14\x00\x06\x00",
        0,
        ".docx",
        "Office Open XML document"
    ),
    // Archives / compression
    sig!(b"PK\x03\x04", 0, ".zip", "ZIP archive"),
    sig!(b"PK\x05\x06", 0, ".zip", "ZIP archive (empty)"),
    sig!(b"PK\x07\x08", 0, ".zip", "ZIP archive (spanned)"),
    sig!(b"\x1f\x8b", 0, ".gz", "gzip compressed data"),
    sig!(b"BZh", 0, ".bz2", "bzip2 compressed data"),
    sig!(b"\xfd7zXZ\x00", 0, ".xz", "xz compressed data"),
    sig!(b"\x28\xb5\x2f\xfd", 0, ".zst", "Zstandard compressed data"),
    sig!(b"7z\xbc\xaf\x27\x1c", 0, ".7z", "7-Zip archive"),
    sig!(b"Rar!\x1a\x07\x00", 0, ".rar", "RAR archive (v1.5+)"),
    sig!(b"Rar!\x1a\x07\x01\x00", 0, ".rar", "RAR archive (v5)"),
    sig!(b"ustar\x0000", 257, ".tar", "tar archive (POSIX)"),
    sig!(b"ustar  \x00", 257, ".tar", "tar archive (GNU)"),
    // Databases / data
    sig!(b"SQLite format 3\x00", 0, ".sqlite", "SQLite 3 database"),
    sig!(b"PAR1", 0, ".parquet", "Apache Parquet data"),
    sig!(b"DICM", 128, ".dcm", "DICOM medical image"),
    // Executables: ELF and Mach-O binaries conventionally carry no suffix,
    // so their extension is empty and resolves as undeterminable.
    sig!(b"\x7fELF", 0, "", "ELF executable"),
    sig!(b"\xcf\xfa\xed\xfe", 0, "", "Mach-O 64-bit executable"),
    sig!(b"MZ", 0, ".exe", "DOS/Windows executable"),
    sig!(b"\xca\xfe\xba\xbe", 0, ".class", "Java class file"),
    sig!(b"\x00asm", 0, ".wasm", "WebAssembly binary"),
    // Fonts
    sig!(b"wOFF", 0, ".woff", "WOFF font"),
    sig!(b"wOF2", 0, ".woff2", "WOFF2 font"),
    sig!(b"OTTO", 0, ".otf", "OpenType font"),
    sig!(b"\x00\x01\x00\x00\x00", 0, ".ttf", "TrueType font"),
];

const fn max_header_len() -> usize {
    let mut max = 0;
    let mut i = 0;
    while i < SIGNATURES.len() {
        let need = SIGNATURES[i].offset + SIGNATURES[i].magic.len();
        if need > max {
            max = need;
        }
        i += 1;
    }
    max
}

/// Bytes the matcher needs from the start of a file to test every entry.
pub(crate) const MAX_HEADER_LEN: usize = max_header_len();
