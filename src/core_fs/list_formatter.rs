use crate::constants::LISTING_RECENT_DAYS;
use crate::core_driver::{FileInfo, FileKind};
use chrono::{DateTime, Duration, Utc};

// Real permission bits are not modelled by every driver.
const PLACEHOLDER_PERMISSIONS: &str = "rwxr-xr-x";

/// Renders directory entries in the two FTP listing formats, in the order
/// they were supplied.
pub struct ListFormatter<'a> {
    files: &'a [FileInfo],
}

impl<'a> ListFormatter<'a> {
    pub fn new(files: &'a [FileInfo]) -> Self {
        Self { files }
    }

    /// Names only, as sent for NLST.
    pub fn short(&self) -> String {
        let mut listing = String::new();
        for file in self.files {
            listing.push_str(file.name());
            listing.push_str("\r\n");
        }
        listing.push_str("\r\n");
        listing
    }

    /// `ls -l` style lines, as sent for LIST.
    pub fn detailed(&self) -> String {
        self.detailed_at(Utc::now())
    }

    pub fn detailed_at(&self, now: DateTime<Utc>) -> String {
        let mut listing = String::new();
        for file in self.files {
            let file_entry = format!(
                "{}{} 1 owner group {:>12} {} {}\r\n",
                type_marker(file.kind()),
                PLACEHOLDER_PERMISSIONS,
                file.size(),
                format_timestamp(file.modified(), now),
                file.name()
            );
            listing.push_str(&file_entry);
        }
        listing.push_str("\r\n");
        listing
    }
}

fn type_marker(kind: FileKind) -> char {
    match kind {
        FileKind::Directory => 'd',
        FileKind::Symlink => 'l',
        FileKind::File => '-',
    }
}

fn format_timestamp(modified: DateTime<Utc>, now: DateTime<Utc>) -> String {
    let recent = modified <= now && now - modified < Duration::days(LISTING_RECENT_DAYS);
    if recent {
        modified.format("%b %e %H:%M").to_string()
    } else {
        modified.format("%b %e  %Y").to_string()
    }
}
