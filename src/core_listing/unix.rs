use crate::core_listing::ListFormatter;
use crate::core_storage::FileItem;

/// `ls -l` style lines, which is what most FTP clients know how to parse.
#[derive(Debug, Clone)]
pub struct UnixListFormatter {
    owner: String,
    group: String,
}

impl Default for UnixListFormatter {
    fn default() -> Self {
        Self {
            owner: String::from("owner"),
            group: String::from("group"),
        }
    }
}

impl UnixListFormatter {
    pub fn new(owner: &str, group: &str) -> Self {
        Self {
            owner: owner.to_string(),
            group: group.to_string(),
        }
    }
}

impl ListFormatter for UnixListFormatter {
    fn format(&self, item: &FileItem) -> String {
        let permissions = if item.is_directory {
            "drwxr-xr-x"
        } else {
            "-rw-r--r--"
        };

        format!(
            "{} 1 {} {} {:>13} {} {}",
            permissions,
            self.owner,
            self.group,
            item.size,
            item.last_modified.format("%b %d %H:%M"),
            item.name
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{Local, TimeZone};

    fn item(name: &str, is_directory: bool, size: u64) -> FileItem {
        FileItem {
            name: name.to_string(),
            is_directory,
            size,
            last_modified: Local.with_ymd_and_hms(2024, 3, 7, 14, 5, 0).unwrap(),
        }
    }

    #[test]
    fn test_format_file() {
        let line = UnixListFormatter::default().format(&item("testfile.txt", false, 2134));
        assert_eq!(
            line,
            "-rw-r--r-- 1 owner group          2134 Mar 07 14:05 testfile.txt"
        );
    }

    #[test]
    fn test_format_directory() {
        let line = UnixListFormatter::new("ftp", "ftp").format(&item("docs", true, 0));
        assert!(line.starts_with("drwxr-xr-x 1 ftp ftp "));
        assert!(line.ends_with(" docs"));
    }
}
