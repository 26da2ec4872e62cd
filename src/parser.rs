//! Parser for the `usb.ids` database format.
//!
//! The format is line-oriented: vendor lines carry a 4-digit hex code at
//! column 0, product lines are indented one tab beneath their vendor, and
//! the class section uses `C xx` headers with tab-indented subclass and
//! protocol lines. `#` comments and blank lines are ignored. Trailing
//! sections with other prefixes (`AT`, `HID`, `R`, ...) are skipped.

use std::fs;
use std::io::Read;
use std::path::Path;

use log::{debug, info};
use thiserror::Error;

use crate::table::{ClassEntry, SubClassEntry, UsbIdTable, VendorEntry};

/// Failure while loading a usb.ids database.
///
/// Only loading can fail; lookups against a loaded table never do.
#[derive(Debug, Error)]
pub enum Error {
    #[error("failed to read usb id database")]
    Io(#[from] std::io::Error),
    #[error("malformed usb id database at line {line}: {text:?}")]
    Parse { line: usize, text: String },
}

#[derive(Clone, Copy, PartialEq)]
enum Section {
    Vendors,
    Classes,
    Other,
}

fn malformed(line: usize, text: &str) -> Error {
    Error::Parse {
        line,
        text: text.to_string(),
    }
}

// An entry line is "<hex code><two spaces><name>"; `width` is the expected
// number of hex digits
fn hex_entry(rest: &str, width: usize) -> Option<(u32, &str)> {
    let (code, name) = rest.split_once("  ")?;
    if code.len() != width {
        return None;
    }
    let code = u32::from_str_radix(code, 16).ok()?;
    let name = name.trim();
    if name.is_empty() {
        return None;
    }
    Some((code, name))
}

impl UsbIdTable {
    /// Parses a usb.ids database from text.
    pub fn parse(input: &str) -> Result<UsbIdTable, Error> {
        let mut table = UsbIdTable::default();
        let mut section = Section::Vendors;
        let mut vendor: Option<u16> = None;
        let mut class: Option<u8> = None;
        let mut subclass: Option<u8> = None;

        for (index, raw) in input.lines().enumerate() {
            let line = index + 1;
            let text = raw.trim_end();
            if text.is_empty() || text.starts_with('#') {
                continue;
            }

            if let Some(rest) = text.strip_prefix("\t\t") {
                match section {
                    Section::Vendors => {
                        // Per-device interface entries; the reference table
                        // does not carry them
                    }
                    Section::Classes => {
                        let (code, name) =
                            hex_entry(rest, 2).ok_or_else(|| malformed(line, text))?;
                        let entry = match (class, subclass) {
                            (Some(c), Some(s)) => table
                                .classes
                                .get_mut(&c)
                                .and_then(|c| c.subclasses.get_mut(&s)),
                            _ => None,
                        }
                        .ok_or_else(|| malformed(line, text))?;
                        entry.protocols.insert(code as u8, name.to_string());
                    }
                    Section::Other => {}
                }
            } else if let Some(rest) = text.strip_prefix('\t') {
                match section {
                    Section::Vendors => {
                        let (code, name) =
                            hex_entry(rest, 4).ok_or_else(|| malformed(line, text))?;
                        let entry = vendor
                            .and_then(|v| table.vendors.get_mut(&v))
                            .ok_or_else(|| malformed(line, text))?;
                        entry.products.insert(code as u16, name.to_string());
                    }
                    Section::Classes => {
                        let (code, name) =
                            hex_entry(rest, 2).ok_or_else(|| malformed(line, text))?;
                        let entry = class
                            .and_then(|c| table.classes.get_mut(&c))
                            .ok_or_else(|| malformed(line, text))?;
                        subclass = Some(code as u8);
                        entry.subclasses.insert(
                            code as u8,
                            SubClassEntry {
                                name: name.to_string(),
                                ..Default::default()
                            },
                        );
                    }
                    Section::Other => {}
                }
            } else if let Some(rest) = text.strip_prefix("C ") {
                let (code, name) = hex_entry(rest, 2).ok_or_else(|| malformed(line, text))?;
                section = Section::Classes;
                class = Some(code as u8);
                subclass = None;
                table.classes.insert(
                    code as u8,
                    ClassEntry {
                        name: name.to_string(),
                        ..Default::default()
                    },
                );
            } else if let Some((code, name)) = hex_entry(text, 4) {
                section = Section::Vendors;
                vendor = Some(code as u16);
                table.vendors.insert(
                    code as u16,
                    VendorEntry {
                        name: name.to_string(),
                        ..Default::default()
                    },
                );
            } else {
                // Some other top-level section (audio terminal types, HID
                // usages, languages, ...); skip it and its children
                if section != Section::Other {
                    debug!("skipping usb.ids section starting at line {}", line);
                }
                section = Section::Other;
            }
        }

        Ok(table)
    }

    /// Reads and parses a usb.ids database from `reader`.
    pub fn from_reader<R: Read>(mut reader: R) -> Result<UsbIdTable, Error> {
        let mut buf = String::new();
        reader.read_to_string(&mut buf)?;
        UsbIdTable::parse(&buf)
    }

    /// Reads and parses a usb.ids database from a file on disk.
    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<UsbIdTable, Error> {
        let path = path.as_ref();
        info!("loading usb id database from {}", path.display());
        let data = fs::read_to_string(path)?;
        UsbIdTable::parse(&data)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Cursor;

    const SAMPLE: &str = "\
# sample database
1d6b  Linux Foundation
\t0001  1.1 root hub
\t0002  2.0 root hub
046d  Logitech, Inc.
\tc534  Unifying Receiver
C 03  Human Interface Device
\t01  Boot Interface Subclass
\t\t01  Keyboard
\t\t02  Mouse
C 09  Hub
AT 0100  ATAPI command set
HID 21  HID Descriptor
";

    #[test]
    fn parses_vendors_and_products() {
        let table = UsbIdTable::parse(SAMPLE).unwrap();

        assert_eq!(table.vendors.len(), 2);
        assert_eq!(table.vendor(0x1d6b).unwrap().name, "Linux Foundation");
        assert_eq!(table.product(0x1d6b, 0x0001), Some("1.1 root hub"));
        assert_eq!(table.product(0x046d, 0xc534), Some("Unifying Receiver"));
    }

    #[test]
    fn parses_class_tree() {
        let table = UsbIdTable::parse(SAMPLE).unwrap();

        assert_eq!(table.classes.len(), 2);
        assert_eq!(table.class(0x03).unwrap().name, "Human Interface Device");
        assert_eq!(
            table.subclass(0x03, 0x01).unwrap().name,
            "Boot Interface Subclass"
        );
        assert_eq!(table.protocol(0x03, 0x01, 0x02), Some("Mouse"));
        // Class with no subclass entries is valid
        assert_eq!(table.class(0x09).unwrap().name, "Hub");
        assert!(table.class(0x09).unwrap().subclasses.is_empty());
    }

    #[test]
    fn skips_unknown_sections() {
        let table = UsbIdTable::parse(SAMPLE).unwrap();

        // The AT/HID sections contribute nothing to the table
        assert!(table.vendor(0x0100).is_none());
        assert!(table.class(0x21).is_none());
    }

    #[test]
    fn comments_and_blank_lines_ignored() {
        let table = UsbIdTable::parse("# nothing\n\n# here\n").unwrap();

        assert!(table.vendors.is_empty());
        assert!(table.classes.is_empty());
    }

    #[test]
    fn malformed_product_line_reports_position() {
        let input = "1d6b  Linux Foundation\n\tzzzz  Bad product\n";
        match UsbIdTable::parse(input) {
            Err(Error::Parse { line, .. }) => assert_eq!(line, 2),
            other => panic!("expected parse error, got {:?}", other),
        }
    }

    #[test]
    fn orphan_product_line_is_an_error() {
        assert!(UsbIdTable::parse("\t0001  No vendor yet\n").is_err());
    }

    #[test]
    fn missing_name_column_is_an_error() {
        // A single space is not the code/name separator; at column 0 the
        // line reads as an unknown section header rather than a vendor
        let table = UsbIdTable::parse("1d6b Linux Foundation\n").unwrap();
        assert!(table.vendors.is_empty());

        // Inside a vendor section the same defect is a hard error
        assert!(UsbIdTable::parse("1d6b  Linux Foundation\n\t0001 1.1 root hub\n").is_err());
    }

    #[test]
    fn from_reader_matches_parse() {
        let a = UsbIdTable::from_reader(Cursor::new(SAMPLE.as_bytes())).unwrap();
        let b = UsbIdTable::parse(SAMPLE).unwrap();

        assert_eq!(a, b);
    }
}
