//! Human-readable text output for USB device identification data.
//!
//! The crate carries an embedded snapshot of the public `usb.ids` database
//! mapping vendor/product codes and class/subclass/protocol codes to names.
//! The snapshot is parsed once on first use; a replacement database can be
//! loaded from a file or any reader and installed process-wide at runtime.
//!
//! The two entry points are:
//! - [`describe`] - render the vendor and product of a device descriptor,
//!   e.g. `"2.0 root hub (Linux Foundation)"`.
//! - [`classify`] - render the class/subclass/protocol of a device or
//!   interface, e.g. `"Human Interface Device (Boot Interface Subclass) Keyboard"`.
//!
//! Both are best-effort: a code missing from the database shows up as an
//! `Unknown` marker in the returned string, never as an error.

pub mod describe;
pub mod descriptor;
pub mod parser;
pub mod table;

// Re-export the working surface at the crate root
pub use self::describe::{
    classify, classify_with, describe, describe_with, ClassifySource, DescribeSource,
};
pub use self::descriptor::{DeviceDescriptor, InterfaceDescriptor};
pub use self::parser::Error;
pub use self::table::{install, table, ClassEntry, SubClassEntry, UsbIdTable, VendorEntry};
