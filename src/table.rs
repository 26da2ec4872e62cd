use std::collections::HashMap;
use std::sync::{Arc, RwLock};

use lazy_static::lazy_static;
use log::debug;
use serde::{Deserialize, Serialize};

// Snapshot of the usb.ids database from http://www.linux-usb.org/usb-ids.html
static EMBEDDED_DB: &str = include_str!("data/usb.ids");

lazy_static! {
    static ref CURRENT: RwLock<Arc<UsbIdTable>> = {
        let table = UsbIdTable::embedded();
        debug!(
            "loaded embedded usb.ids snapshot: {} vendors, {} classes",
            table.vendors.len(),
            table.classes.len()
        );
        RwLock::new(Arc::new(table))
    };
}

/// A vendor name together with the vendor's known products.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct VendorEntry {
    pub name: String,
    pub products: HashMap<u16, String>,
}

/// A subclass name together with the subclass's known protocols.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct SubClassEntry {
    pub name: String,
    pub protocols: HashMap<u8, String>,
}

/// A class name together with the class's known subclasses.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ClassEntry {
    pub name: String,
    pub subclasses: HashMap<u8, SubClassEntry>,
}

/// The reference table mapping numeric USB identification codes to names.
///
/// Entries are immutable once the table is built; updating the process-wide
/// table means building a new one and calling [`install`].
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct UsbIdTable {
    pub vendors: HashMap<u16, VendorEntry>,
    pub classes: HashMap<u8, ClassEntry>,
}

impl UsbIdTable {
    /// Builds the table from the embedded usb.ids snapshot.
    pub fn embedded() -> Self {
        // The snapshot ships inside the crate, a parse failure is a build
        // defect rather than a runtime condition
        Self::parse(EMBEDDED_DB).expect("embedded usb.ids snapshot is well-formed")
    }

    pub fn vendor(&self, vendor_id: u16) -> Option<&VendorEntry> {
        self.vendors.get(&vendor_id)
    }

    pub fn product(&self, vendor_id: u16, product_id: u16) -> Option<&str> {
        self.vendor(vendor_id)
            .and_then(|v| v.products.get(&product_id))
            .map(String::as_str)
    }

    pub fn class(&self, class_code: u8) -> Option<&ClassEntry> {
        self.classes.get(&class_code)
    }

    pub fn subclass(&self, class_code: u8, subclass_code: u8) -> Option<&SubClassEntry> {
        self.class(class_code)
            .and_then(|c| c.subclasses.get(&subclass_code))
    }

    pub fn protocol(
        &self,
        class_code: u8,
        subclass_code: u8,
        protocol_code: u8,
    ) -> Option<&str> {
        self.subclass(class_code, subclass_code)
            .and_then(|s| s.protocols.get(&protocol_code))
            .map(String::as_str)
    }
}

/// Returns a handle to the current process-wide table.
///
/// The handle is a consistent snapshot; a concurrent [`install`] does not
/// affect lookups made through it.
pub fn table() -> Arc<UsbIdTable> {
    CURRENT.read().expect("usb id table lock poisoned").clone()
}

/// Replaces the process-wide table.
///
/// Publication is atomic at the table level: readers either see the old
/// table or the new one, never a partially populated mix.
pub fn install(table: UsbIdTable) {
    debug!(
        "installing usb id table: {} vendors, {} classes",
        table.vendors.len(),
        table.classes.len()
    );
    let mut current = CURRENT.write().expect("usb id table lock poisoned");
    *current = Arc::new(table);
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn embedded_snapshot_parses() {
        let table = UsbIdTable::embedded();

        assert_eq!(table.vendor(0x1d6b).unwrap().name, "Linux Foundation");
        assert_eq!(table.product(0x1d6b, 0x0002), Some("2.0 root hub"));
        assert_eq!(table.class(0x03).unwrap().name, "Human Interface Device");
        assert_eq!(
            table.subclass(0x03, 0x01).unwrap().name,
            "Boot Interface Subclass"
        );
        assert_eq!(table.protocol(0x03, 0x01, 0x01), Some("Keyboard"));
    }

    #[test]
    fn absent_codes_are_none() {
        let table = UsbIdTable::embedded();

        assert!(table.vendor(0xf00d).is_none());
        assert!(table.product(0x1d6b, 0xffff).is_none());
        assert!(table.class(0x04).is_none());
        assert!(table.protocol(0x09, 0x00, 0xaa).is_none());
    }

    #[test]
    fn install_publishes_new_entries() {
        // Extend the embedded table rather than shrinking it, other tests
        // read the process-wide table concurrently
        let mut extended = UsbIdTable::embedded();
        extended.vendors.insert(
            0xf00d,
            VendorEntry {
                name: "Test Vendor".to_string(),
                products: HashMap::from([(0x0001, "Test Product".to_string())]),
            },
        );
        install(extended);

        let current = table();
        assert_eq!(current.vendor(0xf00d).unwrap().name, "Test Vendor");
        assert_eq!(current.product(0x1d6b, 0x0002), Some("2.0 root hub"));
    }
}
