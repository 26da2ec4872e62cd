//! Best-effort rendering of identification codes as names.
//!
//! [`describe`] and [`classify`] never fail: a code with no entry in the
//! table is rendered as an `Unknown` marker inside the returned string,
//! and a value that declines to expose its codes is rendered by its type
//! name alone.

use std::any::type_name;

use crate::table::{self, UsbIdTable};

/// A value carrying a vendor/product code pair, typically a device
/// descriptor.
///
/// Returning `None` means the value does not expose the pair; [`describe`]
/// then falls back to the type name.
pub trait DescribeSource {
    fn vendor_product(&self) -> Option<(u16, u16)>;
}

/// A value carrying class/subclass/protocol codes: a device descriptor
/// (device-level class triple) or an interface descriptor (interface-level
/// triple).
pub trait ClassifySource {
    fn class_triple(&self) -> Option<(u8, u8, u8)>;
}

/// Renders the vendor and product of `val` against the process-wide table.
///
/// Output is one of:
/// - `"<product> (<vendor>)"` when both codes are known
/// - `"Unknown (<vendor>)"` when only the vendor is known
/// - `"Unknown vvvv:pppp"` when the vendor is unknown
/// - `"Unknown (<type name>)"` when `val` exposes no code pair
pub fn describe<T: DescribeSource>(val: &T) -> String {
    describe_with(&table::table(), val)
}

/// [`describe`] against an explicit table instead of the process-wide one.
pub fn describe_with<T: DescribeSource>(table: &UsbIdTable, val: &T) -> String {
    let (vendor_id, product_id) = match val.vendor_product() {
        Some(pair) => pair,
        None => return format!("Unknown ({})", type_name::<T>()),
    };
    match table.vendor(vendor_id) {
        Some(vendor) => match vendor.products.get(&product_id) {
            Some(product) => format!("{} ({})", product, vendor.name),
            None => format!("Unknown ({})", vendor.name),
        },
        // Codes rendered the way the database itself writes them
        None => format!("Unknown {:04x}:{:04x}", vendor_id, product_id),
    }
}

/// Renders the class/subclass/protocol of `val` against the process-wide
/// table.
///
/// Output shape follows resolution depth:
/// - `"<class> (<subclass>) <protocol>"` when all three are known
/// - `"<class> (<subclass>)"` when the protocol is unknown
/// - `"<class>"` when the subclass is unknown
/// - `"Unknown cc.ss.pp"` when the class is unknown
/// - `"Unknown (<type name>)"` when `val` exposes no triple
pub fn classify<T: ClassifySource>(val: &T) -> String {
    classify_with(&table::table(), val)
}

/// [`classify`] against an explicit table instead of the process-wide one.
pub fn classify_with<T: ClassifySource>(table: &UsbIdTable, val: &T) -> String {
    let (class_code, subclass_code, protocol_code) = match val.class_triple() {
        Some(triple) => triple,
        None => return format!("Unknown ({})", type_name::<T>()),
    };
    let class = match table.class(class_code) {
        Some(class) => class,
        None => {
            return format!(
                "Unknown {:02x}.{:02x}.{:02x}",
                class_code, subclass_code, protocol_code
            )
        }
    };
    let subclass = match class.subclasses.get(&subclass_code) {
        Some(subclass) => subclass,
        None => return class.name.clone(),
    };
    match subclass.protocols.get(&protocol_code) {
        Some(protocol) => format!("{} ({}) {}", class.name, subclass.name, protocol),
        None => format!("{} ({})", class.name, subclass.name),
    }
}

impl DescribeSource for rusb::DeviceDescriptor {
    fn vendor_product(&self) -> Option<(u16, u16)> {
        Some((self.vendor_id(), self.product_id()))
    }
}

impl ClassifySource for rusb::DeviceDescriptor {
    fn class_triple(&self) -> Option<(u8, u8, u8)> {
        Some((self.class_code(), self.sub_class_code(), self.protocol_code()))
    }
}

impl ClassifySource for rusb::InterfaceDescriptor<'_> {
    fn class_triple(&self) -> Option<(u8, u8, u8)> {
        Some((self.class_code(), self.sub_class_code(), self.protocol_code()))
    }
}
