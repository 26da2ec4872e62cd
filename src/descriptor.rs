//! Byte-level views of standard USB descriptors.
//!
//! These let `describe`/`classify` run over raw enumeration or capture
//! data without a live device handle. Only the fields are decoded; the
//! contents are not validated.

use byteorder::{ByteOrder, LittleEndian};
use serde::{Deserialize, Serialize};

use crate::describe::{ClassifySource, DescribeSource};

/// Standard device descriptor (18 bytes).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DeviceDescriptor {
    pub b_length: u8,
    pub b_descriptor_type: u8,
    pub bcd_usb: u16,
    pub b_device_class: u8,
    pub b_device_sub_class: u8,
    pub b_device_protocol: u8,
    pub b_max_packet_size0: u8,
    pub id_vendor: u16,
    pub id_product: u16,
    pub bcd_device: u16,
    pub i_manufacturer: u8,
    pub i_product: u8,
    pub i_serial_number: u8,
    pub b_num_configurations: u8,
}

impl DeviceDescriptor {
    /// Decodes a device descriptor from wire bytes, or `None` if the
    /// buffer is too short.
    pub fn parse(data: &[u8]) -> Option<Self> {
        if data.len() < 18 {
            return None;
        }

        Some(DeviceDescriptor {
            b_length: data[0],
            b_descriptor_type: data[1],
            bcd_usb: LittleEndian::read_u16(&data[2..4]),
            b_device_class: data[4],
            b_device_sub_class: data[5],
            b_device_protocol: data[6],
            b_max_packet_size0: data[7],
            id_vendor: LittleEndian::read_u16(&data[8..10]),
            id_product: LittleEndian::read_u16(&data[10..12]),
            bcd_device: LittleEndian::read_u16(&data[12..14]),
            i_manufacturer: data[14],
            i_product: data[15],
            i_serial_number: data[16],
            b_num_configurations: data[17],
        })
    }

    /// The bcdUSB field as a dotted version string, e.g. "2.0".
    pub fn usb_version_string(&self) -> String {
        format!("{}.{}", self.bcd_usb >> 8, (self.bcd_usb & 0xff) / 0x10)
    }
}

impl DescribeSource for DeviceDescriptor {
    fn vendor_product(&self) -> Option<(u16, u16)> {
        Some((self.id_vendor, self.id_product))
    }
}

impl ClassifySource for DeviceDescriptor {
    fn class_triple(&self) -> Option<(u8, u8, u8)> {
        Some((
            self.b_device_class,
            self.b_device_sub_class,
            self.b_device_protocol,
        ))
    }
}

/// Standard interface descriptor (9 bytes).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct InterfaceDescriptor {
    pub b_length: u8,
    pub b_descriptor_type: u8,
    pub b_interface_number: u8,
    pub b_alternate_setting: u8,
    pub b_num_endpoints: u8,
    pub b_interface_class: u8,
    pub b_interface_sub_class: u8,
    pub b_interface_protocol: u8,
    pub i_interface: u8,
}

impl InterfaceDescriptor {
    /// Decodes an interface descriptor from wire bytes, or `None` if the
    /// buffer is too short.
    pub fn parse(data: &[u8]) -> Option<Self> {
        if data.len() < 9 {
            return None;
        }

        Some(InterfaceDescriptor {
            b_length: data[0],
            b_descriptor_type: data[1],
            b_interface_number: data[2],
            b_alternate_setting: data[3],
            b_num_endpoints: data[4],
            b_interface_class: data[5],
            b_interface_sub_class: data[6],
            b_interface_protocol: data[7],
            i_interface: data[8],
        })
    }
}

impl ClassifySource for InterfaceDescriptor {
    fn class_triple(&self) -> Option<(u8, u8, u8)> {
        Some((
            self.b_interface_class,
            self.b_interface_sub_class,
            self.b_interface_protocol,
        ))
    }
}
