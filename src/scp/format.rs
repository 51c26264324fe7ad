/*
    FluxFox
    https://github.com/dbalsom/fluxfox

    Copyright 2024 Daniel Balsom

    Permission is hereby granted, free of charge, to any person obtaining a
    copy of this software and associated documentation files (the “Software”),
    to deal in the Software without restriction, including without limitation
    the rights to use, copy, modify, merge, publish, distribute, sublicense,
    and/or sell copies of the Software, and to permit persons to whom the
    Software is furnished to do so, subject to the following conditions:

    The above copyright notice and this permission notice shall be included in
    all copies or substantial portions of the Software.

    THE SOFTWARE IS PROVIDED “AS IS”, WITHOUT WARRANTY OF ANY KIND, EXPRESS OR
    IMPLIED, INCLUDING BUT NOT LIMITED TO THE WARRANTIES OF MERCHANTABILITY,
    FITNESS FOR A PARTICULAR PURPOSE AND NONINFRINGEMENT. IN NO EVENT SHALL THE
    AUTHORS OR COPYRIGHT HOLDERS BE LIABLE FOR ANY CLAIM, DAMAGES OR OTHER
    LIABILITY, WHETHER IN AN ACTION OF CONTRACT, TORT OR OTHERWISE, ARISING
    FROM, OUT OF OR IN CONNECTION WITH THE SOFTWARE OR THE USE OR OTHER
    DEALINGS IN THE SOFTWARE.

    --------------------------------------------------------------------------

    src/scp/format.rs

    The fixed-layout, bit-exact wire structures of the SuperCardPro (SCP) container. Everything
    here mirrors the on-disk byte layout exactly; no field is reinterpreted.
*/

use binrw::binrw;

/// Number of entries in the SCP Track Lookup Table, and the number of trackable cylinder/side
/// combinations (84 cylinders * 2 sides).
pub const SCP_TRACK_COUNT: usize = 168;

/// Byte offset of the TLUT from the start of the image.
pub const TLUT_OFFSET: u32 = 0x10;

/// On-disk byte length of the TLUT.
pub const TLUT_LEN: u32 = 0x2a0;

/// Base of the SCP sample clock in nanoseconds per tick at capture-resolution 0.
pub const BASE_CAPTURE_RES_NS: u32 = 25;

pub const FLAG_INDEX_CUED: u8 = 0b0000_0001;
pub const FLAG_96_TPI: u8 = 0b0000_0010;
pub const FLAG_RPM_300: u8 = 0b0000_0100;
pub const FLAG_FLUX_NORMALIZED: u8 = 0b0000_1000;
pub const FLAG_READONLY: u8 = 0b0001_0000;
pub const FLAG_FOOTER: u8 = 0b0010_0000;
pub const FLAG_EXTENDED_MODE: u8 = 0b0100_0000;
pub const FLAG_NON_SCP_CAPTURE: u8 = 0b1000_0000;

/// The 16-byte SCP image header.
#[binrw]
#[brw(little)]
#[derive(Debug, Clone)]
pub struct ScpFileHeader {
    pub id: [u8; 3],
    pub version: u8,
    pub disk_type: u8,
    pub nr_revs: u8,
    pub start_track: u8,
    pub end_track: u8,
    pub flags: u8,
    pub cell_width: u8,
    pub single_sided: u8,
    pub resolution: u8,
    pub checksum: u32,
}

impl ScpFileHeader {
    pub fn is_index_cued(&self) -> bool {
        self.flags & FLAG_INDEX_CUED != 0
    }

    pub fn rpm(&self) -> DiskRpm {
        if self.flags & FLAG_RPM_300 != 0 {
            DiskRpm::Rpm300
        } else {
            DiskRpm::Rpm360
        }
    }

    pub fn write_protected(&self) -> bool {
        self.flags & FLAG_READONLY == 0
    }

    pub fn has_footer(&self) -> bool {
        self.flags & FLAG_FOOTER != 0
    }

    pub fn is_extended_mode(&self) -> bool {
        self.flags & FLAG_EXTENDED_MODE != 0
    }

    pub fn is_non_scp_capture(&self) -> bool {
        self.flags & FLAG_NON_SCP_CAPTURE != 0
    }

    /// Major/minor version split of the version byte.
    pub fn version_parts(&self) -> (u8, u8) {
        (self.version >> 4, self.version & 0x0f)
    }

    /// Capture resolution in nanoseconds per tick.
    pub fn capture_resolution_ns(&self) -> u32 {
        BASE_CAPTURE_RES_NS + (self.resolution as u32 * BASE_CAPTURE_RES_NS)
    }
}

/// The 4-byte track-record signature plus its track number.
#[binrw]
#[brw(little)]
#[derive(Debug, Clone)]
pub struct ScpTrackHeader {
    pub id: [u8; 3],
    pub track_number: u8,
}

/// One 12-byte revolution header within a track record.
#[binrw]
#[brw(little)]
#[derive(Debug, Clone, Copy, Default)]
pub struct ScpRevHeader {
    pub index_ticks: u32,
    pub cell_count: u32,
    pub data_offset: u32,
}

/// Disk RPM as inferred from the SCP header's RPM flag. Diagnostic only; it does not affect
/// decode or encode semantics.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DiskRpm {
    Rpm300,
    Rpm360,
}

/// Manufacturer/format nibble of the SCP disk-type byte. Diagnostic only.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ScpDiskManufacturer {
    Cbm,
    Atari,
    Apple,
    Pc,
    Tandy,
    Ti,
    Roland,
    Amstrad,
    Other,
    TapeDrive,
    HardDrive,
    Unknown,
}

impl ScpDiskManufacturer {
    pub fn from_byte(disk_type: u8) -> Self {
        match disk_type & 0xf0 {
            0x00 => Self::Cbm,
            0x10 => Self::Atari,
            0x20 => Self::Apple,
            0x30 => Self::Pc,
            0x40 => Self::Tandy,
            0x50 => Self::Ti,
            0x60 => Self::Roland,
            0x70 => Self::Amstrad,
            0x80 => Self::Other,
            0xe0 => Self::TapeDrive,
            0xf0 => Self::HardDrive,
            _ => Self::Unknown,
        }
    }
}
