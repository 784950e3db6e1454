//! CLI header (`IMAGE_COR20_HEADER`) parsing.
//!
//! The 72-byte CLI header is pointed to by the CLR runtime header data directory and
//! locates the metadata root within the image. Only the fields needed to find and
//! sanity-check the metadata are kept.
//!
//! # Reference
//! - ECMA-335 6th Edition, Partition II, Section 25.3.3 - CLI Header

use crate::{
    file::io::{read_le, read_le_at},
    Error::OutOfBounds,
    Result,
};

/// The parsed CLI header of a .NET image.
pub struct Cor20Header {
    /// Size of the header in bytes, always 72
    pub cb: u32,
    /// Minimum major runtime version required
    pub major_runtime_version: u16,
    /// Minor runtime version
    pub minor_runtime_version: u16,
    /// RVA of the metadata root
    pub meta_data_rva: u32,
    /// Size of the metadata in bytes
    pub meta_data_size: u32,
    /// Runtime flags (`COMIMAGE_FLAGS_*`)
    pub flags: u32,
    /// Entry point token or RVA
    pub entry_point_token: u32,
}

impl Cor20Header {
    /// Size of the CLI header in bytes
    pub const SIZE: usize = 72;

    /// Parse the CLI header from `data`.
    ///
    /// # Errors
    /// Returns [`crate::Error::OutOfBounds`] if `data` is shorter than 72 bytes and
    /// [`crate::Error::Malformed`] if the header size or metadata location are invalid.
    pub fn read(data: &[u8]) -> Result<Cor20Header> {
        if data.len() < Self::SIZE {
            return Err(OutOfBounds);
        }

        let cb = read_le::<u32>(data)?;
        if cb as usize != Self::SIZE {
            return Err(malformed_error!(
                "Invalid CLR header size: expected 72, got {}",
                cb
            ));
        }

        let mut offset = 4;
        let major_runtime_version = read_le_at::<u16>(data, &mut offset)?;
        let minor_runtime_version = read_le_at::<u16>(data, &mut offset)?;
        if major_runtime_version == 0 || major_runtime_version > 10 {
            return Err(malformed_error!(
                "Invalid major runtime version: {}",
                major_runtime_version
            ));
        }

        let meta_data_rva = read_le_at::<u32>(data, &mut offset)?;
        if meta_data_rva == 0 {
            return Err(malformed_error!("Metadata RVA cannot be zero"));
        }

        let meta_data_size = read_le_at::<u32>(data, &mut offset)?;
        if meta_data_size == 0 {
            return Err(malformed_error!("Metadata size cannot be zero"));
        } else if meta_data_size > 0x1000_0000 {
            return Err(malformed_error!(
                "Metadata size {} exceeds reasonable limit (256MB)",
                meta_data_size
            ));
        }

        let flags = read_le_at::<u32>(data, &mut offset)?;
        let entry_point_token = read_le_at::<u32>(data, &mut offset)?;

        Ok(Cor20Header {
            cb,
            major_runtime_version,
            minor_runtime_version,
            meta_data_rva,
            meta_data_size,
            flags,
            entry_point_token,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn crafted() {
        #[rustfmt::skip]
        let mut header_bytes = vec![
            0x48, 0x00, 0x00, 0x00,
            0x02, 0x00,
            0x05, 0x00,
            0x48, 0x20, 0x00, 0x00,
            0x00, 0x01, 0x00, 0x00,
            0x01, 0x00, 0x00, 0x00,
            0x01, 0x00, 0x00, 0x06,
        ];
        header_bytes.resize(72, 0);

        let header = Cor20Header::read(&header_bytes).unwrap();

        assert_eq!(header.cb, 72);
        assert_eq!(header.major_runtime_version, 2);
        assert_eq!(header.minor_runtime_version, 5);
        assert_eq!(header.meta_data_rva, 0x2048);
        assert_eq!(header.meta_data_size, 0x100);
        assert_eq!(header.flags, 1);
        assert_eq!(header.entry_point_token, 0x0600_0001);
    }

    #[test]
    fn invalid() {
        assert!(matches!(Cor20Header::read(&[0x48; 10]), Err(OutOfBounds)));

        let mut wrong_size = vec![0u8; 72];
        wrong_size[0] = 0x40;
        assert!(Cor20Header::read(&wrong_size).is_err());

        let mut no_metadata = vec![0u8; 72];
        no_metadata[0] = 0x48;
        no_metadata[4] = 0x02;
        assert!(Cor20Header::read(&no_metadata).is_err());
    }
}
