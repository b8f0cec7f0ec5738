#![allow(dead_code)]

use std::{
    path::{Path, PathBuf},
    sync::Once,
};

use rmmanifest::{constants::*, types::*, ResourceDirectory, ResourceKey};
use zerocopy::IntoBytes;

pub static MANIFEST: &[u8] = br#"<?xml version="1.0" encoding="UTF-8" standalone="yes"?>
<assembly xmlns="urn:schemas-microsoft-com:asm.v1" manifestVersion="1.0">
  <trustInfo xmlns="urn:schemas-microsoft-com:asm.v3">
    <security>
      <requestedPrivileges>
        <requestedExecutionLevel level="requireAdministrator" uiAccess="false"/>
      </requestedPrivileges>
    </security>
  </trustInfo>
</assembly>
"#;
pub static PAYLOAD: &[u8] = b"resource payload kept across updates";

pub const FILE_ALIGNMENT: u32 = 0x200;
pub const SECTION_ALIGNMENT: u32 = 0x1000;
pub const TEXT_RVA: u32 = 0x1000;
pub const RSRC_RVA: u32 = 0x2000;
pub const RSRC_OFFSET: u32 = 0x400;

static INIT_LOGGER: Once = Once::new();
pub fn init_logger() {
    INIT_LOGGER.call_once(|| {
        env_logger::builder()
            .is_test(true)
            .filter_level(log::LevelFilter::Debug)
            .format_timestamp(None)
            .format_module_path(false)
            .format_level(true)
            .format_target(false)
            .write_style(env_logger::WriteStyle::Auto)
            .init();
    });
}

pub fn manifest_key() -> ResourceKey { ResourceKey::manifest(1, LANGUAGE_ID_EN_US) }

pub fn payload_key() -> ResourceKey {
    ResourceKey::new(RT_RCDATA.into(), "PAYLOAD".into(), LANGUAGE_ID_NEUTRAL)
}

/// Resource directory with an XML manifest and one data resource.
pub fn sample_resources() -> ResourceDirectory {
    let mut resources = ResourceDirectory::default();
    resources.set(&manifest_key(), MANIFEST.to_vec()).unwrap();
    resources.set(&payload_key(), PAYLOAD.to_vec()).unwrap();
    resources
}

fn put(image: &mut Vec<u8>, offset: usize, bytes: &[u8]) {
    if image.len() < offset + bytes.len() {
        image.resize(offset + bytes.len(), 0);
    }
    image[offset..offset + bytes.len()].copy_from_slice(bytes);
}

fn aligned(value: u32, alignment: u32) -> u32 { value.div_ceil(alignment) * alignment }

/// Build a minimal PE32+ image with a `.text` section and, if given, a `.rsrc` section
/// holding the resource directory. The overlay is appended after all sections.
pub fn build_image(resources: Option<&ResourceDirectory>, overlay: &[u8]) -> Vec<u8> {
    let mut image = vec![0u8; 0x200];
    put(&mut image, 0, &PE_DOS_MAGIC.to_le_bytes());
    put(&mut image, PE_PTR_OFFSET as usize, &0x40u32.to_le_bytes());
    put(&mut image, 0x40, &PE_NT_SIGNATURE.to_le_bytes());

    let number_of_sections = if resources.is_some() { 2 } else { 1 };
    let coff_header = CoffHeader {
        machine: 0x8664,
        number_of_sections,
        size_of_optional_header: (PE_OPTIONAL_HEADER_SIZE_64 + 16 * PE_DATA_DIRECTORY_SIZE) as u16,
        characteristics: 0x22,
        ..CoffHeader::default()
    };
    put(&mut image, 0x44, coff_header.as_bytes());

    let standard_header = StandardHeader {
        magic: PE_64_MAGIC,
        size_of_code: FILE_ALIGNMENT,
        address_of_entry_point: TEXT_RVA,
        base_of_code: TEXT_RVA,
        ..StandardHeader::default()
    };
    let standard_header_offset = 0x44 + PE_COFF_HEADER_SIZE as usize;
    put(&mut image, standard_header_offset, standard_header.as_bytes());

    let resource_size = resources.map(|resources| resources.size()).unwrap_or(0);
    let size_of_image = if resources.is_some() {
        RSRC_RVA + aligned(resource_size, SECTION_ALIGNMENT)
    } else {
        RSRC_RVA
    };
    let windows_header = WindowsHeader::<u64> {
        image_base: 0x1_4000_0000,
        section_alignment: SECTION_ALIGNMENT,
        file_alignment: FILE_ALIGNMENT,
        operating_system_version: VersionU16 { major: 6, minor: 0 },
        subsystem_version: VersionU16 { major: 6, minor: 0 },
        size_of_image,
        size_of_headers: 0x200,
        check_sum: 0x1234,
        subsystem: 3,
        number_of_rva_and_sizes: 16,
        ..WindowsHeader::default()
    };
    let windows_header_offset = standard_header_offset + PE_STANDARD_HEADER_SIZE_64 as usize;
    put(&mut image, windows_header_offset, windows_header.as_bytes());

    let data_directory_offset = standard_header_offset + PE_OPTIONAL_HEADER_SIZE_64 as usize;
    if resources.is_some() {
        let directory = ImageDataDirectory {
            virtual_address: RSRC_RVA,
            size:            resource_size,
        };
        put(&mut image, data_directory_offset + 2 * PE_DATA_DIRECTORY_SIZE as usize, directory.as_bytes());
    }

    let section_table_offset = data_directory_offset + 16 * PE_DATA_DIRECTORY_SIZE as usize;
    let text = SectionHeader {
        name: SectionHeader::encode_name(".text"),
        virtual_size: 0x10,
        virtual_address: TEXT_RVA,
        size_of_raw_data: FILE_ALIGNMENT,
        pointer_to_raw_data: 0x200,
        characteristics: IMAGE_SCN_CNT_CODE | IMAGE_SCN_MEM_EXECUTE | IMAGE_SCN_MEM_READ,
        ..SectionHeader::default()
    };
    put(&mut image, section_table_offset, text.as_bytes());
    put(&mut image, 0x200, &[0xc3; 0x10]);
    image.resize(0x400, 0);

    if let Some(resources) = resources {
        let rsrc = SectionHeader {
            name: SectionHeader::encode_name(".rsrc"),
            virtual_size: resource_size,
            virtual_address: RSRC_RVA,
            size_of_raw_data: aligned(resource_size, FILE_ALIGNMENT),
            pointer_to_raw_data: RSRC_OFFSET,
            characteristics: IMAGE_SCN_CNT_INITIALIZED_DATA | IMAGE_SCN_MEM_READ,
            ..SectionHeader::default()
        };
        put(&mut image, section_table_offset + PE_SECTION_HEADER_SIZE as usize, rsrc.as_bytes());
        put(&mut image, RSRC_OFFSET as usize, &resources.build(RSRC_RVA));
        image.resize((RSRC_OFFSET + aligned(resource_size, FILE_ALIGNMENT)) as usize, 0);
    }

    image.extend_from_slice(overlay);
    image
}

/// Scratch directory for one test, removed when dropped.
pub struct TestDir(PathBuf);
impl TestDir {
    pub fn new(name: &str) -> Self {
        let path = std::env::temp_dir().join(format!("rmmanifest-{}-{}", name, std::process::id()));
        let _ = std::fs::remove_dir_all(&path);
        std::fs::create_dir_all(&path).unwrap();
        Self(path)
    }

    pub fn path(&self) -> &Path { &self.0 }

    pub fn write(&self, name: &str, data: &[u8]) -> PathBuf {
        let path = self.0.join(name);
        std::fs::write(&path, data).unwrap();
        path
    }

    pub fn file_names(&self) -> Vec<String> {
        let mut names = std::fs::read_dir(&self.0)
            .unwrap()
            .map(|entry| entry.unwrap().file_name().to_string_lossy().into_owned())
            .collect::<Vec<_>>();
        names.sort();
        names
    }
}
impl Drop for TestDir {
    fn drop(&mut self) { let _ = std::fs::remove_dir_all(&self.0); }
}
