//! Portable executable image representation.
//!
//! See <https://learn.microsoft.com/en-us/windows/win32/debug/pe-format> for more information.

use std::{
    borrow::Cow,
    fs,
    io::{Read, Write},
    path::{Path, PathBuf},
};

use ahash::RandomState;
use indexmap::IndexMap;
use log::{debug, error, info, warn};
use zerocopy::IntoBytes;

use crate::{constants::*, errors::*, resource::*, types::*, util::*};

/// Image data directory type enumeration.
#[derive(Debug, Clone, Copy, Eq, PartialEq, Ord, PartialOrd, Hash)]
pub enum DataDirectoryType {
    ExportTable,
    ImportTable,
    ResourceTable,
    ExceptionTable,
    CertificateTable,
    BaseRelocationTable,
    Debug,
    Architecture,
    GlobalPtr,
    TLSTable,
    LoadConfigTable,
    BoundImport,
    IAT,
    DelayImportDescriptor,
    CLRRuntimeHeader,
    Reserved,
}
impl DataDirectoryType {
    /// All data directories in the order they appear in the optional header.
    pub const ALL: [DataDirectoryType; 16] = [
        DataDirectoryType::ExportTable,
        DataDirectoryType::ImportTable,
        DataDirectoryType::ResourceTable,
        DataDirectoryType::ExceptionTable,
        DataDirectoryType::CertificateTable,
        DataDirectoryType::BaseRelocationTable,
        DataDirectoryType::Debug,
        DataDirectoryType::Architecture,
        DataDirectoryType::GlobalPtr,
        DataDirectoryType::TLSTable,
        DataDirectoryType::LoadConfigTable,
        DataDirectoryType::BoundImport,
        DataDirectoryType::IAT,
        DataDirectoryType::DelayImportDescriptor,
        DataDirectoryType::CLRRuntimeHeader,
        DataDirectoryType::Reserved,
    ];
}

/// Where a rebuilt resource directory is placed in the image.
#[derive(Debug, Clone, Copy)]
enum Placement {
    /// Overwrite the section at the index, which holds only the resource directory.
    InPlace { index: usize, raw_size: u32 },
    /// Add a new section after all existing sections.
    Append,
}

/// Portable executable image representation.
///
/// This struct is the main entry point for parsing, querying and updating a portable executable image.
#[derive(Debug, Clone)]
pub struct Image<'a> {
    pub(crate) image: Cow<'a, [u8]>,

    pub(crate) coff_header:           CoffHeader,
    pub(crate) standard_header:       StandardHeader,
    pub(crate) windows_header:        GenericWindowsHeader,
    pub(crate) header_data_directory: IndexMap<DataDirectoryType, ImageDataDirectory, RandomState>,
    pub(crate) section_table:         Vec<SectionHeader>,

    pub(crate) resource_directory: Option<ResourceDirectory>,

    coff_header_offset:    u64,
    windows_header_offset: u64,
    data_directory_offset: u64,
    section_table_offset:  u64,
}

impl PartialEq for Image<'_> {
    fn eq(&self, other: &Self) -> bool {
        self.coff_header == other.coff_header
            && self.standard_header == other.standard_header
            && self.windows_header == other.windows_header
            && self.header_data_directory == other.header_data_directory
            && self.section_table == other.section_table
            && self.resource_directory == other.resource_directory
    }
}
impl Eq for Image<'_> {}

impl<'a> Image<'a> {
    /// Parse a portable executable image from a byte slice.
    ///
    /// # Returns
    /// Returns the `Image`, or an error if the byte slice is not a valid portable executable image or is missing required headers.
    pub fn parse<R: Into<Cow<'a, [u8]>>>(image: R) -> Result<Self, ImageReadError> {
        let image = image.into();

        let pe_dos_magic = read_at::<u16>(&image, 0)?;
        debug!("pe_dos_magic: {:#x?}", pe_dos_magic);
        if pe_dos_magic != PE_DOS_MAGIC {
            return Err(ImageReadError::InvalidHeader("no dos magic".into()));
        }

        let pe_signature_offset = read_at::<u32>(&image, PE_PTR_OFFSET as u64)? as u64;
        let pe_signature = read_at::<u32>(&image, pe_signature_offset)?;
        debug!("{:#x?}: pe_signature: {:#x?}", pe_signature_offset, pe_signature);
        if pe_signature != PE_NT_SIGNATURE {
            return Err(ImageReadError::InvalidHeader("no pe signature".into()));
        }

        let coff_header_offset = pe_signature_offset + 4;
        let coff_header = read_at::<CoffHeader>(&image, coff_header_offset)?;
        debug!("{:#x?}: {:#x?}", coff_header_offset, coff_header);

        let standard_header_offset = coff_header_offset + PE_COFF_HEADER_SIZE as u64;
        let standard_header = read_at::<StandardHeader>(&image, standard_header_offset)?;
        debug!("{:#x?}: {:#x?}", standard_header_offset, standard_header);

        let size_of_optional_header = coff_header.size_of_optional_header as u64;
        let (windows_header_offset, windows_header, data_directory_offset) = match standard_header.magic {
            PE_32_MAGIC if size_of_optional_header >= PE_OPTIONAL_HEADER_SIZE_32 as u64 => {
                let offset = standard_header_offset + PE_STANDARD_HEADER_SIZE_32 as u64;
                let header = read_at::<WindowsHeader<u32>>(&image, offset)?;
                (
                    offset,
                    GenericWindowsHeader::WindowsHeader32(header),
                    standard_header_offset + PE_OPTIONAL_HEADER_SIZE_32 as u64,
                )
            }
            PE_64_MAGIC if size_of_optional_header >= PE_OPTIONAL_HEADER_SIZE_64 as u64 => {
                let offset = standard_header_offset + PE_STANDARD_HEADER_SIZE_64 as u64;
                let header = read_at::<WindowsHeader<u64>>(&image, offset)?;
                (
                    offset,
                    GenericWindowsHeader::WindowsHeader64(header),
                    standard_header_offset + PE_OPTIONAL_HEADER_SIZE_64 as u64,
                )
            }
            _ => return Err(ImageReadError::InvalidHeader("invalid optional header".into())),
        };
        debug!("{:#x?}: {:#x?}", windows_header_offset, windows_header);

        let section_table_offset = standard_header_offset + size_of_optional_header;
        let directory_capacity =
            (section_table_offset - data_directory_offset) / PE_DATA_DIRECTORY_SIZE as u64;
        let directory_count = (windows_header.number_of_rva_and_sizes() as u64).min(directory_capacity);
        if directory_count < windows_header.number_of_rva_and_sizes() as u64 {
            warn!(
                "optional header holds {} data directories, {} announced",
                directory_capacity,
                windows_header.number_of_rva_and_sizes()
            );
        }

        let mut header_data_directory =
            IndexMap::<DataDirectoryType, ImageDataDirectory, _>::with_hasher(RandomState::new());
        for (index, &kind) in DataDirectoryType::ALL.iter().enumerate().take(directory_count as usize) {
            let offset = data_directory_offset + index as u64 * PE_DATA_DIRECTORY_SIZE as u64;
            let directory = read_at::<ImageDataDirectory>(&image, offset)?;
            debug!("{:#x?}: {:?}: {:#x?}", offset, kind, directory);
            header_data_directory.insert(kind, directory);
        }

        let mut section_table = Vec::with_capacity(coff_header.number_of_sections as usize);
        for index in 0..coff_header.number_of_sections as u64 {
            let offset = section_table_offset + index * PE_SECTION_HEADER_SIZE as u64;
            let section_header = read_at::<SectionHeader>(&image, offset)?;
            debug!(
                "{:#x?}: {}: {:#x?}",
                offset,
                section_header.name().unwrap_or("?".to_string()),
                section_header
            );
            section_table.push(section_header);
        }

        let resource_directory = match header_data_directory.get(&DataDirectoryType::ResourceTable) {
            Some(directory) if directory.virtual_address > 0 && directory.size > 0 => {
                Self::parse_resource_directory(&image, directory, &section_table)?
            }
            _ => None,
        };

        Ok(Self {
            image,
            coff_header,
            standard_header,
            windows_header,
            header_data_directory,
            section_table,
            resource_directory,
            coff_header_offset,
            windows_header_offset,
            data_directory_offset,
            section_table_offset,
        })
    }

    fn parse_resource_directory(
        image: &[u8], directory: &ImageDataDirectory, section_table: &[SectionHeader],
    ) -> Result<Option<ResourceDirectory>, ImageReadError> {
        let virtual_address = directory.virtual_address;
        let Some(section) = section_table.iter().find(|section| section.contains_rva(virtual_address))
        else {
            warn!("resource directory at {:#x?} is not inside any section", virtual_address);
            return Ok(None);
        };
        debug!(
            "found resource directory in {} section: {:#x?}",
            section.name().unwrap_or("?".to_string()),
            section
        );
        let base_address = section.pointer_to_raw_data as u64
            + (virtual_address - section.virtual_address) as u64;
        let base_address = u32::try_from(base_address).map_err(|_| {
            ImageReadError::InvalidSection(format!("resource directory offset {:#x?}", base_address))
        })?;
        ResourceDirectory::parse(image, base_address, virtual_address).map(Some)
    }

    /// Parse a portable executable image from a file.
    ///
    /// # Returns
    /// Returns the `Image`, or an error if the file could not be read, is not a valid portable executable image or is missing required headers.
    pub fn parse_file<P: AsRef<Path>>(path: P) -> Result<Image<'static>, ImageReadError> {
        let data = fs::read(path)?;
        Image::parse(data)
    }

    /// Parse a portable executable image from a reader.
    ///
    /// # Returns
    /// Returns the `Image`, or an error if the reader could not be read, is not a valid portable executable image or is missing required headers.
    pub fn parse_reader<R: Read>(reader: &mut R) -> Result<Image<'static>, ImageReadError> {
        let mut data = Vec::new();
        reader.read_to_end(&mut data)?;
        Image::parse(data)
    }

    /// Write the portable executable image to a file.
    ///
    /// The image is written to a temporary file next to the target which then replaces the target,
    /// so other processes see either the previous or the new file.
    /// Symbolic links are resolved first, the file they point to is replaced and the links are kept.
    ///
    /// # Returns
    /// Returns an error if the file could not be written. The target is left untouched in that case.
    pub fn write_file<P: AsRef<Path>>(&self, path: P) -> Result<(), ImageWriteError> {
        let path = match fs::canonicalize(path.as_ref()) {
            Ok(resolved) => resolved,
            Err(error) if error.kind() == std::io::ErrorKind::NotFound => path.as_ref().to_path_buf(),
            Err(error) => return Err(error.into()),
        };
        let path = path.as_path();
        let temporary = temporary_path(path);
        debug!("writing {} bytes to {}", self.image.len(), temporary.display());

        let write = || -> std::io::Result<()> {
            let mut file = fs::File::create(&temporary)?;
            file.write_all(&self.image)?;
            file.sync_all()?;
            drop(file);
            if let Ok(metadata) = fs::metadata(path) {
                fs::set_permissions(&temporary, metadata.permissions())?;
            }
            fs::rename(&temporary, path)
        };
        if let Err(error) = write() {
            error!("failed to replace {}: {}", path.display(), error);
            if let Err(error) = fs::remove_file(&temporary) {
                debug!("failed to remove {}: {}", temporary.display(), error);
            }
            return Err(error.into());
        }
        Ok(())
    }

    /// Write the portable executable image to a writer.
    ///
    /// # Returns
    /// Returns an error if the writer could not be written.
    pub fn write_writer<W: Write>(&self, writer: &mut W) -> Result<(), ImageWriteError> {
        writer.write_all(&self.image).map_err(|e| e.into())
    }

    /// Set the resource directory of the image.
    ///
    /// This will update the resource data directory and the resource section.
    /// The section containing the existing resource directory is updated in place if all of the following conditions are met:
    /// - The section is not used by other directories and the resource directory starts at the beginning of the section.
    /// - The new directory is not larger than the section, or the section is the last section in the file.
    /// - The section can grow to the new virtual size without overlapping another section.
    ///
    /// Otherwise, the existing section is kept intact and a new section is added after all other sections and before any other data at the end of the image.
    ///
    /// # Returns
    /// Returns the previous resource directory, or an error in the following cases:
    /// - There is not enough free space in the image header to add a new section.
    /// - A section points to data outside the image.
    /// - The image declares a zero file or section alignment.
    ///
    /// The image is unchanged when an error is returned.
    ///
    /// # Safety
    /// Replacing an existing resource directory may cause the resulting image to be invalid.
    /// Applications might reference data inside the resource directory that may not exist in the new one.
    ///
    /// Some packed images (e.g. packed with UPX) might not work with a modified resource directory or additional sections.
    pub fn set_resource_directory(
        &mut self, resource_directory: ResourceDirectory,
    ) -> Result<Option<ResourceDirectory>, ImageWriteError> {
        let file_alignment = self.windows_header.file_alignment();
        let section_alignment = self.windows_header.section_alignment();
        if file_alignment == 0 || section_alignment == 0 {
            return Err(ImageWriteError::InvalidAlignment(file_alignment, section_alignment));
        }

        // modify copies to allow erroring out without invalidating the image
        let mut coff_header = self.coff_header;
        let mut windows_header = self.windows_header;
        let mut header_data_directory = self.header_data_directory.clone();
        let mut section_table = self.section_table.clone();

        for &kind in DataDirectoryType::ALL[..=DataDirectoryType::ResourceTable as usize].iter() {
            if !header_data_directory.contains_key(&kind) {
                debug!("adding missing header data directory: {:?}", kind);
                header_data_directory.insert(kind, ImageDataDirectory::default());
            }
        }
        let directory_area = self.section_table_offset - self.data_directory_offset;
        let directory_table_size = header_data_directory.len() as u64 * PE_DATA_DIRECTORY_SIZE as u64;
        let optional_header_growth = directory_table_size.saturating_sub(directory_area);
        coff_header.size_of_optional_header += optional_header_growth as u16;

        let image_len = self.image.len() as u64;
        let headers_end =
            self.section_table_offset + section_table.len() as u64 * PE_SECTION_HEADER_SIZE as u64;
        let sections_start = section_table
            .iter()
            .filter(|section| section.has_raw_data())
            .map(|section| section.pointer_to_raw_data as u64)
            .min()
            .unwrap_or(image_len);
        let sections_end = section_table
            .iter()
            .filter(|section| section.has_raw_data())
            .map(|section| section.raw_end())
            .max()
            .unwrap_or(image_len);
        if sections_end > image_len {
            return Err(ImageWriteError::InvalidSectionRange(sections_end, image_len));
        }
        if sections_start < headers_end {
            return Err(ImageWriteError::InvalidSectionRange(headers_end, sections_start));
        }
        let header_limit = (windows_header.size_of_headers() as u64).min(sections_start).max(headers_end);

        let new_size = resource_directory.size();
        debug!(
            "new resource data size: {:#x?} (aligned: {:#x?})",
            new_size,
            aligned_to(new_size, file_alignment)
        );

        let old_directory = header_data_directory
            .get(&DataDirectoryType::ResourceTable)
            .copied()
            .unwrap_or_default();
        let placement =
            self.resource_placement(&header_data_directory, old_directory, new_size, sections_end);

        let mut section_data;
        let mut header_growth = optional_header_growth;
        match placement {
            Placement::InPlace { index, raw_size } => {
                let section = &mut section_table[index];
                section_data = resource_directory.build(section.virtual_address);
                section_data.resize(raw_size as usize, 0);
                section.size_of_raw_data = raw_size;
                section.virtual_size = new_size;
                let virtual_address = section.virtual_address;
                header_data_directory.insert(
                    DataDirectoryType::ResourceTable,
                    ImageDataDirectory { virtual_address, size: new_size },
                );
            }
            Placement::Append => {
                let virtual_address = section_table
                    .iter()
                    .map(|section| section.virtual_end())
                    .max()
                    .unwrap_or(windows_header.size_of_headers() as u64);
                let virtual_address = aligned_to(virtual_address, section_alignment as u64);
                let pointer_to_raw_data = aligned_to(sections_end, file_alignment as u64);
                let (Ok(virtual_address), Ok(pointer_to_raw_data)) =
                    (u32::try_from(virtual_address), u32::try_from(pointer_to_raw_data))
                else {
                    return Err(ImageWriteError::ImageTooLarge(pointer_to_raw_data.max(virtual_address)));
                };

                let raw_size = aligned_to(new_size, file_alignment);
                section_data = resource_directory.build(virtual_address);
                section_data.resize(raw_size as usize, 0);
                let section = SectionHeader {
                    name: SectionHeader::encode_name(".rsrc"),
                    virtual_size: new_size,
                    virtual_address,
                    size_of_raw_data: raw_size,
                    pointer_to_raw_data,
                    characteristics: IMAGE_SCN_CNT_INITIALIZED_DATA | IMAGE_SCN_MEM_READ,
                    ..SectionHeader::default()
                };
                debug!("adding resource section: {:#x?}", section);
                section_table.push(section);
                coff_header.number_of_sections += 1;
                header_growth += PE_SECTION_HEADER_SIZE as u64;
                header_data_directory.insert(
                    DataDirectoryType::ResourceTable,
                    ImageDataDirectory { virtual_address, size: new_size },
                );
            }
        }

        let available_space = header_limit - headers_end;
        debug!("available header space: {:#x?}", available_space);
        debug!("required additional header space: {:#x?}", header_growth);
        if header_growth > available_space
            || self.image[headers_end as usize..(headers_end + header_growth) as usize]
                .iter()
                .any(|&byte| byte != 0)
        {
            error!(
                "not enough free space in header ({:#x?} required, {:#x?} available)",
                header_growth, available_space
            );
            return Err(ImageWriteError::NotEnoughSpaceInHeader);
        }

        // section data between the first and the last section
        let mut body = Vec::with_capacity((sections_end - sections_start) as usize + section_data.len());
        match placement {
            Placement::InPlace { index, .. } => {
                let section = self.section_table[index];
                body.extend_from_slice(&self.image[sections_start as usize..section.pointer_to_raw_data as usize]);
                body.extend_from_slice(&section_data);
                if section.raw_end() < sections_end {
                    body.extend_from_slice(&self.image[section.raw_end() as usize..sections_end as usize]);
                }
            }
            Placement::Append => {
                body.extend_from_slice(&self.image[sections_start as usize..sections_end as usize]);
                let padding = aligned_to(sections_end, file_alignment as u64) - sections_end;
                body.resize(body.len() + padding as usize, 0);
                body.extend_from_slice(&section_data);
            }
        }

        let overlay = &self.image[sections_end as usize..];
        let shift = (sections_start + body.len() as u64) as i64 - sections_end as i64;
        if let Some(certificates) = header_data_directory.get_mut(&DataDirectoryType::CertificateTable) {
            if certificates.size > 0 {
                warn!("image is signed, the signature is invalidated by the resource update");
                if shift != 0 && certificates.virtual_address as u64 >= sections_end {
                    // the certificate table address is a file offset
                    certificates.virtual_address = (certificates.virtual_address as i64 + shift) as u32;
                    debug!("moved certificate table by {:#x?}", shift);
                }
            }
        }
        if !overlay.is_empty() && shift != 0 {
            info!("moving {:#x?} bytes of trailing data by {:#x?}", overlay.len(), shift);
        }

        let size_of_image = section_table
            .iter()
            .map(|section| aligned_to(section.virtual_end(), section_alignment as u64))
            .max()
            .unwrap_or(0)
            .max(aligned_to(windows_header.size_of_headers() as u64, section_alignment as u64));
        let size_of_image =
            u32::try_from(size_of_image).map_err(|_| ImageWriteError::ImageTooLarge(size_of_image))?;
        windows_header.set_layout(size_of_image, header_data_directory.len() as u32);

        let mut header = Vec::with_capacity(sections_start as usize);
        header.extend_from_slice(&self.image[..self.data_directory_offset as usize]);
        let coff_header_offset = self.coff_header_offset as usize;
        header[coff_header_offset..coff_header_offset + PE_COFF_HEADER_SIZE as usize]
            .copy_from_slice(coff_header.as_bytes());
        let windows_header_offset = self.windows_header_offset as usize;
        let windows_header_bytes = windows_header.as_bytes();
        header[windows_header_offset..windows_header_offset + windows_header_bytes.len()]
            .copy_from_slice(windows_header_bytes);
        for directory in header_data_directory.values() {
            header.extend_from_slice(directory.as_bytes());
        }
        if directory_table_size < directory_area {
            // keep the remaining optional header bytes, the section table does not move
            header.extend_from_slice(
                &self.image[(self.data_directory_offset + directory_table_size) as usize
                    ..self.section_table_offset as usize],
            );
        }
        for section in section_table.iter() {
            header.extend_from_slice(section.as_bytes());
        }
        header.extend_from_slice(&self.image[(headers_end + header_growth) as usize..sections_start as usize]);
        debug_assert_eq!(header.len() as u64, sections_start);

        let mut new_image = header;
        new_image.extend_from_slice(&body);
        new_image.extend_from_slice(overlay);
        if new_image.len() as u64 > u32::MAX as u64 {
            return Err(ImageWriteError::ImageTooLarge(new_image.len() as u64));
        }

        let rebuilt = Image::parse(new_image).map_err(ImageWriteError::InvalidRebuild)?;
        let previous = std::mem::replace(self, rebuilt);
        Ok(previous.resource_directory)
    }

    fn resource_placement(
        &self, header_data_directory: &IndexMap<DataDirectoryType, ImageDataDirectory, RandomState>,
        old_directory: ImageDataDirectory, new_size: u32, sections_end: u64,
    ) -> Placement {
        if old_directory.size == 0 {
            debug!("no existing resource directory, adding new resource section");
            return Placement::Append;
        }
        let virtual_address = old_directory.virtual_address;
        let Some(index) = self.section_table.iter().position(|section| section.contains_rva(virtual_address))
        else {
            warn!("existing resource directory is outside of all sections");
            return Placement::Append;
        };
        let section = self.section_table[index];
        debug!(
            "found existing resource directory in {} section: {:#x?}",
            section.name().unwrap_or("?".to_string()),
            section
        );

        if section.virtual_address != virtual_address || !section.has_raw_data() {
            debug!("resource directory does not start at the section start, keeping section intact");
            return Placement::Append;
        }

        let mut shared = false;
        for (kind, directory) in header_data_directory.iter() {
            // the certificate table address is a file offset, not a virtual address
            if matches!(kind, DataDirectoryType::ResourceTable | DataDirectoryType::CertificateTable) {
                continue;
            }
            if directory.size > 0 && section.contains_rva(directory.virtual_address) {
                info!("resource section also used by data directory {:?}", kind);
                shared = true;
            }
        }
        if shared {
            warn!("resource section used by multiple data directories can indicate a packed executable");
            return Placement::Append;
        }

        let is_last_section = section.raw_end() == sections_end;
        let raw_size = if new_size <= section.size_of_raw_data && !is_last_section {
            debug!(
                "existing section size is large enough and can be reused ({:#x?} >= {:#x?})",
                { section.size_of_raw_data },
                new_size
            );
            section.size_of_raw_data
        } else if is_last_section {
            debug!("existing section is the last section and can be resized");
            aligned_to(new_size, self.windows_header.file_alignment())
        } else {
            debug!(
                "existing resource section size is too small and followed by other sections ({:#x?} < {:#x?})",
                { section.size_of_raw_data },
                new_size
            );
            return Placement::Append;
        };

        let virtual_end = section.virtual_address as u64
            + aligned_to(new_size.max(raw_size) as u64, self.windows_header.section_alignment() as u64);
        let overlaps = self.section_table.iter().enumerate().any(|(other_index, other)| {
            other_index != index
                && (other.virtual_address as u64) < virtual_end
                && other.virtual_end() > section.virtual_address as u64
        });
        if overlaps {
            debug!("resized resource section would overlap the following section");
            return Placement::Append;
        }

        Placement::InPlace { index, raw_size }
    }

    /// Returns the current resource directory or `None` if the image does not contain a resource directory.
    pub fn resource_directory(&self) -> Option<&ResourceDirectory> { self.resource_directory.as_ref() }

    /// Returns the raw image data with all changes applied.
    pub fn data(&self) -> &[u8] { &self.image }

    /// Returns the parsed coff header.
    pub fn coff_header(&self) -> &CoffHeader { &self.coff_header }

    /// Returns the parsed standard header.
    pub fn standard_header(&self) -> &StandardHeader { &self.standard_header }

    /// Returns the parsed windows header.
    pub fn windows_header(&self) -> &GenericWindowsHeader { &self.windows_header }

    /// Returns the data directory for the requested header.
    pub fn data_directory(&self, directory: DataDirectoryType) -> Option<&ImageDataDirectory> {
        self.header_data_directory.get(&directory)
    }

    /// Returns all data directories existing in the image.
    pub fn data_directories(&self) -> Vec<DataDirectoryType> {
        self.header_data_directory.keys().copied().collect::<Vec<_>>()
    }

    /// Returns the section header containing the data directory.
    pub fn section_header_for_data_directory(
        &self, directory: DataDirectoryType,
    ) -> Option<&SectionHeader> {
        let directory = self.data_directory(directory)?;
        let virtual_address = directory.virtual_address;
        self.section_table.iter().find(|section| section.contains_rva(virtual_address))
    }

    /// Returns all section tables existing in the image.
    pub fn section_table(&self) -> &Vec<SectionHeader> { &self.section_table }
}

fn temporary_path(path: &Path) -> PathBuf {
    let file_name = path
        .file_name()
        .map(|name| name.to_string_lossy().into_owned())
        .unwrap_or_else(|| "image".to_string());
    path.with_file_name(format!(".{}.{}.tmp", file_name, std::process::id()))
}
