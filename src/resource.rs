//! Data types for parsing, editing and building the resource section.
//! The resource section contains the resource directory and the resource data.
//! See <https://learn.microsoft.com/en-us/windows/win32/debug/pe-format#the-rsrc-section> for more information.

use std::{borrow::Borrow, cmp::Ordering, collections::HashSet, fmt};

use ahash::RandomState;
use debug_ignore::DebugIgnore;
use indexmap::IndexMap;
use log::{debug, error, trace, warn};
use zerocopy::IntoBytes;

use crate::{constants::*, errors::*, types::*, util::*};

// type, name and language levels, with some slack for unusual but valid trees
const MAX_TABLE_DEPTH: usize = 8;

/// Key of a leaf in the resource directory.
#[derive(Debug, Clone, Eq, PartialEq, Hash)]
pub struct ResourceKey {
    pub kind:     ResourceEntryName,
    pub name:     ResourceEntryName,
    pub language: LANGID,
}
impl ResourceKey {
    pub fn new(kind: ResourceEntryName, name: ResourceEntryName, language: LANGID) -> Self {
        Self { kind, name, language }
    }

    /// Key of a manifest resource with the given id and language.
    pub fn manifest(id: WORD, language: LANGID) -> Self {
        Self::new(ResourceEntryName::from(RT_MANIFEST), ResourceEntryName::from(id), language)
    }

    fn language_name(&self) -> ResourceEntryName { ResourceEntryName::ID(self.language as u32) }
}
impl fmt::Display for ResourceKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}/{}/{}", self.kind, self.name, self.language)
    }
}

/// Portable executable resource directory.
#[derive(Debug, Clone, Eq, PartialEq, Default)]
pub struct ResourceDirectory {
    pub(crate) virtual_address: u32,
    pub(crate) root:            ResourceTable,
    pub(crate) skipped_entries: usize,
}
impl ResourceDirectory {
    /// Parse the resource directory located at the file offset `base_address` of the image.
    /// The virtual address is the address the directory is loaded at and is used to resolve the resource data offsets.
    ///
    /// Data entries pointing outside the image are left out of the directory and counted in [`ResourceDirectory::skipped_entries`].
    ///
    /// # Returns
    /// Returns an error if the resource directory at the given address is invalid,
    /// including tables nested too deep or referenced more than once.
    pub fn parse(
        image: &[u8], base_address: u32, virtual_address: u32,
    ) -> Result<Self, ImageReadError> {
        let mut state = ParseState {
            tables:  HashSet::with_hasher(RandomState::new()),
            skipped: 0,
        };
        let root = ResourceTable::parse(image, base_address, virtual_address, 0, 0, &mut state)?;
        if state.skipped > 0 {
            warn!("skipped {} resource data entries outside of the image", state.skipped);
        }
        Ok(Self {
            virtual_address,
            root,
            skipped_entries: state.skipped,
        })
    }

    /// Returns the number of data entries that could not be read when the directory was parsed.
    /// Building a directory with skipped entries drops them from the image.
    pub fn skipped_entries(&self) -> usize { self.skipped_entries }

    /// Returns the virtual address of the resource directory in the source image.
    pub fn virtual_address(&self) -> u32 { self.virtual_address }

    /// Returns the root resource table.
    /// The root resource table contains one table per resource type.
    pub fn root(&self) -> &ResourceTable { &self.root }

    /// Returns the mutable root resource table.
    pub fn root_mut(&mut self) -> &mut ResourceTable { &mut self.root }

    /// Returns the size of the resulting resource directory in bytes.
    pub fn size(&self) -> u32 {
        self.root.tables_size()
            + aligned_to(self.root.strings_size(), 8)
            + self.root.descriptions_size()
            + self.root.data_size()
    }

    /// Build the resource directory into raw bytes to be included in an image.
    /// The virtual address is used to compute the resource data offsets and has to correspond to the address the directory is placed at in the target image.
    pub fn build(&self, virtual_address: u32) -> Vec<u8> {
        let tables_size = self.root.tables_size();
        let strings_size = aligned_to(self.root.strings_size(), 8);
        let descriptions_size = self.root.descriptions_size();

        let mut builder = DirectoryBuilder {
            tables:            Vec::with_capacity(tables_size as usize),
            strings:           Vec::with_capacity(strings_size as usize),
            descriptions:      Vec::with_capacity(descriptions_size as usize),
            data:              Vec::with_capacity(self.root.data_size() as usize),
            strings_base:      tables_size,
            descriptions_base: tables_size + strings_size,
            data_rva:          virtual_address + tables_size + strings_size + descriptions_size,
        };
        builder.write_table(&self.root);
        builder.strings.resize(strings_size as usize, 0);

        let mut data = builder.tables;
        data.extend(builder.strings);
        data.extend(builder.descriptions);
        data.extend(builder.data);
        data
    }

    /// Returns the data stored under the key.
    pub fn get(&self, key: &ResourceKey) -> Option<&ResourceData> {
        self.root
            .get(&key.kind)?
            .as_table()?
            .get(&key.name)?
            .as_table()?
            .get(key.language_name())?
            .as_data()
    }

    /// Store `data` under the key, creating the type and name tables as needed.
    /// An existing entry keeps its codepage and only has its data replaced.
    ///
    /// # Returns
    /// Returns the replaced data, or an error if the existing tree has data where a table is required.
    pub fn set(
        &mut self, key: &ResourceKey, data: Vec<u8>,
    ) -> Result<Option<ResourceData>, ResourceError> {
        let names = self.root.table_or_insert(&key.kind)?;
        let languages = names.table_or_insert(&key.name)?;
        let language = key.language_name();
        match languages.get_mut(&language) {
            Some(ResourceEntry::Data(existing)) => {
                let previous = existing.clone();
                existing.set_data(data);
                Ok(Some(previous))
            }
            Some(ResourceEntry::Table(_)) => Err(ResourceError::InvalidTable(format!(
                "language entry {} is a table",
                key
            ))),
            None => {
                languages.insert(language, ResourceEntry::Data(ResourceData::new(data)));
                Ok(None)
            }
        }
    }

    /// Remove the data stored under the key.
    /// Type and name tables left empty by the removal are removed as well.
    ///
    /// # Returns
    /// Returns the removed data.
    pub fn remove(&mut self, key: &ResourceKey) -> Option<ResourceData> {
        let language = key.language_name();
        let names = self.root.get_mut(&key.kind)?.as_table_mut()?;
        let languages = names.get_mut(&key.name)?.as_table_mut()?;
        languages.get(&language)?.as_data()?;
        let removed = languages.remove(&language)?;

        if languages.is_empty() {
            debug!("removing empty resource name table {}", key.name);
            names.remove(&key.name);
        }
        if names.is_empty() {
            debug!("removing empty resource type table {}", key.kind);
            self.root.remove(&key.kind);
        }
        match removed {
            ResourceEntry::Data(data) => Some(data),
            ResourceEntry::Table(_) => None,
        }
    }

    /// Returns the keys of all data entries in the standard three level layout.
    pub fn keys(&self) -> Vec<ResourceKey> {
        let mut keys = Vec::new();
        for (kind, names) in self.root.entries.iter() {
            let Some(names) = names.as_table() else { continue };
            for (name, languages) in names.entries.iter() {
                let Some(languages) = languages.as_table() else { continue };
                for (language, entry) in languages.entries.iter() {
                    let language = match language {
                        ResourceEntryName::ID(id) => u16::try_from(*id).ok(),
                        ResourceEntryName::Name(_) => None,
                    };
                    if let (Some(language), Some(_)) = (language, entry.as_data()) {
                        keys.push(ResourceKey::new(kind.clone(), name.clone(), language));
                    }
                }
            }
        }
        keys
    }

    /// Returns the first manifest in the directory as text.
    ///
    /// # Returns
    /// Returns `None` if there is no manifest, or an error if the manifest is not valid UTF-8.
    pub fn manifest(&self) -> Result<Option<String>, ResourceError> {
        let manifest = self
            .keys()
            .into_iter()
            .find(|key| key.kind == ResourceEntryName::from(RT_MANIFEST))
            .and_then(|key| self.get(&key));
        match manifest {
            Some(data) => Ok(Some(std::str::from_utf8(data.data())?.to_string())),
            None => Ok(None),
        }
    }
}

// tables parsed so far and data entries left out of one directory
struct ParseState {
    tables:  HashSet<u32, RandomState>,
    skipped: usize,
}

struct DirectoryBuilder {
    tables:            Vec<u8>,
    strings:           Vec<u8>,
    descriptions:      Vec<u8>,
    data:              Vec<u8>,
    strings_base:      u32,
    descriptions_base: u32,
    data_rva:          u32,
}
impl DirectoryBuilder {
    // tables are laid out in pre-order, a child table directly follows the entries of its parent
    // or the subtree of its previous sibling
    fn write_table(&mut self, table: &ResourceTable) {
        self.tables.extend_from_slice(table.data.as_bytes());
        let entries_offset = self.tables.len();
        self.tables.resize(entries_offset + table.entries.len() * RESOURCE_ENTRY_SIZE as usize, 0);

        for (index, (name, entry)) in table.entries.iter().enumerate() {
            let name_offset_or_integer_id = match name {
                ResourceEntryName::ID(id) => *id,
                ResourceEntryName::Name(data) => {
                    let offset = self.strings_base + self.strings.len() as u32;
                    self.strings.extend_from_slice(data);
                    offset | RESOURCE_NAME_FLAG
                }
            };
            let data_entry_or_subdirectory_offset = match entry {
                ResourceEntry::Table(child) => {
                    let offset = self.tables.len() as u32;
                    self.write_table(child);
                    offset | RESOURCE_SUBDIRECTORY_FLAG
                }
                ResourceEntry::Data(data) => {
                    let offset = self.descriptions_base + self.descriptions.len() as u32;
                    let description = ResourceDataEntry {
                        data_rva: self.data_rva + self.data.len() as u32,
                        size:     data.data.len() as u32,
                        codepage: data.codepage,
                        reserved: data.reserved,
                    };
                    self.descriptions.extend_from_slice(description.as_bytes());
                    self.data.extend_from_slice(&data.data);
                    self.data.resize(aligned_to(self.data.len(), 8), 0);
                    offset
                }
            };
            let entry = ResourceDirectoryEntry {
                name_offset_or_integer_id,
                data_entry_or_subdirectory_offset,
            };
            let entry_offset = entries_offset + index * RESOURCE_ENTRY_SIZE as usize;
            self.tables[entry_offset..entry_offset + RESOURCE_ENTRY_SIZE as usize]
                .copy_from_slice(entry.as_bytes());
        }
    }
}

/// Portable executable resource table.
#[derive(Debug, Clone, Eq, PartialEq, Default)]
pub struct ResourceTable {
    pub(crate) data:    ResourceDirectoryTable,
    pub(crate) entries: IndexMap<ResourceEntryName, ResourceEntry, RandomState>,
}
impl ResourceTable {
    fn parse(
        image: &[u8], base_address: u32, virtual_address: u32, directory_offset: u32, level: usize,
        state: &mut ParseState,
    ) -> Result<Self, ImageReadError> {
        if level > MAX_TABLE_DEPTH {
            return Err(ImageReadError::InvalidResourceTable(format!(
                "table at {:#x} nested deeper than {} levels",
                directory_offset, MAX_TABLE_DEPTH
            )));
        }
        if !state.tables.insert(directory_offset) {
            return Err(ImageReadError::InvalidResourceTable(format!(
                "table at {:#x} referenced more than once",
                directory_offset
            )));
        }
        let indent = "--".repeat(level + 1);
        let table_offset = base_address as u64 + directory_offset as u64;
        let resource_table = read_at::<ResourceDirectoryTable>(image, table_offset)?;
        trace!("{} {:#x?}", indent, resource_table);

        let mut table = Self {
            data:    resource_table,
            entries: IndexMap::with_hasher(RandomState::new()),
        };

        let count = resource_table.number_of_name_entries as u64
            + resource_table.number_of_id_entries as u64;
        for index in 0..count {
            let entry_offset =
                table_offset + RESOURCE_TABLE_SIZE as u64 + index * RESOURCE_ENTRY_SIZE as u64;
            let entry = read_at::<ResourceDirectoryEntry>(image, entry_offset)?;
            trace!("{} {:#x?}", indent, entry);

            let name = ResourceEntryName::parse(image, base_address, entry.name_offset_or_integer_id)?;
            let target = entry.data_entry_or_subdirectory_offset;
            if target & RESOURCE_SUBDIRECTORY_FLAG != 0 {
                let child = ResourceTable::parse(
                    image,
                    base_address,
                    virtual_address,
                    target ^ RESOURCE_SUBDIRECTORY_FLAG,
                    level + 1,
                    state,
                )?;
                table.entries.insert(name, ResourceEntry::Table(child));
                continue;
            }

            let description = read_at::<ResourceDataEntry>(image, base_address as u64 + target as u64)?;
            let address = (description.data_rva as u64)
                .checked_sub(virtual_address as u64)
                .map(|offset| base_address as u64 + offset);
            let size = description.size as u64;
            let data = address.and_then(|address| range(image, address, size).ok());
            let Some(data) = data else {
                error!(
                    "{} resource data entry {} at rva {:#x?} with size {:#x?} outside valid range ({:#x?}), skipping",
                    indent,
                    name,
                    { description.data_rva },
                    { description.size },
                    image.len()
                );
                state.skipped += 1;
                continue;
            };
            trace!("{} {:#x?} {:#x?}", indent, address, description);
            table.entries.insert(
                name,
                ResourceEntry::Data(ResourceData {
                    data:     data.to_vec().into(),
                    codepage: description.codepage,
                    reserved: description.reserved,
                }),
            );
        }

        // skipped entries are not part of the table anymore
        table.update_counts();
        Ok(table)
    }

    fn update_counts(&mut self) {
        let names = self.entries.keys().filter(|name| name.is_name()).count();
        self.data.number_of_name_entries = names as u16;
        self.data.number_of_id_entries = (self.entries.len() - names) as u16;
    }

    fn table_or_insert(
        &mut self, name: &ResourceEntryName,
    ) -> Result<&mut ResourceTable, ResourceError> {
        if !self.entries.contains_key(name) {
            self.insert(name, ResourceEntry::Table(ResourceTable::default()));
        }
        match self.entries.get_mut(name) {
            Some(ResourceEntry::Table(table)) => Ok(table),
            _ => Err(ResourceError::InvalidTable(format!("entry {} is not a table", name))),
        }
    }

    /// Get a resource entry from the table.
    pub fn get<N: Borrow<ResourceEntryName>>(&self, name: N) -> Option<&ResourceEntry> {
        self.entries.get(name.borrow())
    }

    /// Get a mutable resource entry from the table.
    pub fn get_mut<N: Borrow<ResourceEntryName>>(&mut self, name: N) -> Option<&mut ResourceEntry> {
        self.entries.get_mut(name.borrow())
    }

    /// Insert a resource entry into the table.
    /// If an entry with the given name already exists, it will be replaced.
    /// Entries are kept in the order required by the loader: names before ids, both ascending.
    /// # Returns
    /// The replaced entry.
    pub fn insert<N: Borrow<ResourceEntryName>>(
        &mut self, name: N, entry: ResourceEntry,
    ) -> Option<ResourceEntry> {
        let previous = self.entries.insert(name.borrow().clone(), entry);
        if previous.is_none() {
            self.entries.sort_by(|a, _, b, _| a.cmp(b));
            self.update_counts();
        }
        previous
    }

    /// Remove a resource entry from the table.
    /// # Returns
    /// The removed entry.
    pub fn remove<N: Borrow<ResourceEntryName>>(&mut self, name: N) -> Option<ResourceEntry> {
        let removed = self.entries.shift_remove(name.borrow());
        if removed.is_some() {
            self.update_counts();
        }
        removed
    }

    /// Returns the names of the entries in the table.
    pub fn entries(&self) -> Vec<&ResourceEntryName> { self.entries.keys().collect() }

    /// Returns whether the table has no entries.
    pub fn is_empty(&self) -> bool { self.entries.is_empty() }

    /// Returns the size of the table and its children in the resource table.
    pub fn tables_size(&self) -> u32 {
        self.entries.values().map(|entry| entry.table_size()).sum::<u32>() + RESOURCE_TABLE_SIZE
    }

    /// Returns the size of the entry names of the table and its children.
    pub fn strings_size(&self) -> u32 {
        self.entries
            .iter()
            .map(|(name, entry)| name.string_size() + entry.strings_size())
            .sum::<u32>()
    }

    /// Returns the size of the data descriptions of the table and its children.
    pub fn descriptions_size(&self) -> u32 {
        self.entries.values().map(|entry| entry.description_size()).sum::<u32>()
    }

    /// Returns the size of the data of the table and its children, including alignment padding.
    pub fn data_size(&self) -> u32 { self.entries.values().map(|entry| entry.data_size()).sum::<u32>() }
}

/// Raw resource data.
#[derive(Debug, Clone, Eq, PartialEq, Default)]
pub struct ResourceData {
    data:     DebugIgnore<Vec<u8>>,
    codepage: u32,
    reserved: u32,
}
impl ResourceData {
    pub fn new(data: Vec<u8>) -> Self {
        Self {
            data: data.into(),
            ..Self::default()
        }
    }

    /// Returns the raw data.
    pub fn data(&self) -> &[u8] { &self.data }

    /// Returns the codepage of the data.
    pub fn codepage(&self) -> u32 { self.codepage }

    /// Set the raw data.
    pub fn set_data(&mut self, data: Vec<u8>) { self.data = data.into(); }

    /// Set the codepage of the data.
    pub fn set_codepage(&mut self, codepage: u32) { self.codepage = codepage; }
}

/// Resource entry in a resource table.
/// This can be either a child table or raw data.
#[derive(Debug, Clone, Eq, PartialEq)]
pub enum ResourceEntry {
    Table(ResourceTable),
    Data(ResourceData),
}
impl ResourceEntry {
    pub fn as_table(&self) -> Option<&ResourceTable> {
        match self {
            ResourceEntry::Table(table) => Some(table),
            ResourceEntry::Data(_) => None,
        }
    }

    pub fn as_table_mut(&mut self) -> Option<&mut ResourceTable> {
        match self {
            ResourceEntry::Table(table) => Some(table),
            ResourceEntry::Data(_) => None,
        }
    }

    pub fn as_data(&self) -> Option<&ResourceData> {
        match self {
            ResourceEntry::Table(_) => None,
            ResourceEntry::Data(data) => Some(data),
        }
    }

    /// Returns the size of the table entry and its children in the resource table.
    pub fn table_size(&self) -> u32 {
        match self {
            // entry + sub-table
            ResourceEntry::Table(table) => table.tables_size() + RESOURCE_ENTRY_SIZE,
            // entry
            ResourceEntry::Data(_) => RESOURCE_ENTRY_SIZE,
        }
    }

    /// Returns the size of the names of child entries.
    pub fn strings_size(&self) -> u32 {
        match self {
            ResourceEntry::Table(table) => table.strings_size(),
            ResourceEntry::Data(_) => 0,
        }
    }

    /// Returns the size of the data descriptions of the entry or its children.
    pub fn description_size(&self) -> u32 {
        match self {
            ResourceEntry::Table(table) => table.descriptions_size(),
            ResourceEntry::Data(_) => RESOURCE_DATA_ENTRY_SIZE,
        }
    }

    /// Returns the size of the data of the entry or its children, each padded to 8 bytes.
    pub fn data_size(&self) -> u32 {
        match self {
            ResourceEntry::Table(table) => table.data_size(),
            ResourceEntry::Data(data) => aligned_to(data.data.len() as u32, 8),
        }
    }
}

/// Resource directory entry name.
/// This can either be a raw id or a name.
#[derive(Debug, Clone, Eq, PartialEq, Hash)]
pub enum ResourceEntryName {
    // raw id
    ID(u32),
    // 2 byte length in characters + utf-16 data
    Name(Vec<u8>),
}
impl ResourceEntryName {
    fn parse(image: &[u8], base_address: u32, id: u32) -> Result<Self, ReadError> {
        if id & RESOURCE_NAME_FLAG == 0 {
            return Ok(Self::ID(id));
        }
        let address = base_address as u64 + (id ^ RESOURCE_NAME_FLAG) as u64;
        let length = read_at::<u16>(image, address)? as u64;
        // length is in 16 bit characters
        let data = range(image, address, 2 + length * 2)?;
        trace!("resource name: {:x?}", data);
        Ok(Self::Name(data.to_vec()))
    }

    pub fn from_string<S: AsRef<str>>(string: S) -> Self {
        let units = string.as_ref().encode_utf16().collect::<Vec<_>>();
        let mut data = Vec::with_capacity(units.len() * 2 + 2);
        data.extend_from_slice(&(units.len() as u16).to_le_bytes());
        data.extend(units.iter().flat_map(|unit| unit.to_le_bytes()));
        Self::Name(data)
    }

    /// Returns the name as a string, or `None` for ids.
    pub fn as_string(&self) -> Option<String> {
        match self {
            Self::ID(_) => None,
            Self::Name(_) => Some(String::from_utf16_lossy(&self.units())),
        }
    }

    /// Returns whether the entry is identified by a name instead of an id.
    pub fn is_name(&self) -> bool { matches!(self, Self::Name(_)) }

    fn units(&self) -> Vec<u16> {
        match self {
            Self::ID(_) => Vec::new(),
            Self::Name(data) => data
                .get(2..)
                .unwrap_or_default()
                .chunks_exact(2)
                .map(|unit| u16::from_le_bytes([unit[0], unit[1]]))
                .collect(),
        }
    }

    fn string_size(&self) -> u32 {
        match self {
            Self::ID(_) => 0,
            Self::Name(name) => name.len() as u32,
        }
    }
}
impl From<u16> for ResourceEntryName {
    fn from(id: u16) -> Self { Self::ID(id as u32) }
}
impl From<&str> for ResourceEntryName {
    fn from(name: &str) -> Self { Self::from_string(name) }
}
impl Ord for ResourceEntryName {
    fn cmp(&self, other: &Self) -> Ordering {
        match (self, other) {
            (Self::Name(a), Self::Name(b)) => self.units().cmp(&other.units()).then_with(|| a.cmp(b)),
            (Self::Name(_), Self::ID(_)) => Ordering::Less,
            (Self::ID(_), Self::Name(_)) => Ordering::Greater,
            (Self::ID(a), Self::ID(b)) => a.cmp(b),
        }
    }
}
impl PartialOrd for ResourceEntryName {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> { Some(self.cmp(other)) }
}
impl fmt::Display for ResourceEntryName {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::ID(id) => write!(f, "#{}", id),
            Self::Name(_) => write!(f, "{}", String::from_utf16_lossy(&self.units())),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample_directory() -> ResourceDirectory {
        let mut directory = ResourceDirectory::default();
        let manifest = b"<?xml version=\"1.0\" encoding=\"UTF-8\" standalone=\"yes\"?>".to_vec();
        directory.set(&ResourceKey::manifest(1, LANGUAGE_ID_EN_US), manifest).unwrap();
        directory
            .set(
                &ResourceKey::new(RT_RCDATA.into(), "PAYLOAD".into(), LANGUAGE_ID_NEUTRAL),
                vec![1, 2, 3],
            )
            .unwrap();
        directory
            .set(&ResourceKey::new(RT_RCDATA.into(), 7u16.into(), LANGUAGE_ID_EN_US), vec![9; 17])
            .unwrap();
        directory
    }

    #[test]
    fn build_size_equals_computed_size() {
        let directory = sample_directory();
        let data = directory.build(0x3000);
        assert_eq!(data.len(), directory.size() as usize, "built size equals computed size");
    }

    #[test]
    fn built_directory_parses_back() {
        let directory = sample_directory();
        let data = directory.build(0x3000);
        let parsed = ResourceDirectory::parse(&data, 0, 0x3000).unwrap();
        assert_eq!(directory.root(), parsed.root(), "parsed and built directories equal");
        assert_eq!(directory.keys(), parsed.keys());
    }

    #[test]
    fn built_directory_parses_at_file_offset() {
        let directory = sample_directory();
        let mut image = vec![0xcc; 0x40];
        image.extend(directory.build(0x2000));
        let parsed = ResourceDirectory::parse(&image, 0x40, 0x2000).unwrap();
        let key = ResourceKey::new(RT_RCDATA.into(), "PAYLOAD".into(), LANGUAGE_ID_NEUTRAL);
        assert_eq!(parsed.get(&key).unwrap().data(), &[1, 2, 3]);
    }

    #[test]
    fn entries_are_sorted_names_first() {
        let mut table = ResourceTable::default();
        table.insert(ResourceEntryName::ID(24), ResourceEntry::Data(ResourceData::default()));
        table.insert(ResourceEntryName::ID(3), ResourceEntry::Data(ResourceData::default()));
        table.insert(ResourceEntryName::from("ZETA"), ResourceEntry::Data(ResourceData::default()));
        table.insert(ResourceEntryName::from("ALPHA"), ResourceEntry::Data(ResourceData::default()));

        let names = table.entries().into_iter().cloned().collect::<Vec<_>>();
        assert_eq!(names, vec![
            ResourceEntryName::from("ALPHA"),
            ResourceEntryName::from("ZETA"),
            ResourceEntryName::ID(3),
            ResourceEntryName::ID(24),
        ]);
        assert_eq!({ table.data.number_of_name_entries }, 2);
        assert_eq!({ table.data.number_of_id_entries }, 2);
    }

    #[test]
    fn set_replaces_existing_data() {
        let mut directory = sample_directory();
        let key = ResourceKey::manifest(1, LANGUAGE_ID_EN_US);
        let previous = directory.set(&key, Vec::new()).unwrap();
        assert!(previous.unwrap().data().starts_with(b"<?xml"));
        assert_eq!(directory.get(&key).unwrap().data(), &[] as &[u8]);
        assert_eq!(directory.manifest().unwrap().as_deref(), Some(""));

        let again = directory.set(&key, Vec::new()).unwrap();
        assert_eq!(again.unwrap().data(), &[] as &[u8], "clearing twice replaces empty data");
    }

    #[test]
    fn empty_data_survives_build() {
        let mut directory = ResourceDirectory::default();
        let key = ResourceKey::manifest(1, LANGUAGE_ID_EN_US);
        directory.set(&key, Vec::new()).unwrap();
        let parsed = ResourceDirectory::parse(&directory.build(0x1000), 0, 0x1000).unwrap();
        assert_eq!(parsed.get(&key).map(|data| data.data().len()), Some(0));
    }

    #[test]
    fn set_rejects_data_where_table_expected() {
        let mut directory = ResourceDirectory::default();
        directory
            .root_mut()
            .insert(ResourceEntryName::from(RT_MANIFEST), ResourceEntry::Data(ResourceData::default()));
        let result = directory.set(&ResourceKey::manifest(1, LANGUAGE_ID_EN_US), Vec::new());
        assert!(matches!(result, Err(ResourceError::InvalidTable(_))));
    }

    #[test]
    fn remove_prunes_empty_tables() {
        let mut directory = sample_directory();
        let key = ResourceKey::manifest(1, LANGUAGE_ID_EN_US);
        assert!(directory.remove(&key).is_some());
        assert!(directory.get(&key).is_none());
        assert!(directory.root().get(ResourceEntryName::from(RT_MANIFEST)).is_none());
        assert!(directory.root().get(ResourceEntryName::from(RT_RCDATA)).is_some());
        assert!(directory.remove(&key).is_none());
    }

    #[test]
    fn truncated_directory_is_an_error() {
        let data = sample_directory().build(0x1000);
        assert!(ResourceDirectory::parse(&data[..20], 0, 0x1000).is_err());
        assert!(ResourceDirectory::parse(&data, data.len() as u32, 0x1000).is_err());
    }

    #[test]
    fn self_referencing_table_is_rejected() {
        let mut data = Vec::new();
        data.extend_from_slice(
            ResourceDirectoryTable {
                number_of_id_entries: 1,
                ..ResourceDirectoryTable::default()
            }
            .as_bytes(),
        );
        data.extend_from_slice(
            ResourceDirectoryEntry {
                name_offset_or_integer_id:         1,
                data_entry_or_subdirectory_offset: RESOURCE_SUBDIRECTORY_FLAG,
            }
            .as_bytes(),
        );
        let result = ResourceDirectory::parse(&data, 0, 0x1000);
        assert!(matches!(result, Err(ImageReadError::InvalidResourceTable(_))));
    }

    #[test]
    fn shared_table_is_rejected() {
        // every table points at the next one twice
        let mut data = Vec::new();
        let table_size = RESOURCE_TABLE_SIZE + 2 * RESOURCE_ENTRY_SIZE;
        for index in 0..8u32 {
            data.extend_from_slice(
                ResourceDirectoryTable {
                    number_of_id_entries: 2,
                    ..ResourceDirectoryTable::default()
                }
                .as_bytes(),
            );
            for id in 1..=2 {
                data.extend_from_slice(
                    ResourceDirectoryEntry {
                        name_offset_or_integer_id:         id,
                        data_entry_or_subdirectory_offset: ((index + 1) * table_size)
                            | RESOURCE_SUBDIRECTORY_FLAG,
                    }
                    .as_bytes(),
                );
            }
        }
        data.extend_from_slice(ResourceDirectoryTable::default().as_bytes());

        let result = ResourceDirectory::parse(&data, 0, 0x1000);
        assert!(matches!(result, Err(ImageReadError::InvalidResourceTable(_))));
    }

    #[test]
    fn out_of_range_data_is_counted() {
        let directory = sample_directory();
        let mut data = directory.build(0x1000);
        assert_eq!(ResourceDirectory::parse(&data, 0, 0x1000).unwrap().skipped_entries(), 0);

        // first data description belongs to the named RCDATA entry, point it far behind the directory
        let description =
            (directory.root().tables_size() + aligned_to(directory.root().strings_size(), 8)) as usize;
        data[description..description + 4].copy_from_slice(&0x7fff_0000u32.to_le_bytes());
        let parsed = ResourceDirectory::parse(&data, 0, 0x1000).unwrap();
        assert_eq!(parsed.skipped_entries(), 1);
        let key = ResourceKey::new(RT_RCDATA.into(), "PAYLOAD".into(), LANGUAGE_ID_NEUTRAL);
        assert!(parsed.get(&key).is_none());
        assert!(parsed.get(&ResourceKey::manifest(1, LANGUAGE_ID_EN_US)).is_some());
    }

    #[test]
    fn convert_resource_name_string() {
        assert_eq!(
            ResourceEntryName::from_string("MAINICON").as_string(),
            Some("MAINICON".to_string()),
            "resource name conversion to string is correct",
        );
        assert_eq!(ResourceEntryName::ID(24).as_string(), None);
    }
}
