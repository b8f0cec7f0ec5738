//! Windows API and binary constants.

#![allow(non_upper_case_globals)]

pub type DWORD = u32;
pub type WORD = u16;
pub type LANGID = WORD;


// https://docs.microsoft.com/en-us/openspecs/windows_protocols/ms-lcid/a9eac961-e77d-41a6-90a5-ce1a8b0cdb9c
pub const LANGUAGE_ID_NEUTRAL: LANGID = 0; // 0x0000, neutral
pub const LANGUAGE_ID_EN_US: LANGID = 1033; // 0x0409, en-US


// https://docs.microsoft.com/en-us/windows/win32/debug/pe-format

pub const PE_DOS_MAGIC: WORD = 0x5a4d; // MZ
pub const PE_PTR_OFFSET: DWORD = 0x03c;
pub const PE_NT_SIGNATURE: DWORD = 0x00004550; // PE00
pub const PE_32_MAGIC: WORD = 0x010b;
pub const PE_64_MAGIC: WORD = 0x020b;

pub const PE_COFF_HEADER_SIZE: DWORD = 20;
pub const PE_SECTION_HEADER_SIZE: DWORD = 40;
pub const PE_DATA_DIRECTORY_SIZE: DWORD = 8;
pub const PE_STANDARD_HEADER_SIZE_32: DWORD = 28;
pub const PE_STANDARD_HEADER_SIZE_64: DWORD = 24;
pub const PE_OPTIONAL_HEADER_SIZE_32: DWORD = 96;
pub const PE_OPTIONAL_HEADER_SIZE_64: DWORD = 112;


// https://docs.microsoft.com/en-us/windows/win32/debug/pe-format#the-rsrc-section

pub const RESOURCE_TABLE_SIZE: DWORD = 16;
pub const RESOURCE_ENTRY_SIZE: DWORD = 8;
pub const RESOURCE_DATA_ENTRY_SIZE: DWORD = 16;
pub const RESOURCE_SUBDIRECTORY_FLAG: DWORD = 0x80000000;
pub const RESOURCE_NAME_FLAG: DWORD = 0x80000000;


// https://docs.microsoft.com/en-us/windows/win32/menurc/resource-types

pub const RT_CURSOR: WORD = 0x01;
pub const RT_BITMAP: WORD = 0x02;
pub const RT_ICON: WORD = 0x03;
pub const RT_MENU: WORD = 0x04;
pub const RT_DIALOG: WORD = 0x05;
pub const RT_STRING: WORD = 0x06;
pub const RT_FONTDIR: WORD = 0x07;
pub const RT_FONT: WORD = 0x08;
pub const RT_ACCELERATOR: WORD = 0x09;
pub const RT_RCDATA: WORD = 0x0A;
pub const RT_MESSAGETABLE: WORD = 0x0B;
pub const RT_GROUP_CURSOR: WORD = 0x0C;
pub const RT_GROUP_ICON: WORD = 0x0E;
pub const RT_VERSION: WORD = 0x10;
pub const RT_DLGINCLUDE: WORD = 0x11;
pub const RT_PLUGPLAY: WORD = 0x13;
pub const RT_VXD: WORD = 0x14;
pub const RT_ANICURSOR: WORD = 0x15;
pub const RT_ANIICON: WORD = 0x16;
pub const RT_HTML: WORD = 0x17;
pub const RT_MANIFEST: WORD = 0x18;

// https://learn.microsoft.com/en-us/windows/win32/sbscs/using-side-by-side-assemblies-as-a-resource
pub const CREATEPROCESS_MANIFEST_RESOURCE_ID: WORD = 1;
pub const ISOLATIONAWARE_MANIFEST_RESOURCE_ID: WORD = 2;


// https://docs.microsoft.com/en-us/windows/win32/debug/pe-format#section-flags

pub const IMAGE_SCN_CNT_CODE: DWORD = 0x00000020;
pub const IMAGE_SCN_CNT_INITIALIZED_DATA: DWORD = 0x00000040;
pub const IMAGE_SCN_CNT_UNINITIALIZED_DATA: DWORD = 0x00000080;
pub const IMAGE_SCN_MEM_DISCARDABLE: DWORD = 0x02000000;
pub const IMAGE_SCN_MEM_SHARED: DWORD = 0x10000000;
pub const IMAGE_SCN_MEM_EXECUTE: DWORD = 0x20000000;
pub const IMAGE_SCN_MEM_READ: DWORD = 0x40000000;
pub const IMAGE_SCN_MEM_WRITE: DWORD = 0x80000000;


// https://learn.microsoft.com/en-us/windows/win32/debug/system-error-codes--0-499-

pub const ERROR_FILE_NOT_FOUND: DWORD = 2;
pub const ERROR_ACCESS_DENIED: DWORD = 5;
pub const ERROR_INVALID_DATA: DWORD = 13;
pub const ERROR_WRITE_FAULT: DWORD = 29;
pub const ERROR_GEN_FAILURE: DWORD = 31;
pub const ERROR_SHARING_VIOLATION: DWORD = 32;
pub const ERROR_BAD_EXE_FORMAT: DWORD = 193;
