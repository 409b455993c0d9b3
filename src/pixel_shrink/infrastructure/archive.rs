use super::error::InfrastructureError;
use std::io::{Cursor, Write};
use zip::write::FileOptions;
use zip::{CompressionMethod, ZipWriter};

pub struct ArchiveEntry {
    pub name: String,
    pub data: Vec<u8>,
}

/// Packs the entries, in order, into an in-memory zip archive.
pub fn build_zip(entries: &[ArchiveEntry]) -> Result<Vec<u8>, InfrastructureError> {
    let mut writer = ZipWriter::new(Cursor::new(Vec::new()));
    let options = FileOptions::default().compression_method(CompressionMethod::Deflated);

    for entry in entries {
        writer.start_file(entry.name.as_str(), options)?;
        writer.write_all(&entry.data)?;
    }

    Ok(writer.finish()?.into_inner())
}
