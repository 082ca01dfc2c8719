use std::fs::File;
use std::io::Write;
use std::path::Path;

use crate::error::ClientError;

pub fn save_json(data: &serde_json::Value, path: &Path) -> Result<(), ClientError> {
    let file = File::create(path)?;
    serde_json::to_writer_pretty(file, data)?;
    println!("wrote {}", path.display());
    Ok(())
}

pub fn save_bytes(data: &[u8], path: &Path) -> Result<(), ClientError> {
    let mut file = File::create(path)?;
    file.write_all(data)?;
    println!("wrote {}", path.display());
    Ok(())
}
