use crate::dataset::Dataset;
use crate::error::{DataError, Result};
use crate::vocab::Vocabulary;

use ndarray::Array2;
use ndarray_npy::{read_npy, write_npy};
use std::{fs::{self, File}, collections::HashMap, path::{Path, PathBuf}, io::{BufWriter, BufReader}};
use std::io::prelude::*;
use flate2::{Compression, read::GzDecoder};
use flate2::write::GzEncoder;
use serde::Serialize;

const GZIP_MAGIC: [u8; 2] = [0x1f, 0x8b];

pub fn read_input<R: ReadFile>(file_path: &Path) -> Result<R> {
    let input = R::read_file(file_path)?;
    Ok(input)
}

/// Saves `item` under `output_dir`, creating it when missing. Returns the written file.
pub fn save_output<S: SaveFile>(output_dir: &Path, file_name: &str, item: &S) -> Result<PathBuf> {

    // create output folder
    fs::create_dir_all(output_dir).map_err(|e| DataError::io(output_dir, e))?;

    // SaveFile picks the extension
    item.save_file(output_dir, file_name)
}

pub trait ReadFile: Sized {
    fn read_file(file_path: &Path) -> Result<Self>;
}

pub trait SaveFile {
    fn save_file(&self, output_dir: &Path, file_name: &str) -> Result<PathBuf>;
}

fn open(file_path: &Path) -> Result<BufReader<File>> {
    File::open(file_path).map(BufReader::new).map_err(|e| DataError::io(file_path, e))
}

fn create(file_path: &Path) -> Result<BufWriter<File>> {
    File::create(file_path).map(BufWriter::new).map_err(|e| DataError::io(file_path, e))
}

fn write_json<T: Serialize>(out: &Path, item: &T) -> Result<PathBuf> {
    let mut f = create(out)?;
    serde_json::to_writer(&mut f, item)?;
    f.flush().map_err(|e| DataError::io(out, e))?;
    Ok(out.to_path_buf())
}

/// The dataset goes to `<file_name>.bin` as bincode, gzip compressed when
/// `compress` is set. It is written next to its final name first and only
/// renamed once complete, so a failed run never leaves a partial artifact.
pub struct DatasetFile<'a> {
    pub dataset: &'a Dataset,
    pub compress: bool,
}

impl SaveFile for DatasetFile<'_> {
    fn save_file(&self, output_dir: &Path, file_name: &str) -> Result<PathBuf> {

        let out = output_dir.join(format!("{}.bin", file_name));
        let tmp = output_dir.join(format!("{}.bin.part", file_name));

        let written = (|| -> Result<()> {
            let mut f = create(&tmp)?;
            if self.compress {
                let mut writer = GzEncoder::new(f, Compression::default());
                bincode::serialize_into(&mut writer, self.dataset)?;
                f = writer.finish().map_err(|e| DataError::io(&tmp, e))?;
            } else {
                bincode::serialize_into(&mut f, self.dataset)?;
            }
            f.flush().map_err(|e| DataError::io(&tmp, e))
        })();

        if let Err(e) = written {
            let _ = fs::remove_file(&tmp);
            return Err(e);
        }
        fs::rename(&tmp, &out).map_err(|e| DataError::io(&out, e))?;
        Ok(out)
    }
}

impl ReadFile for Dataset {
    // plain or gzip, told apart by the magic bytes
    fn read_file(file_path: &Path) -> Result<Self> {
        let mut f = open(file_path)?;
        let compressed = f.fill_buf().map_err(|e| DataError::io(file_path, e))?.starts_with(&GZIP_MAGIC);
        let item = if compressed {
            bincode::deserialize_from(GzDecoder::new(f))?
        } else {
            bincode::deserialize_from(f)?
        };
        Ok(item)
    }
}

impl SaveFile for Array2<f32> {
    fn save_file(&self, output_dir: &Path, file_name: &str) -> Result<PathBuf> {
        let out = output_dir.join(format!("{}.npy", file_name));
        write_npy(&out, self)?;
        Ok(out)
    }
}

impl ReadFile for Array2<f32> {
    fn read_file(file_path: &Path) -> Result<Self> {
        Ok(read_npy(file_path)?)
    }
}

impl SaveFile for HashMap<String, usize> {
    fn save_file(&self, output_dir: &Path, file_name: &str) -> Result<PathBuf> {
        write_json(&output_dir.join(format!("{}.json", file_name)), self)
    }
}

impl ReadFile for HashMap<String, usize> {
    fn read_file(file_path: &Path) -> Result<Self> {
        Ok(serde_json::from_reader(open(file_path)?)?)
    }
}

impl SaveFile for Vocabulary {
    fn save_file(&self, output_dir: &Path, file_name: &str) -> Result<PathBuf> {
        write_json(&output_dir.join(format!("{}.json", file_name)), self)
    }
}

impl ReadFile for Vocabulary {
    fn read_file(file_path: &Path) -> Result<Self> {
        Ok(serde_json::from_reader(open(file_path)?)?)
    }
}
