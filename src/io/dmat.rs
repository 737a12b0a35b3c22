use std::fs::File;
use std::io::{BufWriter, Write};
use std::path::Path;

use crate::error::{HalaRigError, HalaRigErrorKind};
use crate::rig::weights::HalaWeightMatrix;
use super::number::format_g17;

/// A dense matrix in the ASCII DMAT format.
///
/// The header line is `cols rows`, followed by one value per line in
/// column-major order.
pub struct HalaDmat;

/// The implementation of the DMAT file.
impl HalaDmat {
  /// Write a column-major matrix to a DMAT file.
  /// param path: The path of the file, created or truncated.
  /// param num_of_rows: The number of rows.
  /// param num_of_cols: The number of columns.
  /// param data: The values, all rows of column 0 first.
  /// return: The result.
  pub fn write<P: AsRef<Path>>(path: P, num_of_rows: usize, num_of_cols: usize, data: &[f64]) -> Result<(), HalaRigError> {
    let path = path.as_ref();
    if num_of_rows.checked_mul(num_of_cols) != Some(data.len()) {
      return Err(HalaRigError::new(
        HalaRigErrorKind::DimensionMismatch,
        &format!("{} values do not fill a {}x{} matrix.", data.len(), num_of_rows, num_of_cols),
        None));
    }

    let file = File::create(path)
      .map_err(|err| HalaRigError::new(HalaRigErrorKind::Io, &format!("Create DMAT file \"{:?}\" failed.", path), Some(Box::new(err))))?;
    let mut writer = BufWriter::new(file);
    Self::write_to(&mut writer, num_of_rows, num_of_cols, data)
      .and_then(|_| writer.flush())
      .map_err(|err| HalaRigError::new(HalaRigErrorKind::Io, &format!("Write DMAT file \"{:?}\" failed.", path), Some(Box::new(err))))?;

    log::debug!("Wrote a {}x{} matrix to \"{:?}\".", num_of_rows, num_of_cols, path);
    Ok(())
  }

  /// Write a weight matrix to a DMAT file.
  /// param path: The path of the file.
  /// param matrix: The matrix.
  /// return: The result.
  pub fn write_matrix<P: AsRef<Path>>(path: P, matrix: &HalaWeightMatrix) -> Result<(), HalaRigError> {
    Self::write(path, matrix.num_of_rows, matrix.num_of_cols, matrix.as_slice())
  }

  fn write_to<W: Write>(writer: &mut W, num_of_rows: usize, num_of_cols: usize, data: &[f64]) -> std::io::Result<()> {
    writeln!(writer, "{} {}", num_of_cols, num_of_rows)?;
    for value in data.iter() {
      writeln!(writer, "{}", format_g17(*value))?;
    }
    Ok(())
  }

  /// Read a DMAT file.
  /// param path: The path of the file.
  /// return: The matrix.
  pub fn read<P: AsRef<Path>>(path: P) -> Result<HalaWeightMatrix, HalaRigError> {
    let path = path.as_ref();
    let text = std::fs::read_to_string(path)
      .map_err(|err| HalaRigError::new(HalaRigErrorKind::Io, &format!("Read DMAT file \"{:?}\" failed.", path), Some(Box::new(err))))?;
    Self::parse(&text)
  }

  /// Parse DMAT text.
  /// param text: The text.
  /// return: The matrix.
  pub fn parse(text: &str) -> Result<HalaWeightMatrix, HalaRigError> {
    let mut tokens = text.split_whitespace();
    let mut dimension = |what: &str| -> Result<usize, HalaRigError> {
      let token = tokens.next()
        .ok_or_else(|| HalaRigError::new(HalaRigErrorKind::Parse, &format!("DMAT header misses the {} count.", what), None))?;
      token.parse::<usize>()
        .map_err(|err| HalaRigError::new(
          HalaRigErrorKind::Parse,
          &format!("DMAT {} count \"{}\" is not a number.", what, token),
          Some(Box::new(err))))
    };
    let num_of_cols = dimension("column")?;
    let num_of_rows = dimension("row")?;

    let data = tokens.map(|token| {
      token.parse::<f64>()
        .map_err(|err| HalaRigError::new(
          HalaRigErrorKind::Parse,
          &format!("DMAT value \"{}\" is not a number.", token),
          Some(Box::new(err))))
    }).collect::<Result<Vec<_>, _>>()?;

    HalaWeightMatrix::from_column_major(num_of_rows, num_of_cols, data)
      .map_err(|err| {
        let msg = err.message().to_owned();
        HalaRigError::new(HalaRigErrorKind::Parse, &msg, Some(Box::new(err)))
      })
  }
}
