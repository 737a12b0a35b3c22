use std::fs::File;
use std::io::{BufWriter, Write};
use std::path::Path;

use glam::DVec3;

use crate::error::{HalaRigError, HalaRigErrorKind};
use crate::rig::skeleton::{HalaBone, HalaJoint};
use super::number::format_g17;

/// The line between the vertex and the edge section.
const SECTION_SEPARATOR: &str = "#";

/// A skeleton graph in the Trivial Graph Format.
///
/// Vertex lines are `index x y z`, then a `#` line, then edge lines
/// `start end 1 0 0`. Indices in the file start at 1; in memory they start at 0.
/// The trailing `1 0 0` marks an edge as a bone edge.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct HalaTgf {
  pub positions: Vec<DVec3>,
  pub edges: Vec<HalaBone>,
}

/// The implementation of the TGF file.
impl HalaTgf {
  /// Write the joints and bones to a TGF file.
  /// param path: The path of the file, created or truncated.
  /// param joints: The joints.
  /// param bones: The bones, indexing into the joints.
  /// return: The result.
  pub fn write<P: AsRef<Path>>(path: P, joints: &[HalaJoint], bones: &[HalaBone]) -> Result<(), HalaRigError> {
    let path = path.as_ref();
    if let Some(bone) = bones.iter().find(|bone| bone.start >= joints.len() || bone.end >= joints.len()) {
      return Err(HalaRigError::new(
        HalaRigErrorKind::DimensionMismatch,
        &format!("Bone {:?} refers to a joint outside of {} joints.", bone, joints.len()),
        None));
    }

    let file = File::create(path)
      .map_err(|err| HalaRigError::new(HalaRigErrorKind::Io, &format!("Create TGF file \"{:?}\" failed.", path), Some(Box::new(err))))?;
    let mut writer = BufWriter::new(file);
    Self::write_to(&mut writer, joints.iter().map(|joint| joint.position), bones)
      .and_then(|_| writer.flush())
      .map_err(|err| HalaRigError::new(HalaRigErrorKind::Io, &format!("Write TGF file \"{:?}\" failed.", path), Some(Box::new(err))))?;

    log::debug!("Wrote {} joints and {} bones to \"{:?}\".", joints.len(), bones.len(), path);
    Ok(())
  }

  /// Write the graph to a writer.
  /// param writer: The writer.
  /// param positions: The joint positions.
  /// param bones: The bones.
  /// return: The result.
  fn write_to<W: Write, I: Iterator<Item = DVec3>>(writer: &mut W, positions: I, bones: &[HalaBone]) -> std::io::Result<()> {
    for (index, position) in positions.enumerate() {
      writeln!(
        writer,
        "{} {} {} {}",
        index + 1,
        format_g17(position.x),
        format_g17(position.y),
        format_g17(position.z))?;
    }
    writeln!(writer, "{}", SECTION_SEPARATOR)?;
    for bone in bones.iter() {
      writeln!(writer, "{} {} 1 0 0", bone.start + 1, bone.end + 1)?;
    }
    Ok(())
  }

  /// Read a TGF file.
  /// param path: The path of the file.
  /// return: The graph.
  pub fn read<P: AsRef<Path>>(path: P) -> Result<Self, HalaRigError> {
    let path = path.as_ref();
    let text = std::fs::read_to_string(path)
      .map_err(|err| HalaRigError::new(HalaRigErrorKind::Io, &format!("Read TGF file \"{:?}\" failed.", path), Some(Box::new(err))))?;
    Self::parse(&text)
  }

  /// Parse TGF text.
  /// Vertex lines must carry consecutive indices starting at 1.
  /// param text: The text.
  /// return: The graph.
  pub fn parse(text: &str) -> Result<Self, HalaRigError> {
    let mut tgf = Self::default();
    let mut in_edges = false;

    for (line_index, line) in text.lines().enumerate() {
      let line_number = line_index + 1;
      let line = line.trim();
      if line.is_empty() {
        continue;
      }
      if line == SECTION_SEPARATOR {
        in_edges = true;
        continue;
      }

      let fields = line.split_whitespace().collect::<Vec<_>>();
      if in_edges {
        if fields.len() < 2 {
          return Err(parse_error(line_number, "an edge needs a start and an end index"));
        }
        let start = parse_index(fields[0], line_number)?;
        let end = parse_index(fields[1], line_number)?;
        tgf.edges.push(HalaBone { start, end });
      } else {
        if fields.len() < 4 {
          return Err(parse_error(line_number, "a vertex needs an index and three coordinates"));
        }
        let index = parse_index(fields[0], line_number)?;
        if index != tgf.positions.len() {
          return Err(parse_error(line_number, "vertex indices must be consecutive"));
        }
        tgf.positions.push(DVec3::new(
          parse_coordinate(fields[1], line_number)?,
          parse_coordinate(fields[2], line_number)?,
          parse_coordinate(fields[3], line_number)?,
        ));
      }
    }

    if let Some(edge) = tgf.edges.iter().find(|edge| edge.start >= tgf.positions.len() || edge.end >= tgf.positions.len()) {
      return Err(HalaRigError::new(
        HalaRigErrorKind::Parse,
        &format!("Edge {} {} refers to a missing vertex.", edge.start + 1, edge.end + 1),
        None));
    }
    Ok(tgf)
  }
}

fn parse_error(line_number: usize, reason: &str) -> HalaRigError {
  HalaRigError::new(HalaRigErrorKind::Parse, &format!("Malformed TGF line {}: {}.", line_number, reason), None)
}

/// Parse a 1-based index into a 0-based one.
fn parse_index(field: &str, line_number: usize) -> Result<usize, HalaRigError> {
  match field.parse::<usize>() {
    Ok(index) if index >= 1 => Ok(index - 1),
    _ => Err(parse_error(line_number, &format!("\"{}\" is not a 1-based index", field))),
  }
}

fn parse_coordinate(field: &str, line_number: usize) -> Result<f64, HalaRigError> {
  field.parse::<f64>()
    .map_err(|err| HalaRigError::new(
      HalaRigErrorKind::Parse,
      &format!("Malformed TGF line {}: \"{}\" is not a number.", line_number, field),
      Some(Box::new(err))))
}

#[cfg(test)]
mod tests {
  use super::*;

  fn joint(name: &str, position: DVec3) -> HalaJoint {
    HalaJoint {
      name: name.to_owned(),
      position,
      parent: None,
    }
  }

  #[test]
  fn writes_one_based_graph() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("leg.tgf");
    let joints = vec![
      joint("hip", DVec3::new(0.0, 1.0, 0.0)),
      joint("knee", DVec3::new(0.1, 0.5, -0.25)),
    ];
    HalaTgf::write(&path, &joints, &[HalaBone { start: 0, end: 1 }]).unwrap();

    let text = std::fs::read_to_string(&path).unwrap();
    assert_eq!(text, "1 0 1 0\n2 0.10000000000000001 0.5 -0.25\n#\n1 2 1 0 0\n");
  }

  #[test]
  fn reads_back_what_it_writes() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("arm.tgf");
    let joints = vec![
      joint("a", DVec3::new(1.0 / 3.0, -2.0e-7, 12345.678)),
      joint("b", DVec3::new(std::f64::consts::PI, 0.0, -1.0e300)),
      joint("c", DVec3::new(0.7, 0.2, 0.1)),
    ];
    let bones = vec![HalaBone { start: 0, end: 1 }, HalaBone { start: 1, end: 2 }];
    HalaTgf::write(&path, &joints, &bones).unwrap();

    let tgf = HalaTgf::read(&path).unwrap();
    let positions = joints.iter().map(|joint| joint.position).collect::<Vec<_>>();
    assert_eq!(tgf.positions, positions);
    assert_eq!(tgf.edges, bones);
  }

  #[test]
  fn empty_graph_is_only_the_separator() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("empty.tgf");
    HalaTgf::write(&path, &[], &[]).unwrap();
    assert_eq!(std::fs::read_to_string(&path).unwrap(), "#\n");
    assert_eq!(HalaTgf::read(&path).unwrap(), HalaTgf::default());
  }

  #[test]
  fn bone_outside_joints_is_rejected_before_writing() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("bad.tgf");
    let joints = vec![joint("a", DVec3::ZERO)];
    let err = HalaTgf::write(&path, &joints, &[HalaBone { start: 0, end: 1 }]).unwrap_err();
    assert_eq!(err.kind(), HalaRigErrorKind::DimensionMismatch);
    assert!(!path.exists());
  }

  #[test]
  fn unwritable_path_is_an_io_error() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("missing").join("leg.tgf");
    let err = HalaTgf::write(&path, &[], &[]).unwrap_err();
    assert_eq!(err.kind(), HalaRigErrorKind::Io);
  }

  #[test]
  fn malformed_text_is_rejected() {
    for text in ["1 0 0\n#\n", "2 0 0 0\n#\n", "1 0 0 x\n#\n", "1 0 0 0\n#\n1 2 1 0 0\n", "1 0 0 0\n#\n0 1\n"] {
      let err = HalaTgf::parse(text).unwrap_err();
      assert_eq!(err.kind(), HalaRigErrorKind::Parse, "parsing {:?}", text);
    }
  }
}
