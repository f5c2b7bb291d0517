//! Human-readable record tree listing.

use super::record::EscherRecord;
use std::fmt::{self, Write};

impl fmt::Display for EscherRecord {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write_record(f, self, 0)
    }
}

/// Render `records` as an indented tree, one record per line.
pub fn dump_records(records: &[EscherRecord]) -> String {
    let mut out = String::new();
    for record in records {
        // Writing into a String cannot fail.
        let _ = write_record(&mut out, record, 0);
    }
    out
}

fn write_record(out: &mut impl Write, record: &EscherRecord, depth: usize) -> fmt::Result {
    let indent = "  ".repeat(depth);
    write!(
        out,
        "{indent}{} (0x{:04X}) ver=0x{:X} inst=0x{:03X} size={}",
        record.record_name(),
        record.record_id(),
        record.version(),
        record.instance(),
        record.record_size()
    )?;

    match record {
        EscherRecord::Sp(sp) => write!(out, " shape_id={} flags={:?}", sp.shape_id(), sp.flags())?,
        EscherRecord::Dg(dg) => write!(out, " shapes={} last_id={}", dg.num_shapes(), dg.last_shape_id())?,
        EscherRecord::Dgg(dgg) => write!(
            out,
            " max_id={} clusters={}",
            dgg.shape_id_max(),
            dgg.file_id_clusters().len()
        )?,
        EscherRecord::Container(c) if c.remaining_length() > 0 => {
            write!(out, " truncated_by={}", c.remaining_length())?
        },
        _ => {},
    }
    writeln!(out)?;

    if let EscherRecord::Opt(opt) = record {
        for property in opt.properties() {
            writeln!(out, "{indent}  - {property}")?;
        }
    }
    for child in record.child_records() {
        write_record(out, child, depth + 1)?;
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::escher::container::EscherContainerRecord;
    use crate::escher::properties::EscherProperty;
    use crate::escher::records::{EscherOptRecord, EscherSpRecord, ShapeFlags};
    use crate::escher::types::record_id;

    #[test]
    fn test_dump_tree() {
        let mut opt = EscherOptRecord::default();
        opt.add_property(EscherProperty::simple(0x0004, 90));
        let mut container = EscherContainerRecord::new(record_id::SP_CONTAINER);
        container.add_child(EscherRecord::Sp(EscherSpRecord::new(1, 1025, ShapeFlags::HAVE_SPT)));
        container.add_child(EscherRecord::Opt(opt));

        let text = dump_records(&[EscherRecord::Container(container)]);
        let lines: Vec<&str> = text.lines().collect();
        assert_eq!(lines.len(), 4);
        assert!(lines[0].starts_with("SpContainer (0xF004)"));
        assert!(lines[1].starts_with("  Sp (0xF00A)"));
        assert!(lines[1].contains("shape_id=1025"));
        assert!(lines[3].contains("transform.rotation"));
    }
}
