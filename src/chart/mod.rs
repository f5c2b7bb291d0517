//! BIFF chart substreams.
//!
//! [`record`] holds the flat record codec, [`aggregates`] groups records
//! into the chart grammar, and [`serializer`] writes the grammar back out
//! with `StartBlock`/`EndBlock` markers rebuilt from [`block`].

pub mod aggregates;
pub mod block;
pub mod record;
pub mod serializer;
pub mod stream;

pub use aggregates::ChartSheet;
pub use block::{BlockMarker, FrameContext, LabelContext, MarkerSource, ObjectKind};
pub use record::{ChartRecord, decode_chart_records, encode_chart_records, sid};
pub use serializer::{ChartSerializer, ChartWriteOptions, RecordVisitor, SizeCounter};
pub use stream::RecordStream;
