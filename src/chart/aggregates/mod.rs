//! Grammar nodes over the flat chart record stream.
//!
//! Every node is parsed greedily with one record of lookahead. The only
//! speculative step is telling IVAXIS from DVAXIS inside AXES, which goes
//! through [`RecordStream::try_parse`](crate::chart::stream::RecordStream::try_parse).
//!
//! Nodes keep every record they matched, so visiting a node replays the
//! input order exactly. Context a node needs from its ancestors (label and
//! frame contexts, series and label ordinals) is passed down while visiting.

pub mod axis;
pub mod chart_formats;
pub mod chart_group;
pub mod fragments;
pub mod label;
pub mod series;

pub use axis::{AxisKind, AxisParent, AxisSet, AxisStyle, Axes, ChartAxis, DisplayUnits};
pub use chart_formats::{ChartFormats, ChartSheet};
pub use chart_group::{ChartGroup, DataTable, DropBar, Legend};
pub use fragments::{ContinuedRecord, CrtMlFrt, FontEntry, FontList, Frame, GelFrame, PicF, ShapeProps, TextProps};
pub use label::{Ai, AttachedLabel, DataLabel, DefaultText};
pub use series::{DataFormat, LegendException, LegendExceptionLabel, SeriesFormat, SeriesLink};
