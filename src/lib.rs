pub mod config;
pub mod duration;
pub mod emit;
pub mod exclusion;
pub mod graph;
#[cfg(feature = "http_api")]
pub mod http_api;
pub mod input;
pub mod render;
pub mod schedule;
pub mod task;
pub mod validation;

pub use config::{ChartConfig, DisplayMode};
pub use duration::{
    Duration, DurationUnit, TaskDuration, format_duration, is_duration_shorthand, is_iso_date,
};
pub use emit::{ConversionResult, convert, convert_with, emit};
pub use exclusion::{Exclusion, ExclusionParseError};
pub use graph::DependencyGraph;
pub use input::{
    ConvertFileError, FileConversion, InputError, InputFormat, convert_file, convert_files,
    load_schedule, load_schedule_from_csv, load_schedule_from_json, parse_schedule_json,
};
pub use render::{DiagramIds, DiagramRenderer, RenderError, RenderSession, RenderedDiagram};
pub use schedule::{Schedule, Section};
pub use task::{Task, TaskStatus, UnknownStatus, format_status_list};
pub use validation::{ValidationError, ValidationOptions, validate, validate_with};
