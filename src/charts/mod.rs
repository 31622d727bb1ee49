//! Bar and line charts of regional data.
//!
//! Building a chart ([`spec`]) is pure; writing it out ([`render`]) is the
//! only step with side effects.

pub mod render;
pub mod spec;

pub use render::{ChartFormat, HtmlRenderer, JsonRenderer, Renderer};
pub use spec::{
    ChartKind, ChartSpec, Point, Series, average_bar_chart, timeline_all_chart, timeline_chart,
};
