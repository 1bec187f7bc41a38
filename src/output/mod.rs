pub mod formatter;

pub use formatter::{
    format_breakdown, format_json, format_scoring, format_table, format_tsv, should_use_colors,
    EMPTY_MESSAGE,
};
